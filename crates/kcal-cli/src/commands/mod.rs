//! CLI subcommand implementations.

pub mod add;
pub mod entries;
pub mod list;
pub mod status;
pub mod total;
pub mod util;
