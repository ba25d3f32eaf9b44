//! CLI subcommand implementations.

pub mod add;
pub mod edit;
pub mod habit;
pub mod mv;
pub mod new;
pub mod path;
pub mod rm;
pub mod show;
pub mod util;
pub mod watch;
