//! CLI command handling

pub mod init;
pub mod output;
pub mod run;

pub use init::*;
pub use output::*;
pub use run::*;
