//! # CLI Commands
//!
//! Contains modules that run the commands.

pub mod cat;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("Input file could not be loaded")]
    LoadFailed,
    #[error("Output file could not be saved")]
    SaveFailed
}
