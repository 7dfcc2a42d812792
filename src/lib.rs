pub mod cli;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod oracle;

pub use error::{OracleError, Result};
