pub mod cli;
pub mod config;
pub mod error;

pub use cli::Args;
pub use config::ClientConfig;
pub use error::ClientError;
