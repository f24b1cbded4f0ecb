pub mod auto_concurrency;
pub mod cli;
pub mod config;
pub mod error;
pub mod parse;
pub mod pusher;
pub mod remote;
pub mod task_list;
pub mod util;

pub use error::ConfigError;
pub use error::TransferError;
