pub mod charts;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod report;

pub use config::Config;
pub use error::{Result, WranglerError};
