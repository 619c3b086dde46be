pub mod config;
mod error;
pub mod utils;

pub use config::*;
pub use error::*;
