#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod error;
pub mod limit;
pub mod log;
pub mod runtime;
pub mod tools;
pub mod types;

mod tests;

pub use error::{FetchError, Result};
pub use limit::RateLimiter;
pub use types::*;
