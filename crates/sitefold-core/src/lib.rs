//! Sitefold Core Library
//!
//! Core types, configuration, and error handling for the sitefold bundler.

pub mod config;
pub mod error;
pub mod source;

pub use config::Config;
pub use error::{CoreError, Result};
pub use source::SourceFile;
