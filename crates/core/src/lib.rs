//! Core utilities for the fieldmap tools
//!
//! This crate provides shared functionality used by the fieldmap binaries:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldmap_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("clusters within {} km", config.schema.analysis.cluster_max_distance_km);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};
