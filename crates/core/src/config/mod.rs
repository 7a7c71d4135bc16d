//! Configuration loading and schema definitions
//!
//! Shared configuration types used by the fieldmap tools.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
