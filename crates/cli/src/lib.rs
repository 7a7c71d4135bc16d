//! Terminal output helpers for the fieldmap tools
//!
//! Provides shared CLI functionality:
//! - Status messages and summaries
//! - Distance and coordinate formatting
//! - Spinners for slow archive reads

#![warn(missing_docs)]

pub mod output;
pub mod progress;
