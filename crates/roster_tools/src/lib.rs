//! # Roster Development Tools
//!
//! Command-line tools for development:
//! - Army book validators
//! - Saved roster summaries

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod summary;
pub mod validate;
