//! WordPress.org plugin reviews tap.
//!
//! Scrapes plugin reviews from the WordPress.org support forums and emits
//! them as Singer records, one plugin at a time.

pub mod config;
pub mod constants;
pub mod error;
pub mod singer;
pub mod wordpress;

pub use error::{Error, Result};
