//! Output formatting module
//!
//! Renders benchmark reports and probe output.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
