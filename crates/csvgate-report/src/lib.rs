//! Rendering of issue suites into text, tables and CI-native formats.

pub mod error;
pub mod format;

mod ci;
mod junit;
mod text;

pub use error::{ReportError, Result};
pub use format::{ReportFormat, render, render_all};
