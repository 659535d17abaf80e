//! File I/O for the pipeline's external inputs.

pub mod expressions;

pub use expressions::{ExpressionsLoadError, load_named_expressions};
