//! # Workflows Module
//!
//! The public API layer. [`generate`] runs the complete landscape
//! construction pipeline from database expressions to emitted C artifacts;
//! [`landscape`] samples the constructed surfaces over a dense composition
//! grid for downstream analysis.

pub mod generate;
pub mod landscape;
