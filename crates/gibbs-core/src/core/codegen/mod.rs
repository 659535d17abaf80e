//! Serialization of named symbolic expressions into evaluable source text.
//!
//! The only target currently supported is C, matching what the downstream
//! phase-field solver links against.

pub mod c;

pub use c::{CodeGenerator, CodegenError, EmittedFiles, Routine};
