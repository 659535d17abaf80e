//! The pipeline stages, leaf-first: sublattice reduction, local polynomial
//! expansion, boundary regularization, and derivative generation. Each stage
//! is a pure function from immutable inputs to a new value.

pub mod derive;
pub mod reduction;
pub mod regularize;
pub mod taylor;
