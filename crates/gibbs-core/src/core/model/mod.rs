//! Thermodynamic data model for the fixed Cr-Nb-Ni phase set.
//!
//! All types here are constructed once and never mutated; pipeline stages
//! consume them and produce new values.

pub mod composition;
pub mod derivatives;
pub mod phase;
pub mod surface;

/// Independent system-composition variable: mole fraction of Cr in the phase.
pub const X_CR: &str = "XCR";
/// Independent system-composition variable: mole fraction of Nb in the phase.
pub const X_NB: &str = "XNB";
/// Dependent composition variable, always `1 - XCR - XNB`.
pub const X_NI: &str = "XNI";
/// Temperature symbol used by the database expressions.
pub const TEMPERATURE: &str = "T";
