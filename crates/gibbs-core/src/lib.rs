//! # Gibbs625 Core Library
//!
//! Closed-form Gibbs free-energy landscape generation for the ternary Cr-Nb-Ni
//! system (superalloy 625), turning multi-sublattice CALPHAD expressions into
//! numerically evaluable energy functions for a phase-field solver.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the immutable symbolic expression tree
//!   (`symbolic`), the thermodynamic data model (`model`), and the C code emitter
//!   (`codegen`). Everything here is stateless and pure.
//!
//! - **[`engine`]: The Logic Core.** This layer orchestrates the landscape
//!   construction pipeline. It holds the per-phase configuration structs and the
//!   pipeline stages (`tasks`): sublattice reduction, local polynomial expansion,
//!   boundary regularization, and exact derivative generation.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It ties
//!   the `engine` and `core` together to execute complete procedures: generating the
//!   full set of emitted energy functions, and sampling the resulting landscapes over
//!   dense composition grids.

pub mod core;
pub mod engine;
pub mod workflows;
