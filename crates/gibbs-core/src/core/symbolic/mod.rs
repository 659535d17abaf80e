//! Immutable symbolic expression trees and the pure rewrites defined on them.
//!
//! Expressions are shared structurally via [`std::sync::Arc`]; differentiation,
//! substitution, and simplification never mutate their input, they return new
//! trees that share unchanged subtrees with the original.

pub mod diff;
pub mod eval;
pub mod expr;
pub mod parse;
pub mod simplify;
pub mod subs;

pub use diff::diff;
pub use eval::{EvalError, eval};
pub use expr::Expr;
pub use parse::{ParseError, parse_expr};
pub use simplify::{SimplifyError, simplify};
pub use subs::substitute;
