use super::composition::Composition;
use super::phase::Phase;
use super::{X_CR, X_NB};
use crate::core::symbolic::{EvalError, Expr, eval};
use std::collections::HashMap;

/// Which rendition of a phase's energy landscape an expression represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// The reduced database expression, undefined outside the physical domain.
    Raw,
    /// A local polynomial expansion about an anchor point.
    Polynomial,
    /// The globally defined blended/clamped surface.
    Regularized,
}

impl Representation {
    pub const ALL: [Representation; 3] = [
        Representation::Raw,
        Representation::Polynomial,
        Representation::Regularized,
    ];

    /// Label used to group emitted artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            Representation::Raw => "energy",
            Representation::Polynomial => "taylor",
            Representation::Regularized => "parabola",
        }
    }
}

/// One phase's energy landscape in the two free composition variables.
/// Immutable: every pipeline stage that transforms a surface returns a new one.
#[derive(Debug, Clone)]
pub struct EnergySurface {
    phase: Phase,
    representation: Representation,
    expr: Expr,
}

impl EnergySurface {
    pub fn new(phase: Phase, representation: Representation, expr: Expr) -> Self {
        Self {
            phase,
            representation,
            expr,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Numeric evaluation at a composition. A `DomainViolation` from a raw
    /// surface outside its domain is expected, not a pipeline failure.
    pub fn eval_at(&self, composition: &Composition) -> Result<f64, EvalError> {
        eval(&self.expr, &composition_vars(composition))
    }
}

pub fn composition_vars(composition: &Composition) -> HashMap<String, f64> {
    let mut vars = HashMap::new();
    vars.insert(X_CR.to_string(), composition.x_cr);
    vars.insert(X_NB.to_string(), composition.x_nb);
    vars
}
