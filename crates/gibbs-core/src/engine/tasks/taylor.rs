use crate::core::model::composition::Composition;
use crate::core::model::phase::PhaseModel;
use crate::core::model::surface::{EnergySurface, Representation, composition_vars};
use crate::core::model::{X_CR, X_NB};
use crate::core::symbolic::{Expr, diff, eval, simplify};
use crate::engine::error::EngineError;
use tracing::{debug, instrument};

/// Truncated bivariate Taylor expansion of a reduced surface about an anchor.
///
/// The coefficient of `(x - x0)^a (y - y0)^b` is the mixed partial
/// `d^(a+b) E / dx^a dy^b` evaluated at the anchor, divided by `a! b!`. The
/// result matches the source surface's value and every partial derivative up
/// to the requested order exactly at the anchor; away from it the error grows
/// with the neglected higher-order terms.
#[instrument(skip_all, fields(phase = %model.phase(), order = order), name = "taylor_task")]
pub fn run(
    model: &PhaseModel,
    surface: &EnergySurface,
    anchor: &Composition,
    order: usize,
) -> Result<EnergySurface, EngineError> {
    if !matches!(order, 0 | 2..=4) {
        return Err(EngineError::UnsupportedOrder { order });
    }
    if !model.contains(anchor) {
        return Err(EngineError::AnchorOutsideDomain {
            phase: model.phase(),
            anchor: *anchor,
        });
    }

    // partials[a][b] = d^(a+b) E / dXCR^a dXNB^b, for a + b <= order.
    let mut partials: Vec<Vec<Expr>> = Vec::with_capacity(order + 1);
    partials.push(vec![surface.expr().clone()]);
    for a in 1..=order {
        let next = simplify(&diff(&partials[a - 1][0], X_CR))?;
        partials.push(vec![next]);
    }
    for a in 0..=order {
        for b in 1..=(order - a) {
            let next = simplify(&diff(&partials[a][b - 1], X_NB))?;
            partials[a].push(next);
        }
    }

    let vars = composition_vars(anchor);
    let dx = || Expr::symbol(X_CR) - Expr::constant(anchor.x_cr);
    let dy = || Expr::symbol(X_NB) - Expr::constant(anchor.x_nb);

    let mut polynomial = Expr::zero();
    for degree in 0..=order {
        for a in (0..=degree).rev() {
            let b = degree - a;
            let coefficient =
                eval(&partials[a][b], &vars)? / (factorial(a) * factorial(b));
            let mut term = Expr::constant(coefficient);
            if a > 0 {
                term = term * dx().powi(a as i32);
            }
            if b > 0 {
                term = term * dy().powi(b as i32);
            }
            polynomial = polynomial + term;
        }
    }

    let polynomial = simplify(&polynomial)?;
    debug!(
        nodes = polynomial.node_count(),
        "Expanded {} to order {} about ({}, {}).",
        model.phase(),
        order,
        anchor.x_cr,
        anchor.x_nb
    );

    Ok(EnergySurface::new(
        model.phase(),
        Representation::Polynomial,
        polynomial,
    ))
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}
