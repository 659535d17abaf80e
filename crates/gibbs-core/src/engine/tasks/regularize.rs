use crate::core::model::phase::{Coordinate, DomainBound, PhaseModel, Side};
use crate::core::model::surface::{EnergySurface, Representation};
use crate::core::model::{X_CR, X_NB, X_NI};
use crate::core::symbolic::{Expr, simplify, substitute};
use crate::engine::config::PhaseParams;
use crate::engine::error::EngineError;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Weight a funnel loses at a corner where an adjacent boundary is also
/// active, so corner regions are not double-counted.
const CORNER_WEIGHT: f64 = 0.25;

/// Blends a surface with linear funnel guards into a single expression that
/// is defined and C1-smooth over the whole composition plane.
///
/// For each domain bound a tanh step weight is raised across the threshold;
/// the core weight (an inclusion-exclusion combination of all step weights)
/// fades the true surface out as any boundary is crossed, while each funnel
/// fades in over its own direction. Deep in the interior the result equals
/// the input surface; far past a boundary it equals that boundary's funnel.
#[instrument(skip_all, fields(phase = %model.phase()), name = "regularize_task")]
pub fn run(
    model: &PhaseModel,
    surface: &EnergySurface,
    params: &PhaseParams,
) -> Result<EnergySurface, EngineError> {
    let bounds = model.domain();
    let weights: Vec<Expr> = bounds
        .iter()
        .map(|bound| blend_weight(bound, params.alpha))
        .collect();

    let core = core_weight(&bounds, &weights);
    let mut blended = core * surface.expr().clone();

    for (index, bound) in bounds.iter().enumerate() {
        // Every boundary on the *other* physical coordinate that is active at
        // the same time shaves a fixed corner weight off this funnel.
        let mut corner_factor = Expr::one();
        for (other_index, other) in bounds.iter().enumerate() {
            if other_index != index && other.coordinate != bound.coordinate {
                corner_factor = corner_factor
                    - Expr::constant(CORNER_WEIGHT) * weights[other_index].clone();
            }
        }
        blended = blended
            + weights[index].clone() * corner_factor * funnel_function(bound, params);
    }

    // The dependent coordinate is eliminated once, after assembly.
    let mut map = HashMap::new();
    map.insert(
        X_NI.to_string(),
        Expr::one() - Expr::symbol(X_CR) - Expr::symbol(X_NB),
    );
    let closed = substitute(&blended, &map);
    let regularized = simplify(&closed)?;
    debug!(
        nodes = regularized.node_count(),
        boundaries = bounds.len(),
        "Regularized {} over the full composition plane.",
        model.phase()
    );

    Ok(EnergySurface::new(
        model.phase(),
        Representation::Regularized,
        regularized,
    ))
}

/// Smooth step that rises from 0 to 1 as the coordinate crosses its
/// threshold, over a transition width set by `alpha`. The half-`alpha` shift
/// centers the transition on the threshold itself.
fn blend_weight(bound: &DomainBound, alpha: f64) -> Expr {
    let coordinate = Expr::symbol(bound.coordinate.symbol());
    let distance = match bound.side {
        Side::Lower => Expr::constant(bound.threshold + 0.5 * alpha) - coordinate,
        Side::Upper => coordinate - Expr::constant(bound.threshold - 0.5 * alpha),
    };
    Expr::constant(0.5)
        * (Expr::one() + (Expr::constant(std::f64::consts::TAU / alpha) * distance).tanh())
}

/// Inclusion-exclusion core weight: 1 in the interior (all steps 0), fading
/// to 0 once any single boundary is crossed.
///
/// Grouped as a product over coordinate families, `prod_c (1 - sum psi_c)`.
/// For two bounded coordinates this expands to exactly
/// `1 - sum psi + sum (cross-coordinate pair products)`: a lower and upper
/// bound of the same coordinate can never be active together, so no
/// same-coordinate pair ever appears, and no negative weight leaks at
/// corners. The grouped form stays exact even where three coordinate
/// families fire at once, which the hand-expanded pair sum does not.
fn core_weight(bounds: &[DomainBound], weights: &[Expr]) -> Expr {
    let mut core = Expr::one();
    for coordinate in [Coordinate::Cr, Coordinate::Nb, Coordinate::Ni] {
        let mut family = Expr::one();
        let mut bounded = false;
        for (bound, weight) in bounds.iter().zip(weights) {
            if bound.coordinate == coordinate {
                family = family - weight.clone();
                bounded = true;
            }
        }
        if bounded {
            core = core * family;
        }
    }
    core
}

/// Affine guard that dominates the true energy beyond its boundary.
fn funnel_function(bound: &DomainBound, params: &PhaseParams) -> Expr {
    let coordinate = Expr::symbol(bound.coordinate.symbol());
    match bound.side {
        Side::Lower => {
            Expr::constant(params.funnel.intercept)
                - Expr::constant(params.funnel.slope) * coordinate
        }
        Side::Upper => {
            Expr::constant(params.funnel.intercept)
                + Expr::constant(params.funnel.slope)
                    * (coordinate - Expr::constant(bound.threshold))
        }
    }
}
