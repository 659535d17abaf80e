use crate::core::model::derivatives::DerivativeSet;
use crate::core::model::surface::EnergySurface;
use crate::core::model::{X_CR, X_NB};
use crate::core::symbolic::{diff, simplify};
use crate::engine::error::EngineError;
use tracing::{debug, instrument};

/// Generates the closed-form gradient and Hessian of a surface.
///
/// Differentiation is exact tree rewriting; no numerical differencing
/// anywhere. The surfaces this pipeline produces are smooth, so the mixed
/// partial is computed once (XCR first, then XNB) and mirrored across the
/// diagonal.
#[instrument(skip_all, fields(phase = %surface.phase()), name = "derive_task")]
pub fn run(surface: &EnergySurface) -> Result<DerivativeSet, EngineError> {
    let value = surface.expr().clone();
    let d_dx_cr = simplify(&diff(&value, X_CR))?;
    let d_dx_nb = simplify(&diff(&value, X_NB))?;
    let d2_dx_cr_cr = simplify(&diff(&d_dx_cr, X_CR))?;
    let d2_dx_cr_nb = simplify(&diff(&d_dx_cr, X_NB))?;
    let d2_dx_nb_nb = simplify(&diff(&d_dx_nb, X_NB))?;

    debug!(
        gradient_nodes = d_dx_cr.node_count() + d_dx_nb.node_count(),
        "Generated derivative set for {} ({:?}).",
        surface.phase(),
        surface.representation()
    );

    Ok(DerivativeSet {
        value,
        d_dx_cr,
        d_dx_nb,
        d2_dx_cr_cr,
        d2_dx_cr_nb,
        d2_dx_nb_nb,
    })
}
