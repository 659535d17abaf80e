use crate::core::model::phase::PhaseModel;
use crate::core::model::surface::{EnergySurface, Representation};
use crate::core::model::{X_CR, X_NB};
use crate::core::symbolic::{Expr, simplify, substitute};
use crate::engine::config::Conditions;
use crate::engine::error::EngineError;
use tracing::{debug, instrument};

/// Reduces a phase's raw sublattice expression to a function of the two free
/// composition variables, pins temperature, and converts J/mol to J/m^3.
///
/// Pure transformation: the [`PhaseModel`] is not touched. Any site-fraction
/// symbol the substitution map does not cover indicates a phase/database
/// mismatch and fails the stage.
#[instrument(skip_all, fields(phase = %model.phase()), name = "reduction_task")]
pub fn run(model: &PhaseModel, conditions: &Conditions) -> Result<EnergySurface, EngineError> {
    let map = model.substitution(conditions.temperature);
    let substituted = substitute(model.raw_expression(), &map);

    for symbol in substituted.free_symbols() {
        if symbol != X_CR && symbol != X_NB {
            return Err(EngineError::UnknownConstituent {
                phase: model.phase(),
                symbol,
            });
        }
    }

    let per_volume = Expr::constant(1.0 / conditions.molar_volume) * substituted;
    let reduced = simplify(&per_volume)?;
    debug!(
        nodes = reduced.node_count(),
        "Reduced {} to system-composition variables.",
        model.phase()
    );

    Ok(EnergySurface::new(
        model.phase(),
        Representation::Raw,
        reduced,
    ))
}
