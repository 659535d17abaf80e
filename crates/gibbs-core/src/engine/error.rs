use thiserror::Error;

use crate::core::codegen::CodegenError;
use crate::core::model::composition::Composition;
use crate::core::model::phase::Phase;
use crate::core::symbolic::{EvalError, ParseError, SimplifyError};

#[derive(Debug, Error)]
pub enum EngineError {
    /// A phase/database mismatch: the database expression references a
    /// constituent the substitution map does not cover. Not recoverable.
    #[error("Phase {phase}: substitution left unresolved constituent symbol '{symbol}'")]
    UnknownConstituent { phase: Phase, symbol: String },

    #[error(
        "Phase {phase}: anchor ({x_cr}, {x_nb}) lies outside the phase domain",
        x_cr = anchor.x_cr,
        x_nb = anchor.x_nb
    )]
    AnchorOutsideDomain { phase: Phase, anchor: Composition },

    #[error("Unsupported polynomial order {order} (supported: 0, 2, 3, 4)")]
    UnsupportedOrder { order: usize },

    #[error("Phase expression parse failure: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("Simplification failure: {source}")]
    Simplification {
        #[from]
        source: SimplifyError,
    },

    /// Raised when a stage needs a numeric value (e.g. a Taylor coefficient)
    /// and evaluation fails; an anchor inside its domain never triggers this.
    #[error("Evaluation failure: {source}")]
    Evaluation {
        #[from]
        source: EvalError,
    },

    #[error("Emission failure: {source}")]
    Emission {
        #[from]
        source: CodegenError,
    },

    #[error("Missing configuration for phase {0}")]
    MissingPhaseConfig(Phase),

    #[error("No expression supplied for phase {0}")]
    MissingPhaseExpression(Phase),

    #[error("Database phase '{0}' is not part of the Cr-Nb-Ni model")]
    UnknownDatabasePhase(String),

    #[error("Worker pool construction failed: {0}")]
    WorkerPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
