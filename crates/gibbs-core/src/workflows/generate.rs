use crate::core::codegen::{CodeGenerator, EmittedFiles, Routine};
use crate::core::model::derivatives::DerivativeSet;
use crate::core::model::phase::{Phase, PhaseModel};
use crate::core::model::surface::{EnergySurface, Representation};
use crate::core::symbolic::Expr;
use crate::engine::config::GeneratorConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use std::path::Path;
use tracing::{info, instrument};

const GAS_CONSTANT: f64 = 8.3144598;
const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

/// The raw Gibbs-energy expressions for all four phases, in sublattice
/// site-fraction symbols, as handed over by the database collaborator.
#[derive(Debug, Clone)]
pub struct PhaseExpressions {
    pub gamma: Expr,
    pub delta: Expr,
    pub mu: Expr,
    pub laves: Expr,
}

impl PhaseExpressions {
    pub fn get(&self, phase: Phase) -> &Expr {
        match phase {
            Phase::Gamma => &self.gamma,
            Phase::Delta => &self.delta,
            Phase::Mu => &self.mu,
            Phase::Laves => &self.laves,
        }
    }

    /// Builds the set from `(database name, expression)` pairs, requiring
    /// exactly the four modeled phases.
    pub fn from_named(
        entries: impl IntoIterator<Item = (String, Expr)>,
    ) -> Result<Self, EngineError> {
        let mut slots: [Option<Expr>; 4] = [None, None, None, None];
        for (name, expr) in entries {
            let phase = Phase::from_database_name(&name)
                .ok_or_else(|| EngineError::UnknownDatabasePhase(name.clone()))?;
            let index = Phase::ALL.iter().position(|p| *p == phase).unwrap();
            slots[index] = Some(expr);
        }
        let mut taken = slots.into_iter();
        let mut next = |phase: Phase| {
            taken
                .next()
                .flatten()
                .ok_or(EngineError::MissingPhaseExpression(phase))
        };
        Ok(Self {
            gamma: next(Phase::Gamma)?,
            delta: next(Phase::Delta)?,
            mu: next(Phase::Mu)?,
            laves: next(Phase::Laves)?,
        })
    }
}

/// All three representations of every phase, in [`Phase::ALL`] order.
#[derive(Debug, Clone)]
pub struct SurfaceSet {
    pub raw: Vec<EnergySurface>,
    pub polynomial: Vec<EnergySurface>,
    pub regularized: Vec<EnergySurface>,
}

impl SurfaceSet {
    pub fn of(&self, representation: Representation) -> &[EnergySurface] {
        match representation {
            Representation::Raw => &self.raw,
            Representation::Polynomial => &self.polynomial,
            Representation::Regularized => &self.regularized,
        }
    }
}

#[derive(Debug)]
pub struct GenerateResult {
    pub surfaces: SurfaceSet,
    pub artifacts: Vec<EmittedFiles>,
}

/// Builds the raw, polynomial, and regularized surfaces for every phase.
///
/// Stages run strictly leaf-to-root: reduction feeds both the polynomial
/// expansion and the regularizer; nothing is mutated in place.
pub fn build_surfaces(
    expressions: &PhaseExpressions,
    config: &GeneratorConfig,
) -> Result<SurfaceSet, EngineError> {
    let mut raw = Vec::with_capacity(Phase::ALL.len());
    let mut polynomial = Vec::with_capacity(Phase::ALL.len());
    let mut regularized = Vec::with_capacity(Phase::ALL.len());

    for phase in Phase::ALL {
        let model = PhaseModel::new(phase, expressions.get(phase).clone());
        let params = config.phase_params(phase);

        let reduced = tasks::reduction::run(&model, &config.conditions)?;
        polynomial.push(tasks::taylor::run(
            &model,
            &reduced,
            &params.expansion_anchor,
            config.order,
        )?);
        regularized.push(tasks::regularize::run(&model, &reduced, params)?);
        raw.push(reduced);
    }

    Ok(SurfaceSet {
        raw,
        polynomial,
        regularized,
    })
}

/// Runs the full pipeline: database expressions in, three groups of emitted
/// C functions out, one group per representation.
#[instrument(skip_all, name = "generate_workflow")]
pub fn run(
    expressions: &PhaseExpressions,
    config: &GeneratorConfig,
    out_dir: &Path,
    overwrite: bool,
    reporter: &ProgressReporter,
) -> Result<GenerateResult, EngineError> {
    // === Stage 1: Landscape construction ===
    reporter.report(Progress::StageStart {
        name: "Constructing energy surfaces",
    });
    info!(
        "Constructing {} K landscapes for {} phases.",
        config.conditions.temperature,
        Phase::ALL.len()
    );
    let surfaces = build_surfaces(expressions, config)?;
    reporter.report(Progress::StageFinish);

    // === Stage 2: Derivative generation ===
    reporter.report(Progress::StageStart {
        name: "Generating derivatives",
    });
    let mut derivative_sets: Vec<Vec<DerivativeSet>> = Vec::with_capacity(3);
    for representation in Representation::ALL {
        let sets = surfaces
            .of(representation)
            .iter()
            .map(tasks::derive::run)
            .collect::<Result<Vec<_>, _>>()?;
        derivative_sets.push(sets);
    }
    reporter.report(Progress::StageFinish);

    // === Stage 3: Emission ===
    reporter.report(Progress::StageStart {
        name: "Emitting C functions",
    });
    let generator = CodeGenerator::new(config.project.clone());
    let mut artifacts = Vec::with_capacity(3);
    for (representation, sets) in Representation::ALL.iter().zip(&derivative_sets) {
        let prefix = format!("{}{}", representation.label(), config.file_tag);
        let routines = assemble_routines(config, sets);
        let files = generator.emit(&prefix, &routines, out_dir, overwrite)?;
        info!("Emitted {} group to {}.", representation.label(), files.source.display());
        artifacts.push(files);
    }
    reporter.report(Progress::StageFinish);

    Ok(GenerateResult {
        surfaces,
        artifacts,
    })
}

/// Fixed routine ordering: energies, anchor and physical constants, first
/// derivatives, then second derivatives. The order is part of the output
/// contract; re-running the pipeline must reproduce artifacts byte for byte.
fn assemble_routines(config: &GeneratorConfig, sets: &[DerivativeSet]) -> Vec<Routine> {
    let mut routines = Vec::new();

    for (phase, set) in Phase::ALL.iter().zip(sets) {
        routines.push(Routine::new(
            format!("g_{}", phase.short_name()),
            set.value.clone(),
        ));
    }

    for phase in Phase::ALL {
        let anchor = config.phase_params(phase).equilibrium_anchor;
        let tag = phase.short_name();
        routines.push(Routine::new(
            format!("xe_{tag}_Cr"),
            Expr::constant(anchor.x_cr),
        ));
        routines.push(Routine::new(
            format!("xe_{tag}_Nb"),
            Expr::constant(anchor.x_nb),
        ));
    }
    routines.push(Routine::new(
        "xe_lav_Ni",
        Expr::constant(config.laves.equilibrium_anchor.x_ni()),
    ));
    routines.push(Routine::new(
        "RT",
        Expr::constant(GAS_CONSTANT * config.conditions.temperature),
    ));
    routines.push(Routine::new(
        "kT",
        Expr::constant(BOLTZMANN_CONSTANT * config.conditions.temperature),
    ));
    routines.push(Routine::new(
        "Vm",
        Expr::constant(config.conditions.molar_volume),
    ));

    for (phase, set) in Phase::ALL.iter().zip(sets) {
        let tag = phase.short_name();
        routines.push(Routine::new(format!("dg_{tag}_dxCr"), set.d_dx_cr.clone()));
        routines.push(Routine::new(format!("dg_{tag}_dxNb"), set.d_dx_nb.clone()));
    }

    for (phase, set) in Phase::ALL.iter().zip(sets) {
        let tag = phase.short_name();
        routines.push(Routine::new(
            format!("d2g_{tag}_dxCrCr"),
            set.d2_dx_cr_cr.clone(),
        ));
        routines.push(Routine::new(
            format!("d2g_{tag}_dxCrNb"),
            set.d2_dx_cr_nb.clone(),
        ));
        routines.push(Routine::new(
            format!("d2g_{tag}_dxNbCr"),
            set.d2_dx_cr_nb.clone(),
        ));
        routines.push(Routine::new(
            format!("d2g_{tag}_dxNbNb"),
            set.d2_dx_nb_nb.clone(),
        ));
    }

    routines
}
