use crate::core::model::composition::Composition;
use crate::core::model::surface::EnergySurface;
use crate::core::symbolic::EvalError;
use crate::engine::config::LandscapeSettings;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use std::io::Write;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One sampled grid point. Phases evaluate independently; `None` records a
/// domain violation (expected for raw surfaces outside their simplex region),
/// never a pipeline failure.
#[derive(Debug, Clone, PartialEq)]
pub struct LandscapeRow {
    pub x_cr: f64,
    pub x_nb: f64,
    pub energies: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct Landscape {
    pub phase_names: Vec<&'static str>,
    pub rows: Vec<LandscapeRow>,
}

impl Landscape {
    /// Rows are already sorted by (x_cr, x_nb); output is byte-identical from
    /// run to run regardless of worker scheduling.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let mut header = vec!["x_cr".to_string(), "x_nb".to_string()];
        header.extend(self.phase_names.iter().map(|name| format!("g_{name}")));
        csv_writer.write_record(&header)?;
        for row in &self.rows {
            let mut record = vec![format!("{:?}", row.x_cr), format!("{:?}", row.x_nb)];
            record.extend(row.energies.iter().map(|energy| match energy {
                Some(value) => format!("{:?}", value),
                None => String::new(),
            }));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Samples the given surfaces (one per phase, all the same representation)
/// over a uniform grid on the unit composition square.
///
/// Embarrassingly parallel: each worker evaluates independent grid points
/// with no shared state, and every result record carries its own coordinates,
/// so ordering across workers is irrelevant.
#[instrument(skip_all, fields(steps = settings.steps), name = "landscape_workflow")]
pub fn run(
    surfaces: &[EnergySurface],
    settings: &LandscapeSettings,
    reporter: &ProgressReporter,
) -> Result<Landscape, EngineError> {
    let phase_names: Vec<&'static str> = surfaces
        .iter()
        .map(|surface| surface.phase().short_name())
        .collect();

    let steps = settings.steps.max(2);
    let denominator = (steps - 1) as f64;
    let points: Vec<Composition> = (0..steps)
        .cartesian_product(0..steps)
        .map(|(i, j)| Composition::new(i as f64 / denominator, j as f64 / denominator))
        .collect();

    reporter.report(Progress::TaskStart {
        total_steps: points.len() as u64,
    });
    info!(
        "Sampling {} grid points across {} workers.",
        points.len(),
        settings.workers
    );

    let sample = |point: &Composition| -> Result<LandscapeRow, EngineError> {
        let mut energies = Vec::with_capacity(surfaces.len());
        for surface in surfaces {
            match surface.eval_at(point) {
                Ok(value) => energies.push(Some(value)),
                // Soft failure: the point is outside this surface's domain.
                Err(EvalError::DomainViolation { .. }) => energies.push(None),
                Err(err @ EvalError::UnboundSymbol(_)) => {
                    return Err(EngineError::Evaluation { source: err });
                }
            }
        }
        reporter.report(Progress::TaskIncrement);
        Ok(LandscapeRow {
            x_cr: point.x_cr,
            x_nb: point.x_nb,
            energies,
        })
    };

    #[cfg(feature = "parallel")]
    let rows: Result<Vec<LandscapeRow>, EngineError> = {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.workers)
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        pool.install(|| points.par_iter().map(sample).collect())
    };

    #[cfg(not(feature = "parallel"))]
    let rows: Result<Vec<LandscapeRow>, EngineError> = points.iter().map(sample).collect();

    let rows = rows?;
    reporter.report(Progress::TaskFinish);

    Ok(Landscape { phase_names, rows })
}
