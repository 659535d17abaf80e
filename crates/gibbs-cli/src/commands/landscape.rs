use crate::cli::LandscapeArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use gibbs625::core::model::surface::Representation;
use gibbs625::engine::progress::ProgressReporter;
use gibbs625::workflows::{generate, landscape};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

pub fn run(args: LandscapeArgs, threads: Option<usize>) -> Result<()> {
    if args.output.exists() && !args.overwrite {
        return Err(CliError::WouldOverwrite {
            path: args.output.clone(),
        });
    }

    let expressions = config::load_expressions(&args.expressions)?;
    let (generator_config, mut settings) = config::load_config(args.config.as_deref())?;

    if let Some(steps) = args.steps {
        settings.steps = steps;
    }
    if let Some(workers) = threads {
        info!("Overriding landscape worker pool size: {workers}.");
        settings.workers = workers;
    }

    let representation: Representation = args.representation.into();
    info!(
        "Sampling the {} representation on a {}x{} grid.",
        representation.label(),
        settings.steps,
        settings.steps
    );

    let surfaces = generate::build_surfaces(&expressions, &generator_config)?;
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let map = landscape::run(surfaces.of(representation), &settings, &reporter)?;

    let file = File::create(&args.output)?;
    map.write_csv(BufWriter::new(file))
        .map_err(|e| CliError::Other(anyhow::Error::new(e)))?;
    println!(
        "Wrote {} samples to {}.",
        map.rows.len(),
        args.output.display()
    );

    Ok(())
}
