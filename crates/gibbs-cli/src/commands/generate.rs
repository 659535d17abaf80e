use crate::cli::GenerateArgs;
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use gibbs625::engine::progress::ProgressReporter;
use gibbs625::workflows::generate;
use tracing::info;

pub fn run(args: GenerateArgs) -> Result<()> {
    let expressions = config::load_expressions(&args.expressions)?;
    let (mut generator_config, _) = config::load_config(args.config.as_deref())?;

    if let Some(order) = args.order {
        info!("Overriding polynomial order: {order}.");
        generator_config.order = order;
    }
    if let Some(project) = args.project {
        info!("Overriding project identifier: {project}.");
        generator_config.project = project;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = generate::run(
        &expressions,
        &generator_config,
        &args.output,
        args.overwrite,
        &reporter,
    )?;

    println!(
        "Emitted {} artifact group(s) to {}:",
        result.artifacts.len(),
        args.output.display()
    );
    for files in &result.artifacts {
        println!(
            "  {} / {}",
            files.source.display(),
            files.header.display()
        );
    }

    Ok(())
}
