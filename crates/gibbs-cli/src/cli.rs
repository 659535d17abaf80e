use clap::{Args, Parser, Subcommand, ValueEnum};
use gibbs625::core::model::surface::Representation;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Trevor Keller",
    version,
    about = "gibbs625 CLI - Generates closed-form Gibbs free-energy landscapes for the ternary Cr-Nb-Ni system from CALPHAD sublattice expressions.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of workers for parallel landscape sampling.
    /// Defaults to the pool size in the configuration file.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline and emit evaluable C energy functions.
    Generate(GenerateArgs),
    /// Sample a generated energy landscape over a dense composition grid.
    Landscape(LandscapeArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the phase expressions file (TOML) produced by the database
    /// frontend.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub expressions: PathBuf,

    /// Path to the generator configuration file in TOML format.
    /// Reference constants are used for anything left unspecified.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for the emitted C sources and headers.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Replace existing artifacts in the output directory.
    #[arg(long)]
    pub overwrite: bool,

    // --- Configuration Overrides ---
    /// Override the polynomial expansion order from the config file.
    #[arg(long, value_name = "INT")]
    pub order: Option<usize>,

    /// Override the project identifier stamped into emitted artifacts.
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,
}

/// Arguments for the `landscape` subcommand.
#[derive(Args, Debug)]
pub struct LandscapeArgs {
    /// Path to the phase expressions file (TOML) produced by the database
    /// frontend.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub expressions: PathBuf,

    /// Path to the generator configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the sampled landscape table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Replace the output file if it already exists.
    #[arg(long)]
    pub overwrite: bool,

    /// Which representation of the landscape to sample.
    #[arg(short, long, value_enum, default_value = "parabola")]
    pub representation: RepresentationArg,

    /// Override the number of samples per composition axis.
    #[arg(long, value_name = "INT")]
    pub steps: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationArg {
    /// The reduced CALPHAD expression (undefined outside the physical domain).
    Energy,
    /// The local polynomial expansion.
    Taylor,
    /// The globally defined blended surface.
    Parabola,
}

impl From<RepresentationArg> for Representation {
    fn from(arg: RepresentationArg) -> Self {
        match arg {
            RepresentationArg::Energy => Representation::Raw,
            RepresentationArg::Taylor => Representation::Polynomial,
            RepresentationArg::Parabola => Representation::Regularized,
        }
    }
}
