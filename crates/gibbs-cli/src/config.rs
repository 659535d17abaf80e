use crate::error::{CliError, Result};
use gibbs625::core::io::load_named_expressions;
use gibbs625::core::model::composition::Composition;
use gibbs625::engine::config::{
    Conditions, FunnelParams, GeneratorConfig, LandscapeSettings, PhaseParams,
};
use gibbs625::workflows::generate::PhaseExpressions;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// On-disk configuration. Every section is optional; anything left
/// unspecified falls back to the reference constants for the 1143.15 K
/// landscape.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub conditions: Option<FileConditions>,
    pub polynomial: Option<FilePolynomial>,
    pub project: Option<FileProject>,
    pub phases: Option<FilePhases>,
    pub landscape: Option<FileLandscape>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConditions {
    pub temperature: Option<f64>,
    #[serde(rename = "molar-volume")]
    pub molar_volume: Option<f64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePolynomial {
    pub order: Option<usize>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileProject {
    pub name: Option<String>,
    #[serde(rename = "file-tag")]
    pub file_tag: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePhases {
    pub gamma: Option<FilePhaseParams>,
    pub delta: Option<FilePhaseParams>,
    pub mu: Option<FilePhaseParams>,
    pub laves: Option<FilePhaseParams>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePhaseParams {
    pub alpha: Option<f64>,
    #[serde(rename = "expansion-anchor")]
    pub expansion_anchor: Option<[f64; 2]>,
    #[serde(rename = "equilibrium-anchor")]
    pub equilibrium_anchor: Option<[f64; 2]>,
    pub funnel: Option<FileFunnel>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileFunnel {
    pub slope: f64,
    pub intercept: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLandscape {
    pub steps: Option<usize>,
    pub workers: Option<usize>,
}

/// Loads the generator configuration, starting from the reference defaults
/// and layering the file (if any) on top.
pub fn load_config(path: Option<&Path>) -> Result<(GeneratorConfig, LandscapeSettings)> {
    let mut config = GeneratorConfig::default();
    let mut settings = LandscapeSettings::default();

    let Some(path) = path else {
        debug!("No configuration file given; using reference constants.");
        return Ok((config, settings));
    };

    let content = std::fs::read_to_string(path)?;
    let file: FileConfig = toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow::Error::new(e),
    })?;
    debug!("Loaded configuration from {}.", path.display());

    if let Some(conditions) = file.conditions {
        config.conditions = Conditions {
            temperature: conditions
                .temperature
                .unwrap_or(config.conditions.temperature),
            molar_volume: conditions
                .molar_volume
                .unwrap_or(config.conditions.molar_volume),
        };
    }
    if let Some(polynomial) = file.polynomial {
        if let Some(order) = polynomial.order {
            config.order = order;
        }
    }
    if let Some(project) = file.project {
        if let Some(name) = project.name {
            config.project = name;
        }
        if let Some(tag) = project.file_tag {
            config.file_tag = tag;
        }
    }
    if let Some(phases) = file.phases {
        apply_phase(&mut config.gamma, phases.gamma);
        apply_phase(&mut config.delta, phases.delta);
        apply_phase(&mut config.mu, phases.mu);
        apply_phase(&mut config.laves, phases.laves);
    }
    if let Some(landscape) = file.landscape {
        if let Some(steps) = landscape.steps {
            settings.steps = steps;
        }
        if let Some(workers) = landscape.workers {
            settings.workers = workers;
        }
    }

    Ok((config, settings))
}

fn apply_phase(params: &mut PhaseParams, file: Option<FilePhaseParams>) {
    let Some(file) = file else {
        return;
    };
    if let Some(alpha) = file.alpha {
        params.alpha = alpha;
    }
    if let Some([x_cr, x_nb]) = file.expansion_anchor {
        params.expansion_anchor = Composition::new(x_cr, x_nb);
    }
    if let Some([x_cr, x_nb]) = file.equilibrium_anchor {
        params.equilibrium_anchor = Composition::new(x_cr, x_nb);
    }
    if let Some(funnel) = file.funnel {
        params.funnel = FunnelParams {
            slope: funnel.slope,
            intercept: funnel.intercept,
        };
    }
}

pub fn load_expressions(path: &Path) -> Result<PhaseExpressions> {
    let entries = load_named_expressions(path)?;
    Ok(PhaseExpressions::from_named(entries)?)
}
