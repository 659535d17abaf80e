use crate::core::model::composition::Composition;
use crate::core::model::phase::Phase;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Operating conditions shared by every phase: the single temperature the
/// landscape is generated for, and the molar volume used to convert energies
/// from J/mol to J/m^3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature: f64,
    pub molar_volume: f64,
}

impl Default for Conditions {
    fn default() -> Self {
        // 870 degC operating point, Vm for fcc Ni-based alloys.
        Self {
            temperature: 1143.15,
            molar_volume: 1.0e-5,
        }
    }
}

/// Slope and intercept of a linear funnel guard. Chosen as configuration to
/// dominate the phase's energy range at the operating temperature; never
/// derived from the landscape itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunnelParams {
    pub slope: f64,
    pub intercept: f64,
}

/// Per-phase pipeline parameters. Each phase gets its own struct so constants
/// can never bleed between phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseParams {
    /// Center of the local polynomial expansion.
    pub expansion_anchor: Composition,
    /// Three-phase coexistence composition, emitted as the `xe_*` constants.
    pub equilibrium_anchor: Composition,
    /// Blend transition width; smaller means closer to a hard clamp.
    pub alpha: f64,
    pub funnel: FunnelParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub conditions: Conditions,
    /// Total degree of the polynomial representation.
    pub order: usize,
    /// Project identifier stamped into emitted artifacts.
    pub project: String,
    /// Suffix joined to each representation label to form file prefixes
    /// (`energy625.c`, `taylor625.c`, `parabola625.c`).
    pub file_tag: String,
    pub gamma: PhaseParams,
    pub delta: PhaseParams,
    pub mu: PhaseParams,
    pub laves: PhaseParams,
}

impl GeneratorConfig {
    pub fn phase_params(&self, phase: Phase) -> &PhaseParams {
        match phase {
            Phase::Gamma => &self.gamma,
            Phase::Delta => &self.delta,
            Phase::Mu => &self.mu,
            Phase::Laves => &self.laves,
        }
    }
}

impl Default for GeneratorConfig {
    /// Reference constants for the 1143.15 K landscape; funnel ranges sized
    /// to dominate each phase's observed energy span at that temperature.
    fn default() -> Self {
        Self {
            conditions: Conditions::default(),
            order: 2,
            project: "ALLOY625".to_string(),
            file_tag: "625".to_string(),
            gamma: PhaseParams {
                expansion_anchor: Composition::new(0.15, 0.0525),
                equilibrium_anchor: Composition::new(0.490, 0.025),
                alpha: 1.0e-5,
                funnel: FunnelParams {
                    slope: 16.0 * 18.0e9,
                    intercept: 10.0e9,
                },
            },
            delta: PhaseParams {
                expansion_anchor: Composition::new(0.10, 0.20),
                equilibrium_anchor: Composition::new(0.015, 0.245),
                alpha: 1.0e-5,
                funnel: FunnelParams {
                    slope: 8.0 * 28.0e9,
                    intercept: 20.0e9,
                },
            },
            mu: PhaseParams {
                expansion_anchor: Composition::new(0.05, 0.4885),
                equilibrium_anchor: Composition::new(0.02, 0.50),
                alpha: 1.0e-5,
                funnel: FunnelParams {
                    slope: 16.0 * 22.0e9,
                    intercept: 12.0e9,
                },
            },
            laves: PhaseParams {
                expansion_anchor: Composition::new(0.35, 0.20),
                equilibrium_anchor: Composition::new(0.300, 0.328),
                alpha: 1.0e-5,
                funnel: FunnelParams {
                    slope: 16.0 * 25.0e9,
                    intercept: 15.0e9,
                },
            },
        }
    }
}

#[derive(Default)]
pub struct GeneratorConfigBuilder {
    conditions: Option<Conditions>,
    order: Option<usize>,
    project: Option<String>,
    file_tag: Option<String>,
    gamma: Option<PhaseParams>,
    delta: Option<PhaseParams>,
    mu: Option<PhaseParams>,
    laves: Option<PhaseParams>,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }
    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
    pub fn file_tag(mut self, tag: impl Into<String>) -> Self {
        self.file_tag = Some(tag.into());
        self
    }
    pub fn gamma(mut self, params: PhaseParams) -> Self {
        self.gamma = Some(params);
        self
    }
    pub fn delta(mut self, params: PhaseParams) -> Self {
        self.delta = Some(params);
        self
    }
    pub fn mu(mut self, params: PhaseParams) -> Self {
        self.mu = Some(params);
        self
    }
    pub fn laves(mut self, params: PhaseParams) -> Self {
        self.laves = Some(params);
        self
    }

    pub fn build(self) -> Result<GeneratorConfig, ConfigError> {
        Ok(GeneratorConfig {
            conditions: self
                .conditions
                .ok_or(ConfigError::MissingParameter("conditions"))?,
            order: self.order.ok_or(ConfigError::MissingParameter("order"))?,
            project: self
                .project
                .ok_or(ConfigError::MissingParameter("project"))?,
            file_tag: self
                .file_tag
                .ok_or(ConfigError::MissingParameter("file_tag"))?,
            gamma: self.gamma.ok_or(ConfigError::MissingParameter("gamma"))?,
            delta: self.delta.ok_or(ConfigError::MissingParameter("delta"))?,
            mu: self.mu.ok_or(ConfigError::MissingParameter("mu"))?,
            laves: self.laves.ok_or(ConfigError::MissingParameter("laves"))?,
        })
    }
}

/// Settings for the dense-grid landscape sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandscapeSettings {
    /// Samples per axis over [0, 1].
    pub steps: usize,
    /// Fixed worker pool size for parallel sampling.
    pub workers: usize,
}

impl Default for LandscapeSettings {
    fn default() -> Self {
        Self {
            steps: 101,
            workers: 6,
        }
    }
}
