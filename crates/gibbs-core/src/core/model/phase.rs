use super::composition::Composition;
use super::{TEMPERATURE, X_CR, X_NB};
use crate::core::symbolic::Expr;
use phf::phf_map;
use std::collections::HashMap;
use std::fmt;

/// The four competing solid phases of the Cr-Nb-Ni system. The pipeline is
/// specialized to exactly this set; there is no provision for other phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Gamma,
    Delta,
    Mu,
    Laves,
}

static DATABASE_PHASES: phf::Map<&'static str, Phase> = phf_map! {
    "FCC_A1" => Phase::Gamma,
    "D0A_NBNI3" => Phase::Delta,
    "D85_NI7NB6" => Phase::Mu,
    "C14_LAVES" => Phase::Laves,
};

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Gamma, Phase::Delta, Phase::Mu, Phase::Laves];

    /// Phase name as it appears in the thermodynamic database.
    pub fn database_name(&self) -> &'static str {
        match self {
            Phase::Gamma => "FCC_A1",
            Phase::Delta => "D0A_NBNI3",
            Phase::Mu => "D85_NI7NB6",
            Phase::Laves => "C14_LAVES",
        }
    }

    /// Short tag used in emitted function names (`g_gam`, `dg_del_dxCr`, ...).
    pub fn short_name(&self) -> &'static str {
        match self {
            Phase::Gamma => "gam",
            Phase::Delta => "del",
            Phase::Mu => "mu",
            Phase::Laves => "lav",
        }
    }

    pub fn from_database_name(name: &str) -> Option<Phase> {
        DATABASE_PHASES.get(name).copied()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.database_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Cr,
    Nb,
    Ni,
}

impl Coordinate {
    /// Symbol the coordinate maps to in reduced expressions. Ni is dependent
    /// and substituted away as `1 - XCR - XNB` once blending is assembled.
    pub fn symbol(&self) -> &'static str {
        match self {
            Coordinate::Cr => "XCR",
            Coordinate::Nb => "XNB",
            Coordinate::Ni => "XNI",
        }
    }

    pub fn of(&self, composition: &Composition) -> f64 {
        match self {
            Coordinate::Cr => composition.x_cr,
            Coordinate::Nb => composition.x_nb,
            Coordinate::Ni => composition.x_ni(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
}

/// One inequality constraint on the phase's physical composition domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBound {
    pub coordinate: Coordinate,
    pub side: Side,
    pub threshold: f64,
}

impl DomainBound {
    pub fn lower(coordinate: Coordinate, threshold: f64) -> Self {
        Self {
            coordinate,
            side: Side::Lower,
            threshold,
        }
    }

    pub fn upper(coordinate: Coordinate, threshold: f64) -> Self {
        Self {
            coordinate,
            side: Side::Upper,
            threshold,
        }
    }

    pub fn satisfied_by(&self, composition: &Composition) -> bool {
        let value = self.coordinate.of(composition);
        match self.side {
            Side::Lower => value >= self.threshold,
            Side::Upper => value <= self.threshold,
        }
    }
}

/// One crystallographic site set in a phase's sublattice model.
#[derive(Debug, Clone, PartialEq)]
pub struct Sublattice {
    pub site_ratio: f64,
    pub constituents: &'static [&'static str],
}

/// A phase together with its raw database expression and the fixed algebraic
/// map from sublattice site fractions to the two free composition variables.
/// Constructed once from the database collaborator's output; immutable.
#[derive(Debug, Clone)]
pub struct PhaseModel {
    phase: Phase,
    sublattices: Vec<Sublattice>,
    raw: Expr,
}

impl PhaseModel {
    pub fn new(phase: Phase, raw: Expr) -> Self {
        Self {
            phase,
            sublattices: sublattices_of(phase),
            raw,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sublattices(&self) -> &[Sublattice] {
        &self.sublattices
    }

    /// Raw Gibbs energy in sublattice site-fraction symbols and temperature,
    /// per mole of formula unit.
    pub fn raw_expression(&self) -> &Expr {
        &self.raw
    }

    /// The sublattice-to-system substitution map, with temperature pinned.
    ///
    /// Keys are the site-fraction symbols of this phase's database model;
    /// values are expressions in `XCR`/`XNB` only.
    pub fn substitution(&self, temperature: f64) -> HashMap<String, Expr> {
        let x_cr = || Expr::symbol(X_CR);
        let x_nb = || Expr::symbol(X_NB);
        let x_ni = || Expr::one() - Expr::symbol(X_CR) - Expr::symbol(X_NB);

        let mut map = HashMap::new();
        match self.phase {
            Phase::Gamma => {
                map.insert("FCC_A10CR".to_string(), x_cr());
                map.insert("FCC_A10NB".to_string(), x_nb());
                map.insert("FCC_A10NI".to_string(), x_ni());
                map.insert("FCC_A11VA".to_string(), Expr::one());
            }
            Phase::Delta => {
                // Nb confined to the first sublattice, Cr to the second.
                map.insert(
                    "D0A_NBNI30NB".to_string(),
                    Expr::constant(4.0) * x_nb(),
                );
                map.insert(
                    "D0A_NBNI30NI".to_string(),
                    Expr::one() - Expr::constant(4.0) * x_nb(),
                );
                map.insert(
                    "D0A_NBNI31CR".to_string(),
                    Expr::constant(4.0 / 3.0) * x_cr(),
                );
                map.insert(
                    "D0A_NBNI31NI".to_string(),
                    Expr::one() - Expr::constant(4.0 / 3.0) * x_cr(),
                );
            }
            Phase::Mu => {
                // First sublattice is pure Nb; the second carries the balance.
                map.insert("D85_NI7NB60NB".to_string(), Expr::one());
                map.insert(
                    "D85_NI7NB61CR".to_string(),
                    Expr::constant(13.0 / 7.0) * x_cr(),
                );
                map.insert(
                    "D85_NI7NB61NB".to_string(),
                    Expr::constant(13.0 / 7.0) * x_nb() - Expr::constant(6.0 / 7.0),
                );
                map.insert(
                    "D85_NI7NB61NI".to_string(),
                    Expr::constant(13.0 / 7.0) * x_ni(),
                );
            }
            Phase::Laves => {
                // Nb eliminated from the first sublattice, Ni from the second.
                map.insert(
                    "C14_LAVES0CR".to_string(),
                    Expr::one() - Expr::constant(1.5) * x_ni(),
                );
                map.insert(
                    "C14_LAVES0NI".to_string(),
                    Expr::constant(1.5) * x_ni(),
                );
                map.insert(
                    "C14_LAVES1CR".to_string(),
                    Expr::one() - Expr::constant(3.0) * x_nb(),
                );
                map.insert(
                    "C14_LAVES1NB".to_string(),
                    Expr::constant(3.0) * x_nb(),
                );
            }
        }
        map.insert(TEMPERATURE.to_string(), Expr::constant(temperature));
        map
    }

    /// Validity constraints on the two free composition variables implied by
    /// the substitution map (site fractions must stay within [0, 1]).
    pub fn domain(&self) -> Vec<DomainBound> {
        match self.phase {
            Phase::Gamma => vec![
                DomainBound::lower(Coordinate::Cr, 0.0),
                DomainBound::lower(Coordinate::Nb, 0.0),
                DomainBound::lower(Coordinate::Ni, 0.0),
            ],
            Phase::Delta => vec![
                DomainBound::lower(Coordinate::Cr, 0.0),
                DomainBound::upper(Coordinate::Cr, 3.0 / 4.0),
                DomainBound::lower(Coordinate::Nb, 0.0),
                DomainBound::upper(Coordinate::Nb, 1.0 / 4.0),
            ],
            Phase::Mu => vec![
                DomainBound::lower(Coordinate::Cr, 0.0),
                DomainBound::upper(Coordinate::Cr, 7.0 / 13.0),
                DomainBound::lower(Coordinate::Nb, 6.0 / 13.0),
                DomainBound::lower(Coordinate::Ni, 0.0),
                DomainBound::upper(Coordinate::Ni, 7.0 / 13.0),
            ],
            Phase::Laves => vec![
                DomainBound::lower(Coordinate::Nb, 0.0),
                DomainBound::upper(Coordinate::Nb, 1.0 / 3.0),
                DomainBound::lower(Coordinate::Ni, 0.0),
                DomainBound::upper(Coordinate::Ni, 2.0 / 3.0),
            ],
        }
    }

    /// True when the composition satisfies every domain constraint and lies
    /// on the Gibbs simplex.
    pub fn contains(&self, composition: &Composition) -> bool {
        composition.is_on_simplex()
            && self
                .domain()
                .iter()
                .all(|bound| bound.satisfied_by(composition))
    }
}

fn sublattices_of(phase: Phase) -> Vec<Sublattice> {
    match phase {
        Phase::Gamma => vec![Sublattice {
            site_ratio: 1.0,
            constituents: &["CR", "NB", "NI"],
        }],
        Phase::Delta => vec![
            Sublattice {
                site_ratio: 1.0,
                constituents: &["NB", "NI"],
            },
            Sublattice {
                site_ratio: 3.0,
                constituents: &["CR", "NI"],
            },
        ],
        Phase::Mu => vec![
            Sublattice {
                site_ratio: 6.0,
                constituents: &["NB"],
            },
            Sublattice {
                site_ratio: 7.0,
                constituents: &["CR", "NB", "NI"],
            },
        ],
        Phase::Laves => vec![
            Sublattice {
                site_ratio: 2.0,
                constituents: &["CR", "NI"],
            },
            Sublattice {
                site_ratio: 1.0,
                constituents: &["CR", "NB"],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbolic::{eval, substitute};
    use std::collections::HashMap;

    fn eval_map_entry(model: &PhaseModel, symbol: &str, x_cr: f64, x_nb: f64) -> f64 {
        let map = model.substitution(1143.15);
        let entry = map.get(symbol).unwrap();
        let mut vars = HashMap::new();
        vars.insert("XCR".to_string(), x_cr);
        vars.insert("XNB".to_string(), x_nb);
        eval(entry, &vars).unwrap()
    }

    #[test]
    fn database_names_round_trip() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_database_name(phase.database_name()), Some(phase));
        }
        assert_eq!(Phase::from_database_name("BCC_A2"), None);
    }

    #[test]
    fn gamma_substitution_is_identity() {
        let model = PhaseModel::new(Phase::Gamma, Expr::zero());
        assert!((eval_map_entry(&model, "FCC_A10CR", 0.3, 0.1) - 0.3).abs() < 1e-15);
        assert!((eval_map_entry(&model, "FCC_A10NI", 0.3, 0.1) - 0.6).abs() < 1e-15);
        assert!((eval_map_entry(&model, "FCC_A11VA", 0.3, 0.1) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn delta_site_fractions_fill_at_domain_limits() {
        let model = PhaseModel::new(Phase::Delta, Expr::zero());
        // Nb sublattice saturates at x_nb = 1/4, Cr sublattice at x_cr = 3/4.
        assert!((eval_map_entry(&model, "D0A_NBNI30NB", 0.0, 0.25) - 1.0).abs() < 1e-15);
        assert!((eval_map_entry(&model, "D0A_NBNI31CR", 0.75, 0.0) - 1.0).abs() < 1e-15);
        assert!((eval_map_entry(&model, "D0A_NBNI30NI", 0.0, 0.25)).abs() < 1e-15);
    }

    #[test]
    fn mu_site_fractions_respect_stoichiometry() {
        let model = PhaseModel::new(Phase::Mu, Expr::zero());
        // At x_nb = 6/13 the second sublattice holds no Nb.
        assert!(eval_map_entry(&model, "D85_NI7NB61NB", 0.0, 6.0 / 13.0).abs() < 1e-15);
        // At x_nb = 1 it is pure Nb.
        assert!((eval_map_entry(&model, "D85_NI7NB61NB", 0.0, 1.0) - 1.0).abs() < 1e-14);
        assert!((eval_map_entry(&model, "D85_NI7NB61CR", 7.0 / 13.0, 6.0 / 13.0) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn laves_site_fractions_fill_at_domain_limits() {
        let model = PhaseModel::new(Phase::Laves, Expr::zero());
        assert!((eval_map_entry(&model, "C14_LAVES1NB", 0.0, 1.0 / 3.0) - 1.0).abs() < 1e-15);
        // x_ni = 2/3 at (1/3, 0): first sublattice is pure Ni.
        assert!((eval_map_entry(&model, "C14_LAVES0NI", 1.0 / 3.0, 0.0) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn substitution_pins_temperature() {
        let model = PhaseModel::new(Phase::Gamma, Expr::symbol("T"));
        let map = model.substitution(1143.15);
        let reduced = substitute(model.raw_expression(), &map);
        assert_eq!(reduced, Expr::constant(1143.15));
    }

    #[test]
    fn substitution_values_stay_in_unit_interval_inside_domain() {
        for phase in Phase::ALL {
            let model = PhaseModel::new(phase, Expr::zero());
            let probe = match phase {
                Phase::Gamma => Composition::new(0.3, 0.1),
                Phase::Delta => Composition::new(0.1, 0.2),
                Phase::Mu => Composition::new(0.1, 0.5),
                Phase::Laves => Composition::new(0.3, 0.3),
            };
            assert!(model.contains(&probe), "{phase} probe not in domain");
            let map = model.substitution(1143.15);
            let mut vars = HashMap::new();
            vars.insert("XCR".to_string(), probe.x_cr);
            vars.insert("XNB".to_string(), probe.x_nb);
            for (symbol, expr) in &map {
                if symbol == "T" {
                    continue;
                }
                let y = eval(expr, &vars).unwrap();
                assert!(
                    (-1e-12..=1.0 + 1e-12).contains(&y),
                    "{phase}: site fraction {symbol} = {y} outside [0, 1]"
                );
            }
        }
    }

    #[test]
    fn domain_membership_matches_declared_bounds() {
        let delta = PhaseModel::new(Phase::Delta, Expr::zero());
        assert!(delta.contains(&Composition::new(0.015, 0.245)));
        assert!(!delta.contains(&Composition::new(0.9, 0.1)));
        assert!(!delta.contains(&Composition::new(0.1, 0.3)));

        let mu = PhaseModel::new(Phase::Mu, Expr::zero());
        assert!(mu.contains(&Composition::new(0.05, 0.5)));
        assert!(!mu.contains(&Composition::new(0.05, 0.3)));
    }

    #[test]
    fn sublattice_site_ratios_match_the_database_models() {
        let ratios: Vec<Vec<f64>> = Phase::ALL
            .iter()
            .map(|phase| {
                PhaseModel::new(*phase, Expr::zero())
                    .sublattices()
                    .iter()
                    .map(|s| s.site_ratio)
                    .collect()
            })
            .collect();
        assert_eq!(
            ratios,
            vec![
                vec![1.0],
                vec![1.0, 3.0],
                vec![6.0, 7.0],
                vec![2.0, 1.0]
            ]
        );
    }
}
