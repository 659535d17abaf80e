const SIMPLEX_TOLERANCE: f64 = 1e-10;

/// A point in a phase's local composition frame. The two stored fractions are
/// the free variables; nickel is always the dependent `1 - x_cr - x_nb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub x_cr: f64,
    pub x_nb: f64,
}

impl Composition {
    pub fn new(x_cr: f64, x_nb: f64) -> Self {
        Self { x_cr, x_nb }
    }

    #[inline]
    pub fn x_ni(&self) -> f64 {
        1.0 - self.x_cr - self.x_nb
    }

    /// True when all three fractions lie in [0, 1]. Callers sampling outside
    /// the simplex must go through the regularized surface.
    pub fn is_on_simplex(&self) -> bool {
        self.x_cr >= -SIMPLEX_TOLERANCE
            && self.x_nb >= -SIMPLEX_TOLERANCE
            && self.x_ni() >= -SIMPLEX_TOLERANCE
    }
}

/// Why an anchor exists. Taylor expansions are centered on `Expansion`
/// anchors; `EquilibriumCorner` anchors are the three-phase coexistence
/// compositions emitted as constants for the phase-field solver. The two may
/// coincide in a given configuration, but the pipeline never conflates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorPurpose {
    Expansion,
    EquilibriumCorner,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub purpose: AnchorPurpose,
    pub at: Composition,
}

impl AnchorPoint {
    pub fn expansion(x_cr: f64, x_nb: f64) -> Self {
        Self {
            purpose: AnchorPurpose::Expansion,
            at: Composition::new(x_cr, x_nb),
        }
    }

    pub fn equilibrium(x_cr: f64, x_nb: f64) -> Self {
        Self {
            purpose: AnchorPurpose::EquilibriumCorner,
            at: Composition::new(x_cr, x_nb),
        }
    }
}
