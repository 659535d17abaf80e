use super::composition::Composition;
use super::surface::composition_vars;
use crate::core::symbolic::{EvalError, Expr, eval};
use nalgebra::{Matrix2, Vector2};

/// Closed-form gradient and Hessian of one [`super::surface::EnergySurface`]
/// with respect to `(XCR, XNB)`.
///
/// The mixed second partial is computed once and mirrored: for the smooth
/// expressions this pipeline produces the two differentiation orders are
/// algebraically identical.
#[derive(Debug, Clone)]
pub struct DerivativeSet {
    pub value: Expr,
    pub d_dx_cr: Expr,
    pub d_dx_nb: Expr,
    pub d2_dx_cr_cr: Expr,
    pub d2_dx_cr_nb: Expr,
    pub d2_dx_nb_nb: Expr,
}

impl DerivativeSet {
    pub fn value_at(&self, composition: &Composition) -> Result<f64, EvalError> {
        eval(&self.value, &composition_vars(composition))
    }

    pub fn gradient_at(&self, composition: &Composition) -> Result<Vector2<f64>, EvalError> {
        let vars = composition_vars(composition);
        Ok(Vector2::new(
            eval(&self.d_dx_cr, &vars)?,
            eval(&self.d_dx_nb, &vars)?,
        ))
    }

    /// Symmetric by construction: the off-diagonal entries share one
    /// expression.
    pub fn hessian_at(&self, composition: &Composition) -> Result<Matrix2<f64>, EvalError> {
        let vars = composition_vars(composition);
        let cr_cr = eval(&self.d2_dx_cr_cr, &vars)?;
        let cr_nb = eval(&self.d2_dx_cr_nb, &vars)?;
        let nb_nb = eval(&self.d2_dx_nb_nb, &vars)?;
        Ok(Matrix2::new(cr_cr, cr_nb, cr_nb, nb_nb))
    }
}
