use super::expr::Expr;
use std::sync::Arc;

/// Exact partial derivative of `expr` with respect to the symbol `var`.
///
/// Purely structural: no numerical differencing anywhere. The result is not
/// simplified; pass it through [`super::simplify`] before evaluation or emission.
pub fn diff(expr: &Expr, var: &str) -> Expr {
    match expr {
        Expr::Constant(_) => Expr::zero(),
        Expr::Symbol(name) => {
            if name == var {
                Expr::one()
            } else {
                Expr::zero()
            }
        }
        Expr::Add(lhs, rhs) => diff(lhs, var) + diff(rhs, var),
        Expr::Sub(lhs, rhs) => diff(lhs, var) - diff(rhs, var),
        Expr::Mul(lhs, rhs) => {
            let lhs_expr = Expr::clone(lhs);
            let rhs_expr = Expr::clone(rhs);
            diff(lhs, var) * rhs_expr + lhs_expr * diff(rhs, var)
        }
        Expr::Div(num, den) => {
            let num_expr = Expr::clone(num);
            let den_expr = Expr::clone(den);
            (diff(num, var) * den_expr.clone() - num_expr * diff(den, var))
                / den_expr.powi(2)
        }
        Expr::Pow(base, exponent) => match exponent.as_ref() {
            // d(u^n) = n * u^(n-1) * u'
            Expr::Constant(n) => {
                let base_expr = Expr::clone(base);
                Expr::constant(*n)
                    * base_expr.pow(Expr::constant(n - 1.0))
                    * diff(base, var)
            }
            // d(u^v) = u^v * (v' * ln(u) + v * u' / u)
            _ => {
                let base_expr = Expr::clone(base);
                let exp_expr = Expr::clone(exponent);
                Expr::Pow(Arc::clone(base), Arc::clone(exponent))
                    * (diff(exponent, var) * base_expr.clone().ln()
                        + exp_expr * diff(base, var) / base_expr)
            }
        },
        Expr::Neg(inner) => -diff(inner, var),
        Expr::Ln(inner) => diff(inner, var) / Expr::clone(inner),
        Expr::Exp(inner) => Expr::Exp(Arc::clone(inner)) * diff(inner, var),
        // d(tanh u) = (1 - tanh^2 u) * u'
        Expr::Tanh(inner) => {
            (Expr::one() - Expr::Tanh(Arc::clone(inner)).powi(2)) * diff(inner, var)
        }
    }
}
