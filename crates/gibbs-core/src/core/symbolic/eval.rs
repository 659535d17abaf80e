use super::expr::Expr;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unbound symbol '{0}' during evaluation")]
    UnboundSymbol(String),

    /// Soft failure: the expression is mathematically undefined at this point.
    /// Expected when a raw (non-regularized) surface is sampled outside its
    /// physical domain.
    #[error("Domain violation: {operation} of {argument}")]
    DomainViolation {
        operation: &'static str,
        argument: f64,
    },
}

/// Evaluates `expr` against the given symbol table.
pub fn eval(expr: &Expr, vars: &HashMap<String, f64>) -> Result<f64, EvalError> {
    match expr {
        Expr::Constant(value) => Ok(*value),
        Expr::Symbol(name) => vars
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundSymbol(name.clone())),
        Expr::Add(lhs, rhs) => Ok(eval(lhs, vars)? + eval(rhs, vars)?),
        Expr::Sub(lhs, rhs) => Ok(eval(lhs, vars)? - eval(rhs, vars)?),
        Expr::Mul(lhs, rhs) => {
            // An exactly-zero left factor annihilates the product without the
            // right factor being evaluated. This is the limit convention the
            // energy expressions are written against: `y*log(y)` vanishes at
            // y = 0, and a saturated blend weight of 0 silences the guarded
            // expression entirely.
            let lhs_value = eval(lhs, vars)?;
            if lhs_value == 0.0 {
                return Ok(0.0);
            }
            Ok(lhs_value * eval(rhs, vars)?)
        }
        Expr::Div(num, den) => {
            let den_value = eval(den, vars)?;
            if den_value == 0.0 {
                return Err(EvalError::DomainViolation {
                    operation: "division by",
                    argument: den_value,
                });
            }
            Ok(eval(num, vars)? / den_value)
        }
        Expr::Pow(base, exponent) => {
            let base_value = eval(base, vars)?;
            let exp_value = eval(exponent, vars)?;
            if base_value == 0.0 && exp_value < 0.0 {
                return Err(EvalError::DomainViolation {
                    operation: "negative power of",
                    argument: base_value,
                });
            }
            if base_value < 0.0 && exp_value.fract() != 0.0 {
                return Err(EvalError::DomainViolation {
                    operation: "fractional power of",
                    argument: base_value,
                });
            }
            Ok(base_value.powf(exp_value))
        }
        Expr::Neg(inner) => Ok(-eval(inner, vars)?),
        Expr::Ln(inner) => {
            let value = eval(inner, vars)?;
            if value <= 0.0 {
                return Err(EvalError::DomainViolation {
                    operation: "logarithm of",
                    argument: value,
                });
            }
            Ok(value.ln())
        }
        Expr::Exp(inner) => Ok(eval(inner, vars)?.exp()),
        Expr::Tanh(inner) => Ok(eval(inner, vars)?.tanh()),
    }
}
