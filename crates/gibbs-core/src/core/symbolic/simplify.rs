use super::expr::Expr;
use thiserror::Error;

/// Rewriting passes are repeated until the tree stops changing. Legitimate
/// CALPHAD expressions settle within a handful of passes; hitting the cap
/// indicates a malformed expression and is fatal.
const MAX_PASSES: usize = 64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimplifyError {
    #[error("Simplification did not reach a fixpoint within {passes} passes ({nodes} nodes)")]
    NoFixpoint { passes: usize, nodes: usize },
}

/// Constant folding and algebraic identity elimination, to a fixpoint.
pub fn simplify(expr: &Expr) -> Result<Expr, SimplifyError> {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = simplify_once(&current);
        if next == current {
            return Ok(next);
        }
        current = next;
    }
    Err(SimplifyError::NoFixpoint {
        passes: MAX_PASSES,
        nodes: current.node_count(),
    })
}

fn simplify_once(expr: &Expr) -> Expr {
    match expr {
        Expr::Constant(_) | Expr::Symbol(_) => expr.clone(),
        Expr::Add(lhs, rhs) => {
            let lhs = simplify_once(lhs);
            let rhs = simplify_once(rhs);
            match (&lhs, &rhs) {
                (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a + b),
                (_, rhs_s) if rhs_s.is_zero() => lhs,
                (lhs_s, _) if lhs_s.is_zero() => rhs,
                _ => lhs + rhs,
            }
        }
        Expr::Sub(lhs, rhs) => {
            let lhs = simplify_once(lhs);
            let rhs = simplify_once(rhs);
            match (&lhs, &rhs) {
                (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a - b),
                (_, rhs_s) if rhs_s.is_zero() => lhs,
                (lhs_s, _) if lhs_s.is_zero() => -rhs,
                (lhs_s, rhs_s) if lhs_s == rhs_s => Expr::zero(),
                _ => lhs - rhs,
            }
        }
        Expr::Mul(lhs, rhs) => {
            let lhs = simplify_once(lhs);
            let rhs = simplify_once(rhs);
            match (&lhs, &rhs) {
                (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a * b),
                (lhs_s, _) if lhs_s.is_zero() => Expr::zero(),
                (_, rhs_s) if rhs_s.is_zero() => Expr::zero(),
                (lhs_s, _) if lhs_s.is_one() => rhs,
                (_, rhs_s) if rhs_s.is_one() => lhs,
                _ => lhs * rhs,
            }
        }
        Expr::Div(num, den) => {
            let num = simplify_once(num);
            let den = simplify_once(den);
            match (&num, &den) {
                (Expr::Constant(a), Expr::Constant(b)) if *b != 0.0 => Expr::Constant(a / b),
                (num_s, _) if num_s.is_zero() => Expr::zero(),
                (_, den_s) if den_s.is_one() => num,
                _ => num / den,
            }
        }
        Expr::Pow(base, exponent) => {
            let base = simplify_once(base);
            let exponent = simplify_once(exponent);
            match (&base, &exponent) {
                (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a.powf(*b)),
                (_, exp_s) if exp_s.is_zero() => Expr::one(),
                (_, exp_s) if exp_s.is_one() => base,
                (base_s, _) if base_s.is_one() => Expr::one(),
                _ => base.pow(exponent),
            }
        }
        Expr::Neg(inner) => {
            let inner = simplify_once(inner);
            match &inner {
                Expr::Constant(c) => Expr::Constant(-c),
                Expr::Neg(nested) => Expr::clone(nested),
                _ => -inner,
            }
        }
        Expr::Ln(inner) => {
            let inner = simplify_once(inner);
            match &inner {
                inner_s if inner_s.is_one() => Expr::zero(),
                Expr::Exp(nested) => Expr::clone(nested),
                _ => inner.ln(),
            }
        }
        Expr::Exp(inner) => {
            let inner = simplify_once(inner);
            match &inner {
                inner_s if inner_s.is_zero() => Expr::one(),
                _ => inner.exp(),
            }
        }
        Expr::Tanh(inner) => {
            let inner = simplify_once(inner);
            match &inner {
                Expr::Constant(c) => Expr::Constant(c.tanh()),
                _ => inner.tanh(),
            }
        }
    }
}
