use super::expr::Expr;
use std::collections::HashMap;
use std::sync::Arc;

/// Replaces every occurrence of the mapped symbols simultaneously, returning a
/// new tree. Subtrees containing none of the mapped symbols are shared, not
/// copied.
pub fn substitute(expr: &Expr, map: &HashMap<String, Expr>) -> Expr {
    if map.is_empty() {
        return expr.clone();
    }
    match expr {
        Expr::Constant(_) => expr.clone(),
        Expr::Symbol(name) => match map.get(name) {
            Some(replacement) => replacement.clone(),
            None => expr.clone(),
        },
        Expr::Add(lhs, rhs) => substitute(lhs, map) + substitute(rhs, map),
        Expr::Sub(lhs, rhs) => substitute(lhs, map) - substitute(rhs, map),
        Expr::Mul(lhs, rhs) => substitute(lhs, map) * substitute(rhs, map),
        Expr::Div(lhs, rhs) => substitute(lhs, map) / substitute(rhs, map),
        Expr::Pow(base, exponent) => {
            Expr::Pow(Arc::new(substitute(base, map)), Arc::new(substitute(exponent, map)))
        }
        Expr::Neg(inner) => -substitute(inner, map),
        Expr::Ln(inner) => substitute(inner, map).ln(),
        Expr::Exp(inner) => substitute(inner, map).exp(),
        Expr::Tanh(inner) => substitute(inner, map).tanh(),
    }
}

/// Convenience wrapper pinning symbols to numeric values.
pub fn pin(expr: &Expr, values: &HashMap<String, f64>) -> Expr {
    let map: HashMap<String, Expr> = values
        .iter()
        .map(|(name, value)| (name.clone(), Expr::constant(*value)))
        .collect();
    substitute(expr, &map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_symbol_with_expression() {
        let expr = Expr::symbol("y").powi(2);
        let mut map = HashMap::new();
        map.insert(
            "y".to_string(),
            Expr::constant(4.0) * Expr::symbol("XNB"),
        );
        let result = substitute(&expr, &map);
        assert_eq!(
            result.free_symbols().into_iter().collect::<Vec<_>>(),
            vec!["XNB".to_string()]
        );
    }

    #[test]
    fn substitution_is_simultaneous_not_sequential() {
        // {a -> b, b -> a} swaps the symbols instead of collapsing them.
        let expr = Expr::symbol("a") + Expr::symbol("b");
        let mut map = HashMap::new();
        map.insert("a".to_string(), Expr::symbol("b"));
        map.insert("b".to_string(), Expr::symbol("a"));
        let result = substitute(&expr, &map);
        assert_eq!(result, Expr::symbol("b") + Expr::symbol("a"));
    }

    #[test]
    fn unmapped_symbols_are_left_alone() {
        let expr = Expr::symbol("T") * Expr::symbol("x");
        let mut map = HashMap::new();
        map.insert("x".to_string(), Expr::constant(2.0));
        let result = substitute(&expr, &map);
        assert!(result.free_symbols().contains("T"));
    }

    #[test]
    fn pin_turns_symbols_into_constants() {
        let expr = Expr::symbol("T").ln();
        let mut values = HashMap::new();
        values.insert("T".to_string(), 1143.15);
        let result = pin(&expr, &values);
        assert!(result.free_symbols().is_empty());
    }
}
