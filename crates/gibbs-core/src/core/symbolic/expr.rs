use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A node in an immutable symbolic expression tree.
///
/// Children are held behind [`Arc`] so that rewrites (differentiation,
/// substitution) can share unchanged subtrees instead of deep-copying them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(f64),
    Symbol(String),
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Pow(Arc<Expr>, Arc<Expr>),
    Neg(Arc<Expr>),
    Ln(Arc<Expr>),
    Exp(Arc<Expr>),
    Tanh(Arc<Expr>),
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Expr::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn zero() -> Self {
        Expr::Constant(0.0)
    }

    pub fn one() -> Self {
        Expr::Constant(1.0)
    }

    pub fn ln(self) -> Self {
        Expr::Ln(Arc::new(self))
    }

    pub fn exp(self) -> Self {
        Expr::Exp(Arc::new(self))
    }

    pub fn tanh(self) -> Self {
        Expr::Tanh(Arc::new(self))
    }

    pub fn pow(self, exponent: Expr) -> Self {
        Expr::Pow(Arc::new(self), Arc::new(exponent))
    }

    pub fn powi(self, exponent: i32) -> Self {
        Expr::Pow(Arc::new(self), Arc::new(Expr::Constant(exponent as f64)))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Constant(c) if *c == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Constant(c) if *c == 1.0)
    }

    /// Collects the names of all free symbols, sorted and deduplicated.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Constant(_) => {}
            Expr::Symbol(name) => {
                out.insert(name.clone());
            }
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
            Expr::Neg(inner) | Expr::Ln(inner) | Expr::Exp(inner) | Expr::Tanh(inner) => {
                inner.collect_symbols(out);
            }
        }
    }

    /// Number of nodes in the tree, counting shared subtrees each time they appear.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Constant(_) | Expr::Symbol(_) => 1,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
            Expr::Neg(inner) | Expr::Ln(inner) | Expr::Exp(inner) | Expr::Tanh(inner) => {
                1 + inner.node_count()
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{:?}", value),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exponent) => write!(f, "({} ** {})", base, exponent),
            Expr::Neg(inner) => write!(f, "(-{})", inner),
            Expr::Ln(inner) => write!(f, "log({})", inner),
            Expr::Exp(inner) => write!(f, "exp({})", inner),
            Expr::Tanh(inner) => write!(f, "tanh({})", inner),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Arc::new(self), Arc::new(rhs))
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Arc::new(self), Arc::new(rhs))
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Arc::new(self), Arc::new(rhs))
    }
}

impl std::ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Arc::new(self), Arc::new(rhs))
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Arc::new(self))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}
