use crate::core::model::{X_CR, X_NB};
use crate::core::symbolic::Expr;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BANNER_WIDTH: usize = 76;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// The expression still contains a symbol that is neither `XCR` nor
    /// `XNB`. Emitting it would hand the solver a partially specified
    /// function, so nothing is written.
    #[error("Routine '{routine}' contains unresolved symbol '{symbol}'")]
    UnresolvedSymbol { routine: String, symbol: String },

    #[error("Routine name '{0}' is not a valid C identifier")]
    InvalidName(String),

    #[error("Output file '{path}' already exists; refusing to overwrite without explicit consent", path = path.display())]
    WouldOverwrite { path: PathBuf },

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One expression to be emitted as a standalone C function.
#[derive(Debug, Clone)]
pub struct Routine {
    pub name: String,
    pub expr: Expr,
}

impl Routine {
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFiles {
    pub source: PathBuf,
    pub header: PathBuf,
}

/// Emits groups of routines as a C source/header pair, in the layout the
/// solver's build expects: one function per expression, a result local, and a
/// banner naming the owning project.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    project: String,
}

impl CodeGenerator {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }

    /// Writes `<prefix>.c` and `<prefix>.h` under `out_dir`.
    ///
    /// Validation happens for every routine before a single byte is written,
    /// so a failure never leaves a partial artifact behind. Existing files
    /// are only replaced when `overwrite` is set.
    pub fn emit(
        &self,
        prefix: &str,
        routines: &[Routine],
        out_dir: &Path,
        overwrite: bool,
    ) -> Result<EmittedFiles, CodegenError> {
        for routine in routines {
            validate_name(&routine.name)?;
            for symbol in routine.expr.free_symbols() {
                if symbol != X_CR && symbol != X_NB {
                    return Err(CodegenError::UnresolvedSymbol {
                        routine: routine.name.clone(),
                        symbol,
                    });
                }
            }
        }

        let source_path = out_dir.join(format!("{prefix}.c"));
        let header_path = out_dir.join(format!("{prefix}.h"));
        if !overwrite {
            for path in [&source_path, &header_path] {
                if path.exists() {
                    return Err(CodegenError::WouldOverwrite { path: path.clone() });
                }
            }
        }

        let source = self.render_source(prefix, routines);
        let header = self.render_header(prefix, routines);

        std::fs::create_dir_all(out_dir).map_err(|e| CodegenError::Io {
            path: out_dir.to_path_buf(),
            source: e,
        })?;
        std::fs::write(&source_path, source).map_err(|e| CodegenError::Io {
            path: source_path.clone(),
            source: e,
        })?;
        std::fs::write(&header_path, header).map_err(|e| CodegenError::Io {
            path: header_path.clone(),
            source: e,
        })?;

        Ok(EmittedFiles {
            source: source_path,
            header: header_path,
        })
    }

    fn banner(&self) -> String {
        let mut out = String::new();
        let rule = "*".repeat(BANNER_WIDTH + 2);
        writeln!(out, "/{rule}").unwrap();
        writeln!(
            out,
            " *{}*",
            center(
                &format!("Code generated with gibbs625 {}", env!("CARGO_PKG_VERSION")),
                BANNER_WIDTH
            )
        )
        .unwrap();
        writeln!(out, " *{}*", center("", BANNER_WIDTH)).unwrap();
        writeln!(
            out,
            " *{}*",
            center(
                &format!("This file is part of '{}'", self.project),
                BANNER_WIDTH
            )
        )
        .unwrap();
        writeln!(out, " {rule}/").unwrap();
        out
    }

    fn render_source(&self, prefix: &str, routines: &[Routine]) -> String {
        let mut out = self.banner();
        writeln!(out, "#include \"{prefix}.h\"").unwrap();
        writeln!(out, "#include <math.h>").unwrap();
        for routine in routines {
            let args = argument_list(&routine.expr);
            writeln!(out).unwrap();
            writeln!(out, "double {}({})", routine.name, args).unwrap();
            writeln!(out, "{{").unwrap();
            writeln!(out, "\tdouble {}_result;", routine.name).unwrap();
            writeln!(out, "\t{}_result = {};", routine.name, c_expr(&routine.expr)).unwrap();
            writeln!(out, "\treturn {}_result;", routine.name).unwrap();
            writeln!(out, "}}").unwrap();
        }
        out
    }

    fn render_header(&self, prefix: &str, routines: &[Routine]) -> String {
        let guard = format!(
            "{}__{}__H",
            sanitize_upper(&self.project),
            sanitize_upper(prefix)
        );
        let mut out = self.banner();
        writeln!(out).unwrap();
        writeln!(out, "#ifndef {guard}").unwrap();
        writeln!(out, "#define {guard}").unwrap();
        writeln!(out).unwrap();
        for routine in routines {
            writeln!(
                out,
                "double {}({});",
                routine.name,
                argument_list(&routine.expr)
            )
            .unwrap();
        }
        writeln!(out).unwrap();
        writeln!(out, "#endif").unwrap();
        out
    }
}

fn center(text: &str, width: usize) -> String {
    if text.len() >= width {
        return text.to_string();
    }
    let left = (width - text.len()) / 2;
    let right = width - text.len() - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn sanitize_upper(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn validate_name(name: &str) -> Result<(), CodegenError> {
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_head && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(CodegenError::InvalidName(name.to_string()))
    }
}

/// Argument list restricted to the symbols actually free in the expression,
/// in the fixed order (XCR, XNB). Constants become nullary functions.
fn argument_list(expr: &Expr) -> String {
    let symbols = expr.free_symbols();
    [X_CR, X_NB]
        .iter()
        .filter(|name| symbols.contains(**name))
        .map(|name| format!("double {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders an expression as a C rvalue with minimal parenthesization.
pub fn c_expr(expr: &Expr) -> String {
    render(expr, 0)
}

fn render(expr: &Expr, parent_precedence: u8) -> String {
    let (text, precedence) = match expr {
        Expr::Constant(value) => (format_double(*value), if *value < 0.0 { 0 } else { 4 }),
        Expr::Symbol(name) => (name.clone(), 4),
        Expr::Add(lhs, rhs) => (format!("{} + {}", render(lhs, 1), render(rhs, 1)), 1),
        Expr::Sub(lhs, rhs) => (format!("{} - {}", render(lhs, 1), render(rhs, 2)), 1),
        Expr::Mul(lhs, rhs) => (format!("{}*{}", render(lhs, 2), render(rhs, 2)), 2),
        Expr::Div(lhs, rhs) => (format!("{}/{}", render(lhs, 2), render(rhs, 3)), 2),
        Expr::Neg(inner) => (format!("-{}", render(inner, 4)), 3),
        Expr::Pow(base, exponent) => (
            format!("pow({}, {})", render(base, 0), render(exponent, 0)),
            4,
        ),
        Expr::Ln(inner) => (format!("log({})", render(inner, 0)), 4),
        Expr::Exp(inner) => (format!("exp({})", render(inner, 0)), 4),
        Expr::Tanh(inner) => (format!("tanh({})", render(inner, 0)), 4),
    };
    if precedence < parent_precedence {
        format!("({text})")
    } else {
        text
    }
}

/// Shortest-round-trip formatting, forced to stay a C `double` literal.
fn format_double(value: f64) -> String {
    let text = format!("{:?}", value);
    if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{text}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renders_arithmetic_with_minimal_parentheses() {
        let expr = (Expr::symbol("XCR") + Expr::constant(1.0)) * Expr::symbol("XNB");
        assert_eq!(c_expr(&expr), "(XCR + 1.0)*XNB");
    }

    #[test]
    fn renders_subtraction_right_operand_parenthesized() {
        let expr = Expr::symbol("XCR") - (Expr::symbol("XNB") + Expr::constant(1.0));
        assert_eq!(c_expr(&expr), "XCR - (XNB + 1.0)");
    }

    #[test]
    fn renders_powers_as_pow_calls() {
        let expr = Expr::symbol("XCR").powi(2);
        assert_eq!(c_expr(&expr), "pow(XCR, 2.0)");
    }

    #[test]
    fn renders_transcendental_functions_with_math_h_names() {
        let expr = Expr::symbol("XCR").ln() + Expr::symbol("XNB").tanh();
        assert_eq!(c_expr(&expr), "log(XCR) + tanh(XNB)");
    }

    #[test]
    fn negative_constants_are_parenthesized_in_context() {
        let expr = Expr::symbol("XCR") * Expr::constant(-2.0);
        assert_eq!(c_expr(&expr), "XCR*(-2.0)");
    }

    #[test]
    fn integral_constants_stay_double_literals() {
        assert_eq!(format_double(4.0), "4.0");
        assert_eq!(format_double(1e-5), "1e-5");
        assert_eq!(format_double(0.25), "0.25");
    }

    #[test]
    fn constant_routines_become_nullary_functions() {
        let dir = tempdir().unwrap();
        let generator = CodeGenerator::new("ALLOY625");
        let routines = vec![Routine::new("Vm", Expr::constant(1.0e-5))];
        let files = generator.emit("consts625", &routines, dir.path(), false).unwrap();
        let source = std::fs::read_to_string(&files.source).unwrap();
        assert!(source.contains("double Vm()"));
        assert!(source.contains("Vm_result = 1e-5;"));
    }

    #[test]
    fn emits_source_and_header_pair() {
        let dir = tempdir().unwrap();
        let generator = CodeGenerator::new("ALLOY625");
        let routines = vec![Routine::new(
            "g_gam",
            Expr::symbol("XCR") * Expr::symbol("XNB"),
        )];
        let files = generator.emit("energy625", &routines, dir.path(), false).unwrap();

        let source = std::fs::read_to_string(&files.source).unwrap();
        assert!(source.contains("#include \"energy625.h\""));
        assert!(source.contains("double g_gam(double XCR, double XNB)"));

        let header = std::fs::read_to_string(&files.header).unwrap();
        assert!(header.contains("#ifndef ALLOY625__ENERGY625__H"));
        assert!(header.contains("double g_gam(double XCR, double XNB);"));
    }

    #[test]
    fn emission_is_deterministic() {
        let dir = tempdir().unwrap();
        let generator = CodeGenerator::new("ALLOY625");
        let routines = vec![
            Routine::new("g_gam", Expr::symbol("XCR").ln() * Expr::constant(2.5)),
            Routine::new("xe_gam_Cr", Expr::constant(0.49)),
        ];
        let first = generator.emit("energy625", &routines, dir.path(), false).unwrap();
        let first_source = std::fs::read_to_string(&first.source).unwrap();
        let second = generator.emit("energy625", &routines, dir.path(), true).unwrap();
        let second_source = std::fs::read_to_string(&second.source).unwrap();
        assert_eq!(first_source, second_source);
    }

    #[test]
    fn refuses_to_overwrite_without_consent() {
        let dir = tempdir().unwrap();
        let generator = CodeGenerator::new("ALLOY625");
        let routines = vec![Routine::new("g_gam", Expr::symbol("XCR"))];
        generator.emit("energy625", &routines, dir.path(), false).unwrap();
        let result = generator.emit("energy625", &routines, dir.path(), false);
        assert!(matches!(result, Err(CodegenError::WouldOverwrite { .. })));
    }

    #[test]
    fn unresolved_symbol_aborts_before_writing_anything() {
        let dir = tempdir().unwrap();
        let generator = CodeGenerator::new("ALLOY625");
        let routines = vec![
            Routine::new("g_gam", Expr::symbol("XCR")),
            Routine::new("g_del", Expr::symbol("T") * Expr::symbol("XNB")),
        ];
        let result = generator.emit("energy625", &routines, dir.path(), false);
        assert!(matches!(
            result,
            Err(CodegenError::UnresolvedSymbol { ref routine, ref symbol })
                if routine == "g_del" && symbol == "T"
        ));
        assert!(!dir.path().join("energy625.c").exists());
    }

    #[test]
    fn rejects_invalid_c_identifiers() {
        let dir = tempdir().unwrap();
        let generator = CodeGenerator::new("ALLOY625");
        let routines = vec![Routine::new("2bad", Expr::zero())];
        let result = generator.emit("x", &routines, dir.path(), false);
        assert!(matches!(result, Err(CodegenError::InvalidName(_))));
    }
}
