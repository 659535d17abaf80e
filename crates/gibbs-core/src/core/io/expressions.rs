use crate::core::symbolic::{Expr, ParseError, parse_expr};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The database frontend's dump format: one expression string per database
/// phase name, in sublattice site-fraction symbols.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ExpressionsFile {
    phases: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ExpressionsLoadError {
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("Expression for phase '{phase}' does not parse: {source}")]
    Expression {
        phase: String,
        #[source]
        source: ParseError,
    },
}

/// Loads `(database name, expression)` pairs from an expressions file,
/// in deterministic (sorted) order. Phase-set validation happens downstream
/// when the pairs are assembled into a full model.
pub fn load_named_expressions(path: &Path) -> Result<Vec<(String, Expr)>, ExpressionsLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExpressionsLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: ExpressionsFile =
        toml::from_str(&content).map_err(|e| ExpressionsLoadError::Toml {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut entries = Vec::with_capacity(file.phases.len());
    for (phase, text) in file.phases {
        let expr = parse_expr(&text).map_err(|e| ExpressionsLoadError::Expression {
            phase: phase.clone(),
            source: e,
        })?;
        entries.push((phase, expr));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_expressions_in_sorted_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expressions.toml");
        std::fs::write(
            &path,
            r#"
            [phases]
            FCC_A1 = "8.3145*T*(FCC_A10CR*log(FCC_A10CR))"
            D0A_NBNI3 = "1000.0*D0A_NBNI30NB"
            "#,
        )
        .unwrap();

        let entries = load_named_expressions(&path).unwrap();
        let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["D0A_NBNI3", "FCC_A1"]);
        assert!(entries[1].1.free_symbols().contains("FCC_A10CR"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = load_named_expressions(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ExpressionsLoadError::Io { .. })));
    }

    #[test]
    fn malformed_toml_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expressions.toml");
        std::fs::write(&path, "phases = 3\n").unwrap();
        let result = load_named_expressions(&path);
        assert!(matches!(result, Err(ExpressionsLoadError::Toml { .. })));
    }

    #[test]
    fn unparseable_expression_names_the_phase() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expressions.toml");
        std::fs::write(&path, "[phases]\nFCC_A1 = \"1 + * 2\"\n").unwrap();
        let result = load_named_expressions(&path);
        assert!(matches!(
            result,
            Err(ExpressionsLoadError::Expression { ref phase, .. }) if phase == "FCC_A1"
        ));
    }
}
