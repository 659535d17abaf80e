use super::expr::Expr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Expected '{expected}' at offset {offset}")]
    ExpectedToken { expected: &'static str, offset: usize },

    #[error("Unknown function '{name}' at offset {offset}")]
    UnknownFunction { name: String, offset: usize },

    #[error("Malformed numeric literal '{literal}' at offset {offset}")]
    BadNumber { literal: String, offset: usize },

    #[error("Trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

/// Parses the textual expression dumps produced by the database collaborator.
///
/// Grammar (sympy-compatible subset): `+ - * / **`, parentheses, numeric
/// literals with optional exponent, bare identifiers as symbols, and the
/// single-argument calls `log`, `ln`, `exp`, `tanh`. `**` binds tighter than
/// unary minus and associates to the right.
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        position: 0,
    };
    let expr = parser.parse_sum()?;
    parser.skip_whitespace();
    if parser.position < parser.chars.len() {
        return Err(ParseError::TrailingInput {
            offset: parser.chars[parser.position].0,
        });
    }
    Ok(expr)
}

struct Parser {
    chars: Vec<(usize, char)>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.position)
            .map(|(offset, _)| *offset)
            .unwrap_or_else(|| self.chars.last().map(|(o, c)| o + c.len_utf8()).unwrap_or(0))
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn consume(&mut self, expected: char, label: &'static str) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::ExpectedToken {
                expected: label,
                offset: self.offset(),
            })
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_product()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.advance();
                    lhs = lhs + self.parse_product()?;
                }
                Some('-') => {
                    self.advance();
                    lhs = lhs - self.parse_product()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    // Lookahead distinguishes '*' from '**'; the latter is
                    // handled below the unary level.
                    if self.chars.get(self.position + 1).map(|(_, c)| *c) == Some('*') {
                        return Ok(lhs);
                    }
                    self.advance();
                    lhs = lhs * self.parse_unary()?;
                }
                Some('/') => {
                    self.advance();
                    lhs = lhs / self.parse_unary()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        if self.peek() == Some('-') {
            self.advance();
            return Ok(-self.parse_unary()?);
        }
        if self.peek() == Some('+') {
            self.advance();
            return Ok(self.parse_unary()?);
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        self.skip_whitespace();
        if self.peek() == Some('*')
            && self.chars.get(self.position + 1).map(|(_, c)| *c) == Some('*')
        {
            self.advance();
            self.advance();
            // Right-associative; '-x ** 2' parses as -(x ** 2).
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some('(') => {
                self.advance();
                let inner = self.parse_sum()?;
                self.consume(')', ")")?;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_identifier(),
            Some(c) => Err(ParseError::UnexpectedCharacter {
                character: c,
                offset: self.offset(),
            }),
        }
    }

    fn parse_number(&mut self) -> Result<Expr, ParseError> {
        let start_offset = self.offset();
        let mut literal = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                literal.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E')
                && self
                    .chars
                    .get(self.position + 1)
                    .map(|(_, next)| next.is_ascii_digit() || *next == '+' || *next == '-')
                    .unwrap_or(false)
            {
                literal.push(c);
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    literal.push(self.peek().unwrap());
                    self.advance();
                }
            } else {
                break;
            }
        }
        literal
            .parse::<f64>()
            .map(Expr::Constant)
            .map_err(|_| ParseError::BadNumber {
                literal,
                offset: start_offset,
            })
    }

    fn parse_identifier(&mut self) -> Result<Expr, ParseError> {
        let start_offset = self.offset();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.advance();
            let argument = self.parse_sum()?;
            self.consume(')', ")")?;
            return match name.as_str() {
                "log" | "ln" => Ok(argument.ln()),
                "exp" => Ok(argument.exp()),
                "tanh" => Ok(argument.tanh()),
                _ => Err(ParseError::UnknownFunction {
                    name,
                    offset: start_offset,
                }),
            };
        }
        Ok(Expr::Symbol(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbolic::eval::eval;
    use std::collections::HashMap;

    fn eval_str(input: &str, pairs: &[(&str, f64)]) -> f64 {
        let vars: HashMap<String, f64> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        eval(&parse_expr(input).unwrap(), &vars).unwrap()
    }

    #[test]
    fn parses_arithmetic_with_precedence() {
        assert_eq!(eval_str("1 + 2 * 3", &[]), 7.0);
        assert_eq!(eval_str("(1 + 2) * 3", &[]), 9.0);
        assert_eq!(eval_str("8 / 2 / 2", &[]), 2.0);
    }

    #[test]
    fn parses_power_operator_right_associatively() {
        assert_eq!(eval_str("2 ** 3 ** 2", &[]), 512.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(eval_str("-2 ** 2", &[]), -4.0);
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(eval_str("1.5e3 + 2E-2", &[]), 1500.02);
    }

    #[test]
    fn parses_sublattice_symbols() {
        let expr = parse_expr("FCC_A10CR * log(FCC_A10CR) + 8.3145 * T").unwrap();
        let symbols: Vec<_> = expr.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["FCC_A10CR".to_string(), "T".to_string()]);
    }

    #[test]
    fn log_and_ln_are_synonyms() {
        assert_eq!(
            parse_expr("log(x)").unwrap(),
            parse_expr("ln(x)").unwrap()
        );
    }

    #[test]
    fn parses_tanh_and_exp_calls() {
        let value = eval_str("tanh(0.5) + exp(0)", &[]);
        assert!((value - (0.5f64.tanh() + 1.0)).abs() < 1e-15);
    }

    #[test]
    fn rejects_unknown_functions() {
        assert!(matches!(
            parse_expr("sinh(x)"),
            Err(ParseError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(matches!(
            parse_expr("1 + 2 )"),
            Err(ParseError::TrailingInput { .. })
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_expr(""), Err(ParseError::UnexpectedEnd));
    }
}
