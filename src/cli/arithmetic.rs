//! Demonstration compiler: integer arithmetic
//!
//! Evaluates `+ - * /`, unary minus and parentheses over `i64`, so that a
//! submitted `2+2` prints `4`. Trailing semicolons and whitespace are ignored.
//! Errors carry the character offset where evaluation stopped.

use crate::console::{CompileResult, Compiler, Diagnostic};
use async_trait::async_trait;

#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticCompiler;

#[async_trait]
impl Compiler for ArithmeticCompiler {
    async fn compile(&self, source: String) -> CompileResult {
        match evaluate(&source) {
            Ok(value) => CompileResult::ok(value.to_string()),
            Err(diagnostic) => CompileResult::failed(vec![diagnostic]),
        }
    }
}

/// Evaluate one integer expression
pub fn evaluate(source: &str) -> Result<i64, Diagnostic> {
    let body = source.trim_end().trim_end_matches(';');
    let mut parser = Parser {
        chars: body.chars().collect(),
        pos: 0,
    };

    parser.skip_whitespace();
    if parser.at_end() {
        return Err(Diagnostic::new("nothing to evaluate"));
    }

    let value = parser.expression()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(Diagnostic::at(format!("unexpected '{}'", c), parser.pos)),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn expression(&mut self) -> Result<i64, Diagnostic> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some(c @ ('+' | '-')) => c,
                _ => return Ok(value),
            };
            let at = self.pos;
            self.pos += 1;
            let rhs = self.term()?;
            value = match op {
                '+' => value.checked_add(rhs),
                _ => value.checked_sub(rhs),
            }
            .ok_or_else(|| Diagnostic::at("integer overflow", at))?;
        }
    }

    fn term(&mut self) -> Result<i64, Diagnostic> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some(c @ ('*' | '/')) => c,
                _ => return Ok(value),
            };
            let at = self.pos;
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == '*' {
                value
                    .checked_mul(rhs)
                    .ok_or_else(|| Diagnostic::at("integer overflow", at))?
            } else if rhs == 0 {
                return Err(Diagnostic::at("division by zero", at));
            } else {
                value
                    .checked_div(rhs)
                    .ok_or_else(|| Diagnostic::at("integer overflow", at))?
            };
        }
    }

    fn factor(&mut self) -> Result<i64, Diagnostic> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                let at = self.pos;
                self.pos += 1;
                self.factor()?
                    .checked_neg()
                    .ok_or_else(|| Diagnostic::at("integer overflow", at))
            }
            Some('(') => {
                let open = self.pos;
                self.pos += 1;
                let value = self.expression()?;
                self.skip_whitespace();
                if self.peek() != Some(')') {
                    return Err(Diagnostic::at("unclosed '('", open));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() => self.number(),
            Some(c) => Err(Diagnostic::at(format!("unexpected '{}'", c), self.pos)),
            None => Err(Diagnostic::at("unexpected end of input", self.pos)),
        }
    }

    fn number(&mut self) -> Result<i64, Diagnostic> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| Diagnostic::at("number too large", start))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_parens() {
        assert_eq!(evaluate("2+2"), Ok(4));
        assert_eq!(evaluate("2 + 3 * 4"), Ok(14));
        assert_eq!(evaluate("(2 + 3) * 4;\n"), Ok(20));
        assert_eq!(evaluate("-(7 - 10) / 2"), Ok(1));
    }

    #[test]
    fn test_errors_carry_offsets() {
        assert_eq!(evaluate("1 +"), Err(Diagnostic::at("unexpected end of input", 3)));
        assert_eq!(evaluate("4 / 0"), Err(Diagnostic::at("division by zero", 2)));
        assert_eq!(evaluate("(1 + 2"), Err(Diagnostic::at("unclosed '('", 0)));
        assert_eq!(evaluate("2 x"), Err(Diagnostic::at("unexpected 'x'", 2)));
        assert_eq!(evaluate("  "), Err(Diagnostic::new("nothing to evaluate")));
    }

    #[tokio::test]
    async fn test_compile_reports_output() {
        let result = ArithmeticCompiler.compile("6*7".to_string()).await;
        assert!(result.success);
        assert_eq!(result.output.as_deref(), Some("42"));

        let result = ArithmeticCompiler.compile("6*".to_string()).await;
        assert!(!result.success);
        assert!(result.output.is_none());
    }
}
