//! Sandboxed arithmetic evaluation.
//!
//! Input is first checked against a fixed character whitelist, then
//! tokenized and parsed by a recursive-descent parser into an [`Expr`] tree
//! which is evaluated over `f64`. The grammar has no identifiers, so there is
//! nothing to resolve: no variables, no functions, no assignment.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Exponentiation is right-associative and binds tighter than a unary minus
//! on its left, so `-2^2 = -4` and `2^-1 = 0.5`.

use crate::error::MathError;

const ALLOWED_CHARS: &str = "0123456789+-*/.()^";
const MAX_DEPTH: usize = 64;
/// Operator chains build a left-deep tree; the token cap bounds its depth.
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Parsed arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Evaluates the tree. Non-finite intermediate results are overflow.
    pub fn eval(&self) -> Result<f64, MathError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Neg(inner) => -inner.eval()?,
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval()?;
                let b = rhs.eval()?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => {
                        if b == 0.0 {
                            return Err(evaluation("деление на ноль"));
                        }
                        a / b
                    }
                    BinaryOp::Pow => {
                        if a == 0.0 && b < 0.0 {
                            return Err(evaluation("деление на ноль"));
                        }
                        if a < 0.0 && b.fract() != 0.0 {
                            return Err(evaluation(
                                "дробная степень отрицательного числа",
                            ));
                        }
                        a.powf(b)
                    }
                }
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(evaluation("переполнение"))
        }
    }
}

fn evaluation(message: &str) -> MathError {
    MathError::Evaluation(message.to_string())
}

/// Rejects any character outside the whitelist. Whitespace is ignored.
pub fn validate(expression: &str) -> Result<(), MathError> {
    match expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .find(|c| !ALLOWED_CHARS.contains(*c))
    {
        Some(bad) => Err(MathError::InvalidCharacter(bad)),
        None => Ok(()),
    }
}

fn tokenize(expression: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    Token::Caret
                } else {
                    Token::Star
                }
            }
            '0'..='9' | '.' => {
                let start = i;
                while i + 1 < chars.len() && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..=i].iter().collect();
                if literal == "." || literal.matches('.').count() > 1 {
                    return Err(MathError::Evaluation(format!(
                        "некорректное число '{}'",
                        literal
                    )));
                }
                let value = literal.parse::<f64>().map_err(|_| {
                    MathError::Evaluation(format!("некорректное число '{}'", literal))
                })?;
                Token::Number(value)
            }
            other => return Err(MathError::InvalidCharacter(other)),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<(), MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(evaluation("слишком глубокая вложенность"));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Expr, MathError> {
        let mut lhs = self.parse_term()?;
        while let Some(token) = self.peek() {
            let op = match token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, MathError> {
        let mut lhs = self.parse_unary()?;
        while let Some(token) = self.peek() {
            let op = match token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, MathError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let inner = self.parse_unary();
                self.depth -= 1;
                inner
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, MathError> {
        let base = self.parse_primary()?;
        if self.peek() == Some(Token::Caret) {
            self.pos += 1;
            self.descend()?;
            let exponent = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, MathError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(evaluation("синтаксическая ошибка: не закрыта скобка")),
                }
            }
            Some(_) => Err(evaluation("синтаксическая ошибка: неожиданный оператор")),
            None => Err(evaluation("синтаксическая ошибка: неожиданный конец выражения")),
        }
    }
}

/// Validates, tokenizes and parses an expression into a tree.
pub fn parse(expression: &str) -> Result<Expr, MathError> {
    validate(expression)?;
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(evaluation("пустое выражение"));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(evaluation("слишком длинное выражение"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(evaluation("синтаксическая ошибка: лишние символы"));
    }
    Ok(expr)
}

/// Evaluates an arithmetic expression such as `(2+3)^2`.
pub fn evaluate(expression: &str) -> Result<f64, MathError> {
    parse(expression)?.eval()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::format::format_number;

    fn eval_str(expression: &str) -> String {
        format_number(evaluate(expression).unwrap())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval_str("2+2*2"), "6");
        assert_eq!(eval_str("(2+2)*2"), "8");
        assert_eq!(eval_str("10 - 4 - 3"), "3");
        assert_eq!(eval_str("7/2"), "3.5");
    }

    #[test]
    fn test_power() {
        assert_eq!(eval_str("(2+3)^2"), "25");
        assert_eq!(eval_str("2^3^2"), "512");
        assert_eq!(eval_str("-2^2"), "-4");
        assert_eq!(eval_str("2^-1"), "0.5");
        assert_eq!(eval_str("2**10"), "1024");
    }

    #[test]
    fn test_unary_and_decimals() {
        assert_eq!(eval_str("--3"), "3");
        assert_eq!(eval_str("+5"), "5");
        assert_eq!(eval_str(".5 + 5."), "5.5");
        assert_eq!(eval_str("0.1 + 0.2"), "0.30000000000000004");
        assert_eq!(eval_str(" ( 2 + 3 ) ^ 2 "), "25");
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate("10/0").unwrap_err();
        assert_eq!(err, MathError::Evaluation("деление на ноль".to_string()));
        assert!(matches!(evaluate("0^-1"), Err(MathError::Evaluation(_))));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            evaluate("10^400").unwrap_err(),
            MathError::Evaluation("переполнение".to_string())
        );
    }

    #[test]
    fn test_malformed_syntax() {
        for bad in ["", "   ", "2+", "(2+3", "2+3)", "()", "2(3)", "1.2.3", ".", "*2", "1 2"] {
            assert!(
                matches!(evaluate(bad), Err(MathError::Evaluation(_))),
                "expected evaluation error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(evaluate(&deep), Err(MathError::Evaluation(_))));

        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&shallow).unwrap(), 1.0);
    }

    #[test]
    fn test_long_operator_chain_rejected() {
        let chain = format!("{}1", "1+".repeat(200_000));
        assert_eq!(
            evaluate(&chain).unwrap_err(),
            MathError::Evaluation("слишком длинное выражение".to_string())
        );

        let product = format!("{}2", "2*".repeat(100_000));
        assert!(matches!(evaluate(&product), Err(MathError::Evaluation(_))));

        let within = format!("{}1", "1+".repeat(500));
        assert_eq!(evaluate(&within).unwrap(), 501.0);
    }

    #[test]
    fn test_whitelist_rejects_names_and_separators() {
        for input in [
            "__import__('os')",
            "2+2; 3",
            "math.pi",
            "a=1",
            "x*2",
            "2+2#",
            "2,5",
            "sqrt(4)",
            "15% от 200",
        ] {
            assert!(
                matches!(evaluate(input), Err(MathError::InvalidCharacter(_))),
                "expected invalid character for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_tree_shape() {
        let expr = parse("1-2").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Sub,
                lhs: Box::new(Expr::Number(1.0)),
                rhs: Box::new(Expr::Number(2.0)),
            }
        );
    }
}
