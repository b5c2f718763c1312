//! Gettext `Plural-Forms` rule parsing and evaluation
//!
//! A rule string such as `nplurals=2; plural=n != 1;` declares how many
//! plural forms a locale has and which zero-based form index a given count
//! maps to. The expression after `plural=` is the C-style gettext plural
//! grammar: integers, `n`, `%`, arithmetic, comparisons, `&&`/`||`, `!`,
//! and the ternary `? :`.
//!
//! The expression is parsed into an AST by a small recursive-descent parser
//! and evaluated directly; no dynamic code evaluation is involved, so a
//! hostile rule string can at worst fail to parse.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RuleError;

/// Matches `nplurals=<N>; plural=<expr>;` with case-insensitive keywords
static RULE_RE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"(?i)nplurals\s*=\s*(\d+)\s*;\s*plural\s*=\s*([^;]+);")
		.expect("Invalid plural rule regex pattern")
});

/// A parsed plural-forms rule: the declared form count plus the selector
/// expression
///
/// # Example
/// ```
/// use glossa_i18n::PluralRule;
///
/// let rule = PluralRule::parse("nplurals=2; plural=n != 1;").unwrap();
/// assert_eq!(rule.nplurals(), 2);
/// assert_eq!(rule.select_form(Some(1)).unwrap(), 0);
/// assert_eq!(rule.select_form(Some(5)).unwrap(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRule {
	nplurals: usize,
	expr: Expr,
}

impl PluralRule {
	/// Parse a `nplurals=<N>; plural=<expr>;` rule string
	pub fn parse(rule: &str) -> Result<Self, RuleError> {
		let captures = RULE_RE.captures(rule).ok_or_else(|| RuleError::Parse {
			rule: rule.to_string(),
			reason: "expected 'nplurals=<N>; plural=<expr>;'".to_string(),
		})?;

		let nplurals: usize = captures[1].parse().map_err(|_| RuleError::Parse {
			rule: rule.to_string(),
			reason: "nplurals is not a valid integer".to_string(),
		})?;

		let expr = parse_expression(&captures[2]).map_err(|reason| RuleError::Parse {
			rule: rule.to_string(),
			reason,
		})?;

		Ok(Self { nplurals, expr })
	}

	/// Number of plural forms the rule declares
	pub fn nplurals(&self) -> usize {
		self.nplurals
	}

	/// Evaluate the rule for a count, returning the zero-based form index
	///
	/// A missing count is normalized to `1`. Boolean results coerce to
	/// `0`/`1`.
	pub fn select_form(&self, n: Option<u64>) -> Result<usize, RuleError> {
		let n = n.unwrap_or(1);
		let value = self.expr.eval(n)?;
		usize::try_from(value)
			.map_err(|_| RuleError::Evaluation(format!("form index {value} is negative")))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
	Mul,
	Div,
	Mod,
	Add,
	Sub,
	Lt,
	Le,
	Gt,
	Ge,
	Eq,
	Ne,
	And,
	Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
	Num(i64),
	N,
	Not(Box<Expr>),
	Binary {
		op: BinOp,
		lhs: Box<Expr>,
		rhs: Box<Expr>,
	},
	Ternary {
		cond: Box<Expr>,
		then: Box<Expr>,
		otherwise: Box<Expr>,
	},
}

impl Expr {
	fn eval(&self, n: u64) -> Result<i64, RuleError> {
		match self {
			Self::Num(value) => Ok(*value),
			Self::N => i64::try_from(n)
				.map_err(|_| RuleError::Evaluation(format!("count {n} out of range"))),
			Self::Not(inner) => Ok(i64::from(inner.eval(n)? == 0)),
			Self::Binary { op, lhs, rhs } => {
				// Logical operators short-circuit like C
				match op {
					BinOp::And => {
						return Ok(i64::from(lhs.eval(n)? != 0 && rhs.eval(n)? != 0));
					}
					BinOp::Or => {
						return Ok(i64::from(lhs.eval(n)? != 0 || rhs.eval(n)? != 0));
					}
					_ => {}
				}

				let left = lhs.eval(n)?;
				let right = rhs.eval(n)?;
				let overflow = || RuleError::Evaluation("arithmetic overflow".to_string());
				match op {
					BinOp::Mul => left.checked_mul(right).ok_or_else(overflow),
					BinOp::Div => left
						.checked_div(right)
						.ok_or_else(|| RuleError::Evaluation("division by zero".to_string())),
					BinOp::Mod => left
						.checked_rem(right)
						.ok_or_else(|| RuleError::Evaluation("modulo by zero".to_string())),
					BinOp::Add => left.checked_add(right).ok_or_else(overflow),
					BinOp::Sub => left.checked_sub(right).ok_or_else(overflow),
					BinOp::Lt => Ok(i64::from(left < right)),
					BinOp::Le => Ok(i64::from(left <= right)),
					BinOp::Gt => Ok(i64::from(left > right)),
					BinOp::Ge => Ok(i64::from(left >= right)),
					BinOp::Eq => Ok(i64::from(left == right)),
					BinOp::Ne => Ok(i64::from(left != right)),
					BinOp::And | BinOp::Or => unreachable!("handled above"),
				}
			}
			Self::Ternary {
				cond,
				then,
				otherwise,
			} => {
				if cond.eval(n)? != 0 {
					then.eval(n)
				} else {
					otherwise.eval(n)
				}
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
	Num(i64),
	N,
	LParen,
	RParen,
	Not,
	Mul,
	Div,
	Mod,
	Add,
	Sub,
	Lt,
	Le,
	Gt,
	Ge,
	Eq,
	Ne,
	And,
	Or,
	Question,
	Colon,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
	let mut tokens = Vec::new();
	let bytes = input.as_bytes();
	let mut i = 0;

	while i < bytes.len() {
		let ch = bytes[i] as char;
		match ch {
			' ' | '\t' | '\r' | '\n' => i += 1,
			'0'..='9' => {
				let start = i;
				while i < bytes.len() && bytes[i].is_ascii_digit() {
					i += 1;
				}
				let digits = &input[start..i];
				let value: i64 = digits
					.parse()
					.map_err(|_| format!("integer literal '{digits}' out of range"))?;
				tokens.push(Token::Num(value));
			}
			'n' => {
				tokens.push(Token::N);
				i += 1;
			}
			'(' => {
				tokens.push(Token::LParen);
				i += 1;
			}
			')' => {
				tokens.push(Token::RParen);
				i += 1;
			}
			'*' => {
				tokens.push(Token::Mul);
				i += 1;
			}
			'/' => {
				tokens.push(Token::Div);
				i += 1;
			}
			'%' => {
				tokens.push(Token::Mod);
				i += 1;
			}
			'+' => {
				tokens.push(Token::Add);
				i += 1;
			}
			'-' => {
				tokens.push(Token::Sub);
				i += 1;
			}
			'?' => {
				tokens.push(Token::Question);
				i += 1;
			}
			':' => {
				tokens.push(Token::Colon);
				i += 1;
			}
			'<' => {
				if bytes.get(i + 1) == Some(&b'=') {
					tokens.push(Token::Le);
					i += 2;
				} else {
					tokens.push(Token::Lt);
					i += 1;
				}
			}
			'>' => {
				if bytes.get(i + 1) == Some(&b'=') {
					tokens.push(Token::Ge);
					i += 2;
				} else {
					tokens.push(Token::Gt);
					i += 1;
				}
			}
			'=' => {
				if bytes.get(i + 1) == Some(&b'=') {
					tokens.push(Token::Eq);
					i += 2;
				} else {
					return Err("'=' is not an operator (did you mean '==')".to_string());
				}
			}
			'!' => {
				if bytes.get(i + 1) == Some(&b'=') {
					tokens.push(Token::Ne);
					i += 2;
				} else {
					tokens.push(Token::Not);
					i += 1;
				}
			}
			'&' => {
				if bytes.get(i + 1) == Some(&b'&') {
					tokens.push(Token::And);
					i += 2;
				} else {
					return Err("'&' is not an operator (did you mean '&&')".to_string());
				}
			}
			'|' => {
				if bytes.get(i + 1) == Some(&b'|') {
					tokens.push(Token::Or);
					i += 2;
				} else {
					return Err("'|' is not an operator (did you mean '||')".to_string());
				}
			}
			other => return Err(format!("unexpected character '{other}'")),
		}
	}

	Ok(tokens)
}

fn parse_expression(input: &str) -> Result<Expr, String> {
	let tokens = tokenize(input)?;
	Parser { tokens, pos: 0 }.parse()
}

/// Recursive-descent parser over the gettext plural grammar, with C
/// operator precedence (ternary lowest, unary `!` highest)
struct Parser {
	tokens: Vec<Token>,
	pos: usize,
}

impl Parser {
	fn parse(mut self) -> Result<Expr, String> {
		let expr = self.ternary()?;
		if self.pos < self.tokens.len() {
			return Err("trailing tokens after expression".to_string());
		}
		Ok(expr)
	}

	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn advance(&mut self) -> Option<Token> {
		let token = self.tokens.get(self.pos).cloned();
		if token.is_some() {
			self.pos += 1;
		}
		token
	}

	fn eat(&mut self, expected: &Token) -> bool {
		if self.peek() == Some(expected) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn ternary(&mut self) -> Result<Expr, String> {
		let cond = self.logical_or()?;
		if !self.eat(&Token::Question) {
			return Ok(cond);
		}
		let then = self.ternary()?;
		if !self.eat(&Token::Colon) {
			return Err("expected ':' in ternary expression".to_string());
		}
		let otherwise = self.ternary()?;
		Ok(Expr::Ternary {
			cond: Box::new(cond),
			then: Box::new(then),
			otherwise: Box::new(otherwise),
		})
	}

	fn logical_or(&mut self) -> Result<Expr, String> {
		let mut lhs = self.logical_and()?;
		while self.eat(&Token::Or) {
			let rhs = self.logical_and()?;
			lhs = binary(BinOp::Or, lhs, rhs);
		}
		Ok(lhs)
	}

	fn logical_and(&mut self) -> Result<Expr, String> {
		let mut lhs = self.equality()?;
		while self.eat(&Token::And) {
			let rhs = self.equality()?;
			lhs = binary(BinOp::And, lhs, rhs);
		}
		Ok(lhs)
	}

	fn equality(&mut self) -> Result<Expr, String> {
		let mut lhs = self.relational()?;
		loop {
			let op = match self.peek() {
				Some(Token::Eq) => BinOp::Eq,
				Some(Token::Ne) => BinOp::Ne,
				_ => break,
			};
			self.pos += 1;
			let rhs = self.relational()?;
			lhs = binary(op, lhs, rhs);
		}
		Ok(lhs)
	}

	fn relational(&mut self) -> Result<Expr, String> {
		let mut lhs = self.additive()?;
		loop {
			let op = match self.peek() {
				Some(Token::Lt) => BinOp::Lt,
				Some(Token::Le) => BinOp::Le,
				Some(Token::Gt) => BinOp::Gt,
				Some(Token::Ge) => BinOp::Ge,
				_ => break,
			};
			self.pos += 1;
			let rhs = self.additive()?;
			lhs = binary(op, lhs, rhs);
		}
		Ok(lhs)
	}

	fn additive(&mut self) -> Result<Expr, String> {
		let mut lhs = self.multiplicative()?;
		loop {
			let op = match self.peek() {
				Some(Token::Add) => BinOp::Add,
				Some(Token::Sub) => BinOp::Sub,
				_ => break,
			};
			self.pos += 1;
			let rhs = self.multiplicative()?;
			lhs = binary(op, lhs, rhs);
		}
		Ok(lhs)
	}

	fn multiplicative(&mut self) -> Result<Expr, String> {
		let mut lhs = self.unary()?;
		loop {
			let op = match self.peek() {
				Some(Token::Mul) => BinOp::Mul,
				Some(Token::Div) => BinOp::Div,
				Some(Token::Mod) => BinOp::Mod,
				_ => break,
			};
			self.pos += 1;
			let rhs = self.unary()?;
			lhs = binary(op, lhs, rhs);
		}
		Ok(lhs)
	}

	fn unary(&mut self) -> Result<Expr, String> {
		if self.eat(&Token::Not) {
			let inner = self.unary()?;
			return Ok(Expr::Not(Box::new(inner)));
		}
		self.primary()
	}

	fn primary(&mut self) -> Result<Expr, String> {
		match self.advance() {
			Some(Token::Num(value)) => Ok(Expr::Num(value)),
			Some(Token::N) => Ok(Expr::N),
			Some(Token::LParen) => {
				let expr = self.ternary()?;
				if !self.eat(&Token::RParen) {
					return Err("expected closing ')'".to_string());
				}
				Ok(expr)
			}
			Some(other) => Err(format!("unexpected token {other:?}")),
			None => Err("unexpected end of expression".to_string()),
		}
	}
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
	Expr::Binary {
		op,
		lhs: Box::new(lhs),
		rhs: Box::new(rhs),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const RUSSIAN: &str = "nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;";

	#[rstest]
	fn test_parse_extracts_nplurals() {
		// Arrange & Act
		let rule = PluralRule::parse("nplurals=2; plural=n != 1;").unwrap();

		// Assert
		assert_eq!(rule.nplurals(), 2);
	}

	#[rstest]
	fn test_parse_keywords_case_insensitive() {
		// Arrange & Act
		let rule = PluralRule::parse("NPLURALS=2; PLURAL=n != 1;");

		// Assert
		assert!(rule.is_ok());
	}

	#[rstest]
	#[case("plural=n != 1;")] // missing nplurals
	#[case("nplurals=2 plural=n != 1;")] // missing first semicolon
	#[case("nplurals=two; plural=n != 1;")] // non-numeric count
	#[case("")]
	fn test_parse_rejects_malformed_header(#[case] rule: &str) {
		// Act
		let result = PluralRule::parse(rule);

		// Assert
		assert!(matches!(result, Err(RuleError::Parse { .. })));
	}

	#[rstest]
	#[case("nplurals=2; plural=n ? ;")] // dangling ternary
	#[case("nplurals=2; plural=n == ;")] // missing operand
	#[case("nplurals=2; plural=n = 1;")] // single '='
	#[case("nplurals=2; plural=n & 1;")] // single '&'
	#[case("nplurals=2; plural=foo;")] // unknown identifier
	#[case("nplurals=2; plural=n ? 0 : 1 1;")] // trailing tokens
	fn test_parse_rejects_malformed_expression(#[case] rule: &str) {
		// Act
		let result = PluralRule::parse(rule);

		// Assert
		assert!(matches!(result, Err(RuleError::Parse { .. })));
	}

	#[rstest]
	#[case(0, 1)]
	#[case(1, 0)]
	#[case(2, 1)]
	#[case(5, 1)]
	fn test_germanic_two_form_rule(#[case] n: u64, #[case] expected: usize) {
		// Arrange
		let rule = PluralRule::parse("nplurals=2; plural=n != 1;").unwrap();

		// Act & Assert: booleans coerce to 0/1
		assert_eq!(rule.select_form(Some(n)).unwrap(), expected);
	}

	#[rstest]
	fn test_germanic_rule_plural_counts_agree() {
		// Arrange
		let rule = PluralRule::parse("nplurals=2; plural=n != 1;").unwrap();

		// Act
		let zero = rule.select_form(Some(0)).unwrap();
		let two = rule.select_form(Some(2)).unwrap();
		let five = rule.select_form(Some(5)).unwrap();
		let one = rule.select_form(Some(1)).unwrap();

		// Assert
		assert_eq!(zero, two);
		assert_eq!(two, five);
		assert_ne!(zero, one);
	}

	#[rstest]
	#[case(1, 0)]
	#[case(2, 1)]
	#[case(5, 2)]
	#[case(11, 2)]
	#[case(21, 0)]
	#[case(22, 1)]
	#[case(111, 2)]
	#[case(121, 0)]
	fn test_russian_three_form_rule(#[case] n: u64, #[case] expected: usize) {
		// Arrange
		let rule = PluralRule::parse(RUSSIAN).unwrap();

		// Act & Assert
		assert_eq!(rule.select_form(Some(n)).unwrap(), expected);
	}

	#[rstest]
	#[case(1, 0)]
	#[case(2, 1)]
	#[case(5, 2)]
	#[case(22, 1)]
	#[case(12, 2)]
	fn test_polish_rule_with_parenthesized_groups(#[case] n: u64, #[case] expected: usize) {
		// Arrange
		let rule = PluralRule::parse(
			"nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
		)
		.unwrap();

		// Act & Assert
		assert_eq!(rule.select_form(Some(n)).unwrap(), expected);
	}

	#[rstest]
	fn test_missing_count_normalizes_to_one() {
		// Arrange
		let rule = PluralRule::parse("nplurals=2; plural=n != 1;").unwrap();

		// Act & Assert: None behaves like n = 1
		assert_eq!(rule.select_form(None).unwrap(), 0);
	}

	#[rstest]
	fn test_single_form_rule_constant_expression() {
		// Arrange: Japanese-style rule with a constant selector
		let rule = PluralRule::parse("nplurals=1; plural=0;").unwrap();

		// Act & Assert
		assert_eq!(rule.select_form(Some(0)).unwrap(), 0);
		assert_eq!(rule.select_form(Some(42)).unwrap(), 0);
	}

	#[rstest]
	fn test_logical_not_coerces_to_boolean() {
		// Arrange: French-style rule written with negation
		let rule = PluralRule::parse("nplurals=2; plural=!(n == 0 || n == 1);").unwrap();

		// Act & Assert
		assert_eq!(rule.select_form(Some(0)).unwrap(), 0);
		assert_eq!(rule.select_form(Some(1)).unwrap(), 0);
		assert_eq!(rule.select_form(Some(7)).unwrap(), 1);
	}

	#[rstest]
	#[case("nplurals=2; plural=n / 0;")]
	#[case("nplurals=2; plural=n % 0;")]
	fn test_division_by_zero_is_an_evaluation_error(#[case] rule: &str) {
		// Arrange
		let rule = PluralRule::parse(rule).unwrap();

		// Act
		let result = rule.select_form(Some(3));

		// Assert
		assert!(matches!(result, Err(RuleError::Evaluation(_))));
	}

	#[rstest]
	fn test_negative_form_index_is_an_evaluation_error() {
		// Arrange
		let rule = PluralRule::parse("nplurals=2; plural=0 - 1;").unwrap();

		// Act
		let result = rule.select_form(Some(1));

		// Assert
		assert!(matches!(result, Err(RuleError::Evaluation(_))));
	}

	#[rstest]
	fn test_arithmetic_in_selector_positions() {
		// Arrange: ternary arms may themselves be expressions
		let rule = PluralRule::parse("nplurals=4; plural=n < 2 ? n : 2 + (n > 10);").unwrap();

		// Act & Assert
		assert_eq!(rule.select_form(Some(0)).unwrap(), 0);
		assert_eq!(rule.select_form(Some(1)).unwrap(), 1);
		assert_eq!(rule.select_form(Some(5)).unwrap(), 2);
		assert_eq!(rule.select_form(Some(11)).unwrap(), 3);
	}
}
