//! Arithmetic tool
//!
//! Evaluates a numeric expression with a small recursive-descent evaluator.
//! Only literals, arithmetic operators, parentheses, a fixed set of math
//! constants and a fixed set of math functions are understood; any other
//! name, attribute access or assignment is rejected.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := number | name | name '(' args ')' | '(' expr ')'
//! ```

use super::{Tool, ToolExecutor, ToolParameter, ToolResult, TOOL_CALCULATOR};
use async_trait::async_trait;
use std::fmt;

/// Substrings that reject an expression before it is parsed
const FORBIDDEN: [&str; 4] = ["import", "exec", "eval", "__"];

/// Nesting ceiling for parentheses, signs and exponents combined
const MAX_DEPTH: usize = 100;

/// Arithmetic tool
///
/// # Examples
///
/// ```
/// use reactqa::tools::calculator::CalculatorTool;
/// use reactqa::tools::ToolExecutor;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let tool = CalculatorTool::new();
/// let result = tool.execute(json!({"expression": "15 * 23 + 47"})).await;
/// assert_eq!(result.output, "Result: 392");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    /// Create a new calculator tool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolExecutor for CalculatorTool {
    fn tool_definition(&self) -> Tool {
        Tool::new(
            TOOL_CALCULATOR,
            "Performs mathematical calculations. Use for arithmetic, algebra, and basic math \
             operations. Input should be a valid mathematical expression.",
            vec![ToolParameter::required(
                "expression",
                "Mathematical expression to evaluate",
            )],
        )
    }

    async fn execute(&self, args: serde_json::Value) -> ToolResult {
        let expression = match args.get("expression") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                return ToolResult::error(
                    "Could not calculate. missing required argument 'expression'".to_string(),
                )
            }
        };

        let lowered = expression.to_lowercase();
        if FORBIDDEN.iter().any(|bad| lowered.contains(bad)) {
            tracing::warn!(expression = %expression, "Rejected calculator expression");
            return ToolResult::error("Invalid expression".to_string());
        }

        match evaluate(&expression) {
            Ok(value) => {
                tracing::debug!(expression = %expression, result = %value, "Calculated");
                ToolResult::success(format!("Result: {}", value)).self_sufficient()
            }
            Err(e) => ToolResult::error(format!("Could not calculate. {}", e)),
        }
    }
}

/// Numeric value produced by the evaluator
///
/// Integers stay exact until an operation overflows `i64`, at which point
/// the result is promoted to a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Exact integer
    Int(i64),
    /// IEEE double
    Float(f64),
}

impl Value {
    fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(x)),
        }
    }
}

/// Render a float the way an interactive calculator would
///
/// Integral values keep one decimal place (`12.0`), very large or very
/// small magnitudes switch to exponent notation (`1e+16`, `1e-05`).
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let rendered = format!("{:e}", x);
        return match rendered.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => rendered,
        };
    }
    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

/// Evaluate an expression string
///
/// # Errors
///
/// Returns a human-readable reason for syntax errors, unknown names and
/// math domain errors.
pub fn evaluate(expression: &str) -> Result<Value, String> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.peek() {
        Token::End => Ok(value),
        _ => Err("invalid syntax".to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Value),
    Name(String),
    Op(&'static str),
    LParen,
    RParen,
    Comma,
    Dot,
    Assign,
    End,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).map_or(false, char::is_ascii_digit))
        {
            let start = i;
            let mut is_float = false;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                is_float = true;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    is_float = true;
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let literal: String = chars[start..i].iter().collect();
            tokens.push(Token::Number(parse_number(&literal, is_float)?));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Name(chars[start..i].iter().collect()));
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (token, width) = match (c, next) {
            ('*', Some('*')) => (Token::Op("**"), 2),
            ('/', Some('/')) => (Token::Op("//"), 2),
            ('=', Some('=')) => return Err("comparisons are not supported".to_string()),
            ('+', _) => (Token::Op("+"), 1),
            ('-', _) => (Token::Op("-"), 1),
            ('*', _) => (Token::Op("*"), 1),
            ('/', _) => (Token::Op("/"), 1),
            ('%', _) => (Token::Op("%"), 1),
            ('^', _) => (Token::Op("^"), 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            (',', _) => (Token::Comma, 1),
            ('.', _) => (Token::Dot, 1),
            ('=', _) => (Token::Assign, 1),
            _ => return Err(format!("invalid character '{}'", c)),
        };
        tokens.push(token);
        i += width;
    }

    tokens.push(Token::End);
    Ok(tokens)
}

fn parse_number(literal: &str, is_float: bool) -> Result<Value, String> {
    if !is_float {
        if let Ok(i) = literal.parse::<i64>() {
            return Ok(Value::Int(i));
        }
    }
    literal
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("invalid number literal '{}'", literal))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::End)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err("invalid syntax".to_string())
        }
    }

    fn expr(&mut self) -> Result<Value, String> {
        let mut left = self.term()?;
        loop {
            match self.peek() {
                Token::Op("+") => {
                    self.advance();
                    left = add(left, self.term()?);
                }
                Token::Op("-") => {
                    self.advance();
                    left = sub(left, self.term()?);
                }
                _ => return Ok(left),
            }
        }
    }

    fn term(&mut self) -> Result<Value, String> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Token::Op(op @ ("*" | "/" | "//" | "%")) => *op,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = match op {
                "*" => mul(left, right),
                "/" => div(left, right)?,
                "//" => floor_div(left, right)?,
                _ => modulo(left, right)?,
            };
        }
    }

    // Every recursive path passes through here, so this is the only depth check.
    fn unary(&mut self) -> Result<Value, String> {
        if self.depth >= MAX_DEPTH {
            return Err("expression too deeply nested".to_string());
        }
        self.depth += 1;
        let value = match self.peek() {
            Token::Op("-") => {
                self.advance();
                self.unary().map(negate)
            }
            Token::Op("+") => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        };
        self.depth -= 1;
        value
    }

    fn power(&mut self) -> Result<Value, String> {
        let base = self.primary()?;
        match self.peek() {
            Token::Op("**" | "^") => {
                self.advance();
                let exponent = self.unary()?;
                pow(base, exponent)
            }
            _ => Ok(base),
        }
    }

    fn primary(&mut self) -> Result<Value, String> {
        match self.advance() {
            Token::Number(value) => Ok(value),
            Token::LParen => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Token::Name(name) => match self.peek() {
                Token::LParen => {
                    self.advance();
                    let args = self.arguments()?;
                    call(&name, &args)
                }
                Token::Dot => Err("attribute access is not allowed".to_string()),
                Token::Assign => Err("assignment is not allowed".to_string()),
                _ => constant(&name),
            },
            _ => Err("invalid syntax".to_string()),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Value>, String> {
        let mut args = Vec::new();
        if *self.peek() == Token::RParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.advance() {
                Token::Comma => continue,
                Token::RParen => return Ok(args),
                _ => return Err("invalid syntax".to_string()),
            }
        }
    }
}

fn add(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_add(y)
            .map_or(Value::Float(x as f64 + y as f64), Value::Int),
        _ => Value::Float(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_sub(y)
            .map_or(Value::Float(x as f64 - y as f64), Value::Int),
        _ => Value::Float(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_mul(y)
            .map_or(Value::Float(x as f64 * y as f64), Value::Int),
        _ => Value::Float(a.as_f64() * b.as_f64()),
    }
}

fn negate(a: Value) -> Value {
    match a {
        Value::Int(x) => x.checked_neg().map_or(Value::Float(-(x as f64)), Value::Int),
        Value::Float(x) => Value::Float(-x),
    }
}

fn div(a: Value, b: Value) -> Result<Value, String> {
    if b.as_f64() == 0.0 {
        return Err("division by zero".to_string());
    }
    Ok(Value::Float(a.as_f64() / b.as_f64()))
}

fn floor_div(a: Value, b: Value) -> Result<Value, String> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Err("integer division or modulo by zero".to_string()),
        (Value::Int(x), Value::Int(y)) => match x.checked_div(y) {
            Some(q) if x % y != 0 && ((x < 0) != (y < 0)) => Ok(Value::Int(q - 1)),
            Some(q) => Ok(Value::Int(q)),
            None => Ok(Value::Float((x as f64 / y as f64).floor())),
        },
        _ if b.as_f64() == 0.0 => Err("float floor division by zero".to_string()),
        _ => Ok(Value::Float((a.as_f64() / b.as_f64()).floor())),
    }
}

fn modulo(a: Value, b: Value) -> Result<Value, String> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Err("integer modulo by zero".to_string()),
        (Value::Int(x), Value::Int(y)) => {
            let r = x.checked_rem(y).unwrap_or(0);
            Ok(Value::Int(if r != 0 && ((r < 0) != (y < 0)) {
                r + y
            } else {
                r
            }))
        }
        _ if b.as_f64() == 0.0 => Err("float modulo".to_string()),
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let r = x % y;
            Ok(Value::Float(if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }))
        }
    }
}

fn pow(base: Value, exponent: Value) -> Result<Value, String> {
    if let (Value::Int(b), Value::Int(e)) = (base, exponent) {
        if e >= 0 {
            let exact = u32::try_from(e).ok().and_then(|e| b.checked_pow(e));
            return Ok(exact.map_or_else(|| Value::Float((b as f64).powf(e as f64)), Value::Int));
        }
    }
    let (b, e) = (base.as_f64(), exponent.as_f64());
    if b == 0.0 && e < 0.0 {
        return Err("0.0 cannot be raised to a negative power".to_string());
    }
    if b < 0.0 && e.fract() != 0.0 {
        return Err("math domain error".to_string());
    }
    Ok(Value::Float(b.powf(e)))
}

fn constant(name: &str) -> Result<Value, String> {
    match name {
        "pi" => Ok(Value::Float(std::f64::consts::PI)),
        "e" => Ok(Value::Float(std::f64::consts::E)),
        "tau" => Ok(Value::Float(std::f64::consts::TAU)),
        "inf" => Ok(Value::Float(f64::INFINITY)),
        "nan" => Ok(Value::Float(f64::NAN)),
        _ => Err(format!("name '{}' is not defined", name)),
    }
}

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("exactly {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(format!(
            "{}() takes {} argument(s) ({} given)",
            name,
            expected,
            args.len()
        ));
    }
    Ok(())
}

fn integral(name: &str, value: Value) -> Result<i64, String> {
    match value {
        Value::Int(i) => Ok(i),
        Value::Float(_) => Err(format!("{}() only accepts integral values", name)),
    }
}

/// Apply a float function, mapping domain and range failures to errors
fn float_fn(arg: Value, domain: impl Fn(f64) -> bool, f: impl Fn(f64) -> f64) -> Result<Value, String> {
    let x = arg.as_f64();
    if !domain(x) {
        return Err("math domain error".to_string());
    }
    let y = f(x);
    if y.is_infinite() && x.is_finite() {
        return Err("math range error".to_string());
    }
    Ok(Value::Float(y))
}

fn to_int(name: &str, x: f64) -> Result<Value, String> {
    if x.is_nan() {
        return Err(format!("{}(): cannot convert float NaN to integer", name));
    }
    if x.is_infinite() {
        return Err(format!("{}(): cannot convert float infinity to integer", name));
    }
    if x.abs() < 9.2e18 {
        Ok(Value::Int(x as i64))
    } else {
        Ok(Value::Float(x))
    }
}

fn round_value(args: &[Value]) -> Result<Value, String> {
    let value = args[0];
    let Some(&digits) = args.get(1) else {
        return match value {
            Value::Int(_) => Ok(value),
            Value::Float(x) => to_int("round", x.round_ties_even()),
        };
    };
    let digits = integral("round", digits)?;
    match value {
        Value::Int(i) if digits >= 0 => Ok(Value::Int(i)),
        Value::Int(i) => {
            let scale = u32::try_from(-digits)
                .ok()
                .and_then(|d| 10_i64.checked_pow(d));
            match scale {
                Some(scale) => {
                    let rounded = (i as f64 / scale as f64).round_ties_even() as i64;
                    Ok(rounded
                        .checked_mul(scale)
                        .map_or(Value::Float(rounded as f64 * scale as f64), Value::Int))
                }
                None => Ok(Value::Int(0)),
            }
        }
        Value::Float(x) => {
            let digits = digits.clamp(-308, 308) as i32;
            let scale = 10_f64.powi(digits);
            let scaled = x * scale;
            if !scaled.is_finite() {
                return Ok(Value::Float(x));
            }
            Ok(Value::Float(scaled.round_ties_even() / scale))
        }
    }
}

fn factorial(n: i64) -> Result<Value, String> {
    if n < 0 {
        return Err("factorial() not defined for negative values".to_string());
    }
    let mut exact: Option<i64> = Some(1);
    let mut approx = 1.0_f64;
    for k in 2..=n {
        exact = exact.and_then(|acc| acc.checked_mul(k));
        approx *= k as f64;
        if approx.is_infinite() {
            break;
        }
    }
    Ok(exact.map_or(Value::Float(approx), Value::Int))
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.checked_abs().unwrap_or(i64::MAX)
}

fn call(name: &str, args: &[Value]) -> Result<Value, String> {
    let all = |_: f64| true;
    match name {
        "sqrt" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], |x| x >= 0.0 || x.is_nan(), f64::sqrt)
        }
        "cbrt" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], all, f64::cbrt)
        }
        "exp" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], all, f64::exp)
        }
        "log" => {
            arity(name, args, 1, 2)?;
            let x = float_fn(args[0], |x| x > 0.0, f64::ln)?.as_f64();
            match args.get(1) {
                None => Ok(Value::Float(x)),
                Some(&base) => {
                    let base = float_fn(base, |b| b > 0.0, f64::ln)?.as_f64();
                    if base == 0.0 {
                        return Err("float division by zero".to_string());
                    }
                    Ok(Value::Float(x / base))
                }
            }
        }
        "log10" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], |x| x > 0.0, f64::log10)
        }
        "log2" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], |x| x > 0.0, f64::log2)
        }
        "sin" | "cos" | "tan" => {
            arity(name, args, 1, 1)?;
            let f = match name {
                "sin" => f64::sin,
                "cos" => f64::cos,
                _ => f64::tan,
            };
            float_fn(args[0], |x| x.is_finite() || x.is_nan(), f)
        }
        "asin" | "acos" => {
            arity(name, args, 1, 1)?;
            let f = if name == "asin" { f64::asin } else { f64::acos };
            float_fn(args[0], |x| (-1.0..=1.0).contains(&x) || x.is_nan(), f)
        }
        "atan" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], all, f64::atan)
        }
        "atan2" => {
            arity(name, args, 2, 2)?;
            Ok(Value::Float(args[0].as_f64().atan2(args[1].as_f64())))
        }
        "sinh" | "cosh" | "tanh" => {
            arity(name, args, 1, 1)?;
            let f = match name {
                "sinh" => f64::sinh,
                "cosh" => f64::cosh,
                _ => f64::tanh,
            };
            float_fn(args[0], all, f)
        }
        "degrees" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], all, f64::to_degrees)
        }
        "radians" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], all, f64::to_radians)
        }
        "hypot" => Ok(Value::Float(
            args.iter()
                .map(|v| v.as_f64() * v.as_f64())
                .sum::<f64>()
                .sqrt(),
        )),
        "pow" => {
            arity(name, args, 2, 2)?;
            let (b, e) = (args[0].as_f64(), args[1].as_f64());
            if (b == 0.0 && e < 0.0) || (b < 0.0 && e.fract() != 0.0) {
                return Err("math domain error".to_string());
            }
            let y = b.powf(e);
            if y.is_infinite() && b.is_finite() && e.is_finite() {
                return Err("math range error".to_string());
            }
            Ok(Value::Float(y))
        }
        "fabs" => {
            arity(name, args, 1, 1)?;
            float_fn(args[0], all, f64::abs)
        }
        "abs" => {
            arity(name, args, 1, 1)?;
            Ok(match args[0] {
                Value::Int(i) => i
                    .checked_abs()
                    .map_or(Value::Float((i as f64).abs()), Value::Int),
                Value::Float(x) => Value::Float(x.abs()),
            })
        }
        "floor" | "ceil" | "trunc" => {
            arity(name, args, 1, 1)?;
            match args[0] {
                Value::Int(_) => Ok(args[0]),
                Value::Float(x) => {
                    let y = match name {
                        "floor" => x.floor(),
                        "ceil" => x.ceil(),
                        _ => x.trunc(),
                    };
                    to_int(name, y)
                }
            }
        }
        "round" => {
            arity(name, args, 1, 2)?;
            round_value(args)
        }
        "factorial" => {
            arity(name, args, 1, 1)?;
            factorial(integral(name, args[0])?)
        }
        "gcd" => {
            let mut acc = 0_i64;
            for &arg in args {
                acc = gcd(acc, integral(name, arg)?);
            }
            Ok(Value::Int(acc))
        }
        "min" | "max" => {
            if args.is_empty() {
                return Err(format!("{} expected at least 1 argument, got 0", name));
            }
            let mut best = args[0];
            for &candidate in &args[1..] {
                let better = if name == "min" {
                    candidate.as_f64() < best.as_f64()
                } else {
                    candidate.as_f64() > best.as_f64()
                };
                if better {
                    best = candidate;
                }
            }
            Ok(best)
        }
        _ => Err(format!("name '{}' is not defined", name)),
    }
}
