//! Recursive-descent expression evaluation over the live token cursor.
//!
//! Numeric evaluation climbs the precedence ladder OR > AND > compare >
//! add > mult > power > unary > primary, reading tokens as it goes.
//! String expressions are a parallel entry point ([`Interpreter::eval_string`])
//! used directly by assignment and PRINT; a string variable met during
//! numeric evaluation only flips the value-type side channel so the
//! caller can detect the mismatch.

use crate::error::{BasicError, Result};
use crate::functions;
use crate::interpreter::Interpreter;
use crate::program::PROGRAM_CAPACITY;
use crate::token::*;
use crate::value::{parse_number_prefix, BasicString, ValueType, MAX_STRING_LEN};

/// Base relations recognized by the comparison level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rel {
    Lt,
    Gt,
    Eq,
    Le,
    Ge,
    Ne,
}

fn rel_class(byte: u8) -> Option<Rel> {
    match byte {
        b'<' | TOK_LT => Some(Rel::Lt),
        b'>' | TOK_GT => Some(Rel::Gt),
        b'=' | TOK_EQ => Some(Rel::Eq),
        _ => None,
    }
}

impl Interpreter {
    /// Evaluate a numeric expression starting at the cursor
    pub(crate) fn eval_expr(&mut self) -> Result<f64> {
        self.value_type = ValueType::Number;
        self.expr_or()
    }

    /// Evaluate a numeric expression and truncate to an integer
    pub(crate) fn eval_integer(&mut self) -> Result<i32> {
        Ok(self.eval_expr()? as i32)
    }

    fn expr_or(&mut self) -> Result<f64> {
        let mut left = self.expr_and()?;
        while self.accept(TOK_OR) {
            let right = self.expr_and()?;
            left = ((left as i64) | (right as i64)) as f64;
        }
        Ok(left)
    }

    fn expr_and(&mut self) -> Result<f64> {
        let mut left = self.expr_compare()?;
        while self.accept(TOK_AND) {
            let right = self.expr_compare()?;
            left = ((left as i64) & (right as i64)) as f64;
        }
        Ok(left)
    }

    /// Comparisons yield -1 for true, 0 for false. Any two-character
    /// combination of `<`, `>`, `=` is recognized (`=<`, `><`, ...).
    fn expr_compare(&mut self) -> Result<f64> {
        let left = self.expr_add()?;

        self.skip_spaces();
        let first = match rel_class(self.peek()) {
            Some(rel) => rel,
            None => return Ok(left),
        };
        self.next_byte();
        self.skip_spaces();

        let rel = match (first, rel_class(self.peek())) {
            (Rel::Lt, Some(Rel::Gt)) | (Rel::Gt, Some(Rel::Lt)) => {
                self.next_byte();
                Rel::Ne
            }
            (Rel::Lt, Some(Rel::Eq)) | (Rel::Eq, Some(Rel::Lt)) => {
                self.next_byte();
                Rel::Le
            }
            (Rel::Gt, Some(Rel::Eq)) | (Rel::Eq, Some(Rel::Gt)) => {
                self.next_byte();
                Rel::Ge
            }
            _ => first,
        };

        let right = self.expr_add()?;
        let truth = match rel {
            Rel::Lt => left < right,
            Rel::Gt => left > right,
            Rel::Eq => left == right,
            Rel::Le => left <= right,
            Rel::Ge => left >= right,
            Rel::Ne => left != right,
        };
        Ok(if truth { -1.0 } else { 0.0 })
    }

    fn expr_add(&mut self) -> Result<f64> {
        let mut left = self.expr_mult()?;
        loop {
            if self.accept_either(b'+', TOK_PLUS) {
                left += self.expr_mult()?;
            } else if self.accept_either(b'-', TOK_MINUS) {
                left -= self.expr_mult()?;
            } else {
                return Ok(left);
            }
        }
    }

    fn expr_mult(&mut self) -> Result<f64> {
        let mut left = self.expr_power()?;
        loop {
            if self.accept_either(b'*', TOK_MULT) {
                left *= self.expr_power()?;
            } else if self.accept_either(b'/', TOK_DIV) {
                let right = self.expr_power()?;
                if right == 0.0 {
                    return Err(BasicError::DivisionByZero);
                }
                left /= right;
            } else {
                return Ok(left);
            }
        }
    }

    /// Exponentiation, left-associative
    fn expr_power(&mut self) -> Result<f64> {
        let mut left = self.expr_unary()?;
        while self.accept_either(b'^', TOK_POWER) {
            let right = self.expr_unary()?;
            if left < 0.0 && right.fract() != 0.0 {
                return Err(BasicError::IllegalFunction);
            }
            left = left.powf(right);
        }
        Ok(left)
    }

    fn expr_unary(&mut self) -> Result<f64> {
        if self.accept_either(b'-', TOK_MINUS) {
            return Ok(-self.expr_unary()?);
        }
        if self.accept(TOK_NOT) {
            let value = self.expr_unary()?;
            return Ok(if value == 0.0 { -1.0 } else { 0.0 });
        }
        if self.accept_either(b'+', TOK_PLUS) {
            return self.expr_unary();
        }
        self.expr_primary()
    }

    fn expr_primary(&mut self) -> Result<f64> {
        self.skip_spaces();
        let c = self.peek();

        if c.is_ascii_digit() || (c == b'.' && self.peek_at(1).is_ascii_digit()) {
            self.value_type = ValueType::Number;
            return Ok(self.parse_number_literal());
        }

        if c == b'(' {
            self.next_byte();
            let value = self.expr_or()?;
            self.accept(b')');
            return Ok(value);
        }

        if is_opcode(c) {
            self.next_byte();
            return self.primary_function(c);
        }

        if c.is_ascii_alphabetic() {
            let name = self.parse_var_name();
            if name.ty == ValueType::Str {
                // Strings are evaluated by the string entry point; flag
                // the type so assignment boundaries can reject this
                self.value_type = ValueType::Str;
                return Ok(0.0);
            }
            self.value_type = ValueType::Number;
            self.skip_spaces();
            if self.peek() == b'(' {
                let indices = self.parse_subscripts()?;
                return self.arrays.get_number(&name, &indices);
            }
            return Ok(self.variables.get_number(&name));
        }

        self.value_type = ValueType::Number;
        Ok(0.0)
    }

    /// Dispatch a function opcode met in primary position. The opening
    /// and closing parentheses are each optional, as in the original.
    fn primary_function(&mut self, token: u8) -> Result<f64> {
        let result = match token {
            TOK_SGN => functions::sgn(self.paren_numeric()?),
            TOK_INT => functions::int(self.paren_numeric()?),
            TOK_ABS => self.paren_numeric()?.abs(),
            TOK_SQR => functions::sqr(self.paren_numeric()?)?,
            TOK_RND => {
                let x = self.paren_numeric()?;
                functions::rnd(&mut self.rnd_state, x)
            }
            TOK_SIN => self.paren_numeric()?.sin(),
            TOK_COS => self.paren_numeric()?.cos(),
            TOK_TAN => self.paren_numeric()?.tan(),
            TOK_ATN => self.paren_numeric()?.atan(),
            TOK_LOG => functions::log(self.paren_numeric()?)?,
            TOK_EXP => functions::exp(self.paren_numeric()?)?,
            // Memory access is a no-op: the argument is read and dropped
            TOK_PEEK | TOK_USR => {
                self.paren_numeric()?;
                0.0
            }
            TOK_FRE => {
                self.paren_numeric()?;
                (PROGRAM_CAPACITY - self.program.bytes().len()) as f64
            }
            TOK_POS => {
                self.paren_numeric()?;
                self.column as f64
            }
            TOK_LEN => {
                let s = self.paren_string()?;
                s.len() as f64
            }
            TOK_ASC => {
                let s = self.paren_string()?;
                functions::asc(&s)?
            }
            TOK_VAL => {
                let s = self.paren_string()?;
                functions::val(&s)
            }
            // Any other opcode in value position reads as 0
            _ => 0.0,
        };
        self.value_type = ValueType::Number;
        Ok(result)
    }

    fn paren_numeric(&mut self) -> Result<f64> {
        self.accept(b'(');
        let value = self.expr_or()?;
        self.accept(b')');
        Ok(value)
    }

    fn paren_string(&mut self) -> Result<BasicString> {
        self.accept(b'(');
        let value = self.eval_string()?;
        self.accept(b')');
        Ok(value)
    }

    /// Parse a parenthesized subscript list starting at `(`
    pub(crate) fn parse_subscripts(&mut self) -> Result<Vec<i32>> {
        self.next_byte();
        let mut indices = Vec::new();
        loop {
            indices.push(self.eval_integer()?);
            self.skip_spaces();
            if self.peek() == b',' && indices.len() < crate::arrays::MAX_DIMENSIONS {
                self.next_byte();
            } else {
                break;
            }
        }
        self.accept(b')');
        Ok(indices)
    }

    /// Read a textual numeric literal from the token stream
    fn parse_number_literal(&mut self) -> f64 {
        let mut text = String::new();
        loop {
            let b = self.peek();
            let in_number = b.is_ascii_digit()
                || b == b'.'
                || b == b'E'
                || b == b'e'
                || ((b == b'+' || b == b'-')
                    && matches!(text.as_bytes().last(), Some(&b'E') | Some(&b'e')));
            if !in_number {
                break;
            }
            text.push(b as char);
            self.next_byte();
        }
        parse_number_prefix(&text)
    }

    // --- String expressions ------------------------------------------

    /// Evaluate a string expression: a primary followed by any number
    /// of `+` concatenations
    pub(crate) fn eval_string(&mut self) -> Result<BasicString> {
        let mut result = self.string_primary()?;
        while self.accept_either(b'+', TOK_PLUS) {
            let rhs = self.string_primary()?;
            result = result.concat(&rhs)?;
        }
        self.value_type = ValueType::Str;
        Ok(result)
    }

    fn string_primary(&mut self) -> Result<BasicString> {
        self.skip_spaces();
        let c = self.peek();

        if c == b'"' {
            return Ok(self.parse_string_literal());
        }

        if matches!(c, TOK_CHR | TOK_STR | TOK_LEFT | TOK_RIGHT | TOK_MID) {
            self.next_byte();
            return self.string_function(c);
        }

        if c.is_ascii_alphabetic() {
            let name = self.parse_var_name();
            if name.ty != ValueType::Str {
                return Err(BasicError::TypeMismatch);
            }
            self.skip_spaces();
            if self.peek() == b'(' {
                let indices = self.parse_subscripts()?;
                return self.arrays.get_string(&name, &indices);
            }
            return Ok(self.variables.get_string(&name));
        }

        Err(BasicError::TypeMismatch)
    }

    fn string_function(&mut self, token: u8) -> Result<BasicString> {
        match token {
            TOK_CHR => {
                self.accept(b'(');
                let code = self.eval_integer()?;
                self.accept(b')');
                functions::chr(code)
            }
            TOK_STR => {
                self.accept(b'(');
                let x = self.eval_expr()?;
                self.accept(b')');
                Ok(functions::str_of(x))
            }
            TOK_LEFT | TOK_RIGHT => {
                self.accept(b'(');
                let s = self.eval_string()?;
                self.accept(b',');
                let n = self.eval_integer()?;
                self.accept(b')');
                Ok(if token == TOK_LEFT {
                    functions::left(&s, n)
                } else {
                    functions::right(&s, n)
                })
            }
            TOK_MID => {
                self.accept(b'(');
                let s = self.eval_string()?;
                self.accept(b',');
                let start = self.eval_integer()?;
                let len = if self.accept(b',') {
                    self.eval_integer()?
                } else {
                    MAX_STRING_LEN as i32
                };
                self.accept(b')');
                functions::mid(&s, start, len)
            }
            _ => Err(BasicError::Syntax),
        }
    }

    /// Read a quoted string literal from the token stream. An unclosed
    /// literal runs to the end of the line.
    pub(crate) fn parse_string_literal(&mut self) -> BasicString {
        if self.peek() != b'"' {
            return BasicString::new();
        }
        self.next_byte();

        let mut bytes = Vec::new();
        loop {
            let b = self.peek();
            if b == b'"' || b == 0 {
                break;
            }
            if bytes.len() < MAX_STRING_LEN {
                bytes.push(b);
            }
            self.next_byte();
        }
        if self.peek() == b'"' {
            self.next_byte();
        }

        BasicString::from_bytes(&bytes)
    }
}
