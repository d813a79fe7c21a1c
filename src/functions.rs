//! Built-in function implementations.
//!
//! The trigonometric functions map straight onto `f64` methods and are
//! invoked inline by the evaluator; everything with argument checking
//! or shared state lives here.

use crate::error::{BasicError, Result};
use crate::value::{format_number, parse_number_prefix, BasicString};

/// SGN: -1, 0 or 1
pub(crate) fn sgn(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// INT: floor, not truncation
pub(crate) fn int(x: f64) -> f64 {
    x.floor()
}

/// SQR: square root of a non-negative number
pub(crate) fn sqr(x: f64) -> Result<f64> {
    if x < 0.0 {
        return Err(BasicError::IllegalFunction);
    }
    Ok(x.sqrt())
}

/// LOG: natural logarithm of a positive number
pub(crate) fn log(x: f64) -> Result<f64> {
    if x <= 0.0 {
        return Err(BasicError::IllegalFunction);
    }
    Ok(x.ln())
}

/// EXP, with overflow detection
pub(crate) fn exp(x: f64) -> Result<f64> {
    let result = x.exp();
    if result.is_infinite() {
        return Err(BasicError::Overflow);
    }
    Ok(result)
}

/// RND over a 32-bit linear congruential generator.
///
/// A positive argument steps the generator; zero re-reads the current
/// state; a negative argument reseeds from the argument.
pub(crate) fn rnd(state: &mut u32, x: f64) -> f64 {
    if x < 0.0 {
        *state = (-x * 65536.0) as u32;
    } else if x > 0.0 {
        *state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
    }
    (*state & 0x7FFF_FFFF) as f64 / 2_147_483_648.0
}

/// CHR$: one-byte string from a character code 0-255
pub(crate) fn chr(code: i32) -> Result<BasicString> {
    if !(0..=255).contains(&code) {
        return Err(BasicError::IllegalFunction);
    }
    Ok(BasicString::from_bytes(&[code as u8]))
}

/// STR$: the number formatted exactly as PRINT would show it
pub(crate) fn str_of(x: f64) -> BasicString {
    BasicString::from_text(&format_number(x))
}

/// VAL: the leading number of the string, 0 when there is none
pub(crate) fn val(s: &BasicString) -> f64 {
    parse_number_prefix(&String::from_utf8_lossy(s.bytes()))
}

/// ASC: code of the first byte; empty strings are an error
pub(crate) fn asc(s: &BasicString) -> Result<f64> {
    match s.bytes().first() {
        Some(&b) => Ok(b as f64),
        None => Err(BasicError::IllegalFunction),
    }
}

/// LEFT$: the first `n` bytes
pub(crate) fn left(s: &BasicString, n: i32) -> BasicString {
    if n <= 0 {
        return BasicString::new();
    }
    let take = (n as usize).min(s.len());
    BasicString::from_bytes(&s.bytes()[..take])
}

/// RIGHT$: the last `n` bytes
pub(crate) fn right(s: &BasicString, n: i32) -> BasicString {
    if n <= 0 {
        return BasicString::new();
    }
    let take = (n as usize).min(s.len());
    BasicString::from_bytes(&s.bytes()[s.len() - take..])
}

/// MID$: `len` bytes from 1-based position `start`
pub(crate) fn mid(s: &BasicString, start: i32, len: i32) -> Result<BasicString> {
    if start < 1 {
        return Err(BasicError::IllegalFunction);
    }
    if len < 0 {
        return Ok(BasicString::new());
    }

    let start = (start - 1) as usize;
    if start >= s.len() {
        return Ok(BasicString::new());
    }
    let end = (start + len as usize).min(s.len());
    Ok(BasicString::from_bytes(&s.bytes()[start..end]))
}
