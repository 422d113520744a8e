//! Value Module
//!
//! Storable values and their byte encoding and printable representation.

use std::fmt::Write as _;

// == Value ==
/// A value accepted by `set` and by the instrumented `store` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Signed integer
    Integer(i64),
    /// Floating-point number
    Float(f64),
}

impl Value {
    // == Encoding ==
    /// Returns the bytes stored for this value.
    ///
    /// Numbers are stored as decimal text so that `incr` and typed
    /// accessors can read them back.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Text(text) => text.as_bytes().to_vec(),
            Value::Bytes(bytes) => bytes.clone(),
            Value::Integer(n) => n.to_string().into_bytes(),
            Value::Float(f) => format!("{:?}", f).into_bytes(),
        }
    }

    // == Representation ==
    /// Returns the printable form recorded in call histories.
    ///
    /// Text is single-quoted, bytes are `b'...'` with non-printable bytes
    /// escaped as `\xNN`, numbers are written plainly.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(text) => {
                let mut out = String::with_capacity(text.len() + 2);
                out.push('\'');
                for c in text.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c => out.push(c),
                    }
                }
                out.push('\'');
                out
            }
            Value::Bytes(bytes) => {
                let mut out = String::with_capacity(bytes.len() + 3);
                out.push_str("b'");
                for &b in bytes {
                    match b {
                        b'\\' => out.push_str("\\\\"),
                        b'\'' => out.push_str("\\'"),
                        b'\n' => out.push_str("\\n"),
                        b'\r' => out.push_str("\\r"),
                        b'\t' => out.push_str("\\t"),
                        0x20..=0x7e => out.push(b as char),
                        _ => {
                            let _ = write!(out, "\\x{:02x}", b);
                        }
                    }
                }
                out.push('\'');
                out
            }
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => format!("{:?}", f),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}
