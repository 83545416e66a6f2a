//! # JAN Codes
//!
//! The scanner only acts on JAN (EAN-13) product codes: exactly thirteen
//! ASCII decimal digits. Anything else a decoder reports (QR payloads,
//! UPC-E, partial reads) is ignored.
//!
//! The check digit is not verified here; the product lookup owns that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::JAN_CODE_LEN;

/// Returns true when `text` is exactly 13 ASCII digits.
///
/// ## Example
/// ```rust
/// use register_core::is_jan_code;
///
/// assert!(is_jan_code("4901234567894"));
/// assert!(!is_jan_code("12345"));
/// assert!(!is_jan_code("abcdefghijklm"));
/// assert!(!is_jan_code(" 4901234567894"));
/// ```
pub fn is_jan_code(text: &str) -> bool {
    text.len() == JAN_CODE_LEN && text.bytes().all(|b| b.is_ascii_digit())
}

/// A decoded payload that passed [`is_jan_code`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct JanCode(String);

impl JanCode {
    /// Validates and wraps a decoded payload.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        if is_jan_code(text) {
            Ok(JanCode(text.to_string()))
        } else {
            Err(ValidationError::InvalidFormat {
                field: "jan_code".to_string(),
                reason: format!("expected {} digits", JAN_CODE_LEN),
            })
        }
    }

    /// The digits as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for JanCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JanCode::parse(s)
    }
}

impl TryFrom<String> for JanCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        JanCode::parse(&value)
    }
}

impl From<JanCode> for String {
    fn from(code: JanCode) -> Self {
        code.0
    }
}

impl fmt::Display for JanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
