use std::num::{ParseFloatError, ParseIntError};

use serde::Deserialize;
use thiserror::Error;

/// Body of `GET /iss-now.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssNowResponse {
    pub timestamp: TimestampValue,
    pub iss_position: IssCoordinates,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssCoordinates {
    pub latitude: CoordinateValue,
    pub longitude: CoordinateValue,
}

/// Open Notify sends coordinates as decimal strings; plain numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    pub fn to_f64(&self) -> Result<f64, ParseFloatError> {
        match self {
            CoordinateValue::Number(value) => Ok(*value),
            CoordinateValue::Text(text) => text.trim().parse::<f64>(),
        }
    }
}

/// Capture time in epoch seconds. Normally an integer, but decimal strings
/// and floats are read too; floats are truncated toward zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimestampValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

#[derive(Debug, Error)]
pub enum TimestampValueError {
    #[error("OutOfRange: {value}")]
    OutOfRange {
        value: f64,
    },

    #[error("ParseText: {source}")]
    ParseText {
        #[from]
        source: ParseIntError,
    },
}

// 2^63; every finite f64 below it and at or above -2^63 fits an i64 after truncation.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl TimestampValue {
    pub fn to_i64(&self) -> Result<i64, TimestampValueError> {
        match self {
            TimestampValue::Integer(value) => Ok(*value),
            TimestampValue::Number(value) => {
                let truncated = value.trunc();
                if truncated.is_finite() && truncated >= -I64_BOUND && truncated < I64_BOUND {
                    Ok(truncated as i64)
                } else {
                    Err(TimestampValueError::OutOfRange { value: *value })
                }
            }
            TimestampValue::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|source| TimestampValueError::ParseText { source }),
        }
    }
}
