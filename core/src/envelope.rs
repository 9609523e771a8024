//! The uniform JSON result printed for every operation.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// `return_code` of a successful operation.
pub const SUCCESS_CODE: i32 = 0;
/// `return_code` of a failed operation.
pub const FAILURE_CODE: i32 = -1;

/// `{ "return_code": …, "message": …, "data": … }`.
///
/// # Examples
///
/// ```
/// use pattern_store_core::Envelope;
///
/// let ok = Envelope::success(vec!["pattern", "state"]);
/// assert_eq!(
///     ok.to_json().unwrap(),
///     r#"{"return_code":0,"message":"success","data":["pattern","state"]}"#,
/// );
///
/// let failed = Envelope::failure("bucket not exist: nope");
/// assert!(!failed.is_success());
/// assert!(failed.data.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub return_code: i32,
    pub message: String,
    pub data: Value,
}

impl Envelope {
    /// Wraps an operation payload.
    pub fn success(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                return_code: SUCCESS_CODE,
                message: "success".to_string(),
                data,
            },
            Err(err) => Self::failure(format!("failed to encode result: {err}")),
        }
    }

    /// Reports a failure with a null payload.
    pub fn failure(message: impl Display) -> Self {
        Self {
            return_code: FAILURE_CODE,
            message: message.to_string(),
            data: Value::Null,
        }
    }

    /// Converts an operation result into an envelope.
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.return_code == SUCCESS_CODE
    }

    /// Serializes the envelope as compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
