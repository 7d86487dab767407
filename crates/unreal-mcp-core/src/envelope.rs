//! Command request/response envelope

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter object passed to command handlers
pub type Params = Map<String, Value>;

/// A single command sent by a client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRequest {
    pub command: String,
    pub params: Params,
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(alias = "type")]
    command: String,
    #[serde(default)]
    params: Value,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>, params: Params) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }

    /// Decode one frame into a request.
    ///
    /// Bytes that are not JSON yield [`BridgeError::MalformedJson`]; JSON that
    /// lacks a string `command` (or the legacy `type`) or carries non-object
    /// `params` yields [`BridgeError::InvalidRequest`].
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(data).map_err(|e| BridgeError::MalformedJson(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(BridgeError::InvalidRequest(
                "request must be a JSON object".into(),
            ));
        }
        let raw: RawRequest = serde_json::from_value(value)
            .map_err(|e| BridgeError::InvalidRequest(e.to_string()))?;
        let params = match raw.params {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                return Err(BridgeError::InvalidRequest(
                    "params must be a JSON object".into(),
                ));
            }
        };
        Ok(Self {
            command: raw.command,
            params,
        })
    }
}

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandResponse {
    Success { result: Value },
    Error { error: String },
}

impl CommandResponse {
    /// Wrap a handler payload. Results are always objects on the wire, so a
    /// bare string becomes `{"message": ...}` and any other scalar becomes
    /// `{"value": ...}`.
    pub fn success(result: Value) -> Self {
        let result = match result {
            Value::Object(_) => result,
            Value::String(message) => serde_json::json!({ "message": message }),
            Value::Null => Value::Object(Map::new()),
            other => serde_json::json!({ "value": other }),
        };
        CommandResponse::Success { result }
    }

    pub fn error(message: impl Into<String>) -> Self {
        CommandResponse::Error {
            error: message.into(),
        }
    }

    pub fn from_error(err: &BridgeError) -> Self {
        Self::error(err.to_string())
    }

    pub fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResponse::Success { .. })
    }

    /// Convert back into a `Result`, surfacing the bridge's error text
    pub fn into_result(self) -> Result<Value> {
        match self {
            CommandResponse::Success { result } => Ok(result),
            CommandResponse::Error { error } => Err(BridgeError::OperationFailed(error)),
        }
    }
}
