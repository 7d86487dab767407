//! Error types for the Unreal MCP bridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
///
/// The `Display` text of each variant is exactly what goes on the wire in
/// the `error` field of a failed response.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Request bytes were not valid JSON
    #[error("Invalid JSON: {0}")]
    MalformedJson(String),

    /// Valid JSON that is not a command envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No handler registered for the command name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A required parameter was absent or empty
    #[error("{0} parameter is required")]
    MissingParameter(String),

    /// A parameter was present but unusable
    #[error("Invalid {name} parameter: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Parameters did not match the expected shape
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Referenced engine entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Engine entity already exists
    #[error("{0}")]
    AlreadyExists(String),

    /// The editor has no world loaded
    #[error("No active world found")]
    NoActiveWorld,

    /// Engine call reported failure
    #[error("{0}")]
    OperationFailed(String),

    /// Socket or file I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Incoming line exceeded the configured frame limit
    #[error("Frame too large: exceeds limit of {limit} bytes")]
    FrameTooLarge { limit: usize },

    /// Peer stayed silent past the receive timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Peer closed the connection
    #[error("Connection closed")]
    ConnectionClosed,

    /// The game thread is gone and cannot take work
    #[error("Game thread unavailable")]
    GameThreadUnavailable,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A handler panicked on the game thread
    #[error("Command '{command}' panicked: {message}")]
    Panicked { command: String, message: String },
}

/// Coarse classification used for logging and client-side decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Protocol,
    Validation,
    EngineState,
    EngineOperation,
    Transport,
    Internal,
}

impl BridgeError {
    /// Shorthand for [`BridgeError::InvalidParameter`]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::MalformedJson(_)
            | BridgeError::InvalidRequest(_)
            | BridgeError::UnknownCommand(_)
            | BridgeError::MissingParameter(_) => ErrorKind::Protocol,
            BridgeError::InvalidParameter { .. } | BridgeError::InvalidParameters(_) => {
                ErrorKind::Validation
            }
            BridgeError::NotFound(_) | BridgeError::AlreadyExists(_) | BridgeError::NoActiveWorld => {
                ErrorKind::EngineState
            }
            BridgeError::OperationFailed(_) => ErrorKind::EngineOperation,
            BridgeError::Io(_)
            | BridgeError::FrameTooLarge { .. }
            | BridgeError::Timeout(_)
            | BridgeError::ConnectionClosed
            | BridgeError::GameThreadUnavailable => ErrorKind::Transport,
            BridgeError::Serialization(_) | BridgeError::Panicked { .. } => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages() {
        assert_eq!(
            BridgeError::UnknownCommand("fly".into()).to_string(),
            "Unknown command: fly"
        );
        assert_eq!(
            BridgeError::MissingParameter("asset_path".into()).to_string(),
            "asset_path parameter is required"
        );
        assert_eq!(
            BridgeError::invalid("level_path", "must start with /Game/").to_string(),
            "Invalid level_path parameter: must start with /Game/"
        );
        assert_eq!(BridgeError::NoActiveWorld.to_string(), "No active world found");
        assert_eq!(
            BridgeError::NotFound("Asset not found: /Game/X".into()).to_string(),
            "Asset not found: /Game/X"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(BridgeError::MalformedJson("eof".into()).kind(), ErrorKind::Protocol);
        assert_eq!(BridgeError::invalid("a", "b").kind(), ErrorKind::Validation);
        assert_eq!(BridgeError::NoActiveWorld.kind(), ErrorKind::EngineState);
        assert_eq!(
            BridgeError::OperationFailed("nope".into()).kind(),
            ErrorKind::EngineOperation
        );
        assert_eq!(BridgeError::ConnectionClosed.kind(), ErrorKind::Transport);
        assert_eq!(
            BridgeError::Panicked {
                command: "x".into(),
                message: "boom".into()
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_from_io() {
        let err: BridgeError = std::io::Error::other("reset").into();
        assert!(matches!(err, BridgeError::Io(ref m) if m == "reset"));
    }
}
