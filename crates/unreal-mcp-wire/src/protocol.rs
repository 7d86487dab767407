//! Frame encoding helpers

use serde::Serialize;
use unreal_mcp_core::{CommandResponse, Result};

/// Largest accepted line, excluding the terminator (16 MiB)
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Characters of a frame shown in debug logs
const PREVIEW_CHARS: usize = 200;

/// Serialize a message into a frame body (no terminator)
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}

/// Decode a response frame
pub fn decode_response(bytes: &[u8]) -> Result<CommandResponse> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Lossy, truncated rendering of a frame for logging
pub fn preview(data: &[u8]) -> String {
    String::from_utf8_lossy(data).chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_has_no_newline() {
        let bytes = encode(&CommandResponse::success(json!({"text": "a\nb"}))).unwrap();
        assert!(!bytes.contains(&b'\n'));
    }

    #[test]
    fn test_decode_response() {
        let resp = decode_response(br#"{"status":"success","result":{"message":"pong"}}"#).unwrap();
        assert_eq!(resp, CommandResponse::success(json!({"message": "pong"})));
        assert!(decode_response(b"{}").is_err());
    }

    #[test]
    fn test_preview_truncates() {
        let long = vec![b'x'; 500];
        assert_eq!(preview(&long).len(), 200);
        assert_eq!(preview(b"short"), "short");
    }
}
