use serde::{Deserialize, Serialize};

use crate::Geometry;

/// Messages sent from client to server over the control channel
///
/// Frames are JSON text: `{"type": "<event>", "data": [args...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// Keystrokes or pasted content for an instance: (instance name, data)
    #[serde(rename = "terminal in")]
    TerminalIn(String, String),

    /// Proposed viewport geometry, applied session-wide: (cols, rows)
    #[serde(rename = "viewport resize")]
    ViewportResize(u16, u16),
}

impl ClientMessage {
    pub fn input(name: impl Into<String>, data: impl Into<String>) -> Self {
        ClientMessage::TerminalIn(name.into(), data.into())
    }

    pub fn resize(geometry: Geometry) -> Self {
        ClientMessage::ViewportResize(geometry.cols, geometry.rows)
    }
}

/// Messages sent from server to client over the control channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    /// Raw output produced by an instance: (instance name, data)
    #[serde(rename = "terminal out")]
    TerminalOut(String, String),

    /// Geometry broadcast, e.g. from another viewer: (cols, rows)
    #[serde(rename = "viewport resize")]
    ViewportResize(u16, u16),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_frames_use_event_names() {
        let input = serde_json::to_string(&ClientMessage::input("node1", "ls\n")).unwrap();
        assert_eq!(input, r#"{"type":"terminal in","data":["node1","ls\n"]}"#);

        let resize = serde_json::to_string(&ClientMessage::resize(Geometry::new(80, 24))).unwrap();
        assert_eq!(resize, r#"{"type":"viewport resize","data":[80,24]}"#);
    }

    #[test]
    fn test_server_frames_parse() {
        let out: ServerMessage =
            serde_json::from_str(r#"{"type":"terminal out","data":["node1","$ "]}"#).unwrap();
        assert_eq!(out, ServerMessage::TerminalOut("node1".into(), "$ ".into()));

        let resize: ServerMessage =
            serde_json::from_str(r#"{"type":"viewport resize","data":[132,43]}"#).unwrap();
        assert_eq!(resize, ServerMessage::ViewportResize(132, 43));
    }

    #[test]
    fn test_unknown_server_event_is_rejected() {
        let result: Result<ServerMessage, _> =
            serde_json::from_str(r#"{"type":"instance delete","data":["node1"]}"#);
        assert!(result.is_err());
    }
}
