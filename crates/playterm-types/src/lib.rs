//! Core types shared by the playterm crates
//!
//! This crate holds the wire protocol spoken over the control channel and the
//! small value types (geometry, session ids, instance descriptors) that every
//! other crate passes around.

use serde::{Deserialize, Serialize};
use std::fmt;

mod protocol;

pub use protocol::{ClientMessage, ServerMessage};

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when no other endpoint is configured
pub const DEFAULT_BASE_URL: &str = "http://play-with-docker.com";

/// Fallback terminal width
pub const DEFAULT_COLS: u16 = 80;

/// Fallback terminal height
pub const DEFAULT_ROWS: u16 = 24;

/// Header attached to every request/reply exchange
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Form field carrying the verification token on session creation
pub const VERIFICATION_FIELD: &str = "g-recaptcha-response";

// ============================================================================
// Geometry
// ============================================================================

/// Viewport size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub cols: u16,
    pub rows: u16,
}

impl Geometry {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

// ============================================================================
// Session and instance identity
// ============================================================================

/// Server-assigned session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Instance description returned by the service when an instance is allocated
///
/// Only `name` is required; everything else the service sends is kept in
/// `extra` so callers can still read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl InstanceDescriptor {
    /// Descriptor for an instance known only by name (lazily created placeholder)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: None,
            ip: None,
            extra: serde_json::Map::new(),
        }
    }
}
