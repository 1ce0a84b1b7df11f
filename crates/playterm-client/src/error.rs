use thiserror::Error;

/// A service URL could not be built from the configured base
#[derive(Debug, Error)]
#[error("invalid service URL '{url}'")]
pub struct UrlError {
    pub url: String,
    #[source]
    pub source: Option<url::ParseError>,
}

/// Failure to allocate an instance
///
/// `CapacityExceeded` and `Generic` are the service's own answers; the other
/// variants mean no usable answer arrived at all.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The service refused because its instance limit was reached (HTTP 409)
    #[error("instance capacity exceeded")]
    CapacityExceeded,

    /// Any other non-success status
    #[error("instance creation failed with status {status}")]
    Generic { status: u16 },

    #[error("instance request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid instance descriptor: {0}")]
    InvalidDescriptor(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidUrl(#[from] UrlError),
}

impl InstanceError {
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, InstanceError::CapacityExceeded)
    }
}

/// Failure of the combined create-instance-and-bind operation
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Max instances reached")]
    MaxInstancesReached,

    #[error("Error creating instance")]
    Creation(#[source] InstanceError),
}

impl From<InstanceError> for TerminalError {
    fn from(err: InstanceError) -> Self {
        match err {
            InstanceError::CapacityExceeded => TerminalError::MaxInstancesReached,
            other => TerminalError::Creation(other),
        }
    }
}

/// The external verification flow did not produce a token
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("verification was cancelled")]
    Cancelled,

    #[error("verification failed: {0}")]
    Failed(String),
}

/// Control channel failures
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to open control channel: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    #[error("control channel is closed")]
    Closed,
}

/// Failure to establish a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no terminal targets were given")]
    NoTargets,

    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Session creation answered with a non-success status
    #[error("session creation rejected with status {status}")]
    Rejected { status: u16 },

    #[error("session creation returned an empty session id")]
    EmptySessionId,

    #[error("session request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
