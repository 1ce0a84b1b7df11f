//! Client-side terminal session multiplexer
//!
//! One control channel per session carries input, output and viewport
//! geometry for any number of remote shell instances. Each instance can be
//! rendered by zero, one or several terminal widgets; output that arrives
//! before an instance has a terminal is buffered and replayed once the first
//! terminal is bound.

pub mod api;
pub mod binding;
pub mod bootstrap;
pub mod buffer;
pub mod channel;
pub mod config;
pub mod error;
pub mod registry;
pub mod resize;
pub mod session;
pub mod surface;
pub mod verify;

// Re-export public API
pub use api::ApiClient;
pub use binding::TerminalBinding;
pub use bootstrap::{Bootstrapped, SessionBootstrap, TargetOutcome};
pub use buffer::OutputBuffer;
pub use channel::{Connector, ControlChannel, Outbound, RemoteEnd, WsConnector};
pub use config::ClientConfig;
pub use error::{
    ChannelError, InstanceError, SessionError, TerminalError, UrlError, VerificationError,
};
pub use registry::{Delivery, Instance, InstanceRegistry};
pub use session::SessionManager;
pub use surface::{Snippet, Surface, SurfaceMap, WidgetFactory};
pub use verify::{StaticVerifier, VerificationToken, Verifier};

pub use playterm_terminal::{ElementRef, TerminalWidget};
pub use playterm_types::{ClientMessage, Geometry, InstanceDescriptor, ServerMessage, SessionId};
