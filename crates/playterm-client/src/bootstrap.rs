use playterm_types::InstanceDescriptor;

use crate::api::ApiClient;
use crate::channel::{Connector, WsConnector};
use crate::config::ClientConfig;
use crate::error::{SessionError, TerminalError};
use crate::session::SessionManager;
use crate::surface::Surface;
use crate::verify::Verifier;

/// Result of binding one target during bootstrap
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,
    pub result: Result<InstanceDescriptor, TerminalError>,
}

/// A freshly created session with one terminal attempt per target
#[derive(Debug)]
pub struct Bootstrapped {
    pub manager: SessionManager,
    pub terminals: Vec<TargetOutcome>,
}

/// Creates sessions behind the external verification flow
pub struct SessionBootstrap<V, C = WsConnector> {
    api: ApiClient,
    verifier: V,
    connector: C,
}

impl<V: Verifier> SessionBootstrap<V, WsConnector> {
    pub fn new(config: ClientConfig, verifier: V) -> Self {
        Self::with_connector(config, verifier, WsConnector)
    }
}

impl<V: Verifier, C: Connector> SessionBootstrap<V, C> {
    pub fn with_connector(config: ClientConfig, verifier: V, connector: C) -> Self {
        Self {
            api: ApiClient::new(config),
            verifier,
            connector,
        }
    }

    /// Verify, create a session, then bind every target in order
    ///
    /// Nothing is bound before the session id is known. Each target gets its
    /// own instance; a failure for one target does not stop the others, and
    /// the verification UI for a target is dismissed once its attempt
    /// finished either way. Failures before the session exists are returned
    /// as `SessionError`.
    pub async fn new_session(
        &self,
        targets: &[String],
        surface: Box<dyn Surface>,
    ) -> Result<Bootstrapped, SessionError> {
        let Some(first) = targets.first() else {
            log::warn!("No terminal targets given; not starting a session");
            return Err(SessionError::NoTargets);
        };

        let token = self.verifier.verify(first).await?;
        let session_id = self.api.create_session(&token).await?;

        let url = self.api.config().channel_url(session_id.as_str())?;
        let channel = self.connector.connect(&url).await?;
        let mut manager = SessionManager::with_api(session_id, self.api.clone(), channel, surface);

        let mut terminals = Vec::with_capacity(targets.len());
        for target in targets {
            let result = manager.terminal(target).await;
            manager.surface_mut().dismiss_verification(target);
            terminals.push(TargetOutcome {
                target: target.clone(),
                result,
            });
        }

        Ok(Bootstrapped { manager, terminals })
    }
}
