use playterm_types::{
    InstanceDescriptor, SessionId, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE,
    VERIFICATION_FIELD,
};
use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::error::{InstanceError, SessionError};
use crate::verify::VerificationToken;

/// Request/reply client for the two exchanges outside the control channel
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(agent);
        }
        let http = builder.build().unwrap_or_else(|e| {
            log::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

        Self { http, config }
    }

    /// Use a preconfigured reqwest client
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Exchange a verification token for a session id
    ///
    /// A 200 body is the session id as plain text; every other status is a
    /// rejection.
    pub async fn create_session(&self, token: &VerificationToken) -> Result<SessionId, SessionError> {
        let url = self.config.endpoint("/")?;
        log::info!("Creating session at {}", url);

        let response = self
            .http
            .post(url)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .form(&[(VERIFICATION_FIELD, token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            log::warn!("Session creation rejected: {}", status);
            return Err(SessionError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let id = body.trim();
        if id.is_empty() {
            return Err(SessionError::EmptySessionId);
        }

        log::info!("Session created: {}", id);
        Ok(SessionId::new(id))
    }

    /// Allocate a new instance inside a session
    pub async fn create_instance(
        &self,
        session_id: &SessionId,
    ) -> Result<InstanceDescriptor, InstanceError> {
        let url = self
            .config
            .session_endpoint(session_id.as_str(), "instances")?;
        log::debug!("Requesting instance: POST {}", url);

        let response = self
            .http
            .post(url)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let descriptor: InstanceDescriptor = serde_json::from_str(&body)?;
                log::info!("Instance created: {}", descriptor.name);
                Ok(descriptor)
            }
            StatusCode::CONFLICT => {
                log::warn!("Instance capacity reached for session {}", session_id);
                Err(InstanceError::CapacityExceeded)
            }
            status => {
                log::warn!("Instance creation failed: {}", status);
                Err(InstanceError::Generic {
                    status: status.as_u16(),
                })
            }
        }
    }
}
