//! Verification gate consumed before a session may be created
//!
//! The service only hands out sessions to callers that present a token from
//! its challenge widget. How that token is obtained (a browser challenge, a
//! pre-issued token, a test double) is up to the embedding application.

use async_trait::async_trait;
use std::fmt;

use crate::error::VerificationError;

/// Opaque token produced by a successful verification
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs
impl fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationToken(<{} bytes>)", self.0.len())
    }
}

/// External verification flow
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Run the challenge for `target` and wait for its outcome
    async fn verify(&self, target: &str) -> Result<VerificationToken, VerificationError>;
}

/// Verifier that always answers with a token obtained out of band
#[derive(Debug, Clone)]
pub struct StaticVerifier {
    token: VerificationToken,
}

impl StaticVerifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: VerificationToken::new(token),
        }
    }
}

#[async_trait]
impl Verifier for StaticVerifier {
    async fn verify(&self, target: &str) -> Result<VerificationToken, VerificationError> {
        if self.token.as_str().is_empty() {
            return Err(VerificationError::Failed(format!(
                "empty token for target '{}'",
                target
            )));
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticVerifier::new("t0k3n");
        assert_eq!(verifier.verify(".term").await.unwrap().as_str(), "t0k3n");

        let empty = StaticVerifier::new("");
        assert!(matches!(
            empty.verify(".term").await,
            Err(VerificationError::Failed(_))
        ));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = VerificationToken::new("secret");
        assert_eq!(format!("{:?}", token), "VerificationToken(<6 bytes>)");
    }
}
