//! Mocked authentication
//!
//! In a real deployment login would validate against a credential service;
//! here a simulated authenticator applies the same validation rules and
//! returns the user it would have verified. The session only cares that an
//! authenticated [`User`] is present before a submission starts.

use crate::error::AuthError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Login or registration input
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Required for registration only
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Basic `user@domain` shape check: non-empty local part and a dot in the
/// domain, no whitespace anywhere.
fn email_is_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Validate credentials for login
pub fn validate_login(creds: &Credentials) -> Result<(), AuthError> {
    if creds.email.is_empty() {
        return Err(AuthError::EmailRequired);
    }
    if !email_is_valid(&creds.email) {
        return Err(AuthError::EmailInvalid);
    }
    if creds.password.is_empty() {
        return Err(AuthError::PasswordRequired);
    }
    if creds.password.len() < 6 {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

/// Validate credentials for registration (login rules plus a name)
pub fn validate_registration(creds: &Credentials) -> Result<(), AuthError> {
    if creds.name.as_deref().unwrap_or("").is_empty() {
        return Err(AuthError::NameRequired);
    }
    validate_login(creds)
}

#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, creds: &Credentials) -> Result<User, AuthError>;
    async fn register(&self, creds: &Credentials) -> Result<User, AuthError>;
    /// Google-style single-sign-on
    async fn sso(&self) -> Result<User, AuthError>;
}

/// Simulated authenticator with configurable latency
pub struct MockAuthenticator {
    latency: Duration,
}

impl MockAuthenticator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new(Duration::from_millis(0))
    }
}

#[async_trait::async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, creds: &Credentials) -> Result<User, AuthError> {
        validate_login(creds)?;
        tokio::time::sleep(self.latency).await;

        // Display name falls back to the local part of the email
        let name = creds
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                creds
                    .email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Ok(User {
            email: creds.email.clone(),
            name,
            picture: None,
        })
    }

    async fn register(&self, creds: &Credentials) -> Result<User, AuthError> {
        validate_registration(creds)?;
        tokio::time::sleep(self.latency).await;

        Ok(User {
            email: creds.email.clone(),
            name: creds.name.clone().unwrap_or_default(),
            picture: None,
        })
    }

    async fn sso(&self) -> Result<User, AuthError> {
        tokio::time::sleep(self.latency).await;

        Ok(User {
            email: "user@gmail.com".to_string(),
            name: "John Doe".to_string(),
            picture: Some("https://example.com/avatar.jpg".to_string()),
        })
    }
}
