//! Orange Money credential and token lifecycle.
//!
//! [`OrangeAuth`] owns the OAuth2 bearer token for one client instance and
//! the RSA public key used to encrypt the transaction PIN.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, TimeDelta, Utc};
use deggo_types::{DeggoError, Diagnostics, ErrorKind, ProviderId};
use reqwest::Client;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::rand_core::OsRng;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

use crate::types::{AUTH_PATH, AuthResponse, PUBLIC_KEY_PATH, PublicKeyResponse};

/// Bearer token state for one client instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenState {
    #[default]
    Unauthenticated,
    Authenticated {
        token: String,
        expires_at: DateTime<Utc>,
    },
}

/// What to do with the current token at a given instant.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenAction<'a> {
    Reuse(&'a str),
    Refresh,
}

impl TokenState {
    /// A token obtained at `now` that lives for `expires_in` seconds.
    ///
    /// `None` when the expiry does not fit in a timestamp.
    pub fn authenticated(token: String, expires_in: i64, now: DateTime<Utc>) -> Option<Self> {
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))?;
        Some(TokenState::Authenticated { token, expires_at })
    }

    /// The token is reused only while its expiry is strictly in the future.
    pub fn action(&self, now: DateTime<Utc>) -> TokenAction<'_> {
        match self {
            TokenState::Authenticated { token, expires_at } if *expires_at > now => {
                TokenAction::Reuse(token)
            }
            _ => TokenAction::Refresh,
        }
    }
}

/// Credential manager for the Orange Money API.
pub struct OrangeAuth {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: Zeroizing<String>,
    token: Mutex<TokenState>,
    public_key: OnceCell<RsaPublicKey>,
}

impl OrangeAuth {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Zeroizing<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret,
            token: Mutex::new(TokenState::Unauthenticated),
            public_key: OnceCell::new(),
        }
    }

    /// Returns a valid bearer token, authenticating if needed.
    ///
    /// The state lock is held across the credential exchange, so concurrent
    /// callers wait for one authentication instead of starting their own.
    pub async fn get_access_token(&self) -> Result<String, DeggoError> {
        let mut state = self.token.lock().await;

        if let TokenAction::Reuse(token) = state.action(Utc::now()) {
            return Ok(token.to_string());
        }

        let (fresh, token) = self.authenticate().await?;
        *state = fresh;
        Ok(token)
    }

    /// Returns true if a token can be obtained.
    pub async fn test_connection(&self) -> bool {
        match self.get_access_token().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Orange Money connection test failed");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn authenticate(&self) -> Result<(TokenState, String), DeggoError> {
        let url = format!("{}{}", self.base_url, AUTH_PATH);
        debug!("Requesting Orange Money access token");

        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(self.client_secret.as_str()))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| auth_failed(None).with_source(e))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(status = status.as_u16(), "Orange Money authentication rejected");
            return Err(auth_failed(Some(&body)));
        }

        let response: AuthResponse =
            serde_json::from_str(&body).map_err(|e| auth_failed(Some(&body)).with_source(e))?;

        let token = response.access_token.clone();
        let state = TokenState::authenticated(response.access_token, response.expires_in, Utc::now())
            .ok_or_else(|| {
                warn!(expires_in = response.expires_in, "Orange Money token lifetime out of range");
                auth_failed(Some(&body))
            })?;
        Ok((state, token))
    }

    /// Returns the provider's PIN encryption key, fetching it on first use.
    ///
    /// The key is kept for the life of this instance. A failed fetch is not
    /// cached.
    pub async fn get_public_key(&self) -> Result<&RsaPublicKey, DeggoError> {
        self.public_key
            .get_or_try_init(|| async {
                let raw = self.fetch_public_key().await?;
                parse_public_key(&raw)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_public_key(&self) -> Result<String, DeggoError> {
        let token = self.get_access_token().await?;
        let url = format!("{}{}", self.base_url, PUBLIC_KEY_PATH);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| key_error("Failed to fetch Orange Money public key").with_source(e))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(key_error("Failed to fetch Orange Money public key")
                .with_details(Diagnostics::from_body(&body)));
        }

        let parsed: PublicKeyResponse = serde_json::from_str(&body)
            .map_err(|e| key_error("Malformed Orange Money public key response").with_source(e))?;
        Ok(parsed.public_key)
    }

    /// Encrypts a secret with the provider key (PKCS#1 v1.5), base64 encoded.
    pub async fn encrypt_secret(&self, secret: &str) -> Result<String, DeggoError> {
        let key = self.get_public_key().await?;
        let encrypted = key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, secret.as_bytes())
            .map_err(|e| key_error("Failed to encrypt PIN code").with_source(e))?;
        Ok(STANDARD.encode(encrypted))
    }
}

/// Parses a public key given as PEM (SPKI or PKCS#1) or bare base64 DER.
pub fn parse_public_key(raw: &str) -> Result<RsaPublicKey, DeggoError> {
    let raw = raw.trim();

    let parsed = if raw.starts_with("-----BEGIN RSA PUBLIC KEY-----") {
        RsaPublicKey::from_pkcs1_pem(raw).map_err(|e| e.to_string())
    } else if raw.starts_with("-----BEGIN") {
        RsaPublicKey::from_public_key_pem(raw).map_err(|e| e.to_string())
    } else {
        let compact: String = raw.split_whitespace().collect();
        STANDARD
            .decode(compact)
            .map_err(|e| e.to_string())
            .and_then(|der| {
                RsaPublicKey::from_public_key_der(&der)
                    .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
                    .map_err(|e| e.to_string())
            })
    };

    parsed.map_err(|reason| {
        key_error("Invalid Orange Money public key")
            .with_details(Diagnostics::new().with("reason", reason))
    })
}

fn auth_failed(body: Option<&str>) -> DeggoError {
    let err = DeggoError::new(
        ErrorKind::InvalidCredentials,
        "Orange Money authentication failed",
    )
    .with_provider(ProviderId::Orange);

    match body {
        Some(body) => err.with_details(Diagnostics::from_body(body)),
        None => err,
    }
}

fn key_error(message: &str) -> DeggoError {
    DeggoError::new(ErrorKind::NetworkError, message).with_provider(ProviderId::Orange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_unauthenticated_refreshes() {
        assert_eq!(TokenState::Unauthenticated.action(at(0)), TokenAction::Refresh);
    }

    #[test]
    fn test_live_token_is_reused() {
        let state = TokenState::authenticated("tok".into(), 3600, at(1_000)).unwrap();
        assert_eq!(state.action(at(1_000)), TokenAction::Reuse("tok"));
        assert_eq!(state.action(at(4_599)), TokenAction::Reuse("tok"));
    }

    #[test]
    fn test_token_expires_at_boundary() {
        let state = TokenState::authenticated("tok".into(), 3600, at(1_000)).unwrap();
        assert_eq!(state.action(at(4_600)), TokenAction::Refresh);
        assert_eq!(state.action(at(10_000)), TokenAction::Refresh);
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        assert!(TokenState::authenticated("tok".into(), i64::MAX, at(1_000)).is_none());
        assert!(TokenState::authenticated("tok".into(), i64::MIN, at(1_000)).is_none());
    }

    #[test]
    fn test_garbage_key_rejected() {
        let err = parse_public_key("not a key").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.provider(), Some(ProviderId::Orange));
    }
}
