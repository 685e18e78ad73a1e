// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! ## Authentication Modes
//!
//! - **Production mode** (`CLERK_JWKS_URL` set): full JWT verification against Clerk JWKS
//! - **Development mode** (no `CLERK_JWKS_URL`): structure and expiry only, no signature check

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Validation};

use super::claims::ClerkClaims;
use super::{AuthError, AuthenticatedUser, JwksManager};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Token verification settings shared by every request.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// JWKS manager; `None` selects development mode
    pub jwks: Option<JwksManager>,
    /// Expected issuer (Clerk instance URL)
    pub issuer: Option<String>,
    /// Expected audience
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Development mode: tokens are decoded without signature verification.
    pub fn development() -> Self {
        Self::default()
    }

    /// Production mode backed by the given JWKS endpoint.
    pub fn production(jwks: JwksManager) -> Self {
        Self {
            jwks: Some(jwks),
            issuer: None,
            audience: None,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }

    /// Extract the bearer token from `headers` and verify it.
    pub async fn verify_bearer(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;

        self.verify_token(token).await
    }

    /// Verify a raw JWT and return the caller.
    pub async fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = match &self.jwks {
            Some(jwks) => self.verify_production(token, jwks).await?,
            None => verify_development(token)?,
        };

        if claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }
        Ok(AuthenticatedUser::from_claims(claims))
    }

    async fn verify_production(
        &self,
        token: &str,
        jwks: &JwksManager,
    ) -> Result<ClerkClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        let (decoding_key, algorithm) = match &header.kid {
            Some(kid) => jwks.get_decoding_key(kid).await?,
            None => jwks.get_any_decoding_key().await?,
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_nbf = true;

        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let token_data =
            decode::<ClerkClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

/// Development verification (no signature check).
///
/// WARNING: only reachable when no JWKS URL is configured.
fn verify_development(token: &str) -> Result<ClerkClaims, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<ClerkClaims>(token)
        .map_err(|_| AuthError::MalformedToken)?;
    let claims = token_data.claims;

    let now = chrono::Utc::now().timestamp();
    let leeway = CLOCK_SKEW_LEEWAY as i64;

    if claims.exp > 0 && claims.exp < now - leeway {
        return Err(AuthError::TokenExpired);
    }
    if matches!(claims.nbf, Some(nbf) if nbf > now + leeway) {
        return Err(AuthError::TokenNotYetValid);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dev_token, dev_token_with_claims};
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let config = AuthConfig::development();
        let result = config.verify_bearer(&HeaderMap::new()).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let config = AuthConfig::development();
        let result = config.verify_bearer(&headers_with("Basic dXNlcjpwYXNz")).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));

        let result = config.verify_bearer(&headers_with("Bearer   ")).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn development_token_yields_subject() {
        let config = AuthConfig::development();
        let token = dev_token("user_2f2DunSM8PXDtKRWsWAcIRIRKzU");
        let user = config
            .verify_bearer(&headers_with(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(user.user_id, "user_2f2DunSM8PXDtKRWsWAcIRIRKzU");
        assert_eq!(user.session_id.as_deref(), Some("sess_test"));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let config = AuthConfig::development();
        let result = config.verify_token("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn expired_development_token_is_rejected() {
        let config = AuthConfig::development();
        let token = dev_token_with_claims(r#"{"sub":"user_1","iat":1609459200,"exp":1609462800}"#);
        let result = config.verify_token(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn empty_subject_is_rejected() {
        let config = AuthConfig::development();
        let token = dev_token_with_claims(r#"{"sub":"","exp":9999999999}"#);
        let result = config.verify_token(&token).await;
        assert!(matches!(result, Err(AuthError::MissingSubject)));
    }

    #[test]
    fn production_mode_keeps_keys_and_issuer() {
        let jwks = JwksManager::new("https://example.com/.well-known/jwks.json").unwrap();
        let config = AuthConfig::production(jwks)
            .with_issuer(Some("https://clerk.example.com".to_string()))
            .with_audience(None);
        assert!(config.jwks.is_some());
        assert_eq!(config.issuer.as_deref(), Some("https://clerk.example.com"));
        assert!(AuthConfig::development().jwks.is_none());
    }
}
