//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.

use hrms_core::error::CoreError;
use hrms_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::parse_var;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's role (`admin`, `hr`, `employee`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret. `None` when `JWT_SECRET` is unset; the server
    /// still starts but every authenticated request fails with a
    /// configuration error.
    pub secret: Option<String>,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    pub fn from_env() -> Result<Self, CoreError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let access_token_expiry_mins: i64 =
            parse_var("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS)?;

        Ok(Self {
            secret,
            access_token_expiry_mins,
        })
    }

    /// The signing secret, or a configuration error when it is unset.
    pub fn signing_secret(&self) -> Result<&str, CoreError> {
        self.secret
            .as_deref()
            .ok_or_else(|| CoreError::Configuration("JWT_SECRET is not set".into()))
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, CoreError> {
    let secret = config.signing_secret()?;
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")))
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Signature and expiry failures are not distinguished: both are
/// `Unauthorized("Invalid or expired token")`.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, CoreError> {
    let secret = config.signing_secret()?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map(|data| data.claims)
    .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: Some("test-secret-that-is-long-enough-for-hmac".to_string()),
            access_token_expiry_mins: 15,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token(42, "hr", &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "hr");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "employee".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_deref().unwrap().as_bytes()),
        )
        .expect("encoding should succeed");

        assert_matches!(
            validate_token(&token, &config),
            Err(CoreError::Unauthorized(msg)) if msg == "Invalid or expired token"
        );
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: Some("secret-alpha".to_string()),
            access_token_expiry_mins: 15,
        };
        let config_b = JwtConfig {
            secret: Some("secret-bravo".to_string()),
            access_token_expiry_mins: 15,
        };

        let token = generate_access_token(1, "admin", &config_a).expect("token generation should succeed");
        assert_matches!(validate_token(&token, &config_b), Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let config = JwtConfig {
            secret: None,
            access_token_expiry_mins: 15,
        };
        assert_matches!(
            generate_access_token(1, "admin", &config),
            Err(CoreError::Configuration(_))
        );
        assert_matches!(validate_token("abc", &config), Err(CoreError::Configuration(_)));
    }
}
