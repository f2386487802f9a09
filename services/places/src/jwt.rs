//! JWT service for token issuance and validation
//!
//! Tokens are signed with HMAC (HS256) using a server-held secret and
//! carry the user id and email. Expired, tampered, and malformed tokens
//! all fail validation the same way.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds (default: 1 hour)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Secret used to sign tokens
    /// - `JWT_TOKEN_EXPIRY`: Token expiry in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Issue a token bound to a user id and email
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.token_expiry,
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            token_expiry: 3600,
        })
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = test_service("test-secret");
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "ada@example.com").expect("issue failed");
        let claims = service.validate(&token).expect("validation failed");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let issuer = test_service("secret-a");
        let verifier = test_service("secret-b");

        let token = issuer.issue(Uuid::new_v4(), "ada@example.com").expect("issue failed");
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let service = test_service("test-secret");
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_secs();

        // Past the default 60 second leeway
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode failed");

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_token() {
        let service = test_service("test-secret");
        assert!(service.validate("not-a-token").is_err());
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", "env-secret");
            std::env::remove_var("JWT_TOKEN_EXPIRY");
        }

        let config = JwtConfig::from_env().expect("config failed");
        assert_eq!(config.secret, "env-secret");
        assert_eq!(config.token_expiry, 3600);

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }

    #[test]
    #[serial]
    fn test_jwt_config_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());
    }
}
