//! Session token handling

use crate::config::JwtConfig;
use crate::domain::UserId;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SESSION_AUDIENCE: &str = "owl-api";
const SESSION_TOKEN_TYPE: &str = "session";

/// Session token claims (issued at login)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id)
    pub sub: String,
    /// Session id, the revocation handle
    pub sid: String,
    pub username: String,
    pub iss: String,
    pub aud: String,
    /// Token type discriminator
    #[serde(default)]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> Result<UserId> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid session subject".to_string()))
    }
}

/// Issued session token plus its metadata
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session_id: String,
    pub expires_in: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    /// RS256 when a private key PEM is configured, HS256 with the shared secret otherwise.
    pub fn new(config: JwtConfig) -> Result<Self> {
        let algorithm = if config.private_key_pem.is_some() {
            Algorithm::RS256
        } else {
            Algorithm::HS256
        };
        let encoding_key = match config.private_key_pem.as_ref() {
            Some(private_key) => EncodingKey::from_rsa_pem(private_key.as_bytes())?,
            None => EncodingKey::from_secret(config.secret.as_bytes()),
        };
        let decoding_key = match (
            config.public_key_pem.as_ref(),
            config.private_key_pem.as_ref(),
        ) {
            (Some(public_key), _) => DecodingKey::from_rsa_pem(public_key.as_bytes())?,
            (None, Some(_)) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "JWT_PUBLIC_KEY is required when JWT_PRIVATE_KEY is set"
                )))
            }
            (None, None) => DecodingKey::from_secret(config.secret.as_bytes()),
        };
        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            algorithm,
        })
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.config.session_ttl_secs
    }

    /// Leeway of 5 seconds rather than the library default of 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(self.algorithm);
        v.leeway = 5;
        v
    }

    /// Create a session token with a fresh session id
    pub fn create_session_token(&self, user_id: UserId, username: &str) -> Result<IssuedSession> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.session_ttl_secs);
        let session_id = Uuid::new_v4().to_string();

        let claims = SessionClaims {
            sub: user_id.to_string(),
            sid: session_id.clone(),
            username: username.to_string(),
            iss: self.config.issuer.clone(),
            aud: SESSION_AUDIENCE.to_string(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(self.algorithm);
        let token =
            encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))?;

        Ok(IssuedSession {
            token,
            session_id,
            expires_in: self.config.session_ttl_secs,
        })
    }

    /// Verify signature, issuer, audience, expiry and token type
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = self.strict_validation();
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.set_issuer(&[&self.config.issuer]);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)?.claims;
        if claims.token_type != SESSION_TOKEN_TYPE {
            return Err(AppError::Unauthorized("Not a session token".to_string()));
        }
        Ok(claims)
    }
}
