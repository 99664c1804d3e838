//! HS256 JWT authenticator.
//!
//! Tokens carry `{ user_id, username, exp }`. A leading `Bearer ` is accepted
//! so the same string works as a header value and as a query parameter.

use std::time::Duration;

use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, Authenticator, Identity, UserId, Username};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    username: String,
    exp: usize,
}

#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `identity`, valid for `ttl` from now
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| AuthError::Issue(e.to_string()))?;
        let exp = (chrono::Utc::now() + ttl).timestamp();
        self.encode_claims(identity, exp)
    }

    fn encode_claims(&self, identity: &Identity, exp: i64) -> Result<String, AuthError> {
        let exp = usize::try_from(exp).map_err(|e| AuthError::Issue(e.to_string()))?;
        let claims = Claims {
            user_id: identity.user_id.value(),
            username: identity.username.as_str().to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, credential: &str) -> Result<Identity, AuthError> {
        let token = credential.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        let username = Username::new(data.claims.username)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(Identity::new(UserId::new(data.claims.user_id), username))
    }
}
