use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Whether a token grants API access or only a new token pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn new(user_id: Uuid, kind: TokenKind, issuer: &str, audience: &str, ttl: Duration) -> Self {
        let iat = OffsetDateTime::now_utc().unix_timestamp().max(0) as usize;
        Self {
            sub: user_id,
            iat,
            exp: iat + ttl.as_secs() as usize,
            iss: issuer.to_owned(),
            aud: audience.to_owned(),
            kind,
        }
    }
}
