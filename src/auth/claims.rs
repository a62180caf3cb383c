use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which half of a login pair a token is. Only `Access` opens the admin
/// routes; `Refresh` is accepted solely by `POST /auth/refresh`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Payload carried by dashboard tokens. `sub` is the administrator's
/// `users.id`, the actor every handler receives through `AuthUser`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}
