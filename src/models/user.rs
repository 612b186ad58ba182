use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identifier of a registered user; the `sub` claim of every token.
pub type UserId = i32;

/// A stored login identity.
///
/// Deliberately not `Serialize`: the password hash must never reach a client.
/// Use [`PublicUser`] for responses.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

/// The client-visible part of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
}

impl From<&Credential> for PublicUser {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            email: credential.email.clone(),
        }
    }
}

/// Canonical form used for storage and lookup, so uniqueness ignores case
/// and surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_omits_hash() {
        let credential = Credential {
            id: 7,
            email: "a@x.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
        };

        let json = serde_json::to_value(PublicUser::from(&credential)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "email": "a@x.com" }));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
