use crate::error::AppError;
use crate::models::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 72;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: UserId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies HS256-signed identity tokens.
///
/// Built once at startup from the configured secret and shared by the auth
/// handlers and `AuthMiddleware`. Tokens are stateless: any instance holding
/// the same secret can verify any token.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    ///
    /// An empty secret is a fatal configuration error and yields
    /// `AppError::SigningError`.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::SigningError("signing secret is empty".into()));
        }

        // Expiry is compared strictly: no clock-skew allowance.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        })
    }

    /// Issues a token for `subject` that expires `TOKEN_TTL_HOURS` from now.
    pub fn issue(&self, subject: UserId) -> Result<String, AppError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`.
    pub(crate) fn issue_at(
        &self,
        subject: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::SigningError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its subject.
    ///
    /// Every failure, whether malformed input, a foreign signature or an
    /// expired token, is reported as `AppError::InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<UserId, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| AppError::InvalidToken(format!("{:?}", e.kind())))
    }
}
