use crate::db::traits::User;
use crate::types::{AppError, Claims, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Longest lifetime the configuration accepts: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 86_400;

/// Stateless JWT issuance and verification.
///
/// Tokens are HS256-signed and carry the user id and role. There is no
/// revocation list: a leaked token stays valid until it expires, and rotating
/// the secret is the only way to invalidate every outstanding token at once.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Creates a new TokenService.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing tokens
    /// * `ttl_secs` - Token validity in seconds
    pub fn new(jwt_secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Mints a token for `user`.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let exp = now.checked_add(self.ttl_secs).ok_or_else(|| {
            AppError::Internal(format!("Token TTL {} overflows expiry", self.ttl_secs))
        })?;
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role.to_string(),
            iat: now,
            exp,
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token and returns its claims.
    ///
    /// The signature is checked before any claim is looked at. A token is
    /// valid only while `now < exp`.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => {
                    tracing::debug!(error = %e, "token rejected");
                    AppError::TokenInvalid
                }
            })?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::Role;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn create_test_service() -> TokenService {
        TokenService::new(SECRET, DEFAULT_TOKEN_TTL_SECS)
    }

    fn test_user(role: Role) -> User {
        User {
            id: "user-123".to_string(),
            username: "Tester".to_string(),
            password_hash: String::new(),
            role,
            created_at: 0,
        }
    }

    #[test]
    fn test_token_verification_success() {
        let service = create_test_service();
        let token = service
            .issue(&test_user(Role::Admin))
            .expect("should issue token");

        let claims = service.verify(&token).expect("should verify token");

        assert_eq!(claims.sub, "user-123", "subject should match user id");
        assert_eq!(claims.role, "admin", "role should be embedded");
    }

    #[test]
    fn test_claims_expiration() {
        let service = create_test_service();
        let token = service
            .issue(&test_user(Role::User))
            .expect("should issue token");
        let claims = service.verify(&token).expect("should verify");

        let now = Utc::now().timestamp();
        assert!(claims.iat <= now && claims.iat >= now - 5);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_zero_ttl_token_is_expired() {
        let service = TokenService::new(SECRET, 0);
        let token = service
            .issue(&test_user(Role::Admin))
            .expect("should issue token");

        assert!(matches!(service.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_overflowing_ttl_is_an_error_not_a_panic() {
        let service = TokenService::new(SECRET, i64::MAX);

        let result = service.issue(&test_user(Role::Admin));

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_max_ttl_issues_a_valid_token() {
        let service = TokenService::new(SECRET, MAX_TOKEN_TTL_SECS);
        let token = service
            .issue(&test_user(Role::Admin))
            .expect("should issue token");

        let claims = service.verify(&token).expect("should verify");
        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_past_expiry_token_is_expired() {
        let service = create_test_service();
        let now = Utc::now().timestamp();
        let token = service
            .sign(&Claims {
                sub: "user-123".to_string(),
                role: "admin".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .expect("should sign");

        assert!(matches!(service.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_token_verification_invalid_token() {
        let service = create_test_service();

        for token in ["", "invalid.token.here", "a.b", "not a token at all"] {
            assert!(
                matches!(service.verify(token), Err(AppError::TokenInvalid)),
                "{token:?} should be rejected as invalid"
            );
        }
    }

    #[test]
    fn test_token_verification_wrong_secret() {
        let service1 = TokenService::new("secret-one-that-is-32-chars-long", 900);
        let service2 = TokenService::new("secret-two-that-is-32-chars-long", 900);

        let token = service1
            .issue(&test_user(Role::Admin))
            .expect("should issue");

        assert!(matches!(service2.verify(&token), Err(AppError::TokenInvalid)));
    }

    #[test]
    fn test_any_single_bit_flip_is_rejected() {
        let service = create_test_service();
        let token = service
            .issue(&test_user(Role::Admin))
            .expect("should issue token");
        let bytes = token.as_bytes();

        let mut checked = 0;
        for index in 0..bytes.len() {
            for bit in 0..8 {
                let mut tampered = bytes.to_vec();
                tampered[index] ^= 1 << bit;

                // Tokens arrive as header strings; non-UTF-8 never reaches verify.
                let Ok(tampered) = String::from_utf8(tampered) else {
                    continue;
                };

                assert!(
                    matches!(service.verify(&tampered), Err(AppError::TokenInvalid)),
                    "flipping bit {bit} of byte {index} must invalidate the token"
                );
                checked += 1;
            }
        }

        assert!(checked > bytes.len() * 6);
    }

    #[test]
    fn test_expired_token_with_bad_signature_is_invalid() {
        let service = create_test_service();
        let other = TokenService::new("some-other-secret-that-is-long", 0);
        let token = other
            .issue(&test_user(Role::Admin))
            .expect("should issue token");

        assert!(matches!(service.verify(&token), Err(AppError::TokenInvalid)));
    }
}
