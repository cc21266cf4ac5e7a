//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Lifetime of an access token
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (employee ID)
    pub sub: String,
    /// Employee display name
    pub name: String,
    /// Employee email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str) -> Self {
        // Only the HMAC family is accepted; the header algorithm is checked
        // against this list before the signature.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Expiry is checked against our own clock in `validate_token_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Generate a JWT token for an employee
    pub fn generate_token(
        &self,
        employee_id: i64,
        name: &str,
        email: &str,
    ) -> Result<String, AuthError> {
        self.generate_token_at(employee_id, name, email, Utc::now())
    }

    /// Generate a JWT token as if issued at `now`
    pub fn generate_token_at(
        &self,
        employee_id: i64,
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = now + Duration::minutes(TOKEN_TTL_MINUTES);

        let claims = Claims {
            sub: employee_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Generating token for employee: {}", employee_id);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate a JWT token against the clock value `now`
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        // Expired once the clock reaches `exp`
        if now.timestamp() >= token_data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    fn manager() -> JwtManager {
        JwtManager::new(SECRET)
    }

    fn issued_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = manager();

        let token = manager.generate_token(1, "John Doe", "john@example.com").unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.name, "John Doe");
        assert_eq!(claims.email, "john@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_valid_for_one_hour() {
        let manager = manager();
        let t = issued_at();
        let token = manager.generate_token_at(7, "John Doe", "john@example.com", t).unwrap();

        assert!(manager.validate_token_at(&token, t).is_ok());
        assert!(manager.validate_token_at(&token, t + Duration::minutes(30)).is_ok());
        assert!(manager.validate_token_at(&token, t + Duration::seconds(3599)).is_ok());

        let at_expiry = manager.validate_token_at(&token, t + Duration::hours(1));
        assert!(matches!(at_expiry, Err(AuthError::TokenExpired)));
        let later = manager.validate_token_at(&token, t + Duration::days(3));
        assert!(matches!(later, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_expired_token_message() {
        let manager = manager();
        let token = manager
            .generate_token_at(7, "John Doe", "john@example.com", Utc::now() - Duration::hours(2))
            .unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert_eq!(err.to_string(), "token has expired");
    }

    #[test]
    fn test_invalid_token() {
        let manager = manager();

        let result = manager.validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
        assert_eq!(result.unwrap_err().to_string(), "invalid token");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let other = JwtManager::new("another-secret");
        let token = other.generate_token(1, "John Doe", "john@example.com").unwrap();

        assert!(matches!(manager().validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let manager = manager();
        let token = manager.generate_token(1, "John Doe", "john@example.com").unwrap();
        let other = manager.generate_token(2, "Jane Doe", "jane@example.com").unwrap();

        // Splice the second token's payload onto the first token's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(manager.validate_token(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_non_hmac_algorithms_are_rejected() {
        let manager = manager();
        let token = manager.generate_token(1, "John Doe", "john@example.com").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        // {"alg":"RS256","typ":"JWT"}
        let rs256 = format!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}.{}", parts[1], parts[2]);
        assert!(matches!(manager.validate_token(&rs256), Err(AuthError::InvalidToken)));

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", parts[1]);
        assert!(matches!(manager.validate_token(&unsigned), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_other_hmac_variants_are_accepted() {
        let manager = manager();
        let now = Utc::now();
        let claims = Claims {
            sub: "3".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            exp: (now + Duration::minutes(5)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(manager.validate_token(&token).unwrap(), claims);
    }
}
