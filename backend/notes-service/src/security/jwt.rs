/// Session token minting and validation
///
/// Tokens are HS256 JWTs signed with the server-held secret. Two kinds exist:
/// short-lived access tokens handed to the client after login, and even
/// shorter-lived state tokens that ride through the OAuth redirect as the
/// `state` parameter. The signing secret is threaded in from `Config` rather
/// than held in module globals, so tests and handlers stay self-contained.
use anyhow::{anyhow, bail, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const OAUTH_STATE_TTL_SECONDS: i64 = 600;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_OAUTH_STATE: &str = "oauth_state";

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims carried by both token kinds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID for access tokens, a random nonce for state tokens)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "oauth_state"
    pub token_type: String,
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate an access token for an authenticated user
///
/// The token expires one hour after issuance and carries the user's internal
/// id as its subject.
pub fn generate_access_token(user_id: Uuid, secret: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: TOKEN_TYPE_ACCESS.to_string(),
    };

    encode(
        &Header::new(JWT_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Generate the correlation token for one login round trip
///
/// Carried through the provider redirect as the `state` query parameter and
/// verified on callback, binding the callback to a login this server started.
pub fn generate_state_token(secret: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::seconds(OAUTH_STATE_TTL_SECONDS);

    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: TOKEN_TYPE_OAUTH_STATE.to_string(),
    };

    encode(
        &Header::new(JWT_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("Failed to generate state token: {e}"))
}

// ============================================================================
// Token Validation
// ============================================================================

fn validate(token: &str, secret: &str, expected_type: &str) -> Result<Claims> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| anyhow!("Token validation failed: {e}"))?;

    if data.claims.token_type != expected_type {
        bail!("Unexpected token type: {}", data.claims.token_type);
    }

    Ok(data.claims)
}

/// Validate an access token and return its claims
///
/// Verifies the HS256 signature, the expiry, and that the token is an access
/// token (a state token presented as a bearer credential is rejected).
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims> {
    validate(token, secret, TOKEN_TYPE_ACCESS)
}

/// Validate a login-state token returned by the provider callback
pub fn validate_state_token(token: &str, secret: &str) -> Result<Claims> {
    validate(token, secret, TOKEN_TYPE_OAUTH_STATE)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-do-not-use";

    #[test]
    fn test_generate_access_token() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, TEST_SECRET);

        assert!(token.is_ok());
        let token_str = token.unwrap();
        assert_eq!(token_str.matches('.').count(), 2); // JWT has 3 parts
    }

    #[test]
    fn test_validate_valid_token() {
        let user_id = Uuid::new_v4();
        let token =
            generate_access_token(user_id, TEST_SECRET).expect("Failed to generate token");

        let claims = validate_access_token(&token, TEST_SECRET);
        assert!(claims.is_ok());

        let claims = claims.unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = validate_access_token("invalid.token.here", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_tampered_token() {
        let user_id = Uuid::new_v4();
        let token =
            generate_access_token(user_id, TEST_SECRET).expect("Failed to generate token");

        // Rewrite the first payload character; the signature no longer matches
        let (header, rest) = token.split_once('.').expect("JWT has three parts");
        let tampered = format!("{}.x{}", header, &rest[1..]);
        let result = validate_access_token(&tampered, TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_wrong_secret() {
        let user_id = Uuid::new_v4();
        let token =
            generate_access_token(user_id, TEST_SECRET).expect("Failed to generate token");

        let result = validate_access_token(&token, "a-different-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            token_type: "access".to_string(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        let result = validate_access_token(&token, TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_state_token_rejected_as_access_token() {
        let state = generate_state_token(TEST_SECRET).expect("Failed to generate state token");

        assert!(validate_state_token(&state, TEST_SECRET).is_ok());
        assert!(validate_access_token(&state, TEST_SECRET).is_err());
    }

    #[test]
    fn test_access_token_rejected_as_state_token() {
        let token = generate_access_token(Uuid::new_v4(), TEST_SECRET)
            .expect("Failed to generate token");

        assert!(validate_state_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn test_state_tokens_are_unique() {
        let a = generate_state_token(TEST_SECRET).unwrap();
        let b = generate_state_token(TEST_SECRET).unwrap();
        assert_ne!(a, b);
    }
}
