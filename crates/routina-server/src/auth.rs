use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use routina_common::models::auth::{Claims, TokenError};

/// Hash a password using argon2id with a random per-call salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
/// A malformed hash string is treated as a failed verification, not an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Encodes and decodes signed access tokens carrying a subject and expiry.
///
/// Symmetric signing only: rotating the secret invalidates every token
/// issued before the rotation.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        }
    }

    /// Issue a token for `subject` with the configured TTL
    pub fn encode(&self, subject: &str) -> Result<String> {
        self.encode_with_ttl(subject, self.ttl)
    }

    /// Issue a token for `subject` expiring at `now + ttl`
    pub fn encode_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
        };
        jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .context("Failed to encode access token")
    }

    /// Verify signature and expiry, then return the claims.
    /// The payload is never read before the signature check passes.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        // `exp == now` still counts as expired, so a zero-TTL token never
        // decodes even within its issuance second.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret, Algorithm::HS256, Duration::minutes(30))
    }

    // Flip the first signature character so the decoded signature bytes
    // actually change (the final character carries unused padding bits).
    fn flip_signature(token: &str) -> String {
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut chars: Vec<char> = token.chars().collect();
        chars[sig_start] = if chars[sig_start] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1));
        assert!(verify_password(password, &hash2));
    }

    #[test]
    fn test_password_verify_malformed_hash_is_false() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
        assert!(!verify_password("whatever", ""));
    }

    #[test]
    fn test_token_encode_and_decode() {
        let codec = codec("test-jwt-secret");
        let token = codec.encode("alice").unwrap();
        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_wrong_secret_fails_signature() {
        let token = codec("secret-1").encode("alice").unwrap();
        let err = codec("secret-2").decode(&token).unwrap_err();
        assert_eq!(err, TokenError::InvalidSignature);
    }

    #[test]
    fn test_token_tampered_signature_fails() {
        let codec = codec("test-jwt-secret");
        let token = codec.encode("alice").unwrap();
        let tampered = flip_signature(&token);
        let err = codec.decode(&tampered).unwrap_err();
        assert_eq!(err, TokenError::InvalidSignature);
    }

    #[test]
    fn test_token_expired_fails() {
        let codec = codec("test-jwt-secret");
        let token = codec
            .encode_with_ttl("alice", Duration::minutes(-5))
            .unwrap();
        let err = codec.decode(&token).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn test_token_zero_ttl_is_dead_on_arrival() {
        let codec = codec("test-jwt-secret");
        let token = codec.encode_with_ttl("alice", Duration::zero()).unwrap();
        let err = codec.decode(&token).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn test_token_garbage_is_malformed() {
        let codec = codec("test-jwt-secret");
        assert_eq!(codec.decode("not-a-jwt").unwrap_err(), TokenError::Malformed);
        assert_eq!(codec.decode("").unwrap_err(), TokenError::Malformed);
        assert_eq!(
            codec.decode("a.b.c").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_token_algorithm_mismatch_rejected() {
        let hs256 = codec("test-jwt-secret");
        let hs512 = TokenCodec::new("test-jwt-secret", Algorithm::HS512, Duration::minutes(30));
        let token = hs512.encode("alice").unwrap();
        assert!(hs256.decode(&token).is_err());
    }
}
