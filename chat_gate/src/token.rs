//! Bearer token minting for the downstream chat application.
//!
//! The token is self-contained: `base64url(claims)` followed by a dot and
//! an HMAC-SHA256 signature over that payload. The downstream application
//! verifies it with the shared secret and reads the claims directly, no
//! callback into this service required. Claims carry an expiry timestamp;
//! verification rejects stale tokens.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::utils::{base64url_decode, base64url_encode};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid signature")]
    Signature,

    #[error("Token expired")]
    Expired,

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Claims carried by a minted bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BearerClaims {
    pub email: String,
    pub user_id: String,
    pub username: String,
    /// Unix timestamp after which the token is no longer valid
    pub exp: i64,
}

/// Mints and verifies signed, expiring bearer tokens.
pub struct TokenMinter {
    secret: Vec<u8>,
    ttl: i64,
}

impl TokenMinter {
    /// `ttl` is the token lifetime in seconds from the moment of minting.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Mint a token for verified user attributes. The output is URL-safe and
    /// can ride in a query parameter.
    pub fn mint(&self, email: &str, user_id: &str, username: &str) -> Result<String, TokenError> {
        let claims = BearerClaims {
            email: email.to_string(),
            user_id: user_id.to_string(),
            username: username.to_string(),
            exp: Utc::now().timestamp() + self.ttl,
        };

        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Encoding(e.to_string()))?;
        let payload = base64url_encode(&claims_json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&payload));

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn verify(&self, token: &str) -> Result<BearerClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;

        let presented = base64url_decode(signature).map_err(|_| TokenError::Malformed)?;
        let expected = self.sign(payload);

        // Constant-time comparison; a length mismatch compares unequal
        if !bool::from(expected.as_slice().ct_eq(&presented)) {
            return Err(TokenError::Signature);
        }

        let claims_json = base64url_decode(payload).map_err(|_| TokenError::Malformed)?;
        let claims: BearerClaims =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"test-secret-key-for-token-minting";

    #[test]
    fn test_mint_verify_roundtrip() {
        // Given a minter and verified user attributes
        let minter = TokenMinter::new(SECRET, 3600);

        // When minting and verifying
        let token = minter
            .mint("new@example.com", "user123", "newbie")
            .expect("minting should succeed");
        let claims = minter.verify(&token).expect("verification should succeed");

        // Then the claims round-trip
        assert_eq!(claims.email, "new@example.com");
        assert_eq!(claims.user_id, "user123");
        assert_eq!(claims.username, "newbie");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_token_is_url_query_safe() {
        let minter = TokenMinter::new(SECRET, 3600);

        let token = minter.mint("new@example.com", "user123", "newbie").unwrap();

        // base64url payload, dot, base64url signature; nothing that needs
        // percent-encoding in a query value
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        );
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        // Given a valid token
        let minter = TokenMinter::new(SECRET, 3600);
        let token = minter.mint("new@example.com", "user123", "newbie").unwrap();

        // When the claims half is swapped for another user's
        let (_, signature) = token.split_once('.').unwrap();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            "{\"email\":\"other@example.com\",\"user_id\":\"user123\",\"username\":\"newbie\",\"exp\":9999999999}",
        );
        let forged = format!("{forged_claims}.{signature}");

        // Then verification fails on the signature
        assert_eq!(minter.verify(&forged), Err(TokenError::Signature));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let minter = TokenMinter::new(SECRET, 3600);
        let other = TokenMinter::new(b"a completely different secret".to_vec(), 3600);

        let token = minter.mint("new@example.com", "user123", "newbie").unwrap();

        assert_eq!(other.verify(&token), Err(TokenError::Signature));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Given a minter whose tokens are born expired
        let minter = TokenMinter::new(SECRET, -1);

        let token = minter.mint("new@example.com", "user123", "newbie").unwrap();

        assert_eq!(minter.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let minter = TokenMinter::new(SECRET, 3600);

        assert_eq!(minter.verify(""), Err(TokenError::Malformed));
        assert_eq!(minter.verify("no-dot-here"), Err(TokenError::Malformed));
        assert_eq!(minter.verify("!!.!!"), Err(TokenError::Malformed));
    }

    proptest! {
        /// Any claims the directory can produce survive a mint/verify round trip
        #[test]
        fn test_roundtrip_arbitrary_claims(
            email in "[a-zA-Z0-9._%+-]{1,32}@[a-zA-Z0-9.-]{1,32}\\.[a-zA-Z]{2,8}",
            user_id in "[a-zA-Z0-9_-]{1,64}",
            username in "[\\p{L}\\p{N} _.-]{1,64}"
        ) {
            let minter = TokenMinter::new(SECRET, 3600);

            let token = minter.mint(&email, &user_id, &username).expect("minting should succeed");
            let claims = minter.verify(&token).expect("verification should succeed");

            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.user_id, user_id);
            prop_assert_eq!(claims.username, username);
        }
    }
}
