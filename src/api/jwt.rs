use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Uses OnceLock for thread-safe lazy initialization.
/// The service is initialized once on first use and reused for all subsequent requests.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Identity token claims, issued by the external identity provider
///
/// `sub` 即用户 id；email 与 name 可选，存在时用来刷新本地用户档案。
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// JWT Service for validating bearer tokens
///
/// Tokens are issued elsewhere (shared-secret HS256); this service only
/// verifies signature and expiry.
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let secret = &crate::config::get_config().auth.jwt_secret;
        if secret.is_empty() {
            tracing::warn!("JWT secret not configured, all authenticated requests will fail");
        }
        Self::new(secret)
    }

    /// Validate an identity token and return its claims
    pub fn validate_token(
        &self,
        token: &str,
    ) -> Result<IdentityClaims, jsonwebtoken::errors::Error> {
        let token_data =
            decode::<IdentityClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn mint(claims: &IdentityClaims, secret: &str) -> String {
        let key = EncodingKey::from_secret(secret.as_bytes());
        encode(&Header::default(), claims, &key).unwrap()
    }

    fn fresh_claims(sub: &str) -> IdentityClaims {
        let now = chrono::Utc::now();
        IdentityClaims {
            sub: sub.to_string(),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada".to_string()),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
        }
    }

    #[test]
    fn test_validate_token() {
        let service = JwtService::new(SECRET);
        let token = mint(&fresh_claims("user-1"), SECRET);
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_optional_claims_absent() {
        let service = JwtService::new(SECRET);
        let now = chrono::Utc::now();
        let claims = IdentityClaims {
            sub: "user-2".to_string(),
            email: None,
            name: None,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
        };
        let token = mint(&claims, SECRET);
        let parsed = service.validate_token(&token).unwrap();

        assert_eq!(parsed.sub, "user-2");
        assert!(parsed.email.is_none());
        assert!(parsed.name.is_none());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = JwtService::new(SECRET);
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new(SECRET);
        let token = mint(&fresh_claims("user-1"), "different_secret_key_32_bytes!!");
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET);
        let now = chrono::Utc::now();
        let claims = IdentityClaims {
            sub: "user-1".to_string(),
            email: None,
            name: None,
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(), // 1 小时前过期
        };
        let token = mint(&claims, SECRET);

        let result = service.validate_token(&token);
        assert!(
            result.is_err(),
            "Expected expired token to be rejected, but got: {:?}",
            result
        );
    }
}
