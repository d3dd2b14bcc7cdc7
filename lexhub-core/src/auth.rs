//! Identity context: resolves an opaque credential into a user id and role.
//! Token issuance and password handling live outside the core.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::policy::Role;

#[derive(Deserialize, Clone, Debug)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<Claims>;
}

pub struct Hs256Verifier {
    key: DecodingKey,
}

impl Hs256Verifier {
    pub fn new(secret: String) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[async_trait]
impl TokenVerifier for Hs256Verifier {
    async fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        decode::<Claims>(token, &self.key, &validation)
            .ok()
            .map(|d| d.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: Uuid,
        role: &'static str,
    }

    #[tokio::test]
    async fn verifies_role_carrying_token() {
        let secret = "test-secret".to_string();
        let user = Uuid::new_v4();
        let token = encode(
            &Header::default(),
            &TestClaims {
                sub: user,
                role: "lawyer",
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let verifier = Hs256Verifier::new(secret);
        let claims = verifier.verify(&token).await.unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.role, Role::Lawyer);
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let verifier = Hs256Verifier::new("test-secret".to_string());
        assert!(verifier.verify("not-a-token").await.is_none());
    }
}
