// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{AuthResponse, Claims, LoginUserPayload, User, UserRole},
        rbac::Permission,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    company_domain: String,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        company_domain: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            company_domain,
            session_ttl,
        }
    }

    /// Login corporativo: só e-mails do domínio da empresa. No primeiro acesso o
    /// usuário é criado como `viewer`, apenas com acesso ao painel.
    pub async fn login_user(&self, payload: &LoginUserPayload) -> Result<AuthResponse, AppError> {
        let email = payload.email.trim().to_lowercase();
        if !email_domain_allowed(&email, &self.company_domain) {
            tracing::warn!(%email, "Login recusado: domínio não permitido");
            return Err(AppError::EmailDomainNotAllowed);
        }

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                let defaults = vec![Permission::DashboardView.slug().to_string()];
                let user = self
                    .user_repo
                    .create_user(&email, payload.name.trim(), UserRole::Viewer, &defaults)
                    .await?;
                tracing::info!(user_id = %user.id, "👤 Novo usuário criado no primeiro login");
                user
            }
        };

        let token = self.create_token(user.id)?;
        Ok(AuthResponse { user, token })
    }

    /// Decodifica o token e carrega o usuário atualizado do banco.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(token, &self.jwt_secret)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        create_token(user_id, &self.jwt_secret, self.session_ttl)
    }
}

pub fn email_domain_allowed(email: &str, domain: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(local, d)| !local.is_empty() && d.eq_ignore_ascii_case(domain))
}

fn create_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "segredo-de-teste";

    #[test]
    fn only_company_domain_is_allowed() {
        assert!(email_domain_allowed("joao@empresa.com", "empresa.com"));
        assert!(email_domain_allowed("joao@EMPRESA.com", "empresa.com"));
        assert!(!email_domain_allowed("joao@gmail.com", "empresa.com"));
        assert!(!email_domain_allowed("joao@sub.empresa.com", "empresa.com"));
        assert!(!email_domain_allowed("@empresa.com", "empresa.com"));
        assert!(!email_domain_allowed("empresa.com", "empresa.com"));
    }

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, SECRET, Duration::hours(24)).unwrap();
        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = create_token(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();
        assert!(matches!(
            decode_claims(&token, "outro-segredo"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = create_token(Uuid::new_v4(), SECRET, Duration::hours(-2)).unwrap();
        assert!(matches!(decode_claims(&token, SECRET), Err(AppError::InvalidToken)));
    }
}
