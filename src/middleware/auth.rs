// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::AppError, config::AppState, middleware::request_log::RequestContext,
    models::auth::User,
};

// Usuário da requisição. Recarregado do banco a cada chamada, então mudanças de
// permissão valem já na próxima requisição.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthenticated)?;

    let user = match app_state.auth_service.validate_token(bearer.token()).await {
        Ok(user) => user,
        Err(AppError::InvalidToken) => {
            let ctx = request
                .extensions()
                .get::<RequestContext>()
                .map(RequestContext::log_context)
                .unwrap_or_default();
            app_state
                .log_service
                .warn("Token de sessão inválido ou expirado", ctx);
            return Err(AppError::InvalidToken);
        }
        Err(e) => return Err(e),
    };
    let authenticated = AuthenticatedUser(user);

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(authenticated.clone());
    let mut response = next.run(request).await;

    // ... e na resposta, para o log de requisições saber quem chamou
    response.extensions_mut().insert(authenticated);
    Ok(response)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
