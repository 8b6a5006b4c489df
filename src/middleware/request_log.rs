// src/middleware/request_log.rs

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::{convert::Infallible, net::SocketAddr, time::Instant};
use uuid::Uuid;

use crate::{
    common::error::ErrorReport, config::AppState, middleware::auth::AuthenticatedUser,
    models::logs::LogContext,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Dados da requisição que acompanham os registros de log
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl RequestContext {
    pub fn log_context(&self) -> LogContext {
        LogContext {
            request_id: self.request_id.clone(),
            user_agent: self.user_agent.clone(),
            ip_address: self.ip_address.clone(),
            ..Default::default()
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

pub async fn request_logger(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ctx = RequestContext {
        request_id: Some(request_id.clone()),
        user_agent: request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ip_address: client_ip(request.headers(), peer),
    };
    request.extensions_mut().insert(ctx.clone());

    app_state
        .log_service
        .log_incoming(&method, &path, ctx.log_context());

    let mut response = next.run(request).await;

    let mut log_ctx = ctx.log_context();
    log_ctx.user_id = response
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|AuthenticatedUser(user)| user.id);

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        app_state.log_service.log_error(report, log_ctx.clone());
    }

    app_state
        .log_service
        .log_request(
            &method,
            &path,
            response.status().as_u16(),
            started.elapsed(),
            log_ctx,
        );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_for_wins_over_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 172.16.0.1"));
        let peer: SocketAddr = "192.168.1.2:5000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("10.0.0.7"));
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)).as_deref(), Some("192.168.1.2"));
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }
}
