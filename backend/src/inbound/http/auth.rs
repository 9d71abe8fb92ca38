//! Bearer-token authentication extractor.
//!
//! Handlers that take [`AuthenticatedUser`] only run once the
//! `Authorization: Bearer <token>` header resolves to a live session; any
//! other request is answered with `401`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionToken, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// User resolved from the request's bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Identifier of the authenticated caller.
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<SessionToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized("malformed authorization header"));
    }
    SessionToken::from_presented(token).ok_or_else(|| Error::unauthorized("missing bearer token"))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = token?;
            state.authenticator.authenticate(&token).await.map(Self)
        })
    }
}
