//! Request extractors for authenticated handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! token checks and profile resolution here. [`AuthContext`] verifies the
//! bearer token synchronously; [`ProfileContext`] additionally resolves the
//! caller's profile id so resume handlers never repeat the lookup.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

/// Header carrying the signed bearer token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

fn authenticate(req: &HttpRequest) -> Result<Principal, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let token = req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    state.verifier.verify(token)
}

/// Authenticated caller identity, extracted from the `x-auth-token` header.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(|principal| Self { principal }))
    }
}

/// Authenticated caller plus their resolved profile id.
///
/// Extraction fails with `400 Profile not found` when the caller has not
/// created a profile yet.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub principal: Principal,
    pub profile_id: Uuid,
}

impl FromRequest for ProfileContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth = authenticate(req);
        let profiles = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| Arc::clone(&state.profiles));
        Box::pin(async move {
            let principal = auth?;
            let profiles =
                profiles.ok_or_else(|| Error::internal("HTTP state not configured"))?;
            let profile_id = profiles.resolve_profile_id(&principal.user_id).await?;
            Ok(Self {
                principal,
                profile_id,
            })
        })
    }
}
