use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::application::navigation::Destination;
use crate::domain::user::Actor;
use crate::presentation::AppState;

/// Resolves the session token, if any, and stores the `Actor` in the request
/// extensions. Never rejects: a missing or bad token means an anonymous request.
pub(crate) async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).or_else(|| {
        jar.get(&state.session.cookie_name)
            .map(|cookie| cookie.value().to_string())
    });

    if let Some(token) = token
        && let Some(actor) = state.auth_service.resolve_session(&token)
    {
        request.extensions_mut().insert(actor);
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.to_string())
}

/// The signed-in user, or `None` for anonymous requests.
#[derive(Debug, Clone)]
pub(crate) struct Viewer(pub(crate) Option<Actor>);

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<Actor>().cloned()))
    }
}

/// The signed-in user. Anonymous requests are redirected to the login page
/// with the requested path kept in `next`.
#[derive(Debug, Clone)]
pub(crate) struct LoginRequired(pub(crate) Actor);

impl<S> FromRequestParts<S> for LoginRequired
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(actor) = parts.extensions.get::<Actor>() {
            return Ok(LoginRequired(actor.clone()));
        }

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);
        let next = uri
            .path_and_query()
            .map(|path| path.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Err(Redirect::to(&Destination::Login { next }.path()))
    }
}
