use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::see_other;
use crate::application::auth_service::Session;
use crate::application::navigation::{Destination, is_safe_next};
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::presentation::app_error::AppResult;
use crate::presentation::{AppState, SessionConfig};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct NextQuery {
    /// Local path to continue to after signing in.
    pub(crate) next: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) expires_in: i64,
    pub(crate) user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LoginFormDto {
    pub(crate) fields: Vec<String>,
    pub(crate) next: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .build()
}

fn auth_response(state: &AppState, session: Session) -> AuthResponseDto {
    AuthResponseDto {
        access_token: session.access_token,
        expires_in: state.auth_service.session_ttl_seconds(),
        user: session.user.into(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/registration",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        email: dto.email,
        password: dto.password,
    };

    let session = state.auth_service.register(req).await?;
    let jar = jar.add(session_cookie(&state.session, session.access_token.clone()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(auth_response(&state, session)),
    ))
}

#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    params(NextQuery),
    responses(
        (status = 200, description = "Login form", body = LoginFormDto)
    )
)]
pub(crate) async fn login_form(Query(query): Query<NextQuery>) -> Json<LoginFormDto> {
    Json(LoginFormDto {
        fields: vec!["username".to_string(), "password".to_string()],
        next: query.next.filter(|next| is_safe_next(next)),
    })
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    params(NextQuery),
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 303, description = "Login successful, continuing to `next`"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
    Json(dto): Json<LoginDto>,
) -> AppResult<Response> {
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    let session = state.auth_service.login(req).await?;
    let jar = jar.add(session_cookie(&state.session, session.access_token.clone()));

    match query.next.filter(|next| is_safe_next(next)) {
        Some(next) => Ok((jar, Redirect::to(&next)).into_response()),
        None => Ok((jar, Json(auth_response(&state, session))).into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 303, description = "Session cleared, redirecting to the index")
    )
)]
pub(crate) async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build((state.session.cookie_name.clone(), "")).path("/"));
    (jar, see_other(&Destination::Index)).into_response()
}
