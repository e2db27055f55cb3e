use sqlx::PgPool;
use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::data::repositories::postgres::category_repository::PostgresCategoryRepository;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::settings::Settings;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type PostgresBlogService =
    BlogService<PostgresPostRepository, PostgresCommentRepository, PostgresCategoryRepository>;

/// How the session token travels in a cookie.
#[derive(Debug, Clone)]
pub(crate) struct SessionConfig {
    pub(crate) cookie_name: String,
    pub(crate) secure: bool,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) blog_service: Arc<PostgresBlogService>,
    pub(crate) session: SessionConfig,
}

impl AppState {
    pub(crate) fn new(pool: PgPool, settings: &Settings) -> Self {
        let jwt = JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds);
        let auth_service = AuthService::new(PostgresUserRepository::new(pool.clone()), jwt);
        let blog_service = BlogService::new(
            PostgresPostRepository::new(pool.clone()),
            PostgresCommentRepository::new(pool.clone()),
            PostgresCategoryRepository::new(pool),
        );

        Self {
            auth_service: Arc::new(auth_service),
            blog_service: Arc::new(blog_service),
            session: SessionConfig {
                cookie_name: settings.session_cookie_name.clone(),
                secure: settings.session_cookie_secure,
            },
        }
    }
}
