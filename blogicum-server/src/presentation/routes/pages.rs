use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::pages::{category_posts, index, profile};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/category/{slug}", get(category_posts))
        .route("/profile/{username}", get(profile))
}
