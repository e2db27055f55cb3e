use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::posts::PostPageDto;
use crate::domain::category::Category;
use crate::domain::pagination::PageRequest;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::Viewer;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PageQuery {
    /// 1-based page number, or `last`.
    pub(crate) page: Option<String>,
}

impl PageQuery {
    fn request(&self) -> AppResult<PageRequest> {
        Ok(PageRequest::parse(self.page.as_deref())?)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) slug: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            title: category.title,
            description: category.description,
            slug: category.slug,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryPageDto {
    pub(crate) category: CategoryDto,
    pub(crate) posts: PostPageDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    pub(crate) username: String,
    pub(crate) date_joined: DateTime<Utc>,
    pub(crate) posts: PostPageDto,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    params(PageQuery),
    responses(
        (status = 200, description = "Published posts, newest first", body = PostPageDto),
        (status = 404, description = "Page out of range"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostPageDto>> {
    let page = state
        .blog_service
        .index(query.request()?, Utc::now())
        .await?;

    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/category/{slug}",
    tag = "pages",
    params(
        ("slug" = String, Path, description = "Category slug"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Published posts of the category", body = CategoryPageDto),
        (status = 404, description = "Category missing or unpublished, or page out of range"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CategoryPageDto>> {
    let result = state
        .blog_service
        .category_page(&slug, query.request()?, Utc::now())
        .await?;

    Ok(Json(CategoryPageDto {
        category: result.category.into(),
        posts: result.posts.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/profile/{username}",
    tag = "pages",
    params(
        ("username" = String, Path, description = "Profile owner"),
        PageQuery
    ),
    responses(
        (status = 200, description = "The user's posts; the owner also sees unpublished ones", body = ProfileDto),
        (status = 404, description = "User not found, or page out of range"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn profile(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProfileDto>> {
    let user = state.auth_service.find_user(&username).await?;
    let posts = state
        .blog_service
        .profile_posts(&user, viewer.as_ref(), query.request()?, Utc::now())
        .await?;

    Ok(Json(ProfileDto {
        username: user.username,
        date_joined: user.created_at,
        posts: posts.into(),
    }))
}
