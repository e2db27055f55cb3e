use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{
    AuthResponseDto, LoginDto, LoginFormDto, RegisterDto, UserDto,
};
use crate::presentation::handlers::comments::{CommentDto, CommentFormDto};
use crate::presentation::handlers::pages::{CategoryDto, CategoryPageDto, ProfileDto};
use crate::presentation::handlers::posts::{
    CategorySummaryDto, PageMetaDto, PostDetailDto, PostDto, PostFormDto, PostPageDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login_form,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::pages::index,
        crate::presentation::handlers::pages::category_posts,
        crate::presentation::handlers::pages::profile,
        crate::presentation::handlers::posts::post_detail,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::edit_post_form,
        crate::presentation::handlers::posts::edit_post,
        crate::presentation::handlers::posts::delete_post_form,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::comments::add_comment,
        crate::presentation::handlers::comments::edit_comment_form,
        crate::presentation::handlers::comments::edit_comment,
        crate::presentation::handlers::comments::delete_comment_form,
        crate::presentation::handlers::comments::delete_comment
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            LoginFormDto,
            AuthResponseDto,
            UserDto,
            PostFormDto,
            PostDto,
            CategorySummaryDto,
            PageMetaDto,
            PostPageDto,
            PostDetailDto,
            CommentFormDto,
            CommentDto,
            CategoryDto,
            CategoryPageDto,
            ProfileDto
        )
    ),
    tags(
        (name = "auth", description = "Sign up, sign in and sign out"),
        (name = "pages", description = "Post listings"),
        (name = "posts", description = "Post detail and authoring"),
        (name = "comments", description = "Comments on posts")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        // the cookie name is configurable; this is its default
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("blogicum_session"))),
        );
        openapi.components = Some(components);
    }
}
