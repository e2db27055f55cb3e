use axum::Router;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    add_comment, delete_comment, delete_comment_form, edit_comment, edit_comment_form,
};
use crate::presentation::handlers::posts::{
    create_post, delete_post, delete_post_form, edit_post, edit_post_form, post_detail,
};

pub(crate) fn router() -> Router<AppState> {
    let posts = Router::new()
        .route("/posts/create", post(create_post))
        .route("/posts/{post_id}", get(post_detail))
        .route("/posts/{post_id}/edit", get(edit_post_form).post(edit_post))
        .route(
            "/posts/{post_id}/delete",
            get(delete_post_form).post(delete_post),
        );

    let comments = Router::new()
        .route("/posts/{post_id}/comment", post(add_comment))
        .route(
            "/posts/{post_id}/edit_comment/{comment_id}",
            get(edit_comment_form).post(edit_comment),
        )
        .route(
            "/posts/{post_id}/delete_comment/{comment_id}",
            get(delete_comment_form).post(delete_comment),
        );

    posts.merge(comments)
}
