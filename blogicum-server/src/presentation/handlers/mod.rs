use axum::{
    extract::{FromRequestParts, Path, rejection::JsonRejection},
    response::{IntoResponse, Redirect, Response},
};

use crate::application::authorship::Access;
use crate::application::navigation::Destination;
use crate::presentation::app_error::{AppError, AppResult};

pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod pages;
pub(crate) mod posts;

/// Numeric path parameters. Values that do not parse are a 404, like a
/// missing row.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub(crate) struct ResourcePath<T>(pub(crate) T);

/// 303 to a named page.
pub(crate) fn see_other(destination: &Destination) -> Response {
    Redirect::to(&destination.path()).into_response()
}

/// Outcome of a guarded mutation whose body could not be read: the author
/// learns about the bad payload, anyone else is still sent to the detail page.
pub(crate) fn reject_after_guard<T>(access: Access<T>, rejection: JsonRejection) -> AppResult<Response> {
    match access {
        Access::Granted(_) => Err(rejection.into()),
        Access::Redirect(destination) => Ok(see_other(&destination)),
    }
}
