use tracing::info;

use super::navigation::Destination;
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::user::Actor;

/// A resource that only its author may change.
pub(crate) trait Authored {
    fn author_id(&self) -> i64;

    /// Read-only page a non-author is sent to instead.
    fn detail(&self) -> Destination;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }

    fn detail(&self) -> Destination {
        Destination::PostDetail { post_id: self.id }
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }

    fn detail(&self) -> Destination {
        Destination::PostDetail {
            post_id: self.post_id,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Access<T> {
    Granted(T),
    /// Soft deny: the requester is not the author and goes to `Destination`.
    Redirect(Destination),
}

/// Lets the author through; anyone else is redirected to the detail page
/// rather than refused.
pub(crate) fn authorize<T: Authored>(resource: T, actor: &Actor) -> Access<T> {
    if resource.author_id() == actor.user_id {
        return Access::Granted(resource);
    }

    let destination = resource.detail();
    info!(
        actor_id = actor.user_id,
        author_id = resource.author_id(),
        redirect_to = %destination.path(),
        "non-author on a guarded endpoint, redirecting"
    );
    Access::Redirect(destination)
}
