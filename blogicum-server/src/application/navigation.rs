/// Named pages a handler can send the client to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Destination {
    Index,
    PostDetail { post_id: i64 },
    Profile { username: String },
    Login { next: String },
}

impl Destination {
    pub(crate) fn path(&self) -> String {
        match self {
            Destination::Index => "/".to_string(),
            Destination::PostDetail { post_id } => format!("/posts/{post_id}"),
            Destination::Profile { username } => {
                format!("/profile/{}", urlencoding::encode(username))
            }
            Destination::Login { next } => {
                format!("/auth/login?next={}", urlencoding::encode(next))
            }
        }
    }
}

/// Where a client may be sent after login. Only local absolute paths qualify;
/// `//host` and `/\host` are protocol-relative in browsers.
pub(crate) fn is_safe_next(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.chars().any(char::is_control)
}
