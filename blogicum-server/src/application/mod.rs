pub(crate) mod auth_service;
pub(crate) mod authorship;
pub(crate) mod blog_service;
pub(crate) mod navigation;
