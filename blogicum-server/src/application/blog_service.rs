use chrono::{DateTime, Utc};
use tracing::info;

use super::authorship::{Access, authorize};
use super::navigation::Destination;
use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::category::Category;
use crate::domain::comment::{Comment, CommentForm};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, PageRequest, PageWindow};
use crate::domain::post::{Post, PostForm};
use crate::domain::user::{Actor, User};
use crate::domain::visibility::PostQuery;

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryPage {
    pub(crate) category: Category,
    pub(crate) posts: Page<Post>,
}

/// How a mutating request ended. Both variants are answered with a redirect;
/// they differ only in whether anything was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MutationOutcome {
    Completed(Destination),
    Redirected(Destination),
}

impl MutationOutcome {
    pub(crate) fn destination(&self) -> &Destination {
        match self {
            MutationOutcome::Completed(destination) | MutationOutcome::Redirected(destination) => {
                destination
            }
        }
    }
}

pub(crate) struct BlogService<P, M, C>
where
    P: PostRepository,
    M: CommentRepository,
    C: CategoryRepository,
{
    posts: P,
    comments: M,
    categories: C,
}

impl<P, M, C> BlogService<P, M, C>
where
    P: PostRepository,
    M: CommentRepository,
    C: CategoryRepository,
{
    pub(crate) fn new(posts: P, comments: M, categories: C) -> Self {
        Self {
            posts,
            comments,
            categories,
        }
    }

    pub(crate) async fn index(
        &self,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<Page<Post>, DomainError> {
        self.paginate(PostQuery::visible(now), page).await
    }

    pub(crate) async fn category_page(
        &self,
        slug: &str,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<CategoryPage, DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|category| category.is_published)
            .ok_or_else(|| DomainError::NotFound(format!("category: {slug}")))?;

        let posts = self
            .paginate(PostQuery::visible(now).in_category(category.id), page)
            .await?;

        Ok(CategoryPage { category, posts })
    }

    /// Authors see all of their own posts on their profile; everyone else
    /// sees only the publicly visible ones.
    pub(crate) async fn profile_posts(
        &self,
        profile: &User,
        viewer: Option<&Actor>,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<Page<Post>, DomainError> {
        let query = match viewer {
            Some(viewer) if viewer.user_id == profile.id => PostQuery::authored_by(profile.id),
            _ => PostQuery::visible(now).by_author(profile.id),
        };
        self.paginate(query, page).await
    }

    pub(crate) async fn post_detail(
        &self,
        post_id: i64,
        viewer: Option<&Actor>,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.viewable_post(post_id, viewer, now).await?;
        let comments = self.comments.list_comments(post.id).await?;
        Ok(PostDetail { post, comments })
    }

    pub(crate) async fn create_post(
        &self,
        actor: &Actor,
        form: PostForm,
        now: DateTime<Utc>,
    ) -> Result<MutationOutcome, DomainError> {
        let form = form.validate()?;

        let new_post = NewPost {
            title: form.title,
            text: form.text,
            pub_date: form.pub_date.unwrap_or(now),
            is_published: form.is_published,
            author_id: actor.user_id,
            category_id: form.category_id,
            location_id: form.location_id,
        };
        let post = self.posts.create_post(new_post).await?;
        info!(post_id = post.id, author_id = actor.user_id, "post created");

        Ok(MutationOutcome::Completed(Destination::Profile {
            username: actor.username.clone(),
        }))
    }

    /// Authorship check shared by the edit and delete pages of a post.
    pub(crate) async fn guard_post(
        &self,
        actor: &Actor,
        post_id: i64,
    ) -> Result<Access<Post>, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;
        Ok(authorize(post, actor))
    }

    pub(crate) async fn edit_post(
        &self,
        actor: &Actor,
        post_id: i64,
        form: PostForm,
    ) -> Result<MutationOutcome, DomainError> {
        let post = match self.guard_post(actor, post_id).await? {
            Access::Granted(post) => post,
            Access::Redirect(destination) => return Ok(MutationOutcome::Redirected(destination)),
        };
        let form = form.validate()?;

        let patch = PostPatch {
            title: form.title,
            text: form.text,
            pub_date: form.pub_date.unwrap_or(post.pub_date),
            is_published: form.is_published,
            category_id: form.category_id,
            location_id: form.location_id,
        };
        self.posts
            .update_post_owned(post.id, actor.user_id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        Ok(MutationOutcome::Completed(Destination::PostDetail { post_id }))
    }

    pub(crate) async fn delete_post(
        &self,
        actor: &Actor,
        post_id: i64,
    ) -> Result<MutationOutcome, DomainError> {
        let post = match self.guard_post(actor, post_id).await? {
            Access::Granted(post) => post,
            Access::Redirect(destination) => return Ok(MutationOutcome::Redirected(destination)),
        };

        if !self.posts.delete_post_owned(post.id, actor.user_id).await? {
            return Err(DomainError::not_found("post", post_id));
        }
        info!(post_id, author_id = actor.user_id, "post deleted");

        Ok(MutationOutcome::Completed(Destination::Profile {
            username: actor.username.clone(),
        }))
    }

    pub(crate) async fn add_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        form: CommentForm,
        now: DateTime<Utc>,
    ) -> Result<MutationOutcome, DomainError> {
        let post = self.viewable_post(post_id, Some(actor), now).await?;
        let form = form.validate()?;

        self.comments
            .create_comment(NewComment {
                text: form.text,
                post_id: post.id,
                author_id: actor.user_id,
            })
            .await?;

        Ok(MutationOutcome::Completed(Destination::PostDetail { post_id }))
    }

    /// Authorship check shared by the edit and delete pages of a comment.
    pub(crate) async fn guard_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Access<Comment>, DomainError> {
        let comment = self
            .comments
            .get_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;
        Ok(authorize(comment, actor))
    }

    pub(crate) async fn edit_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        comment_id: i64,
        form: CommentForm,
    ) -> Result<MutationOutcome, DomainError> {
        let comment = match self.guard_comment(actor, post_id, comment_id).await? {
            Access::Granted(comment) => comment,
            Access::Redirect(destination) => return Ok(MutationOutcome::Redirected(destination)),
        };
        let form = form.validate()?;

        self.comments
            .update_comment_owned(comment.id, actor.user_id, form.text)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        Ok(MutationOutcome::Completed(Destination::PostDetail { post_id }))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor: &Actor,
        post_id: i64,
        comment_id: i64,
    ) -> Result<MutationOutcome, DomainError> {
        let comment = match self.guard_comment(actor, post_id, comment_id).await? {
            Access::Granted(comment) => comment,
            Access::Redirect(destination) => return Ok(MutationOutcome::Redirected(destination)),
        };

        if !self
            .comments
            .delete_comment_owned(comment.id, actor.user_id)
            .await?
        {
            return Err(DomainError::not_found("comment", comment_id));
        }

        Ok(MutationOutcome::Completed(Destination::PostDetail { post_id }))
    }

    async fn paginate(&self, query: PostQuery, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let total = self.posts.count_posts(query).await?;
        let window = PageWindow::resolve(page, total)?;
        let posts = self.posts.list_posts(query, window.into()).await?;
        Ok(window.into_page(posts))
    }

    /// The author may open their own post in any state; anyone else only a
    /// publicly visible one.
    async fn viewable_post(
        &self,
        post_id: i64,
        viewer: Option<&Actor>,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let is_author = viewer.is_some_and(|viewer| post.is_authored_by(viewer.user_id));
        if is_author || PostQuery::visible(now).matches(&post) {
            Ok(post)
        } else {
            Err(DomainError::not_found("post", post_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use super::{BlogService, MutationOutcome};
    use crate::application::authorship::Access;
    use crate::application::navigation::Destination;
    use crate::data::category_repository::CategoryRepository;
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
    use crate::domain::category::Category;
    use crate::domain::comment::{Comment, CommentForm};
    use crate::domain::error::DomainError;
    use crate::domain::pagination::PageRequest;
    use crate::domain::post::{CategoryRef, Post, PostForm};
    use crate::domain::user::{Actor, User};
    use crate::domain::visibility::PostQuery;

    #[derive(Debug, Clone)]
    struct StoredPost {
        id: i64,
        title: String,
        text: String,
        pub_date: DateTime<Utc>,
        is_published: bool,
        author_id: i64,
        category_id: Option<i64>,
    }

    #[derive(Default)]
    struct Tables {
        categories: Vec<Category>,
        posts: Vec<StoredPost>,
        comments: Vec<Comment>,
        created_posts: Vec<NewPost>,
    }

    /// In-memory store evaluating `PostQuery` the way the SQL does: visibility
    /// predicate, one row per post with its comment count, newest first.
    #[derive(Clone, Default)]
    struct FakeStore {
        tables: Arc<Mutex<Tables>>,
    }

    impl FakeStore {
        fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
            f(&mut self.tables.lock().expect("tables mutex poisoned"))
        }

        fn add_category(&self, id: i64, slug: &str, is_published: bool) {
            self.with(|t| {
                t.categories.push(Category {
                    id,
                    title: format!("Category {id}"),
                    description: "about".to_string(),
                    slug: slug.to_string(),
                    is_published,
                    created_at: Utc::now(),
                })
            });
        }

        fn add_post(
            &self,
            id: i64,
            author_id: i64,
            category_id: Option<i64>,
            pub_date: DateTime<Utc>,
            is_published: bool,
        ) {
            self.with(|t| {
                t.posts.push(StoredPost {
                    id,
                    title: format!("post {id}"),
                    text: "body".to_string(),
                    pub_date,
                    is_published,
                    author_id,
                    category_id,
                })
            });
        }

        fn add_comment(&self, id: i64, post_id: i64, author_id: i64) {
            self.with(|t| {
                t.comments.push(Comment {
                    id,
                    text: format!("comment {id}"),
                    post_id,
                    author_id,
                    author_username: format!("user{author_id}"),
                    created_at: Utc::now(),
                })
            });
        }

        fn stored_post(&self, id: i64) -> Option<StoredPost> {
            self.with(|t| t.posts.iter().find(|p| p.id == id).cloned())
        }

        fn stored_comment(&self, id: i64) -> Option<Comment> {
            self.with(|t| t.comments.iter().find(|c| c.id == id).cloned())
        }

        fn hydrate(tables: &Tables, stored: &StoredPost) -> Post {
            let category = stored.category_id.and_then(|id| {
                tables
                    .categories
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| CategoryRef {
                        id: c.id,
                        title: c.title.clone(),
                        slug: c.slug.clone(),
                        is_published: c.is_published,
                    })
            });
            let comment_count = tables
                .comments
                .iter()
                .filter(|c| c.post_id == stored.id)
                .count() as i64;

            Post {
                id: stored.id,
                title: stored.title.clone(),
                text: stored.text.clone(),
                pub_date: stored.pub_date,
                is_published: stored.is_published,
                author_id: stored.author_id,
                author_username: format!("user{}", stored.author_id),
                category,
                location: None,
                comment_count,
                created_at: stored.pub_date,
            }
        }

        fn select(&self, query: PostQuery) -> Vec<Post> {
            self.with(|t| {
                let t = &*t;
                let mut posts: Vec<Post> = t
                    .posts
                    .iter()
                    .map(|stored| Self::hydrate(t, stored))
                    .filter(|post| query.matches(post))
                    .collect();
                posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
                posts
            })
        }
    }

    #[async_trait]
    impl PostRepository for FakeStore {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            let id = self.with(|t| {
                let id = t.posts.len() as i64 + 100;
                t.created_posts.push(input.clone());
                t.posts.push(StoredPost {
                    id,
                    title: input.title,
                    text: input.text,
                    pub_date: input.pub_date,
                    is_published: input.is_published,
                    author_id: input.author_id,
                    category_id: input.category_id,
                });
                id
            });
            self.get_post(id)
                .await?
                .ok_or_else(|| DomainError::Unexpected("insert lost".to_string()))
        }

        async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self.with(|t| {
                let t = &*t;
                t.posts
                    .iter()
                    .find(|p| p.id == id)
                    .map(|stored| Self::hydrate(t, stored))
            }))
        }

        async fn update_post_owned(
            &self,
            post_id: i64,
            owner_id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            let updated = self.with(|t| {
                let stored = t
                    .posts
                    .iter_mut()
                    .find(|p| p.id == post_id && p.author_id == owner_id)?;
                stored.title = patch.title;
                stored.text = patch.text;
                stored.pub_date = patch.pub_date;
                stored.is_published = patch.is_published;
                stored.category_id = patch.category_id;
                Some(stored.id)
            });
            match updated {
                Some(id) => self.get_post(id).await,
                None => Ok(None),
            }
        }

        async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
            Ok(self.with(|t| {
                let before = t.posts.len();
                t.posts
                    .retain(|p| !(p.id == post_id && p.author_id == owner_id));
                let deleted = t.posts.len() < before;
                if deleted {
                    t.comments.retain(|c| c.post_id != post_id);
                }
                deleted
            }))
        }

        async fn list_posts(
            &self,
            query: PostQuery,
            pagination: Pagination,
        ) -> Result<Vec<Post>, DomainError> {
            Ok(self
                .select(query)
                .into_iter()
                .skip(pagination.offset as usize)
                .take(pagination.limit as usize)
                .collect())
        }

        async fn count_posts(&self, query: PostQuery) -> Result<i64, DomainError> {
            Ok(self.select(query).len() as i64)
        }
    }

    #[async_trait]
    impl CommentRepository for FakeStore {
        async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
            Ok(self.with(|t| {
                let comment = Comment {
                    id: t.comments.len() as i64 + 500,
                    text: input.text,
                    post_id: input.post_id,
                    author_id: input.author_id,
                    author_username: format!("user{}", input.author_id),
                    created_at: Utc::now(),
                };
                t.comments.push(comment.clone());
                comment
            }))
        }

        async fn get_comment(
            &self,
            post_id: i64,
            comment_id: i64,
        ) -> Result<Option<Comment>, DomainError> {
            Ok(self.with(|t| {
                t.comments
                    .iter()
                    .find(|c| c.id == comment_id && c.post_id == post_id)
                    .cloned()
            }))
        }

        async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
            Ok(self.with(|t| {
                t.comments
                    .iter()
                    .filter(|c| c.post_id == post_id)
                    .cloned()
                    .collect()
            }))
        }

        async fn update_comment_owned(
            &self,
            comment_id: i64,
            owner_id: i64,
            text: String,
        ) -> Result<Option<Comment>, DomainError> {
            Ok(self.with(|t| {
                let comment = t
                    .comments
                    .iter_mut()
                    .find(|c| c.id == comment_id && c.author_id == owner_id)?;
                comment.text = text;
                Some(comment.clone())
            }))
        }

        async fn delete_comment_owned(
            &self,
            comment_id: i64,
            owner_id: i64,
        ) -> Result<bool, DomainError> {
            Ok(self.with(|t| {
                let before = t.comments.len();
                t.comments
                    .retain(|c| !(c.id == comment_id && c.author_id == owner_id));
                t.comments.len() < before
            }))
        }
    }

    #[async_trait]
    impl CategoryRepository for FakeStore {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
            Ok(self.with(|t| t.categories.iter().find(|c| c.slug == slug).cloned()))
        }
    }

    fn service(store: &FakeStore) -> BlogService<FakeStore, FakeStore, FakeStore> {
        BlogService::new(store.clone(), store.clone(), store.clone())
    }

    fn actor(user_id: i64) -> Actor {
        Actor {
            user_id,
            username: format!("user{user_id}"),
        }
    }

    fn profile(user_id: i64) -> User {
        User::new(
            user_id,
            format!("user{user_id}"),
            format!("user{user_id}@example.com"),
            Utc::now(),
        )
        .expect("sample user must be valid")
    }

    fn post_form(title: &str) -> PostForm {
        PostForm {
            title: title.to_string(),
            text: "new body".to_string(),
            pub_date: None,
            is_published: true,
            category_id: Some(1),
            location_id: None,
        }
    }

    fn first_page() -> PageRequest {
        PageRequest::Number(1)
    }

    #[tokio::test]
    async fn index_lists_only_visible_posts() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_category(2, "hidden", false);
        store.add_post(1, 1, Some(1), now - Duration::hours(1), true);
        store.add_post(2, 1, Some(1), now + Duration::hours(1), true);
        store.add_post(3, 1, Some(2), now - Duration::hours(1), true);
        store.add_post(4, 1, Some(1), now - Duration::hours(1), false);
        store.add_post(5, 1, None, now - Duration::hours(1), true);

        let page = service(&store)
            .index(first_page(), now)
            .await
            .expect("index must load");

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn index_orders_newest_first_and_breaks_ties_by_id() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        let same = now - Duration::hours(2);
        store.add_post(1, 1, Some(1), now - Duration::hours(3), true);
        store.add_post(2, 1, Some(1), same, true);
        store.add_post(3, 1, Some(1), same, true);
        store.add_post(4, 1, Some(1), now - Duration::minutes(5), true);

        let page = service(&store)
            .index(first_page(), now)
            .await
            .expect("index must load");

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn comment_counts_are_exact_including_zero() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 1, Some(1), now - Duration::hours(2), true);
        store.add_post(2, 1, Some(1), now - Duration::hours(1), true);
        store.add_comment(10, 1, 2);
        store.add_comment(11, 1, 3);
        store.add_comment(12, 1, 2);

        let page = service(&store)
            .index(first_page(), now)
            .await
            .expect("index must load");

        let counts: Vec<(i64, i64)> = page.items.iter().map(|p| (p.id, p.comment_count)).collect();
        assert_eq!(counts, vec![(2, 0), (1, 3)]);
    }

    #[tokio::test]
    async fn index_pages_hold_ten_posts() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        for id in 1..=23 {
            store.add_post(id, 1, Some(1), now - Duration::minutes(id), true);
        }
        let service = service(&store);

        let first = service.index(first_page(), now).await.expect("page 1");
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.num_pages, 3);
        assert_eq!(first.items[0].id, 1);

        let last = service
            .index(PageRequest::Last, now)
            .await
            .expect("last page");
        assert_eq!(last.number, 3);
        assert_eq!(last.items.len(), 3);

        let err = service
            .index(PageRequest::Number(4), now)
            .await
            .expect_err("page 4 must not exist");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn category_page_narrows_visible_posts() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_category(2, "food", true);
        store.add_post(1, 1, Some(1), now - Duration::hours(1), true);
        store.add_post(2, 1, Some(2), now - Duration::hours(1), true);
        store.add_post(3, 1, Some(1), now + Duration::hours(1), true);

        let page = service(&store)
            .category_page("travel", first_page(), now)
            .await
            .expect("category must load");

        assert_eq!(page.category.slug, "travel");
        let ids: Vec<i64> = page.posts.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn unpublished_or_unknown_category_is_not_found() {
        let store = FakeStore::default();
        store.add_category(2, "hidden", false);
        let service = service(&store);

        for slug in ["hidden", "missing"] {
            let err = service
                .category_page(slug, first_page(), Utc::now())
                .await
                .expect_err("category must be missing");
            assert!(matches!(err, DomainError::NotFound(_)), "{slug}");
        }
    }

    #[tokio::test]
    async fn profile_owner_sees_all_own_posts() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 7, Some(1), now - Duration::hours(1), true);
        store.add_post(2, 7, Some(1), now + Duration::hours(1), true);
        store.add_post(3, 7, None, now - Duration::hours(2), false);
        store.add_post(4, 8, Some(1), now - Duration::hours(1), true);
        let service = service(&store);
        let owner = profile(7);

        let own = service
            .profile_posts(&owner, Some(&actor(7)), first_page(), now)
            .await
            .expect("own profile must load");
        let ids: Vec<i64> = own.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let visitor = service
            .profile_posts(&owner, Some(&actor(8)), first_page(), now)
            .await
            .expect("profile must load");
        let ids: Vec<i64> = visitor.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        let anonymous = service
            .profile_posts(&owner, None, first_page(), now)
            .await
            .expect("profile must load");
        assert_eq!(anonymous.total, 1);
    }

    #[tokio::test]
    async fn hidden_post_detail_is_only_for_its_author() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 7, Some(1), now + Duration::hours(1), true);
        store.add_comment(10, 1, 7);
        let service = service(&store);

        let detail = service
            .post_detail(1, Some(&actor(7)), now)
            .await
            .expect("author must see own post");
        assert_eq!(detail.post.id, 1);
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.post.comment_count, 1);

        for viewer in [Some(actor(8)), None] {
            let err = service
                .post_detail(1, viewer.as_ref(), now)
                .await
                .expect_err("others must not see a scheduled post");
            assert!(matches!(err, DomainError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn create_post_stamps_session_user_as_author() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        let alice = Actor {
            user_id: 3,
            username: "alice".to_string(),
        };

        let outcome = service(&store)
            .create_post(&alice, post_form("  hello  "), now)
            .await
            .expect("create must succeed");

        assert_eq!(
            outcome,
            MutationOutcome::Completed(Destination::Profile {
                username: "alice".to_string()
            })
        );
        let created = store.with(|t| t.created_posts.clone());
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].author_id, 3);
        assert_eq!(created[0].title, "hello");
        assert_eq!(created[0].pub_date, now);
    }

    #[tokio::test]
    async fn create_post_rejects_invalid_form() {
        let store = FakeStore::default();
        let err = service(&store)
            .create_post(&actor(3), post_form("   "), Utc::now())
            .await
            .expect_err("blank title must fail");
        assert!(matches!(err, DomainError::Validation { field: "title", .. }));
        assert!(store.with(|t| t.posts.is_empty()));
    }

    #[tokio::test]
    async fn author_edit_persists_and_keeps_author() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 7, Some(1), now - Duration::hours(1), true);

        let outcome = service(&store)
            .edit_post(&actor(7), 1, post_form("renamed"))
            .await
            .expect("edit must succeed");

        assert_eq!(
            outcome,
            MutationOutcome::Completed(Destination::PostDetail { post_id: 1 })
        );
        let stored = store.stored_post(1).expect("post must remain");
        assert_eq!(stored.title, "renamed");
        assert_eq!(stored.author_id, 7);
        assert_eq!(stored.pub_date, now - Duration::hours(1));
    }

    #[tokio::test]
    async fn non_author_edit_is_redirected_and_changes_nothing() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 7, Some(1), now - Duration::hours(1), true);

        let outcome = service(&store)
            .edit_post(&actor(8), 1, post_form("hijacked"))
            .await
            .expect("soft deny is not an error");

        assert_eq!(
            outcome,
            MutationOutcome::Redirected(Destination::PostDetail { post_id: 1 })
        );
        assert_eq!(store.stored_post(1).expect("post remains").title, "post 1");
    }

    #[tokio::test]
    async fn non_author_is_redirected_before_form_validation() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_post(1, 7, Some(1), now, true);

        let outcome = service(&store)
            .edit_post(&actor(8), 1, post_form(""))
            .await
            .expect("guard runs before validation");
        assert!(matches!(outcome, MutationOutcome::Redirected(_)));
    }

    #[tokio::test]
    async fn editing_missing_post_is_not_found() {
        let store = FakeStore::default();
        let err = service(&store)
            .edit_post(&actor(7), 404, post_form("x"))
            .await
            .expect_err("missing post");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_post_by_author_goes_to_profile() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_post(1, 7, Some(1), now, true);
        store.add_comment(10, 1, 8);

        let outcome = service(&store)
            .delete_post(&actor(7), 1)
            .await
            .expect("delete must succeed");

        assert_eq!(
            outcome.destination(),
            &Destination::Profile {
                username: "user7".to_string()
            }
        );
        assert!(store.stored_post(1).is_none());
        assert!(store.stored_comment(10).is_none());
    }

    #[tokio::test]
    async fn delete_post_by_non_author_is_redirected() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_post(1, 7, Some(1), now, true);

        let outcome = service(&store)
            .delete_post(&actor(8), 1)
            .await
            .expect("soft deny is not an error");

        assert_eq!(
            outcome,
            MutationOutcome::Redirected(Destination::PostDetail { post_id: 1 })
        );
        assert!(store.stored_post(1).is_some());
    }

    #[tokio::test]
    async fn guard_post_reports_access() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_post(1, 7, Some(1), now, true);
        let service = service(&store);

        assert!(matches!(
            service.guard_post(&actor(7), 1).await,
            Ok(Access::Granted(_))
        ));
        assert!(matches!(
            service.guard_post(&actor(8), 1).await,
            Ok(Access::Redirect(Destination::PostDetail { post_id: 1 }))
        ));
        assert!(matches!(
            service.guard_post(&actor(8), 2).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn add_comment_stamps_author_and_returns_to_post() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 7, Some(1), now - Duration::hours(1), true);

        let outcome = service(&store)
            .add_comment(
                &actor(8),
                1,
                CommentForm {
                    text: " first! ".to_string(),
                },
                now,
            )
            .await
            .expect("comment must be added");

        assert_eq!(
            outcome,
            MutationOutcome::Completed(Destination::PostDetail { post_id: 1 })
        );
        let comments = store.with(|t| t.comments.clone());
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_id, 8);
        assert_eq!(comments[0].text, "first!");
    }

    #[tokio::test]
    async fn add_comment_on_hidden_post_is_not_found() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_category(1, "travel", true);
        store.add_post(1, 7, Some(1), now - Duration::hours(1), false);

        let err = service(&store)
            .add_comment(
                &actor(8),
                1,
                CommentForm {
                    text: "hello".to_string(),
                },
                now,
            )
            .await
            .expect_err("hidden post");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn comment_edit_and_delete_follow_authorship() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_post(1, 7, Some(1), now, true);
        store.add_comment(10, 1, 8);
        let service = service(&store);
        let form = || CommentForm {
            text: "edited".to_string(),
        };

        let denied = service
            .edit_comment(&actor(7), 1, 10, form())
            .await
            .expect("soft deny");
        assert_eq!(
            denied,
            MutationOutcome::Redirected(Destination::PostDetail { post_id: 1 })
        );
        assert_eq!(store.stored_comment(10).expect("kept").text, "comment 10");

        let edited = service
            .edit_comment(&actor(8), 1, 10, form())
            .await
            .expect("author edit");
        assert_eq!(
            edited,
            MutationOutcome::Completed(Destination::PostDetail { post_id: 1 })
        );
        assert_eq!(store.stored_comment(10).expect("kept").text, "edited");

        let denied = service
            .delete_comment(&actor(7), 1, 10)
            .await
            .expect("soft deny");
        assert!(matches!(denied, MutationOutcome::Redirected(_)));
        assert!(store.stored_comment(10).is_some());

        let deleted = service
            .delete_comment(&actor(8), 1, 10)
            .await
            .expect("author delete");
        assert!(matches!(deleted, MutationOutcome::Completed(_)));
        assert!(store.stored_comment(10).is_none());
    }

    #[tokio::test]
    async fn comment_under_another_post_is_not_found() {
        let now = Utc::now();
        let store = FakeStore::default();
        store.add_post(1, 7, Some(1), now, true);
        store.add_post(2, 7, Some(1), now, true);
        store.add_comment(10, 1, 8);

        let err = service(&store)
            .guard_comment(&actor(8), 2, 10)
            .await
            .expect_err("comment belongs to post 1");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
