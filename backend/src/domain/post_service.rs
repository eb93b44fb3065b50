//! Post coordination service.
//!
//! Posts follow the same two-step discipline as resumes for their comment
//! list (child insert first, tail append second), plus two single-document
//! policies of their own: the owner-checked delete and the atomic
//! like/unlike toggle. Deleting a post never cascades to its comments;
//! orphaned comments stay fetchable by id.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::ports::{
    CommentRepository, PostCommand, PostQuery, PostRepository, StoreError, UserDirectory,
};
use crate::domain::{Comment, Error, Post, Principal, UserDisplay, UserId};

/// Coordinator for the post aggregate and its comment records.
#[derive(Clone)]
pub struct PostService<P, C, U> {
    posts: Arc<P>,
    comments: Arc<C>,
    users: Arc<U>,
}

impl<P, C, U> PostService<P, C, U> {
    /// Create a new service over the given repositories.
    pub fn new(posts: Arc<P>, comments: Arc<C>, users: Arc<U>) -> Self {
        Self {
            posts,
            comments,
            users,
        }
    }
}

fn post_missing() -> Error {
    Error::not_found("Post not found")
}

fn comment_link_failed(comment: Uuid, cause: Option<StoreError>) -> Error {
    error!(
        comment = %comment,
        cause = cause.as_ref().map(ToString::to_string),
        "post link update failed after comment write"
    );
    Error::link_inconsistency("Comment saved but the post comment list could not be updated")
        .with_details(serde_json::json!({ "code": "aggregate_link_failed" }))
}

impl<P, C, U> PostService<P, C, U>
where
    P: PostRepository,
    C: CommentRepository,
    U: UserDirectory,
{
    async fn author_snapshot(&self, user: &UserId) -> Result<UserDisplay, Error> {
        self.users
            .display_info(user)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl<P, C, U> PostQuery for PostService<P, C, U>
where
    P: PostRepository,
    C: CommentRepository,
    U: UserDirectory,
{
    async fn fetch(&self, id: Uuid) -> Result<Post, Error> {
        self.posts.find_by_id(id).await?.ok_or_else(post_missing)
    }

    async fn list_all(&self) -> Result<Vec<Post>, Error> {
        Ok(self.posts.find_all().await?)
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Post>, Error> {
        Ok(self.posts.find_by_author(author).await?)
    }

    async fn fetch_comment(&self, id: Uuid) -> Result<Comment, Error> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::resource_missing("Comment not found"))
    }
}

#[async_trait]
impl<P, C, U> PostCommand for PostService<P, C, U>
where
    P: PostRepository,
    C: CommentRepository,
    U: UserDirectory,
{
    async fn create(&self, principal: &Principal, text: String) -> Result<Post, Error> {
        let author = self.author_snapshot(&principal.user_id).await?;
        let post = self
            .posts
            .insert(Post::create(principal.user_id, text, author))
            .await?;
        debug!(post = %post.id, "created post");
        Ok(post)
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Post, Error> {
        let post = self.posts.find_by_id(id).await?.ok_or_else(post_missing)?;
        if post.user != principal.user_id {
            return Err(Error::unauthorized("User not authorized"));
        }
        // Comments are deliberately left behind; cleanup is one-way only.
        self.posts.delete_by_id(id).await?.ok_or_else(post_missing)
    }

    async fn toggle_like(&self, principal: &Principal, id: Uuid) -> Result<Post, Error> {
        self.posts
            .toggle_like(id, &principal.user_id)
            .await?
            .ok_or_else(post_missing)
    }

    async fn add_comment(
        &self,
        principal: &Principal,
        post: Uuid,
        text: String,
    ) -> Result<Comment, Error> {
        // Resolve the aggregate before any write so a bad post id fails
        // with no partial effects.
        if self.posts.find_by_id(post).await?.is_none() {
            return Err(post_missing());
        }
        let author = self.author_snapshot(&principal.user_id).await?;

        let comment = self
            .comments
            .insert(Comment::create(post, text, author))
            .await?;
        match self.posts.push_comment(post, comment.id).await {
            Ok(Some(_)) => Ok(comment),
            Ok(None) => Err(comment_link_failed(comment.id, None)),
            Err(err) => Err(comment_link_failed(comment.id, Some(err))),
        }
    }

    async fn update_comment(&self, id: Uuid, text: String) -> Result<Comment, Error> {
        self.comments
            .update_text(id, text)
            .await?
            .ok_or_else(|| Error::resource_missing("Comment not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCommentRepository, MockPostRepository, MockUserDirectory};

    fn display() -> UserDisplay {
        UserDisplay {
            name: "Ann".into(),
            avatar: None,
        }
    }

    fn service(
        posts: MockPostRepository,
        comments: MockCommentRepository,
        users: MockUserDirectory,
    ) -> PostService<MockPostRepository, MockCommentRepository, MockUserDirectory> {
        PostService::new(Arc::new(posts), Arc::new(comments), Arc::new(users))
    }

    #[tokio::test]
    async fn create_snapshots_author_display() {
        let caller = Principal::new(UserId::random());

        let mut users = MockUserDirectory::new();
        users
            .expect_display_info()
            .times(1)
            .return_once(|_| Ok(Some(display())));

        let mut posts = MockPostRepository::new();
        posts.expect_insert().times(1).return_once(|post| Ok(post));

        let svc = service(posts, MockCommentRepository::new(), users);
        let post = svc
            .create(&caller, "hello".into())
            .await
            .expect("create succeeds");
        assert_eq!(post.name, "Ann");
        assert_eq!(post.user, caller.user_id);
        assert!(post.likes.is_empty());
    }

    #[tokio::test]
    async fn delete_rejects_non_owner_before_any_write() {
        let owner = UserId::random();
        let caller = Principal::new(UserId::random());
        let post = Post::create(owner, "hello".into(), display());
        let id = post.id;

        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(post)));
        posts.expect_delete_by_id().times(0);

        let svc = service(posts, MockCommentRepository::new(), MockUserDirectory::new());
        let err = svc.delete(&caller, id).await.expect_err("not owner");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "User not authorized");
    }

    #[tokio::test]
    async fn delete_of_missing_post_is_not_found() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let svc = service(posts, MockCommentRepository::new(), MockUserDirectory::new());
        let err = svc
            .delete(&Principal::new(UserId::random()), Uuid::new_v4())
            .await
            .expect_err("missing post");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn add_comment_sets_back_reference_and_appends_tail() {
        let caller = Principal::new(UserId::random());
        let post = Post::create(UserId::random(), "hello".into(), display());
        let post_id = post.id;

        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(post.clone())));
        posts
            .expect_push_comment()
            .withf(move |id, _| *id == post_id)
            .times(1)
            .return_once(|id, comment| {
                let mut updated = Post::create(UserId::random(), "hello".into(), display());
                updated.id = id;
                updated.comments.push(comment);
                Ok(Some(updated))
            });

        let mut users = MockUserDirectory::new();
        users
            .expect_display_info()
            .times(1)
            .return_once(|_| Ok(Some(display())));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .withf(move |comment| comment.post == post_id)
            .times(1)
            .return_once(|comment| Ok(comment));

        let svc = service(posts, comments, users);
        let comment = svc
            .add_comment(&caller, post_id, "nice".into())
            .await
            .expect("comment succeeds");
        assert_eq!(comment.post, post_id);
    }

    #[tokio::test]
    async fn add_comment_reports_link_failure_without_returning_the_child() {
        let caller = Principal::new(UserId::random());
        let post = Post::create(UserId::random(), "hello".into(), display());
        let post_id = post.id;

        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(post)));
        // Post vanished between the comment insert and the list append.
        posts
            .expect_push_comment()
            .times(1)
            .return_once(|_, _| Ok(None));

        let mut users = MockUserDirectory::new();
        users
            .expect_display_info()
            .times(1)
            .return_once(|_| Ok(Some(display())));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .times(1)
            .return_once(|comment| Ok(comment));

        let svc = service(posts, comments, users);
        let err = svc
            .add_comment(&caller, post_id, "nice".into())
            .await
            .expect_err("link failure surfaces");
        assert_eq!(err.code(), ErrorCode::LinkInconsistency);
    }

    #[tokio::test]
    async fn add_comment_rejects_missing_post_before_any_write() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));
        posts.expect_push_comment().times(0);

        let mut comments = MockCommentRepository::new();
        comments.expect_insert().times(0);

        let svc = service(posts, comments, MockUserDirectory::new());
        let err = svc
            .add_comment(&Principal::new(UserId::random()), Uuid::new_v4(), "x".into())
            .await
            .expect_err("missing post");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn toggle_like_on_missing_post_is_not_found() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_toggle_like()
            .times(1)
            .return_once(|_, _| Ok(None));

        let svc = service(posts, MockCommentRepository::new(), MockUserDirectory::new());
        let err = svc
            .toggle_like(&Principal::new(UserId::random()), Uuid::new_v4())
            .await
            .expect_err("missing post");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
