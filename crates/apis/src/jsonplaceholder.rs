//! JSONPlaceholder façade: posts, comments, users, todos.
//!
//! The upstream is a fake REST API. `create_post` is accepted and echoed
//! back with a fabricated id, but nothing is persisted: the returned id
//! does not refer to a retrievable post.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::HttpClient;

#[derive(Clone)]
pub struct JsonPlaceholderApi {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl JsonPlaceholderApi {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All posts, truncated locally to the first `limit` items.
    ///
    /// The upstream has no paging, so the full collection is always
    /// fetched. `None` or `limit <= 0` returns everything in server order.
    pub async fn get_posts(&self, limit: Option<i64>) -> Result<Value, ApiError> {
        let posts = self.client.get(&format!("{}/posts", self.base_url), &[]).await?;
        Ok(truncate(posts, limit))
    }

    pub async fn get_post(&self, post_id: impl fmt::Display) -> Result<Value, ApiError> {
        let url = format!("{}/posts/{}", self.base_url, post_id);
        self.client.get(&url, &[]).await
    }

    /// Comments of one post, or every comment when `post_id` is `None`.
    pub async fn get_comments<I: fmt::Display>(&self, post_id: Option<I>) -> Result<Value, ApiError> {
        let url = match post_id {
            Some(id) => format!("{}/posts/{}/comments", self.base_url, id),
            None => format!("{}/comments", self.base_url),
        };
        self.client.get(&url, &[]).await
    }

    pub async fn get_users(&self) -> Result<Value, ApiError> {
        self.client.get(&format!("{}/users", self.base_url), &[]).await
    }

    pub async fn get_user(&self, user_id: impl fmt::Display) -> Result<Value, ApiError> {
        let url = format!("{}/users/{}", self.base_url, user_id);
        self.client.get(&url, &[]).await
    }

    /// Todos of one user, or every todo when `user_id` is `None`.
    pub async fn get_todos<I: fmt::Display>(&self, user_id: Option<I>) -> Result<Value, ApiError> {
        let url = match user_id {
            Some(id) => format!("{}/users/{}/todos", self.base_url, id),
            None => format!("{}/todos", self.base_url),
        };
        self.client.get(&url, &[]).await
    }

    /// POST a new post. The body carries exactly `title`, `body`, `userId`.
    pub async fn create_post(&self, title: &str, body: &str, user_id: i64) -> Result<Value, ApiError> {
        let payload = json!({
            "title": title,
            "body": body,
            "userId": user_id,
        });
        self.client
            .post(&format!("{}/posts", self.base_url), Some(&payload))
            .await
    }
}

/// Keep the first `limit` items of an array. Non-array values pass through.
fn truncate(value: Value, limit: Option<i64>) -> Value {
    match (value, limit) {
        (Value::Array(mut items), Some(n)) if n > 0 => {
            items.truncate(usize::try_from(n).unwrap_or(usize::MAX));
            Value::Array(items)
        }
        (value, _) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordedCall, RecordingClient};
    use crate::types::ResourceId;

    const BASE: &str = "https://jsonplaceholder.typicode.com";

    fn three_posts() -> Value {
        json!([
            {"id": 1, "title": "Post 1", "body": "Body 1", "userId": 1},
            {"id": 2, "title": "Post 2", "body": "Body 2", "userId": 2},
            {"id": 3, "title": "Post 3", "body": "Body 3", "userId": 3}
        ])
    }

    fn api(client: RecordingClient) -> (JsonPlaceholderApi, Arc<RecordingClient>) {
        let client = Arc::new(client);
        (JsonPlaceholderApi::new(client.clone(), BASE), client)
    }

    #[tokio::test]
    async fn test_get_posts_without_limit_returns_all() {
        let (api, client) = api(RecordingClient::new().with_json(format!("{BASE}/posts"), three_posts()));
        let posts = api.get_posts(None).await.unwrap();
        assert_eq!(posts, three_posts());
        assert_eq!(
            client.calls(),
            vec![RecordedCall::Get { url: format!("{BASE}/posts"), params: vec![] }]
        );
    }

    #[tokio::test]
    async fn test_get_posts_limit_truncates_locally_in_order() {
        let (api, client) = api(RecordingClient::new().with_json(format!("{BASE}/posts"), three_posts()));
        let posts = api.get_posts(Some(2)).await.unwrap();
        let items = posts.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[1]["id"], 2);
        // Limit never reaches the upstream.
        assert_eq!(
            client.calls(),
            vec![RecordedCall::Get { url: format!("{BASE}/posts"), params: vec![] }]
        );
    }

    #[tokio::test]
    async fn test_get_posts_limit_edge_values() {
        let (api, _) = api(RecordingClient::new().with_json(format!("{BASE}/posts"), three_posts()));
        for (limit, expected) in [(Some(0), 3), (Some(-4), 3), (Some(3), 3), (Some(50), 3), (Some(1), 1)] {
            let posts = api.get_posts(limit).await.unwrap();
            assert_eq!(posts.as_array().unwrap().len(), expected, "limit {limit:?}");
        }
    }

    #[tokio::test]
    async fn test_get_post_substitutes_literal_id() {
        let post = json!({"id": 1, "title": "Post 1"});
        let (api, client) = api(
            RecordingClient::new()
                .with_json(format!("{BASE}/posts/1"), post.clone())
                .with_json(format!("{BASE}/posts/abc"), json!({})),
        );

        assert_eq!(api.get_post(1).await.unwrap(), post);
        assert_eq!(api.get_post(ResourceId::from("1")).await.unwrap(), post);
        api.get_post("abc").await.unwrap();

        let urls: Vec<String> = client.calls().iter().map(|c| c.url().to_string()).collect();
        assert_eq!(
            urls,
            vec![
                format!("{BASE}/posts/1"),
                format!("{BASE}/posts/1"),
                format!("{BASE}/posts/abc"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_post_surfaces_http_error() {
        let (api, _) = api(RecordingClient::new());
        let err = api.get_post(999).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_dependent_collections_use_flat_or_nested_url() {
        let (api, client) = api(
            RecordingClient::new()
                .with_json(format!("{BASE}/todos"), json!([]))
                .with_json(format!("{BASE}/users/3/todos"), json!([]))
                .with_json(format!("{BASE}/comments"), json!([]))
                .with_json(format!("{BASE}/posts/5/comments"), json!([])),
        );

        api.get_todos(None::<i64>).await.unwrap();
        api.get_todos(Some(3)).await.unwrap();
        api.get_comments(None::<i64>).await.unwrap();
        api.get_comments(Some(5)).await.unwrap();

        let urls: Vec<String> = client.calls().iter().map(|c| c.url().to_string()).collect();
        assert_eq!(
            urls,
            vec![
                format!("{BASE}/todos"),
                format!("{BASE}/users/3/todos"),
                format!("{BASE}/comments"),
                format!("{BASE}/posts/5/comments"),
            ]
        );
    }

    #[tokio::test]
    async fn test_users() {
        let users = json!([{"id": 1, "name": "User 1"}, {"id": 2, "name": "User 2"}]);
        let (api, client) = api(
            RecordingClient::new()
                .with_json(format!("{BASE}/users"), users.clone())
                .with_json(format!("{BASE}/users/2"), json!({"id": 2})),
        );
        assert_eq!(api.get_users().await.unwrap(), users);
        assert_eq!(api.get_user(2).await.unwrap()["id"], 2);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_create_post_sends_exactly_three_fields() {
        let echoed = json!({"id": 101, "title": "New Post", "body": "New Body", "userId": 1});
        let (api, client) = api(RecordingClient::new().with_json(format!("{BASE}/posts"), echoed.clone()));

        let created = api.create_post("New Post", "New Body", 1).await.unwrap();
        assert_eq!(created, echoed);
        assert_eq!(
            client.calls(),
            vec![RecordedCall::Post {
                url: format!("{BASE}/posts"),
                body: Some(json!({"title": "New Post", "body": "New Body", "userId": 1})),
            }]
        );
    }

    #[test]
    fn test_truncate_passes_non_arrays_through() {
        let obj = json!({"data": [1, 2, 3]});
        assert_eq!(truncate(obj.clone(), Some(1)), obj);
    }
}
