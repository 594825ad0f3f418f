//! Official Joke API façade.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpClient;

#[derive(Clone)]
pub struct JokeApi {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl JokeApi {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_random_joke(&self) -> Result<Value, ApiError> {
        self.client
            .get(&format!("{}/random_joke", self.base_url), &[])
            .await
    }

    /// Random joke(s) of one category, e.g. `programming`, `general`,
    /// `knock-knock`. Unknown categories surface as upstream errors.
    pub async fn get_jokes_by_type(&self, joke_type: &str) -> Result<Value, ApiError> {
        let url = format!("{}/jokes/{}/random", self.base_url, joke_type);
        self.client.get(&url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClient;
    use serde_json::json;

    const BASE: &str = "https://official-joke-api.appspot.com";

    #[tokio::test]
    async fn test_random_joke() {
        let joke = json!({
            "setup": "Why did the chicken cross the road?",
            "punchline": "To get to the other side!"
        });
        let client = Arc::new(RecordingClient::new().with_json(format!("{BASE}/random_joke"), joke.clone()));
        let api = JokeApi::new(client.clone(), BASE);

        assert_eq!(api.get_random_joke().await.unwrap(), joke);
        assert_eq!(client.calls()[0].url(), format!("{BASE}/random_joke"));
    }

    #[tokio::test]
    async fn test_jokes_by_type_puts_category_in_path() {
        let jokes = json!([{"setup": "Programming joke", "punchline": "Haha!"}]);
        let client = Arc::new(
            RecordingClient::new().with_json(format!("{BASE}/jokes/programming/random"), jokes.clone()),
        );
        let api = JokeApi::new(client.clone(), BASE);

        assert_eq!(api.get_jokes_by_type("programming").await.unwrap(), jokes);
        assert_eq!(client.calls()[0].url(), format!("{BASE}/jokes/programming/random"));
    }
}
