//! Built-in resources. Each one renders a JSON descriptor pointing at the
//! configured upstream; none of them touches the network.

use pubapi_core::UpstreamConfig;
use serde_json::json;

use crate::resource::{Resource, ResourceDefinition, ResourceError, UriParams};

/// `posts://all`
pub struct AllPostsResource;

impl Resource for AllPostsResource {
    fn definition(&self) -> ResourceDefinition {
        ResourceDefinition::json("posts://all", "all_posts", "All posts from JSONPlaceholder")
    }

    fn read(&self, _params: &UriParams, upstream: &UpstreamConfig) -> Result<String, ResourceError> {
        Ok(serde_json::to_string_pretty(&json!({
            "description": "All posts from JSONPlaceholder",
            "endpoint": format!("{}/posts", upstream.jsonplaceholder_url),
            "type": "posts_collection",
        }))?)
    }
}

/// `posts://{post_id}`
pub struct PostResource;

impl Resource for PostResource {
    fn definition(&self) -> ResourceDefinition {
        ResourceDefinition::json("posts://{post_id}", "post", "A single JSONPlaceholder post")
    }

    fn read(&self, params: &UriParams, upstream: &UpstreamConfig) -> Result<String, ResourceError> {
        let post_id = params
            .get("post_id")
            .ok_or_else(|| ResourceError::MissingParam("post_id".to_string()))?;
        Ok(serde_json::to_string_pretty(&json!({
            "description": format!("Post {post_id} from JSONPlaceholder"),
            "endpoint": format!("{}/posts/{post_id}", upstream.jsonplaceholder_url),
            "type": "single_post",
        }))?)
    }
}

/// `users://all`
pub struct AllUsersResource;

impl Resource for AllUsersResource {
    fn definition(&self) -> ResourceDefinition {
        ResourceDefinition::json("users://all", "all_users", "All users from JSONPlaceholder")
    }

    fn read(&self, _params: &UriParams, upstream: &UpstreamConfig) -> Result<String, ResourceError> {
        Ok(serde_json::to_string_pretty(&json!({
            "description": "All users from JSONPlaceholder",
            "endpoint": format!("{}/users", upstream.jsonplaceholder_url),
            "type": "users_collection",
        }))?)
    }
}

/// `api://status`: the upstreams this server talks to.
pub struct ApiStatusResource;

impl Resource for ApiStatusResource {
    fn definition(&self) -> ResourceDefinition {
        ResourceDefinition::json("api://status", "api_status", "Status of the available APIs")
    }

    fn read(&self, _params: &UriParams, upstream: &UpstreamConfig) -> Result<String, ResourceError> {
        Ok(serde_json::to_string_pretty(&json!({
            "apis": {
                "jsonplaceholder": {
                    "name": "JSONPlaceholder",
                    "base_url": upstream.jsonplaceholder_url,
                    "description": "Fake REST API for posts, users, comments and todos",
                    "endpoints": ["/posts", "/users", "/comments", "/todos"],
                },
                "catfacts": {
                    "name": "Cat Facts",
                    "base_url": upstream.catfacts_url,
                    "description": "Facts about cats",
                    "endpoints": ["/fact", "/facts"],
                },
                "jokes": {
                    "name": "Official Joke API",
                    "base_url": upstream.jokes_url,
                    "description": "Random jokes",
                    "endpoints": ["/random_joke", "/jokes/{type}/random"],
                },
                "qrcode": {
                    "name": "QR Code Generator",
                    "base_url": upstream.qrcode_url,
                    "description": "PNG QR code generation",
                    "endpoints": ["/create-qr-code/"],
                },
            }
        }))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_collection_descriptors() {
        let upstream = UpstreamConfig::default();
        let posts = parse(&AllPostsResource.read(&UriParams::new(), &upstream).unwrap());
        assert_eq!(posts["type"], "posts_collection");
        assert_eq!(posts["endpoint"], "https://jsonplaceholder.typicode.com/posts");

        let users = parse(&AllUsersResource.read(&UriParams::new(), &upstream).unwrap());
        assert_eq!(users["type"], "users_collection");
        assert_eq!(users["endpoint"], "https://jsonplaceholder.typicode.com/users");
    }

    #[test]
    fn test_single_post_descriptor() {
        let mut params = UriParams::new();
        params.insert("post_id".to_string(), "7".to_string());
        let text = PostResource.read(&params, &UpstreamConfig::default()).unwrap();
        // Pretty-printed.
        assert!(text.contains('\n'));
        let post = parse(&text);
        assert_eq!(post["description"], "Post 7 from JSONPlaceholder");
        assert_eq!(post["endpoint"], "https://jsonplaceholder.typicode.com/posts/7");
        assert_eq!(post["type"], "single_post");
    }

    #[test]
    fn test_single_post_without_param() {
        let err = PostResource
            .read(&UriParams::new(), &UpstreamConfig::default())
            .unwrap_err();
        assert!(matches!(err, ResourceError::MissingParam(_)));
    }

    #[test]
    fn test_status_uses_configured_urls() {
        let upstream = UpstreamConfig::all_at("http://localhost:9999/");
        let status = parse(&ApiStatusResource.read(&UriParams::new(), &upstream).unwrap());
        let apis = status["apis"].as_object().unwrap();
        assert_eq!(apis.len(), 4);
        assert_eq!(apis["catfacts"]["base_url"], "http://localhost:9999");
        assert_eq!(apis["jokes"]["endpoints"][1], "/jokes/{type}/random");
        assert_eq!(apis["qrcode"]["name"], "QR Code Generator");
    }
}
