use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier substituted into a URL path segment.
///
/// Accepts either a JSON number or a JSON string and renders it exactly as
/// given, so `1` and `"1"` both produce `/posts/1` and `"abc"` produces
/// `/posts/abc`. No existence check happens locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(n) => write!(f, "{n}"),
            ResourceId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        ResourceId::Int(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Str(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_number_or_string() {
        let n: ResourceId = serde_json::from_str("7").unwrap();
        assert_eq!(n, ResourceId::Int(7));
        let s: ResourceId = serde_json::from_str("\"07\"").unwrap();
        assert_eq!(s, ResourceId::Str("07".to_string()));
    }

    #[test]
    fn test_display_is_literal() {
        assert_eq!(ResourceId::from(42).to_string(), "42");
        assert_eq!(ResourceId::from("07").to_string(), "07");
        assert_eq!(ResourceId::from("a b").to_string(), "a b");
    }
}
