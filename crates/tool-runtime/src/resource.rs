//! Resources: static descriptors addressed by URI.
//!
//! A resource describes where data lives; it never fetches it. `read` is
//! synchronous and only sees the upstream configuration, so a resource
//! cannot perform network I/O.

use std::collections::HashMap;

use pubapi_core::UpstreamConfig;
use serde::{Deserialize, Serialize};

/// Variables captured from a templated URI.
pub type UriParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A URI template such as `posts://{post_id}`.
///
/// Variables match one or more characters up to the next literal and
/// never span a `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut rest = raw;
        while !rest.is_empty() {
            match rest.find('{') {
                Some(0) => {
                    let close = rest
                        .find('}')
                        .ok_or_else(|| format!("unclosed '{{' in '{raw}'"))?;
                    let name = &rest[1..close];
                    if name.is_empty() || name.contains('{') {
                        return Err(format!("invalid variable in '{raw}'"));
                    }
                    if matches!(segments.last(), Some(Segment::Var(_))) {
                        return Err(format!("adjacent variables in '{raw}'"));
                    }
                    segments.push(Segment::Var(name.to_string()));
                    rest = &rest[close + 1..];
                }
                Some(open) => {
                    segments.push(Segment::Literal(rest[..open].to_string()));
                    rest = &rest[open..];
                }
                None => {
                    if rest.contains('}') {
                        return Err(format!("stray '}}' in '{raw}'"));
                    }
                    segments.push(Segment::Literal(rest.to_string()));
                    rest = "";
                }
            }
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if the template contains at least one variable.
    pub fn is_templated(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Var(_)))
    }

    /// Variable names, in order.
    pub fn variables(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Var(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Match a concrete URI, returning the captured variables.
    pub fn matches(&self, uri: &str) -> Option<UriParams> {
        let mut params = UriParams::new();
        let mut rest = uri;
        let mut iter = self.segments.iter().peekable();
        while let Some(segment) = iter.next() {
            match segment {
                Segment::Literal(lit) => {
                    rest = rest.strip_prefix(lit.as_str())?;
                }
                Segment::Var(name) => {
                    let end = match iter.peek() {
                        Some(Segment::Literal(next)) => rest.find(next.as_str())?,
                        _ => rest.len(),
                    };
                    let value = &rest[..end];
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    params.insert(name.clone(), value.to_string());
                    rest = &rest[end..];
                }
            }
        }
        rest.is_empty().then_some(params)
    }
}

/// Describes a resource (or resource template) for `resources/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Static URI or URI template.
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl ResourceDefinition {
    pub fn json(uri: &str, name: &str, description: &str) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: "application/json".to_string(),
        }
    }
}

/// Contents returned by reading a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

pub trait Resource: Send + Sync {
    fn definition(&self) -> ResourceDefinition;

    /// Render the descriptor for a matched URI.
    fn read(&self, params: &UriParams, upstream: &UpstreamConfig) -> Result<String, ResourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Missing URI parameter: {0}")]
    MissingParam(String),
    #[error("Failed to render resource: {0}")]
    Render(#[from] serde_json::Error),
}
