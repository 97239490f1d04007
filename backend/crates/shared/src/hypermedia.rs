//! Hypermedia Response Envelopes
//!
//! Every handler shapes its body the same way: the record's own fields,
//! flattened, plus a `links` array describing where the client can go next.
//!
//! ```rust
//! use kernel::hypermedia::{BaseUrl, Envelope, Link};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Record { name: &'static str }
//!
//! let base = BaseUrl::new("http://localhost:3000/");
//! let body = Envelope::new(Record { name: "Harry Potter" })
//!     .link(Link::get("self", base.join(&["products", "42"])));
//!
//! let json = serde_json::to_value(&body).unwrap();
//! assert_eq!(json["name"], "Harry Potter");
//! assert_eq!(json["links"][0]["href"], "http://localhost:3000/products/42");
//! ```

use serde::Serialize;
use serde_json::Value;

/// HTTP verb advertised in a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// One discoverability link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub rel: String,
    pub method: LinkMethod,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Example request body shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Link {
    pub fn new(rel: impl Into<String>, method: LinkMethod, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            method,
            href: href.into(),
            description: None,
            body: None,
        }
    }

    pub fn get(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(rel, LinkMethod::Get, href)
    }

    pub fn post(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(rel, LinkMethod::Post, href)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A record plus its links.
///
/// `T` must serialise to a JSON object; its fields are inlined next to
/// `links`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    pub record: T,
    pub links: Vec<Link>,
}

impl<T> Envelope<T> {
    pub fn new(record: T) -> Self {
        Self {
            record,
            links: Vec::new(),
        }
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

/// Body for operations that only report what happened.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn envelope(message: impl Into<String>) -> Envelope<Self> {
        Envelope::new(Self {
            message: message.into(),
        })
    }
}

/// Public base URL that hrefs are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self(raw.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join path segments onto the base: `join(&["orders", id])`
    pub fn join(&self, segments: &[&str]) -> String {
        let mut href = self.0.clone();
        for segment in segments {
            href.push('/');
            href.push_str(segment.trim_matches('/'));
        }
        href
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
