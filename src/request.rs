//! Incoming HTTP request type.

use std::collections::HashMap;

use crate::session::Session;

/// An incoming HTTP request with its body fully read.
pub struct Request {
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
    pub(crate) session: Session,
}

impl Request {
    pub(crate) fn new(raw_query: Option<&str>, body: Vec<u8>, session: Session) -> Self {
        let query = raw_query.map(|q| decode_pairs(q.as_bytes())).unwrap_or_default();
        Self { query, body, params: HashMap::new(), session }
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn session(&self) -> &Session { &self.session }

    /// Returns a named path parameter.
    ///
    /// For a route `/delete/{id}`, `req.param("id")` on `/delete/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// First value of a decoded query-string parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        first(&self.query, name)
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    ///
    /// Invalid percent-escapes and UTF-8 are decoded lossily rather than
    /// rejected.
    pub fn form(&self) -> Form {
        Form(decode_pairs(&self.body))
    }
}

/// Decoded form fields, in submission order.
#[derive(Debug, Default)]
pub struct Form(Vec<(String, String)>);

impl Form {
    pub fn get(&self, name: &str) -> Option<&str> {
        first(&self.0, name)
    }

    /// Field value, or `""` when the field was not submitted.
    pub fn field(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}

fn decode_pairs(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}
