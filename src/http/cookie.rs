//! Cookie directive parsing and rendering.
//!
//! # Responsibilities
//! - Split a raw `set-cookie` header value into `(key, value-or-flag)` pairs
//! - Normalize well-known attribute names to canonical keys
//! - Build a [`CookieDirective`] from the pairs (first pair is name/value)
//! - Render a directive back to a `Set-Cookie` wire value
//!
//! # Design Decisions
//! - Both `;` and `,` separate fragments, so legacy comma-joined directives
//!   still parse. An `Expires` date containing a comma is cut at the comma.
//! - Malformed fragments are dropped one at a time; the rest of the header
//!   still parses. Nothing in here returns an error.
//! - Attribute names are normalized through one static table, used in both
//!   directions.

use std::collections::BTreeMap;
use std::fmt;

use crate::http::token::is_valid_token;

/// Wire attribute names and their canonical keys, in rendering order.
const ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    ("Max-Age", "max_age"),
    ("Expires", "expires"),
    ("Domain", "domain"),
    ("Path", "path"),
    ("Secure", "secure"),
    ("HttpOnly", "http_only"),
    ("SameSite", "same_site"),
];

/// Bare fragments that are understood as flags.
const FLAG_NAMES: &[&str] = &["HttpOnly", "Secure"];

/// Value of a parsed cookie fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `key=value`.
    Text(String),
    /// A bare flag such as `HttpOnly`.
    Flag,
}

impl AttributeValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Flag => None,
        }
    }
}

/// Maps a wire attribute name to its canonical key; unknown names pass through.
pub fn canonical_key(name: &str) -> &str {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(wire, _)| *wire == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

fn wire_name(key: &str) -> Option<&'static str> {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(_, canonical)| *canonical == key)
        .map(|(wire, _)| *wire)
}

/// Parse a raw cookie header value into ordered `(key, value)` pairs.
///
/// The first pair is conventionally the cookie's own name and value. Empty,
/// unrecognized-bare, empty-key and non-token fragments are dropped.
pub fn parse_cookie_header(raw: &str) -> Vec<(String, AttributeValue)> {
    raw.split(|c: char| c == ';' || c == ',')
        .filter_map(parse_fragment)
        .collect()
}

fn parse_fragment(fragment: &str) -> Option<(String, AttributeValue)> {
    let fragment = fragment.trim();

    let Some((key, value)) = fragment.split_once('=') else {
        return FLAG_NAMES
            .contains(&fragment)
            .then(|| (canonical_key(fragment).to_string(), AttributeValue::Flag));
    };

    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || !is_valid_token(key) || !is_valid_token(value) {
        return None;
    }

    Some((canonical_key(key).to_string(), AttributeValue::text(value)))
}

/// One cookie to be set on a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    name: String,
    value: String,
    attributes: BTreeMap<String, AttributeValue>,
}

impl CookieDirective {
    /// Build a directive from parsed pairs.
    ///
    /// Returns `None` when there are no pairs or the first one is a bare flag,
    /// since there is then no cookie name to set.
    pub fn from_pairs(pairs: Vec<(String, AttributeValue)>) -> Option<Self> {
        let mut pairs = pairs.into_iter();
        let (name, value) = match pairs.next()? {
            (name, AttributeValue::Text(value)) => (name, value),
            (_, AttributeValue::Flag) => return None,
        };

        Some(Self {
            name,
            value,
            attributes: pairs.collect(),
        })
    }

    /// Parse a raw `set-cookie` header value.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_pairs(parse_cookie_header(raw))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Attributes keyed by canonical key (`max_age`, `path`, ...) or by the
    /// unchanged custom name.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn is_flag_set(&self, key: &str) -> bool {
        matches!(self.attributes.get(key), Some(AttributeValue::Flag))
    }
}

fn write_attribute(f: &mut fmt::Formatter<'_>, name: &str, value: &AttributeValue) -> fmt::Result {
    match value {
        AttributeValue::Text(v) => write!(f, "; {name}={v}"),
        AttributeValue::Flag => write!(f, "; {name}"),
    }
}

impl fmt::Display for CookieDirective {
    /// Renders the `Set-Cookie` wire value: name/value, known attributes in
    /// fixed order, then custom attributes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;

        for (wire, canonical) in ATTRIBUTE_NAMES {
            if let Some(value) = self.attributes.get(*canonical) {
                write_attribute(f, wire, value)?;
            }
        }

        for (key, value) in &self.attributes {
            if wire_name(key).is_none() {
                write_attribute(f, key, value)?;
            }
        }

        Ok(())
    }
}
