//! Metadata embedded in test names.
//!
//! A test name may carry one or more `@probedock(...)` markers:
//!
//! ```text
//! it works @probedock(abc123)
//! it fails @probedock(key="k1" category="API" tag="smoke" tag="v2" ticket="100")
//! ```
//!
//! A marker containing a single lowercase alphanumeric token sets the key.
//! Otherwise `key` and `category` are read (last occurrence wins) and `tag`
//! and `ticket` accumulate. Unknown attributes and malformed markers are
//! ignored; every marker is removed from the visible name.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@probedock\(([^()]*)\)").expect("valid marker regex"));

static MARKER_WITH_LEADING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*@probedock\([^()]*\)").expect("valid marker regex"));

static BARE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+$").expect("valid key regex"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z]+)=(?:"([^"]*)"|'([^']*)'|(\S+))"#).expect("valid attribute regex")
});

/// Metadata parsed from the markers of a test name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub key: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub tickets: Vec<String>,
}

impl Annotation {
    /// Parse all markers in `name`.
    pub fn parse(name: &str) -> Self {
        let mut annotation = Self::default();

        for marker in MARKER.captures_iter(name) {
            let text = marker.get(1).map_or("", |m| m.as_str());

            if BARE_KEY.is_match(text) {
                annotation.key = Some(text.to_string());
                continue;
            }

            for attribute in ATTRIBUTE.captures_iter(text) {
                let value = (2..=4)
                    .find_map(|i| attribute.get(i))
                    .map_or("", |m| m.as_str())
                    .to_string();

                match &attribute[1] {
                    "key" => annotation.key = Some(value),
                    "category" => annotation.category = Some(value),
                    "tag" => annotation.tags.push(value),
                    "ticket" => annotation.tickets.push(value),
                    _ => {}
                }
            }
        }

        annotation
    }
}

/// Remove every marker, together with the whitespace before it, from `name`.
pub fn strip(name: &str) -> String {
    MARKER_WITH_LEADING_SPACE.replace_all(name, "").into_owned()
}
