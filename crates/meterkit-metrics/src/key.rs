// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Metric identity and canonical key rendering.
//!
//! A metric is identified by its name plus an unordered set of tags. The
//! canonical form is the name followed by every tag, sorted by tag key, each
//! rendered as `<tags_separator><key><tag_kv_separator><value>`. With the
//! default [`KeyFormat`] that is `name|a=1|b=2`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{MetricsError, MetricsResult};

/// Tag set attached to a metric
pub type Tags = HashMap<String, String>;

/// Separators used when rendering canonical keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyFormat {
    /// Placed before every tag (default: `|`)
    pub tags_separator: String,

    /// Placed between a tag key and its value (default: `=`)
    pub tag_kv_separator: String,
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            tags_separator: "|".to_string(),
            tag_kv_separator: "=".to_string(),
        }
    }
}

impl KeyFormat {
    /// Create a format with custom separators
    pub fn new(tags_separator: impl Into<String>, tag_kv_separator: impl Into<String>) -> Self {
        Self {
            tags_separator: tags_separator.into(),
            tag_kv_separator: tag_kv_separator.into(),
        }
    }

    /// Render the canonical key for `name` and `tags`
    pub fn render(&self, name: &str, tags: &Tags) -> String {
        let mut pairs: Vec<(&str, &str)> =
            tags.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        pairs.sort_unstable();
        self.render_sorted(name, pairs)
    }

    // `pairs` must already be sorted by tag key
    fn render_sorted<'a>(
        &self,
        name: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> String {
        let mut key = String::with_capacity(name.len() + 32);
        key.push_str(name);
        for (k, v) in pairs {
            key.push_str(&self.tags_separator);
            key.push_str(k);
            key.push_str(&self.tag_kv_separator);
            key.push_str(v);
        }
        key
    }
}

/// Render a canonical key with the default separators
pub fn canonical_key(name: &str, tags: &Tags) -> String {
    KeyFormat::default().render(name, tags)
}

/// Identity of a single time series
///
/// Two keys are equal iff their names and full tag sets are equal,
/// regardless of the order tags were inserted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey {
    name: String,
    tags: BTreeMap<String, String>,
}

impl MetricKey {
    /// Create a key from a name and tag set
    pub fn new(name: impl Into<String>, tags: &Tags) -> Self {
        Self {
            name: name.into(),
            tags: tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Metric name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags in key order
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical string form using `format`
    pub fn canonical(&self, format: &KeyFormat) -> String {
        format.render_sorted(&self.name, self.tags())
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical(&KeyFormat::default()))
    }
}

/// Merge `extra` over `base`; tags in `extra` win on conflict
pub fn merge_tags(base: &Tags, extra: &Tags) -> Tags {
    let mut merged = base.clone();
    for (k, v) in extra {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

/// Join a namespace prefix and a metric name with `.`
///
/// An empty side is dropped: `("", "x")` and `("x", "")` both give `"x"`.
pub fn join_namespace(namespace: &str, name: &str) -> String {
    match (namespace.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => namespace.to_string(),
        (false, false) => format!("{}.{}", namespace, name),
    }
}

/// Parse a `k1=v1,k2=v2` tag string
///
/// `field` is only used to build the error message.
pub fn parse_tags(field: &str, spec: &str) -> MetricsResult<Tags> {
    let mut tags = Tags::new();
    if spec.is_empty() {
        return Ok(tags);
    }
    for pair in spec.split(',') {
        let parts: Vec<&str> = pair.split('=').collect();
        if parts.len() != 2 {
            return Err(MetricsError::InvalidTag {
                field: field.to_string(),
                pair: pair.to_string(),
                spec: spec.to_string(),
            });
        }
        tags.insert(parts[0].to_string(), parts[1].to_string());
    }
    Ok(tags)
}
