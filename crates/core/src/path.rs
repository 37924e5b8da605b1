use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Normalized navigation path.
///
/// Construction normalizes rather than rejects: a missing leading `/` is
/// prepended and trailing slashes are stripped (the root stays `/`). All
/// prefix matching in the policy tables goes through [`RoutePath::covers`],
/// which is segment-aware.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoutePath(Cow<'static, str>);

impl RoutePath {
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        let raw = path.into();

        let needs_slash = !raw.starts_with('/');
        let trailing = raw.len() > 1 && raw.ends_with('/');

        if raw.is_empty() {
            return Self(Cow::Borrowed("/"));
        }
        if !needs_slash && !trailing {
            return Self(raw);
        }

        let mut owned = String::with_capacity(raw.len() + 1);
        if needs_slash {
            owned.push('/');
        }
        owned.push_str(raw.trim_end_matches('/'));
        if owned.is_empty() {
            owned.push('/');
        }
        Self(Cow::Owned(owned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment-aware prefix test: `/admin` covers `/admin` and `/admin/users`
    /// but never `/administrator`.
    pub fn covers(&self, path: &RoutePath) -> bool {
        let prefix = self.as_str();
        let candidate = path.as_str();

        if prefix == "/" {
            return true;
        }

        match candidate.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl core::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RoutePath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for RoutePath {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl From<RoutePath> for String {
    fn from(value: RoutePath) -> Self {
        value.0.into_owned()
    }
}
