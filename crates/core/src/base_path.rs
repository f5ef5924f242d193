use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Normalized deployment path prefix under which all backend resources live.
///
/// `/` and the empty string both mean "served from the root" and normalize to
/// an empty prefix, so `prefix()` can be concatenated with absolute resource
/// paths without producing `//`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasePath(String);

impl BasePath {
    /// Parses and normalizes a configured base path.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.contains(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "base path '{trimmed}' must not contain whitespace"
            )));
        }
        if trimmed.contains('?') || trimmed.contains('#') {
            return Err(AppError::Validation(format!(
                "base path '{trimmed}' must not contain a query or fragment"
            )));
        }

        let without_trailing = trimmed.trim_end_matches('/');
        if without_trailing.is_empty() {
            return Ok(Self::root());
        }

        if without_trailing.starts_with('/') {
            Ok(Self(without_trailing.to_owned()))
        } else {
            Ok(Self(format!("/{without_trailing}")))
        }
    }

    /// Returns the base path for an application served from `/`.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Returns the prefix to prepend to absolute resource paths.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this is the root base path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for BasePath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            formatter.write_str("/")
        } else {
            formatter.write_str(self.0.as_str())
        }
    }
}
