use serde::{Deserialize, Serialize};

use crate::PageSize;

/// Filters applied to the paginated user list.
///
/// Empty values mean "no filter"; the setters normalize blank input to `None`
/// or an empty list so two filters compare equal when they filter the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    search: Option<String>,
    org_unit_ids: Vec<String>,
    role_filter: Option<String>,
}

impl UserFilter {
    /// Returns the free-text name search.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the organizational unit restriction.
    #[must_use]
    pub fn org_unit_ids(&self) -> &[String] {
        self.org_unit_ids.as_slice()
    }

    /// Returns the access role restriction.
    #[must_use]
    pub fn role_filter(&self) -> Option<&str> {
        self.role_filter.as_deref()
    }

    /// Returns a copy with a new search text.
    #[must_use]
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = normalize(search);
        self
    }

    /// Returns a copy restricted to the given organizational units.
    #[must_use]
    pub fn with_org_unit_ids<I, S>(mut self, org_unit_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for org_unit_id in org_unit_ids {
            let trimmed = org_unit_id.as_ref().trim();
            if !trimmed.is_empty() && !normalized.iter().any(|known| known == trimmed) {
                normalized.push(trimmed.to_owned());
            }
        }
        self.org_unit_ids = normalized;
        self
    }

    /// Returns a copy restricted to one access role.
    #[must_use]
    pub fn with_role_filter(mut self, role_filter: Option<&str>) -> Self {
        self.role_filter = normalize(role_filter);
        self
    }

    /// Returns whether no restriction is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.org_unit_ids.is_empty() && self.role_filter.is_none()
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Full parameter tuple of one user page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPageQuery {
    /// 1-indexed page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: PageSize,
    /// Active filters.
    pub filter: UserFilter,
}
