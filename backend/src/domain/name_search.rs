//! Display names for studies and tags, and substring search over them.

use std::fmt;

/// Maximum length of a study or tag name, in characters.
pub const NAME_MAX: usize = 100;

/// Validation errors for [`ResourceName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name must not be empty")]
    Empty,
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trimmed, non-empty display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    /// Validate and construct a [`ResourceName`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(NameError::TooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ResourceName> for String {
    fn from(value: ResourceName) -> Self {
        value.0
    }
}

/// Substring needle for name search. An absent needle matches every name.
///
/// Listing matches case-insensitively while counting matches
/// case-sensitively, so `totalData` can disagree with the listed rows for
/// mixed-case needles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameQuery(String);

impl NameQuery {
    /// Wrap an optional `name` query value.
    pub fn new(raw: Option<&str>) -> Self {
        Self(raw.unwrap_or_default().to_owned())
    }

    /// Raw needle.
    pub fn needle(&self) -> &str {
        &self.0
    }

    /// SQL `LIKE` pattern with `%`, `_` and `\` escaped.
    ///
    /// ```
    /// use noteshare::domain::NameQuery;
    ///
    /// assert_eq!(NameQuery::new(Some("50%_off")).like_pattern(), r"%50\%\_off%");
    /// assert_eq!(NameQuery::new(None).like_pattern(), "%%");
    /// ```
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// Case-insensitive containment, as used for listing.
    pub fn matches_listing(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// Case-sensitive containment, as used for counting.
    pub fn matches_count(&self, name: &str) -> bool {
        name.contains(&self.0)
    }
}
