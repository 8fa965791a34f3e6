//! Query scoping shared by every repository.

use serde::Deserialize;

/// Whether soft-deleted rows take part in a query.
///
/// There is no implicit default scope: every list query carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trashed {
    /// Only live rows (`deleted_at IS NULL`)
    #[default]
    Exclude,
    /// Live and soft-deleted rows
    Include,
    /// Only soft-deleted rows
    Only,
}

/// List filter accepted by repository `list` operations.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListFilter {
    /// Filter on the `status` flag; ignored by entities without one
    pub status: Option<bool>,
    #[serde(default)]
    pub trashed: Trashed,
}

impl ListFilter {
    /// Live rows with `status = true`.
    pub fn active() -> Self {
        Self {
            status: Some(true),
            trashed: Trashed::Exclude,
        }
    }

    /// Every live row regardless of status.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_trashed(mut self, trashed: Trashed) -> Self {
        self.trashed = trashed;
        self
    }
}
