//! Taxonomy terms.

use serde::{Deserialize, Serialize};

use super::id::TermId;
use super::slug::slugify;
use super::status::Taxonomy;

/// A category or tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub taxonomy: Taxonomy,
    pub name: String,
    pub slug: String,
}

impl Term {
    /// Create a term whose slug is derived from its name.
    #[must_use]
    pub fn new(id: TermId, taxonomy: Taxonomy, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id,
            taxonomy,
            name,
            slug,
        }
    }

    /// Whether this term is `name` in `taxonomy`, ignoring case.
    #[must_use]
    pub fn matches(&self, taxonomy: Taxonomy, name: &str) -> bool {
        self.taxonomy == taxonomy && self.name.eq_ignore_ascii_case(name.trim())
    }
}
