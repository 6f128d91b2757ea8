//! User-defined factors and their ordered registry.

use serde::{Deserialize, Serialize};

use crate::types::TagId;

/// Color given to new tags when none is chosen.
pub const DEFAULT_TAG_COLOR: &str = "#6366f1";

/// Icon given to user-created tags.
pub const DEFAULT_TAG_ICON: &str = "activity";

/// A labeled, colored factor that can be attached to awake entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
    /// Cosmetic icon name.
    #[serde(default = "default_icon")]
    pub icon: String,
    pub color: String,
}

fn default_icon() -> String {
    DEFAULT_TAG_ICON.to_string()
}

/// Ordered list of tags. Order is user-controlled and persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    pub const fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    /// The tag set a fresh journal starts with.
    pub fn defaults() -> Self {
        let tag = |id: &'static str, label: &str, icon: &str, color: &str| Tag {
            id: TagId::builtin(id),
            label: label.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        };
        Self::new(vec![
            tag("caffeine", "Caffeine", "coffee", "#f97316"),
            tag("exercise", "Exercise", "dumbbell", "#10b981"),
            tag("meditation", "Meditation", "moon", "#a855f7"),
        ])
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Appends a new tag and returns its generated ID.
    ///
    /// A blank label is ignored and returns `None`.
    pub fn add(&mut self, label: &str, color: Option<&str>) -> Option<TagId> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let color = color
            .map(str::trim)
            .filter(|color| !color.is_empty())
            .unwrap_or(DEFAULT_TAG_COLOR);

        let id = self.fresh_id();
        self.tags.push(Tag {
            id: id.clone(),
            label: label.to_string(),
            icon: DEFAULT_TAG_ICON.to_string(),
            color: color.to_string(),
        });
        tracing::debug!(%id, label, "added tag");
        Some(id)
    }

    /// Removes a tag from the registry.
    ///
    /// Entries that reference it keep the ID; it simply stops resolving.
    pub fn remove(&mut self, id: &TagId) -> Option<Tag> {
        let index = self.tags.iter().position(|tag| &tag.id == id)?;
        Some(self.tags.remove(index))
    }

    /// Moves the tag at `from` so it ends up at `to`.
    ///
    /// Returns false without changes when the indices are equal or either is
    /// out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.tags.len() || to >= self.tags.len() {
            return false;
        }
        let tag = self.tags.remove(from);
        self.tags.insert(to, tag);
        true
    }

    pub fn get(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| &tag.id == id)
    }

    /// Position of a tag in display order.
    pub fn position(&self, id: &TagId) -> Option<usize> {
        self.tags.iter().position(|tag| &tag.id == id)
    }

    /// Label for a tag ID, or `None` if the tag no longer exists.
    pub fn resolve_label(&self, id: &TagId) -> Option<&str> {
        self.get(id).map(|tag| tag.label.as_str())
    }

    /// Finds a tag by ID, falling back to a case-insensitive label match.
    pub fn find(&self, key: &str) -> Option<&Tag> {
        let key = key.trim();
        self.tags
            .iter()
            .find(|tag| tag.id.as_str() == key)
            .or_else(|| {
                self.tags
                    .iter()
                    .find(|tag| tag.label.eq_ignore_ascii_case(key))
            })
    }

    fn fresh_id(&self) -> TagId {
        loop {
            let candidate = TagId::generate();
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

impl<'a> IntoIterator for &'a TagRegistry {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
