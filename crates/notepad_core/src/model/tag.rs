//! Note tag vocabulary and view filter.
//!
//! # Responsibility
//! - Define the fixed tag set a note can be filed under.
//! - Define the tag filter used by the display view, including the
//!   "all" sentinel.
//!
//! # Invariants
//! - The tag set is closed; unknown labels never map to a tag.
//! - `NoteTag::default()` is the first value of `NoteTag::ALL`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Category label attached to every note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTag {
    #[default]
    #[serde(rename = "Ideas", alias = "Идеи")]
    Ideas,
    #[serde(rename = "Personal", alias = "Личное")]
    Personal,
    #[serde(rename = "Work", alias = "Работа")]
    Work,
    #[serde(rename = "Shopping List", alias = "Список покупок")]
    ShoppingList,
}

impl NoteTag {
    /// Every tag in display order.
    pub const ALL: [NoteTag; 4] = [
        NoteTag::Ideas,
        NoteTag::Personal,
        NoteTag::Work,
        NoteTag::ShoppingList,
    ];

    /// Stable label used for display and serialization.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ideas => "Ideas",
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::ShoppingList => "Shopping List",
        }
    }

    /// Parses a user or storage label.
    ///
    /// Matching is case-insensitive after trimming. Labels written by the
    /// legacy browser widget are accepted too.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "ideas" | "идеи" => Some(Self::Ideas),
            "personal" | "личное" => Some(Self::Personal),
            "work" | "работа" => Some(Self::Work),
            "shopping list" | "shopping-list" | "shopping" | "список покупок" => {
                Some(Self::ShoppingList)
            }
            _ => None,
        }
    }
}

impl Display for NoteTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Active tag filter of the display view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagFilter {
    /// Sentinel: every tag passes.
    #[default]
    All,
    /// Only notes filed under this tag pass.
    Only(NoteTag),
}

impl TagFilter {
    /// Parses `all` (or the legacy `Все`) or any label accepted by
    /// [`NoteTag::parse`].
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        if normalized == "all" || normalized == "все" {
            return Some(Self::All);
        }
        NoteTag::parse(&normalized).map(Self::Only)
    }

    /// Returns whether a note with `tag` passes this filter.
    pub fn admits(self, tag: NoteTag) -> bool {
        match self {
            Self::All => true,
            Self::Only(active) => active == tag,
        }
    }
}

impl From<NoteTag> for TagFilter {
    fn from(value: NoteTag) -> Self {
        Self::Only(value)
    }
}

impl Display for TagFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(tag) => Display::fmt(tag, f),
        }
    }
}
