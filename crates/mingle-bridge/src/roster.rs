//! Roster vocabulary shared between the host and the backend.
//!
//! The roster is the in-memory list of discoverable users shown on the home
//! screen. Users carry an ordered list of interest tags drawn from a fixed,
//! small set; the host renders one filter chip per known tag.

use serde::{Deserialize, Serialize};

/// The fixed set of interest tags a user profile can carry.
///
/// The variant order is load-bearing: it is the display order of the filter
/// chips and the index order of [`InterestSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Coffee,
    Music,
    Ai,
    Basketball,
    Hiking,
    Photography,
    Gaming,
    Travel,
}

impl Interest {
    /// Every known interest tag, in display order.
    pub const ALL: [Interest; 8] = [
        Interest::Coffee,
        Interest::Music,
        Interest::Ai,
        Interest::Basketball,
        Interest::Hiking,
        Interest::Photography,
        Interest::Gaming,
        Interest::Travel,
    ];

    /// Human-readable chip label.
    pub fn label(self) -> &'static str {
        match self {
            Interest::Coffee => "Coffee",
            Interest::Music => "Music",
            Interest::Ai => "AI",
            Interest::Basketball => "Basketball",
            Interest::Hiking => "Hiking",
            Interest::Photography => "Photography",
            Interest::Gaming => "Gaming",
            Interest::Travel => "Travel",
        }
    }

    /// Parses a tag from its label, case-insensitively. Returns `None` for
    /// anything outside the known set.
    pub fn parse(input: &str) -> Option<Interest> {
        let input = input.trim();
        Interest::ALL
            .into_iter()
            .find(|interest| interest.label().eq_ignore_ascii_case(input))
    }
}

impl std::fmt::Display for Interest {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())
    }
}

/// A discoverable user as presented on the home screen.
///
/// Immutable in this scope: the roster is replaced wholesale on every fetch,
/// individual users are never updated in place. Duplicate interest tags
/// within one user are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier within the roster.
    pub id: String,
    /// Display name; non-empty by construction at the source.
    pub display_name: String,
    /// Ordered interest tags for this user.
    pub interests: Vec<Interest>,
}

/// Which interest tags are currently selected for roster filtering.
///
/// One flag per known tag. The all-false state is valid and means "no filter
/// active, show everyone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestSelection {
    selected: [bool; Interest::ALL.len()],
}

impl InterestSelection {
    /// A selection with no active tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects or deselects a single tag.
    pub fn set(&mut self, interest: Interest, selected: bool) {
        self.selected[interest as usize] = selected;
    }

    /// Whether the given tag is currently selected.
    pub fn is_selected(&self, interest: Interest) -> bool {
        self.selected[interest as usize]
    }

    /// Whether any tag at all is selected.
    pub fn any_selected(&self) -> bool {
        self.selected.iter().any(|flag| *flag)
    }

    /// The currently selected tags, in display order.
    pub fn active(&self) -> Vec<Interest> {
        Interest::ALL
            .into_iter()
            .filter(|interest| self.is_selected(*interest))
            .collect()
    }
}
