//! Interest-based roster filtering.

use mingle_bridge::roster::{InterestSelection, User};

/// Applies the interest filter to a roster.
///
/// With no tag selected the roster passes through unchanged. Otherwise a
/// user is kept when any one of their tags is selected (OR across tags, not
/// AND), and the result preserves roster order. Pure: same inputs always
/// yield the same output, no I/O, no side effects.
pub fn apply_filter(roster: &[User], selection: &InterestSelection) -> Vec<User> {
    if !selection.any_selected() {
        return roster.to_vec();
    }

    roster
        .iter()
        .filter(|user| user.interests.iter().any(|tag| selection.is_selected(*tag)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mingle_bridge::roster::Interest;

    fn user(id: &str, name: &str, interests: &[Interest]) -> User {
        User {
            id: id.to_string(),
            display_name: name.to_string(),
            interests: interests.to_vec(),
        }
    }

    fn sample() -> Vec<User> {
        vec![
            user("u-01", "Alex", &[Interest::Coffee, Interest::Ai]),
            user("u-02", "Maria", &[Interest::Music, Interest::Basketball]),
            user("u-03", "Sam", &[Interest::Ai, Interest::Music]),
        ]
    }

    fn selection_of(tags: &[Interest]) -> InterestSelection {
        let mut selection = InterestSelection::new();
        for tag in tags {
            selection.set(*tag, true);
        }
        selection
    }

    #[test]
    fn empty_selection_is_identity() {
        let roster = sample();
        assert_eq!(apply_filter(&roster, &InterestSelection::new()), roster);
    }

    #[test]
    fn single_tag_keeps_exactly_the_users_carrying_it() {
        let roster = sample();
        let filtered = apply_filter(&roster, &selection_of(&[Interest::Ai]));
        let ids: Vec<&str> = filtered.iter().map(|user| user.id.as_str()).collect();
        assert_eq!(ids, ["u-01", "u-03"]);
    }

    #[test]
    fn tags_combine_as_or_and_order_is_preserved() {
        let roster = sample();
        let filtered = apply_filter(
            &roster,
            &selection_of(&[Interest::Basketball, Interest::Coffee]),
        );
        let ids: Vec<&str> = filtered.iter().map(|user| user.id.as_str()).collect();
        assert_eq!(ids, ["u-01", "u-02"]);
    }

    #[test]
    fn result_is_a_subsequence_of_the_roster() {
        let roster = sample();
        let filtered = apply_filter(&roster, &selection_of(&[Interest::Music]));
        let mut remaining = roster.iter();
        for kept in &filtered {
            assert!(
                remaining.any(|original| original == kept),
                "filtered user {} out of roster order",
                kept.id
            );
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let roster = sample();
        let selection = selection_of(&[Interest::Ai, Interest::Music]);
        let once = apply_filter(&roster, &selection);
        assert_eq!(apply_filter(&once, &selection), once);
    }

    #[test]
    fn no_match_yields_an_empty_view() {
        let roster = sample();
        let filtered = apply_filter(&roster, &selection_of(&[Interest::Travel]));
        assert!(filtered.is_empty());
    }
}
