//! Idempotent like/unlike toggle, shared by post and comment likes.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Disliked,
}

impl LikeAction {
    pub fn as_message(self) -> &'static str {
        match self {
            Self::Liked => "LIKED",
            Self::Disliked => "DISLIKED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub new_count: u64,
    pub action: LikeAction,
}

/// Toggles `target` in the user's liked-id list and computes the new
/// counter value for the entity.
///
/// A missing counter is treated as 0 and the result floors at 0, so a
/// dislike never drives the count negative. The liked-id list is an
/// insertion-ordered set: a like appends, a dislike removes the first
/// occurrence.
///
/// Callers must persist the updated list and the returned count together;
/// `Store` does both under one lock pair.
pub fn toggle_like(current: Option<u64>, liked_ids: &mut Vec<Uuid>, target: Uuid) -> ToggleOutcome {
    match liked_ids.iter().position(|id| *id == target) {
        Some(index) => {
            liked_ids.remove(index);
            ToggleOutcome {
                new_count: current.unwrap_or(0).saturating_sub(1),
                action: LikeAction::Disliked,
            }
        }
        None => {
            liked_ids.push(target);
            ToggleOutcome {
                new_count: current.unwrap_or(0) + 1,
                action: LikeAction::Liked,
            }
        }
    }
}

/// Membership test backing the check-like-status endpoints. Agrees with
/// the state left by the last successful toggle.
pub fn is_liked(liked_ids: &[Uuid], target: Uuid) -> bool {
    liked_ids.contains(&target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_like_on_untouched_entity() {
        let target = Uuid::new_v4();
        let mut liked = Vec::new();

        let outcome = toggle_like(None, &mut liked, target);

        assert_eq!(outcome.action, LikeAction::Liked);
        assert_eq!(outcome.new_count, 1);
        assert_eq!(liked, vec![target]);
        assert!(is_liked(&liked, target));
    }

    #[test]
    fn second_toggle_returns_to_empty() {
        let target = Uuid::new_v4();
        let mut liked = Vec::new();

        let first = toggle_like(None, &mut liked, target);
        let second = toggle_like(Some(first.new_count), &mut liked, target);

        assert_eq!(second.action, LikeAction::Disliked);
        assert_eq!(second.new_count, 0);
        assert!(liked.is_empty());
        assert!(!is_liked(&liked, target));
    }

    #[test]
    fn dislike_floors_at_zero() {
        // Membership without a counter: the dislike must not underflow.
        let target = Uuid::new_v4();
        let mut liked = vec![target];

        let outcome = toggle_like(None, &mut liked, target);

        assert_eq!(outcome.action, LikeAction::Disliked);
        assert_eq!(outcome.new_count, 0);

        let mut liked = vec![target];
        let outcome = toggle_like(Some(0), &mut liked, target);
        assert_eq!(outcome.new_count, 0);
    }

    #[test]
    fn round_trip_preserves_count_when_started_positive() {
        let target = Uuid::new_v4();
        let mut liked = Vec::new();

        let first = toggle_like(Some(5), &mut liked, target);
        assert_eq!(first.new_count, 6);
        let second = toggle_like(Some(first.new_count), &mut liked, target);
        assert_eq!(second.new_count, 5);
    }

    #[test]
    fn dislike_removes_first_occurrence_only() {
        let target = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut liked = vec![other, target, other];

        toggle_like(Some(3), &mut liked, target);

        assert_eq!(liked, vec![other, other]);
    }

    #[test]
    fn insertion_order_is_kept() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut liked = Vec::new();

        for id in [a, b, c] {
            toggle_like(None, &mut liked, id);
        }
        toggle_like(Some(1), &mut liked, b);

        assert_eq!(liked, vec![a, c]);
    }
}
