//! Leaderboard value objects.

use serde::{Deserialize, Serialize};

use crate::slot::Slot;

/// One ranked user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Chat username.
    pub user: String,
    /// Number of IN slots in the window.
    pub count: u32,
}

/// Rank users by slot count, descending.
///
/// `slots` must be ordered by admission time ascending; ties keep the order
/// in which each user first appears.
pub fn rank(slots: &[Slot]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    for slot in slots {
        match entries.iter_mut().find(|e| e.user == slot.user) {
            Some(entry) => entry.count += 1,
            None => entries.push(LeaderboardEntry {
                user: slot.user.clone(),
                count: 1,
            }),
        }
    }
    // stable sort keeps first-seen order among equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Render `user(count), ...` or `none`.
pub fn render(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "none".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{}({})", e.user, e.count))
        .collect::<Vec<_>>()
        .join(", ")
}
