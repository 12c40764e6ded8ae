//! Rankings of played (IN) slots over rolling windows.

use std::sync::Arc;

use slotbot_core::result::AppResult;
use slotbot_core::traits::Clock;
use slotbot_core::types::{LeaderboardPeriod, ReferenceZone};
use slotbot_database::SlotStore;
use slotbot_entity::leaderboard::{LeaderboardEntry, rank};
use slotbot_entity::slot::SlotFilter;

/// Read-only leaderboard queries.
pub struct LeaderboardService {
    store: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    zone: ReferenceZone,
}

impl std::fmt::Debug for LeaderboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardService")
            .field("zone", &self.zone)
            .finish()
    }
}

impl LeaderboardService {
    /// Creates a new leaderboard service.
    pub fn new(store: Arc<dyn SlotStore>, clock: Arc<dyn Clock>, zone: ReferenceZone) -> Self {
        Self { store, clock, zone }
    }

    /// Full ranking for `period`, window computed now.
    pub async fn ranking(&self, period: LeaderboardPeriod) -> AppResult<Vec<LeaderboardEntry>> {
        let now = self.clock.now();
        let start = period.window_start(now, self.zone);
        let played = self.store.find(&SlotFilter::played_between(start, now)).await?;
        Ok(rank(&played))
    }

    /// The first `n` entries.
    pub async fn top(&self, period: LeaderboardPeriod, n: usize) -> AppResult<Vec<LeaderboardEntry>> {
        let mut entries = self.ranking(period).await?;
        entries.truncate(n);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use slotbot_core::traits::ManualClock;
    use slotbot_database::MemoryDatabase;
    use slotbot_entity::chat::Badges;
    use slotbot_entity::slot::{NewSlot, SlotPatch, SlotStatus};
    use uuid::Uuid;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    async fn played(db: &MemoryDatabase, user: &str, time: DateTime<Utc>, status: SlotStatus) {
        let slot = SlotStore::insert(
            db,
            NewSlot {
                session_id: Uuid::nil(),
                time,
                local_date: time.date_naive(),
                user: user.to_string(),
                message: format!("{user}-{time}"),
                badges: Badges::default(),
            },
        )
        .await
        .unwrap();
        db.update(
            slot.id,
            &SlotPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_windows_and_status_filter() {
        let now = at("2024-05-10T20:00:00Z");
        let db = MemoryDatabase::new();
        played(&db, "alice", now - Duration::hours(2), SlotStatus::In).await;
        played(&db, "bob", now - Duration::hours(1), SlotStatus::In).await;
        played(&db, "bob", now - Duration::minutes(30), SlotStatus::In).await;
        played(&db, "carol", now - Duration::minutes(10), SlotStatus::Out).await;
        played(&db, "alice", now - Duration::days(3), SlotStatus::In).await;
        played(&db, "dave", now - Duration::days(20), SlotStatus::In).await;
        played(&db, "erin", now - Duration::days(40), SlotStatus::In).await;

        let service = LeaderboardService::new(
            Arc::new(db),
            Arc::new(ManualClock::new(now)),
            ReferenceZone::utc(),
        );

        let daily = service.ranking(LeaderboardPeriod::Daily).await.unwrap();
        let daily: Vec<_> = daily.iter().map(|e| (e.user.as_str(), e.count)).collect();
        assert_eq!(daily, [("bob", 2), ("alice", 1)]);

        let weekly = service.ranking(LeaderboardPeriod::Weekly).await.unwrap();
        let weekly: Vec<_> = weekly.iter().map(|e| (e.user.as_str(), e.count)).collect();
        assert_eq!(weekly, [("alice", 2), ("bob", 2)]);

        let monthly = service.top(LeaderboardPeriod::Monthly, 5).await.unwrap();
        assert_eq!(monthly.len(), 3);
        assert_eq!(monthly[2].user, "dave");

        let again = service.top(LeaderboardPeriod::Monthly, 5).await.unwrap();
        assert_eq!(monthly, again);
    }
}
