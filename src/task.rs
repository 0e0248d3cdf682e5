//! Task records, ID minting, and the progress engine.
//!
//! A task pairs a clamped `progress`/`limit` counter with optional metadata
//! and an optional action script. IDs are fixed-width lowercase hex tokens
//! derived from the mint time, so lexicographic order is creation order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of a task ID in hex digits.
pub const ID_WIDTH: usize = 11;

const DEFAULT_TITLE: &str = "New task";

/// Mint a fresh task ID from the given instant.
///
/// The ID is the Unix time in centiseconds rendered as zero-padded hex.
/// Two IDs minted more than 10ms apart never collide; within one process
/// invocation at most one task is ever minted.
pub fn mint_id(now: DateTime<Utc>) -> String {
    let centis = now.timestamp() as i128 * 100 + (now.timestamp_subsec_millis() / 10) as i128;
    format!("{:0width$x}", centis.max(0), width = ID_WIDTH)
}

/// Parse an ID back into its numeric timestamp value, for creation-order
/// sorting. IDs that are not hex (e.g. imported from elsewhere) yield None.
pub fn id_timestamp(id: &str) -> Option<u64> {
    u64::from_str_radix(id, 16).ok()
}

/// Thresholds derived from a deadline when it is set, marking where the
/// remaining time crosses 50% and 75%. Frozen at edit time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeadlineLimits {
    pub warn_at: DateTime<Utc>,
    pub late_at: DateTime<Utc>,
}

/// Proximity of a task to its deadline, judged against the frozen limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Clear,
    Approaching,
    Overdue,
}

/// A single trackable unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub title: String,
    pub progress: u32,
    pub limit: u32,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub script_args: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_limits: Option<DeadlineLimits>,
    pub mtime: DateTime<Utc>,
}

impl Task {
    /// A task with default field values, stamped with the given time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            progress: 0,
            limit: 1,
            script: String::new(),
            script_args: String::new(),
            comment: String::new(),
            deadline: None,
            deadline_limits: None,
            mtime: now,
        }
    }

    /// Completion ratio in `[0.0, 1.0]`. A stored limit of zero (possible
    /// only via import of foreign data) is treated as one.
    pub fn ratio(&self) -> f64 {
        f64::from(self.progress) / f64::from(self.limit.max(1))
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= self.limit
    }

    pub fn is_virgin(&self) -> bool {
        self.progress == 0
    }

    /// Add `delta` to the progress, saturating into `[0, limit]`.
    /// Over- and under-shoot clamp silently. Updates `mtime`.
    pub fn advance(&mut self, delta: i64, now: DateTime<Utc>) {
        let next = i64::from(self.progress)
            .saturating_add(delta)
            .clamp(0, i64::from(self.limit));
        self.progress = next as u32;
        self.touch(now);
    }

    /// Record a mutation time. `mtime` never moves backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.mtime {
            self.mtime = now;
        }
    }

    /// Set the deadline and freeze its warning thresholds: the window opens
    /// at 50% of the time remaining from `now`, and escalates at 75%.
    pub fn set_deadline(&mut self, deadline: DateTime<Utc>, now: DateTime<Utc>) {
        let remaining = deadline - now;
        self.deadline = Some(deadline);
        self.deadline_limits = Some(DeadlineLimits {
            warn_at: now + (remaining * 2) / 4,
            late_at: now + (remaining * 3) / 4,
        });
        self.touch(now);
    }

    pub fn clear_deadline(&mut self, now: DateTime<Utc>) {
        self.deadline = None;
        self.deadline_limits = None;
        self.touch(now);
    }

    /// Judge deadline proximity against the thresholds frozen when the
    /// deadline was set. Tasks without a deadline are always clear.
    pub fn deadline_status(&self, now: DateTime<Utc>) -> DeadlineStatus {
        match self.deadline_limits {
            Some(limits) if now >= limits.late_at => DeadlineStatus::Overdue,
            Some(limits) if now >= limits.warn_at => DeadlineStatus::Approaching,
            _ => DeadlineStatus::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn minted_ids_are_fixed_width_hex() {
        let id = mint_id(at(1_722_852_417));
        assert_eq!(id.len(), ID_WIDTH);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(id_timestamp(&id), Some(172_285_241_700));
    }

    #[test]
    fn minted_ids_order_by_creation() {
        let older = mint_id(at(1_000_000_000));
        let newer = mint_id(at(1_000_000_001));
        assert!(newer > older);
    }

    #[test]
    fn advance_clamps_to_limit() {
        let mut task = Task::new(at(0));
        task.limit = 3;
        task.advance(10, at(1));
        assert_eq!(task.progress, 3);
        // idempotent at the boundary
        task.advance(1, at(2));
        assert_eq!(task.progress, 3);
    }

    #[test]
    fn advance_clamps_at_zero() {
        let mut task = Task::new(at(0));
        task.limit = 5;
        task.progress = 2;
        task.advance(-10, at(1));
        assert_eq!(task.progress, 0);
    }

    #[test]
    fn advance_updates_mtime_monotonically() {
        let mut task = Task::new(at(100));
        task.advance(1, at(50));
        assert_eq!(task.mtime, at(100));
        task.advance(1, at(200));
        assert_eq!(task.mtime, at(200));
    }

    #[test]
    fn ratio_guards_zero_limit() {
        let mut task = Task::new(at(0));
        task.limit = 0;
        task.progress = 0;
        assert_eq!(task.ratio(), 0.0);
    }

    #[test]
    fn deadline_thresholds_split_remaining_time() {
        let now = at(0);
        let deadline = now + Duration::seconds(400);
        let mut task = Task::new(now);
        task.set_deadline(deadline, now);

        let limits = task.deadline_limits.unwrap();
        assert_eq!(limits.warn_at, at(200));
        assert_eq!(limits.late_at, at(300));

        assert_eq!(task.deadline_status(at(100)), DeadlineStatus::Clear);
        assert_eq!(task.deadline_status(at(250)), DeadlineStatus::Approaching);
        assert_eq!(task.deadline_status(at(350)), DeadlineStatus::Overdue);
    }

    #[test]
    fn deadline_thresholds_are_frozen_at_edit_time() {
        let now = at(0);
        let mut task = Task::new(now);
        task.set_deadline(now + Duration::seconds(400), now);
        let frozen = task.deadline_limits.unwrap();

        // later mutations do not move the thresholds
        task.advance(1, at(390));
        assert_eq!(task.deadline_limits.unwrap(), frozen);
    }
}
