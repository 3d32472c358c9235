use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

const MILLIS_PER_MINUTE: i64 = 1000 * 60;
const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// A time-triggered notification request. Created, edited and deleted by
/// external request handlers; mutated by the reminder scheduler on fire and
/// by `snooze`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub session_id: Option<ID>,
    pub user_id: Option<ID>,
    pub body: String,
    /// Nominal fire instant in unix millis.
    pub fire_at: Option<i64>,
    /// Overrides `fire_at` for the next firing when present.
    pub snooze_until: Option<i64>,
    pub recurrence: Recurrence,
    pub triggered: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
}

impl Recurrence {
    pub fn period_millis(&self) -> Option<i64> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => Some(MILLIS_PER_DAY),
            Recurrence::Weekly => Some(7 * MILLIS_PER_DAY),
        }
    }
}

impl Reminder {
    pub fn new(body: String, fire_at: Option<i64>, recurrence: Recurrence) -> Self {
        Self {
            id: Default::default(),
            session_id: None,
            user_id: None,
            body,
            fire_at,
            snooze_until: None,
            recurrence,
            triggered: false,
            enabled: true,
        }
    }

    /// The instant used to decide due-ness: snooze-until when set, else the
    /// nominal fire instant.
    pub fn effective_due_at(&self) -> Option<i64> {
        self.snooze_until.or(self.fire_at)
    }

    pub fn is_due(&self, now: i64) -> bool {
        if !self.enabled || self.triggered {
            return false;
        }
        match self.effective_due_at() {
            Some(due_at) => due_at <= now,
            None => false,
        }
    }

    /// Advances the reminder after a firing. Non-recurring reminders become
    /// terminal. Recurring reminders get their fire instant moved exactly
    /// one period past the anchor and return to the due-scan pool.
    ///
    /// The anchor is the nominal fire instant; the snooze-until only serves
    /// as a fallback anchor when no nominal instant exists. Snoozing a
    /// recurring reminder therefore shifts one firing without moving the
    /// underlying cadence.
    pub fn advance_after_fire(&mut self) {
        match self.recurrence.period_millis() {
            None => {
                self.triggered = true;
            }
            Some(period) => {
                let anchor = self.fire_at.or(self.snooze_until);
                self.fire_at = anchor.map(|ts| ts + period);
                self.snooze_until = None;
                self.triggered = false;
            }
        }
    }

    /// Pushes the next firing `minutes` past the latest of the prior
    /// snooze-until, the nominal fire instant and `now`, and re-arms a
    /// triggered reminder.
    pub fn snooze(&mut self, minutes: i64, now: i64) {
        let base = self
            .snooze_until
            .into_iter()
            .chain(self.fire_at)
            .chain(Some(now))
            .max()
            .unwrap_or(now);
        self.snooze_until = Some(base + minutes * MILLIS_PER_MINUTE);
        self.triggered = false;
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_613_862_000_000;

    fn reminder(fire_at: Option<i64>, recurrence: Recurrence) -> Reminder {
        Reminder::new("stretch break".into(), fire_at, recurrence)
    }

    #[test]
    fn due_when_fire_instant_has_passed() {
        let r = reminder(Some(T0), Recurrence::None);
        assert!(!r.is_due(T0 - 1));
        assert!(r.is_due(T0));
        assert!(r.is_due(T0 + 1));
    }

    #[test]
    fn snooze_until_overrides_fire_instant() {
        let mut r = reminder(Some(T0), Recurrence::None);
        r.snooze_until = Some(T0 + MILLIS_PER_MINUTE);
        assert!(!r.is_due(T0));
        assert!(r.is_due(T0 + MILLIS_PER_MINUTE));
    }

    #[test]
    fn never_due_without_any_instant() {
        let r = reminder(None, Recurrence::None);
        assert!(!r.is_due(i64::MAX));
    }

    #[test]
    fn disabled_or_triggered_is_not_due() {
        let mut r = reminder(Some(T0), Recurrence::None);
        r.enabled = false;
        assert!(!r.is_due(T0));

        let mut r = reminder(Some(T0), Recurrence::None);
        r.triggered = true;
        assert!(!r.is_due(T0));
    }

    #[test]
    fn non_recurring_fire_is_terminal() {
        let mut r = reminder(Some(T0), Recurrence::None);
        r.advance_after_fire();
        assert!(r.triggered);
        assert!(!r.is_due(i64::MAX));
    }

    #[test]
    fn daily_fire_moves_anchor_one_day() {
        let mut r = reminder(Some(T0), Recurrence::Daily);
        r.snooze_until = Some(T0 + 5 * MILLIS_PER_MINUTE);
        r.advance_after_fire();
        assert_eq!(r.fire_at, Some(T0 + MILLIS_PER_DAY));
        assert_eq!(r.snooze_until, None);
        assert!(!r.triggered);
    }

    #[test]
    fn weekly_fire_moves_anchor_seven_days() {
        let mut r = reminder(Some(T0), Recurrence::Weekly);
        r.advance_after_fire();
        assert_eq!(r.fire_at, Some(T0 + 7 * MILLIS_PER_DAY));
    }

    #[test]
    fn recurring_fire_falls_back_to_snooze_anchor() {
        let mut r = reminder(None, Recurrence::Daily);
        r.snooze_until = Some(T0);
        r.advance_after_fire();
        assert_eq!(r.fire_at, Some(T0 + MILLIS_PER_DAY));
        assert_eq!(r.snooze_until, None);
    }

    #[test]
    fn snooze_uses_latest_known_instant_as_base() {
        // Overdue reminder: base is now, not the stale fire instant.
        let mut r = reminder(Some(T0), Recurrence::None);
        let now = T0 + MILLIS_PER_DAY;
        r.snooze(5, now);
        assert_eq!(r.snooze_until, Some(now + 5 * MILLIS_PER_MINUTE));

        // Future reminder: base is the fire instant.
        let mut r = reminder(Some(T0 + MILLIS_PER_DAY), Recurrence::None);
        r.snooze(5, T0);
        assert_eq!(
            r.snooze_until,
            Some(T0 + MILLIS_PER_DAY + 5 * MILLIS_PER_MINUTE)
        );
    }

    #[test]
    fn snooze_rearms_a_triggered_reminder() {
        let mut r = reminder(Some(T0), Recurrence::None);
        r.advance_after_fire();
        assert!(r.triggered);

        r.snooze(10, T0);
        assert!(!r.triggered);
        assert!(r.is_due(T0 + 10 * MILLIS_PER_MINUTE));
    }
}
