use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MILLIS_PER_MINUTE: i64 = 1000 * 60;

/// A `Contest` is a long-lived simulated live contest. It is created by an
/// external administrative surface in `Scheduled` status and from then on is
/// advanced exclusively by the contest ticker.
#[derive(Debug, Clone)]
pub struct Contest {
    pub id: ID,
    pub title: String,
    /// Selects the simulation profile used while the contest is live.
    pub sport: Sport,
    /// Scheduled kickoff in unix millis.
    pub start_ts: i64,
    /// Playing time in minutes. A contest without a duration can go live
    /// but is never finished by time alone.
    pub duration: Option<i64>,
    pub status: ContestStatus,
    /// Cache of the last simulated snapshot. The update log owned by
    /// `ContestUpdate` is the authoritative history.
    pub state: Option<serde_json::Value>,
    /// Subscriber that receives realtime notifications for this contest.
    pub owner_id: Option<ID>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Scheduled,
    Live,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
    Generic,
}

#[derive(Error, Debug, PartialEq)]
pub enum StatusTransitionError {
    #[error("Contest cannot go from {from:?} to {to:?}")]
    NotMonotonic {
        from: ContestStatus,
        to: ContestStatus,
    },
}

impl Contest {
    pub fn new(title: String, sport: Sport, start_ts: i64, duration: Option<i64>) -> Self {
        Self {
            id: Default::default(),
            title,
            sport,
            start_ts,
            duration,
            status: ContestStatus::Scheduled,
            state: None,
            owner_id: None,
        }
    }

    /// End of the playing window in unix millis, when a duration is set.
    pub fn end_ts(&self) -> Option<i64> {
        self.duration
            .map(|minutes| self.start_ts + minutes * MILLIS_PER_MINUTE)
    }

    /// Transitions `Scheduled -> Live`. Transitions are one-directional and
    /// may not be skipped.
    pub fn go_live(&mut self) -> Result<(), StatusTransitionError> {
        self.transition(ContestStatus::Live)
    }

    /// Transitions `Live -> Finished`.
    pub fn finish(&mut self) -> Result<(), StatusTransitionError> {
        self.transition(ContestStatus::Finished)
    }

    fn transition(&mut self, to: ContestStatus) -> Result<(), StatusTransitionError> {
        let allowed = matches!(
            (self.status, to),
            (ContestStatus::Scheduled, ContestStatus::Live)
                | (ContestStatus::Live, ContestStatus::Finished)
        );
        if !allowed {
            return Err(StatusTransitionError::NotMonotonic {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for Contest {
    fn id(&self) -> &ID {
        &self.id
    }
}
