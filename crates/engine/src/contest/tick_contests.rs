use super::listener::{publish_to_listeners, ContestListener, ContestNotification};
use crate::shared::usecase::UseCase;
use courtside_domain::{
    simulate_step, Contest, ContestStatus, ContestUpdate, ScoreState, UpdatePayload,
};
use courtside_infra::CourtsideContext;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

/// One scan-and-advance pass over every contest not yet finished.
///
/// The pass evaluates each contest against a single `now` captured at the
/// start, applies at most one status transition per contest, appends the
/// matching update record and publishes the notification to the listener
/// set. A contest whose whole window fits inside one tick interval starts
/// on one pass and finishes on the next.
pub struct TickContestsUseCase {
    listeners: Vec<Arc<dyn ContestListener>>,
    rng: StdRng,
}

impl TickContestsUseCase {
    pub fn new(listeners: Vec<Arc<dyn ContestListener>>, rng: StdRng) -> Self {
        Self { listeners, rng }
    }
}

impl fmt::Debug for TickContestsUseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickContestsUseCase")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TickSummary {
    pub started: usize,
    pub updated: usize,
    pub finished: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

enum Outcome {
    Started,
    Updated,
    Finished,
    NotStartedYet,
    Skipped,
}

#[async_trait::async_trait]
impl UseCase for TickContestsUseCase {
    type Response = TickSummary;
    type Error = UseCaseError;

    const NAME: &'static str = "TickContests";

    async fn execute(&mut self, ctx: &CourtsideContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        let contests = ctx.repos.contests.find_unfinished().await.map_err(|e| {
            error!("Unable to scan unfinished contests: {:?}", e);
            UseCaseError::StorageError
        })?;

        let mut summary = TickSummary::default();
        for contest in contests {
            let contest_id = contest.id.clone();
            match self.process_contest(contest, now, ctx).await {
                Ok(Outcome::Started) => summary.started += 1,
                Ok(Outcome::Updated) => summary.updated += 1,
                Ok(Outcome::Finished) => summary.finished += 1,
                Ok(Outcome::NotStartedYet) | Ok(Outcome::Skipped) => {}
                Err(e) => {
                    // One broken contest must not abort the pass; the next
                    // tick retries it naturally.
                    error!("Skipping contest {} this pass: {:?}", contest_id, e);
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }
}

impl TickContestsUseCase {
    async fn process_contest(
        &mut self,
        mut contest: Contest,
        now: i64,
        ctx: &CourtsideContext,
    ) -> anyhow::Result<Outcome> {
        match contest.status {
            ContestStatus::Finished => {
                warn!(
                    "Finished contest {} returned by the unfinished scan",
                    contest.id
                );
                Ok(Outcome::Skipped)
            }
            ContestStatus::Scheduled if now >= contest.start_ts => {
                contest.go_live()?;
                ctx.repos.contests.save(&contest).await?;
                ctx.repos
                    .contest_updates
                    .insert(&ContestUpdate::new(
                        contest.id.clone(),
                        UpdatePayload::Started,
                        now,
                    ))
                    .await?;
                publish_to_listeners(&self.listeners, &ContestNotification::started(&contest))
                    .await;
                Ok(Outcome::Started)
            }
            ContestStatus::Scheduled => Ok(Outcome::NotStartedYet),
            ContestStatus::Live => {
                if contest.end_ts().map(|end_ts| now >= end_ts).unwrap_or(false) {
                    contest.finish()?;
                    ctx.repos.contests.save(&contest).await?;
                    ctx.repos
                        .contest_updates
                        .insert(&ContestUpdate::new(
                            contest.id.clone(),
                            UpdatePayload::Finished,
                            now,
                        ))
                        .await?;
                    publish_to_listeners(
                        &self.listeners,
                        &ContestNotification::finished(&contest),
                    )
                    .await;
                    return Ok(Outcome::Finished);
                }

                let prev = match &contest.state {
                    Some(value) => match ScoreState::parse(value) {
                        Ok(state) => state,
                        Err(e) => {
                            warn!(
                                "Contest {} has a malformed state blob, resetting: {:?}",
                                contest.id, e
                            );
                            ScoreState::default()
                        }
                    },
                    None => ScoreState::default(),
                };

                let next = simulate_step(&prev, &contest.sport, &mut self.rng);
                contest.state = Some(next.to_value());
                ctx.repos.contests.save(&contest).await?;
                ctx.repos
                    .contest_updates
                    .insert(&ContestUpdate::new(
                        contest.id.clone(),
                        UpdatePayload::Update {
                            state: next.to_value(),
                        },
                        now,
                    ))
                    .await?;
                publish_to_listeners(
                    &self.listeners,
                    &ContestNotification::updated(&contest, next),
                )
                .await;
                Ok(Outcome::Updated)
            }
        }
    }
}
