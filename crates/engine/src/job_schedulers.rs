use crate::{
    contest::{ContestListener, TickContestsUseCase},
    reminder::SendDueRemindersUseCase,
    shared::usecase::execute,
};
use courtside_infra::CourtsideContext;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, sleep};
use tracing::{info, warn};

/// Seconds until the next wall-clock minute boundary, so reminder scans
/// line up with the instants reminders are usually created for.
pub fn secs_until_minute_boundary(now_millis: i64) -> u64 {
    (60 - (now_millis / 1000) % 60) as u64
}

/// Drives the contest lifecycle pass. A tick that arrives while the
/// previous one is still in flight is skipped, never interleaved.
pub struct ContestTicker {
    ctx: CourtsideContext,
    listeners: Vec<Arc<dyn ContestListener>>,
    in_flight: Mutex<()>,
}

impl ContestTicker {
    pub fn new(ctx: CourtsideContext, listeners: Vec<Arc<dyn ContestListener>>) -> Self {
        Self {
            ctx,
            listeners,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn tick(&self) {
        let _pass = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Contest tick requested while one is in flight, skipping");
                return;
            }
        };
        let usecase = TickContestsUseCase::new(self.listeners.clone(), StdRng::from_entropy());
        // Pass outcomes are logged by the executor; the timer never sees an
        // error.
        let _ = execute(usecase, &self.ctx).await;
    }
}

/// Drives the reminder due-scan with the same single-flight discipline.
pub struct ReminderScheduler {
    ctx: CourtsideContext,
    in_flight: Mutex<()>,
}

impl ReminderScheduler {
    pub fn new(ctx: CourtsideContext) -> Self {
        Self {
            ctx,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn check_and_send(&self) {
        let _pass = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Reminder scan requested while one is in flight, skipping");
                return;
            }
        };
        let _ = execute(SendDueRemindersUseCase, &self.ctx).await;
    }
}

pub fn start_contest_ticker(ticker: Arc<ContestTicker>) {
    let interval_secs = ticker.ctx.config.contest_tick_interval_secs;
    info!("Contest ticker started (every {}s)", interval_secs);
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_secs(interval_secs));
        loop {
            tick_interval.tick().await;
            ticker.tick().await;
        }
    });
}

pub fn start_reminder_scheduler(scheduler: Arc<ReminderScheduler>) {
    let interval_secs = scheduler.ctx.config.reminder_tick_interval_secs;
    info!("Reminder scheduler started (every {}s)", interval_secs);
    tokio::spawn(async move {
        // Catch anything already overdue, then align scans to the minute.
        scheduler.check_and_send().await;
        let now = scheduler.ctx.sys.get_timestamp_millis();
        sleep(Duration::from_secs(secs_until_minute_boundary(now))).await;
        let mut scan_interval = interval(Duration::from_secs(interval_secs));
        loop {
            scan_interval.tick().await;
            scheduler.check_and_send().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_domain::{Contest, ContestStatus, Sport};
    use courtside_infra::ISys;

    #[test]
    fn minute_boundary_delay() {
        assert_eq!(secs_until_minute_boundary(50 * 1000), 10);
        assert_eq!(secs_until_minute_boundary(60 * 1000), 60);
        assert_eq!(secs_until_minute_boundary(59 * 1000), 1);
        assert_eq!(secs_until_minute_boundary(61 * 1000), 59);
    }

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    #[tokio::test]
    async fn manual_tick_advances_contests() {
        let mut ctx = CourtsideContext::create_for_tests();
        let now = 1_613_862_000_000;
        ctx.sys = Arc::new(StaticTimeSys(now));
        let contest = Contest::new("m".into(), Sport::Football, now - 1, Some(90));
        ctx.repos.contests.insert(&contest).await.unwrap();

        let ticker = ContestTicker::new(ctx.clone(), vec![]);
        ticker.tick().await;

        let stored = ctx.repos.contests.find(&contest.id).await.unwrap();
        assert_eq!(stored.status, ContestStatus::Live);
    }

    #[tokio::test]
    async fn reentrant_tick_is_skipped_while_one_holds_the_guard() {
        let ctx = CourtsideContext::create_for_tests();
        let ticker = ContestTicker::new(ctx, vec![]);

        let guard = ticker.in_flight.try_lock().unwrap();
        // With the guard held this returns immediately instead of queueing
        // a second interleaved pass.
        ticker.tick().await;
        drop(guard);

        ticker.tick().await;
    }
}
