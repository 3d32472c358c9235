use crate::shared::usecase::UseCase;
use courtside_domain::{PushTarget, Reminder};
use courtside_infra::{CourtsideContext, PushPayload};
use tracing::{error, info, warn};

/// One pass over every reminder whose effective due instant has arrived,
/// using a single `now` snapshot for the whole pass.
///
/// Delivery is best-effort and independent per target. The reminder's own
/// advancement is committed after the delivery attempts, so a crash in
/// between re-fires the reminder on the next pass: duplicates are possible,
/// lost transitions are not.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct ReminderPassSummary {
    pub fired: usize,
    pub deliveries: usize,
    pub delivery_failures: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for SendDueRemindersUseCase {
    type Response = ReminderPassSummary;
    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &CourtsideContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        let due = ctx.repos.reminders.find_due(now).await.map_err(|e| {
            error!("Unable to scan due reminders: {:?}", e);
            UseCaseError::StorageError
        })?;
        let mut summary = ReminderPassSummary::default();
        if due.is_empty() {
            return Ok(summary);
        }
        info!("Found {} due reminders", due.len());

        let targets = ctx.repos.push_targets.find_all().await.map_err(|e| {
            error!("Unable to load push targets: {:?}", e);
            UseCaseError::StorageError
        })?;
        if ctx.push.is_none() || targets.is_empty() {
            warn!("No push transport or targets available; due reminders advance without delivery");
        }

        for reminder in due {
            summary.fired += 1;
            self.deliver_to_targets(&reminder, &targets, ctx, &mut summary)
                .await;

            let mut advanced = reminder;
            advanced.advance_after_fire();
            if let Err(e) = ctx.repos.reminders.save(&advanced).await {
                // Not advanced: the reminder fires again next pass, which
                // the at-least-once contract allows.
                error!("Unable to advance reminder {}: {:?}", advanced.id, e);
            }
        }
        Ok(summary)
    }
}

impl SendDueRemindersUseCase {
    async fn deliver_to_targets(
        &self,
        reminder: &Reminder,
        targets: &[PushTarget],
        ctx: &CourtsideContext,
        summary: &mut ReminderPassSummary,
    ) {
        let dispatcher = match &ctx.push {
            Some(dispatcher) => dispatcher,
            None => return,
        };

        let payload = PushPayload {
            title: "Courtside Reminder".into(),
            body: reminder.body.clone(),
            session_id: reminder.session_id.clone(),
            user_id: reminder.user_id.clone(),
        };

        // Owned reminders can be scoped to the owner's targets; everything
        // else fans out globally.
        let scoped_owner = if ctx.config.scope_push_to_owner {
            reminder.user_id.as_ref()
        } else {
            None
        };

        for target in targets {
            if let Some(owner_id) = scoped_owner {
                if target.user_id.as_ref() != Some(owner_id) {
                    continue;
                }
            }
            match dispatcher.deliver(target, &payload).await {
                Ok(()) => summary.deliveries += 1,
                Err(e) => {
                    warn!(
                        "Push delivery to {} failed for reminder {}: {:?}",
                        target.endpoint, reminder.id, e
                    );
                    summary.delivery_failures += 1;
                }
            }
        }
    }
}
