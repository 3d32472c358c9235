mod listener;
mod tick_contests;

pub use listener::{publish_to_listeners, ContestListener, ContestNotification, FanoutListener};
pub use tick_contests::{TickContestsUseCase, TickSummary};
