mod contest;
mod contest_update;
mod push_target;
mod reminder;
mod shared;
mod simulation;

pub use contest::{Contest, ContestStatus, Sport, StatusTransitionError};
pub use contest_update::{ContestUpdate, UpdatePayload};
pub use push_target::PushTarget;
pub use reminder::{Recurrence, Reminder};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use simulation::{simulate_step, ScoreState};
