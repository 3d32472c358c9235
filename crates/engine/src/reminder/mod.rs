mod send_due_reminders;

pub use send_due_reminders::{ReminderPassSummary, SendDueRemindersUseCase};
