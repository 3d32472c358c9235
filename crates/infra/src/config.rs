use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tracing::{info, warn};

const JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between contest ticker passes.
    pub contest_tick_interval_secs: u64,
    /// Seconds between reminder due-scans.
    pub reminder_tick_interval_secs: u64,
    /// When true, reminders with an owning user are delivered only to that
    /// user's push targets instead of fanning out to every target.
    pub scope_push_to_owner: bool,
    /// Server credential attached to outbound push deliveries. Absent means
    /// no delivery transport is configured.
    pub push_api_key: Option<String>,
    /// Secret used to validate inbound connection tokens.
    pub jwt_secret: String,
}

impl Config {
    pub fn new() -> Self {
        let contest_tick_interval_secs = env_interval("CONTEST_TICK_INTERVAL_SECS", 30);
        let reminder_tick_interval_secs = env_interval("REMINDER_TICK_INTERVAL_SECS", 60);

        let scope_push_to_owner = std::env::var("PUSH_SCOPE_TO_OWNER")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let push_api_key = std::env::var("PUSH_API_KEY").ok();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find JWT_SECRET environment variable. Going to create one.");
                random_secret(JWT_SECRET_LEN)
            }
        };

        Self {
            contest_tick_interval_secs,
            reminder_tick_interval_secs,
            scope_push_to_owner,
            push_api_key,
            jwt_secret,
        }
    }

    pub fn for_tests() -> Self {
        Self {
            contest_tick_interval_secs: 30,
            reminder_tick_interval_secs: 60,
            scope_push_to_owner: false,
            push_api_key: None,
            jwt_secret: "test-secret".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_interval(var: &str, default_secs: u64) -> u64 {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}s.",
                    var, raw, default_secs
                );
                default_secs
            }
        },
        Err(_) => default_secs,
    }
}

fn random_secret(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_secret_of_requested_length() {
        assert_eq!(random_secret(32).len(), 32);
        assert_ne!(random_secret(32), random_secret(32));
    }
}
