#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use uuid::Uuid;

pub struct SessionId {}

impl SessionId {
    /// Creates an id in the form `session-<unix millis>-<8 hex chars>`.
    pub fn create() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| return elapsed.as_millis())
            .unwrap_or_default();

        let suffix = Uuid::new_v4()
            .to_string()
            .split('-')
            .next()
            .unwrap_or_default()
            .to_string();

        return format!("session-{millis}-{suffix}");
    }

    /// Creates a fresh id that is guaranteed to differ from `previous`.
    pub fn regenerate(previous: &str) -> String {
        loop {
            let id = SessionId::create();
            if id != previous {
                return id;
            }
        }
    }
}
