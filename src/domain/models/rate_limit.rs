#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

/// Minimum interval between accepted sends.
pub const COOLDOWN: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SendGate {
    Ready,
    InFlight,
    CoolingDown(Instant),
}

pub struct RateLimit {
    window: Duration,
    last_send: Option<Instant>,
    gate: SendGate,
}

impl Default for RateLimit {
    fn default() -> RateLimit {
        return RateLimit::new(COOLDOWN);
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    if duration.is_zero() {
        return None;
    }

    return Some(duration);
}

impl RateLimit {
    pub fn new(window: Duration) -> RateLimit {
        return RateLimit {
            window,
            last_send: None,
            gate: SendGate::Ready,
        };
    }

    pub fn gate(&self, now: Instant) -> SendGate {
        if let SendGate::CoolingDown(until) = self.gate {
            if now >= until {
                return SendGate::Ready;
            }
        }

        return self.gate;
    }

    /// Time left before another send is accepted, or `None` when sending is
    /// open.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let since_send = self.last_send.and_then(|last| {
            let elapsed = now.saturating_duration_since(last);
            return non_zero(self.window.saturating_sub(elapsed));
        });

        match self.gate(now) {
            SendGate::Ready => return since_send,
            // Sending reopens one window after the reply lands.
            SendGate::InFlight => return since_send.or(Some(self.window)),
            SendGate::CoolingDown(until) => {
                let gate_left = non_zero(until.saturating_duration_since(now));
                return since_send.max(gate_left);
            }
        }
    }

    #[cfg(test)]
    pub fn is_ready(&self, now: Instant) -> bool {
        return self.remaining(now).is_none();
    }

    /// Marks a send as accepted and the request as outstanding.
    pub fn record_send(&mut self, now: Instant) {
        self.last_send = Some(now);
        self.gate = SendGate::InFlight;
    }

    /// Called once the outcome of the outstanding request is known.
    pub fn settle(&mut self, now: Instant) {
        self.gate = SendGate::CoolingDown(now + self.window);
    }

    /// Whole seconds to report to the user, rounded up and never zero.
    pub fn wait_seconds(remaining: Duration) -> u64 {
        let millis = remaining.as_millis() as u64;
        return ((millis + 999) / 1000).max(1);
    }
}
