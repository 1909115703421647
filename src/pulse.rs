//! Deferred clearing of the `firing` flag.
//!
//! The pulse only exists so a UI can flash a transition after it deposits, so it
//! runs on host-reported real time rather than the simulation clock. The queue
//! never touches tokens.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Pulse {
    transition_id: String,
    remaining: Duration,
}

#[derive(Debug, Clone)]
pub struct PulseQueue {
    duration: Duration,
    pending: Vec<Pulse>,
}

impl PulseQueue {
    pub fn new(duration: Duration) -> Self {
        PulseQueue {
            duration,
            pending: Vec::new(),
        }
    }

    /// Starts (or restarts) the pulse for a transition.
    pub fn schedule(&mut self, transition_id: &str) {
        self.cancel(transition_id);
        self.pending.push(Pulse {
            transition_id: transition_id.to_string(),
            remaining: self.duration,
        });
    }

    pub fn cancel(&mut self, transition_id: &str) {
        self.pending.retain(|p| p.transition_id != transition_id);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, transition_id: &str) -> bool {
        self.pending.iter().any(|p| p.transition_id == transition_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Lets `elapsed` pass and returns the transitions whose pulse ran out, in scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<String> {
        let mut expired = Vec::new();
        self.pending.retain_mut(|pulse| {
            pulse.remaining = pulse.remaining.saturating_sub(elapsed);
            if pulse.remaining.is_zero() {
                expired.push(pulse.transition_id.clone());
                false
            } else {
                true
            }
        });
        expired
    }
}
