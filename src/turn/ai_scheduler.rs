//! Deferred AI turns.
//!
//! The AI move is not run on another thread: the controller is polled with
//! `tick(now)` and runs a ticket once it falls due. Every ticket carries the
//! session generation it was issued under, so starting a new game makes any
//! outstanding ticket stale.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTicket {
    pub generation: u64,
    pub due_at: Instant,
}

#[derive(Debug, Clone)]
pub struct AiScheduler {
    generation: u64,
    pending: Option<AiTicket>,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl AiScheduler {
    pub fn new(delay_min_ms: u64, delay_max_ms: u64) -> Self {
        Self {
            generation: 0,
            pending: None,
            delay_min_ms: delay_min_ms.min(delay_max_ms),
            delay_max_ms: delay_max_ms.max(delay_min_ms),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<&AiTicket> {
        self.pending.as_ref()
    }

    /// Issue a ticket due after a random delay in the configured range.
    /// Replaces any pending ticket.
    pub fn schedule(&mut self, now: Instant, rng: &mut StdRng) -> AiTicket {
        let delay = rng.random_range(self.delay_min_ms..=self.delay_max_ms);
        let ticket = AiTicket {
            generation: self.generation,
            due_at: now + Duration::from_millis(delay),
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Hand out the pending ticket once it is due.
    pub fn take_due(&mut self, now: Instant) -> Option<AiTicket> {
        match self.pending {
            Some(ticket) if ticket.due_at <= now => self.pending.take(),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Start a new generation: drops the pending ticket and makes every
    /// ticket issued so far stale.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    pub fn is_current(&self, ticket: &AiTicket) -> bool {
        ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::AiScheduler;

    #[test]
    fn ticket_is_due_only_after_its_delay() {
        let mut scheduler = AiScheduler::new(300, 800);
        let mut rng = StdRng::seed_from_u64(7);
        let now = Instant::now();
        let ticket = scheduler.schedule(now, &mut rng);

        let delay = ticket.due_at - now;
        assert!(delay >= Duration::from_millis(300) && delay <= Duration::from_millis(800));
        assert!(scheduler.take_due(now).is_none());
        assert_eq!(scheduler.take_due(now + Duration::from_millis(800)), Some(ticket));
        assert!(scheduler.pending().is_none());
    }

    #[test]
    fn invalidate_makes_old_tickets_stale() {
        let mut scheduler = AiScheduler::new(0, 0);
        let mut rng = StdRng::seed_from_u64(7);
        let ticket = scheduler.schedule(Instant::now(), &mut rng);
        assert!(scheduler.is_current(&ticket));

        scheduler.invalidate();
        assert!(!scheduler.is_current(&ticket));
        assert!(scheduler.pending().is_none());
    }
}
