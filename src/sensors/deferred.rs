//! Two-phase non-blocking wait.
//!
//! A sensor that needs time between "start" and "result" (the DS18B20
//! needs up to 750 ms for a 12-bit conversion) is driven as
//! `Idle → AwaitingResult { deadline } → Idle` across loop ticks instead of
//! stalling the loop. [`Deferred::step`] tells the caller what to do on
//! this tick; the caller performs the bus work and then calls
//! [`Deferred::begin`] or [`Deferred::reset`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResult { deadline_ms: u64 },
}

/// What the owner should do on this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing in flight: issue the request.
    Start,
    /// Request in flight, deadline not reached.
    Wait,
    /// Deadline reached: collect the result.
    Collect,
}

#[derive(Debug, Clone, Copy)]
pub struct Deferred {
    phase: Phase,
    wait_ms: u32,
}

impl Deferred {
    pub const fn new(wait_ms: u32) -> Self {
        Self {
            phase: Phase::Idle,
            wait_ms,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step(&self, now_ms: u64) -> Step {
        match self.phase {
            Phase::Idle => Step::Start,
            Phase::AwaitingResult { deadline_ms } if now_ms >= deadline_ms => Step::Collect,
            Phase::AwaitingResult { .. } => Step::Wait,
        }
    }

    /// Record that the request went out at `now_ms`.
    pub fn begin(&mut self, now_ms: u64) {
        self.phase = Phase::AwaitingResult {
            deadline_ms: now_ms.saturating_add(u64::from(self.wait_ms)),
        };
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }
}
