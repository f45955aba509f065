// ABOUTME: Connection lifecycle state machine
// ABOUTME: Lock-free Idle -> Open -> Closed/Failed phase shared by sender and event stream

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Connection lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Not yet established
    Idle = 0,
    /// Established; sends expected to succeed, messages flowing
    Open = 1,
    /// Closed by either side (terminal)
    Closed = 2,
    /// Failed (terminal)
    Failed = 3,
}

impl Phase {
    /// Closed and Failed absorb every later transition
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Closed | Phase::Failed)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Phase::Idle,
            1 => Phase::Open,
            2 => Phase::Closed,
            _ => Phase::Failed,
        }
    }

    fn can_advance_to(self, next: Phase) -> bool {
        match (self, next) {
            (Phase::Idle, Phase::Open) => true,
            (Phase::Idle | Phase::Open, Phase::Closed | Phase::Failed) => true,
            _ => false,
        }
    }
}

/// Shared handle to one connection's phase
#[derive(Debug, Clone)]
pub struct ConnectionState {
    phase: Arc<AtomicU8>,
}

impl ConnectionState {
    /// New state in [`Phase::Idle`]
    pub fn new() -> Self {
        Self {
            phase: Arc::new(AtomicU8::new(Phase::Idle as u8)),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// True once Closed or Failed
    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Move forward to `next`
    ///
    /// Returns false, leaving the phase unchanged, if the transition is not
    /// allowed (backwards, repeated, or out of a terminal phase).
    pub fn advance(&self, next: Phase) -> bool {
        self.phase
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Phase::from_u8(raw)
                    .can_advance_to(next)
                    .then_some(next as u8)
            })
            .is_ok()
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}
