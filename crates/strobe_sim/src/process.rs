//! Simulation processes.
//!
//! A process is the unit of scheduling: a continuous assignment, a
//! combinational block, an edge-triggered block, or a monitor. Each carries a
//! `scheduled` flag that coalesces multiple wake-ups within a delta cycle;
//! a process sits in the active queue at most once at any instant.

use crate::signal::SignalId;
use std::rc::Rc;
use strobe_graph::{ArenaId, Expr, Statement};

/// Opaque ID for a registered process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ProcId(u32);

impl ProcId {
    /// Wraps a raw slot index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Unwraps the raw slot index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl ArenaId for ProcId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

/// One argument of a monitor's format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorArg {
    /// The current tick (`$time`).
    Time,
    /// The current value of a signal.
    Signal(SignalId),
}

/// What a process does when it runs.
#[derive(Debug, Clone)]
pub enum ProcessBody {
    /// A continuous assignment: re-evaluate `rhs` and drive `target`.
    Assign {
        /// The driven net.
        target: SignalId,
        /// The right-hand side, re-evaluated on every wake-up.
        rhs: Expr,
    },
    /// A combinational block; all assignments inside are blocking.
    Comb {
        /// The block body.
        body: Statement,
    },
    /// An edge-triggered block; non-blocking assignments are deferred to the
    /// NBA region.
    Ff {
        /// The block body, with the event control already stripped.
        body: Statement,
    },
    /// A monitor: render the format string and emit one line.
    Monitor {
        /// The format string.
        format: String,
        /// The arguments consumed by `%` escapes, left to right.
        args: Vec<MonitorArg>,
    },
}

/// A registered process.
#[derive(Debug, Clone)]
pub struct SimProcess {
    /// The process behavior. Shared so the kernel can run it while holding
    /// mutable access to everything else.
    pub body: Rc<ProcessBody>,
    /// `true` while a wake-up for this process sits in the active queue.
    pub scheduled: bool,
}

impl SimProcess {
    /// Wraps a body into an unscheduled process.
    pub fn new(body: ProcessBody) -> Self {
        Self {
            body: Rc::new(body),
            scheduled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_process_is_unscheduled() {
        let proc = SimProcess::new(ProcessBody::Comb {
            body: Statement::Empty,
        });
        assert!(!proc.scheduled);
    }

    #[test]
    fn monitor_args_compare() {
        assert_eq!(MonitorArg::Time, MonitorArg::Time);
        assert_ne!(
            MonitorArg::Signal(SignalId::from_raw(0)),
            MonitorArg::Signal(SignalId::from_raw(1))
        );
        assert_ne!(MonitorArg::Time, MonitorArg::Signal(SignalId::from_raw(0)));
    }

    #[test]
    fn proc_id_roundtrip() {
        assert_eq!(ProcId::from_raw(3).as_raw(), 3);
    }

    #[test]
    fn body_is_shared_not_copied() {
        let proc = SimProcess::new(ProcessBody::Monitor {
            format: "%d".to_string(),
            args: vec![MonitorArg::Time],
        });
        let alias = Rc::clone(&proc.body);
        assert_eq!(Rc::strong_count(&alias), 2);
    }
}
