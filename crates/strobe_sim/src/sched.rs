//! Scheduler data types.
//!
//! The kernel keeps three queues: a min-heap of [`FutureEvent`]s ordered by
//! `(time, order)`, a FIFO of [`Action`]s due at the current tick, and a list
//! of deferred [`NbaAssign`] writes applied at the delta-cycle boundary.
//!
//! The `order` counter is assigned at insertion and breaks ties between
//! events at the same tick, so execution order never depends on heap
//! internals and two runs of the same design are byte-identical.

use crate::process::{MonitorArg, ProcId};
use crate::signal::SignalId;
use std::cmp::Ordering;
use std::rc::Rc;
use strobe_graph::Expr;

/// A unit of work dispatched from the active queue.
#[derive(Debug, Clone)]
pub enum Action {
    /// Wake a registered process.
    Process(ProcId),
    /// A one-shot testbench write.
    Write {
        /// The driven net.
        target: SignalId,
        /// The value expression, evaluated at dispatch time.
        rhs: Expr,
        /// `true` to defer the write to the NBA region.
        non_blocking: bool,
    },
    /// A self-rescheduling clock toggle compiled from `forever { #d assign; }`.
    Clock {
        /// The driven net.
        target: SignalId,
        /// The value expression, evaluated at every tick of the clock.
        rhs: Rc<Expr>,
        /// The delay between toggles, in ticks. Never zero.
        period: u64,
        /// `true` to defer each toggle to the NBA region.
        non_blocking: bool,
    },
    /// Install a monitor and print its first line.
    RegisterMonitor {
        /// The format string.
        format: String,
        /// The monitor arguments, already resolved to signals.
        args: Vec<MonitorArg>,
    },
    /// Stop the simulation at the end of the current delta cycle.
    Finish,
}

/// An event waiting in the future queue.
#[derive(Debug)]
pub struct FutureEvent {
    /// The tick at which to run.
    pub time: u64,
    /// Insertion counter used as a tie-break at equal ticks.
    pub order: u64,
    /// The work to enqueue.
    pub action: Action,
}

impl PartialEq for FutureEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.order == other.order
    }
}

impl Eq for FutureEvent {}

impl PartialOrd for FutureEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FutureEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.order.cmp(&other.order))
    }
}

/// A write deferred to the end of the current delta cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NbaAssign {
    /// The target net.
    pub signal: SignalId,
    /// The value to apply, masked by the write path.
    pub value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    fn event(time: u64, order: u64) -> FutureEvent {
        FutureEvent {
            time,
            order,
            action: Action::Finish,
        }
    }

    #[test]
    fn ordering_by_time_first() {
        assert!(event(1, 9) < event(2, 0));
        assert!(event(3, 0) > event(2, 7));
    }

    #[test]
    fn equal_times_order_by_insertion() {
        assert!(event(5, 0) < event(5, 1));
        assert!(event(5, 2) > event(5, 1));
    }

    #[test]
    fn heap_pops_in_time_then_insertion_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(event(10, 2)));
        heap.push(Reverse(event(5, 3)));
        heap.push(Reverse(event(10, 0)));
        heap.push(Reverse(event(10, 1)));
        let popped: Vec<(u64, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|Reverse(e)| (e.time, e.order))
            .collect();
        assert_eq!(popped, vec![(5, 3), (10, 0), (10, 1), (10, 2)]);
    }

    #[test]
    fn equality_ignores_action() {
        let a = FutureEvent {
            time: 1,
            order: 2,
            action: Action::Finish,
        };
        let b = FutureEvent {
            time: 1,
            order: 2,
            action: Action::Process(ProcId::from_raw(0)),
        };
        assert_eq!(a, b);
    }
}
