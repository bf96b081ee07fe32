//! The event-driven simulation kernel.
//!
//! [`SimKernel`] owns every runtime signal, every registered process, and the
//! three scheduler queues: the time-ordered future heap, the same-tick active
//! FIFO, and the deferred non-blocking-assignment (NBA) list. The main loop
//! runs delta cycles: drain the active queue, flush the NBA list (which may
//! refill the active queue through wake-ups), and only advance time once both
//! are empty.
//!
//! Ordering guarantees:
//!
//! - Events at the same tick run in insertion order.
//! - Within one tick, all direct writes of a delta cycle complete before any
//!   deferred NBA write is applied.
//! - Time never goes backward.
//! - `finish()` takes effect at the end of the delta cycle that requested it:
//!   the active queue is drained and the NBA list flushed before the loop
//!   exits.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::rc::Rc;

use tracing::debug;

use strobe_graph::{Arena, EdgeKind, Expr, Statement};

use crate::bind::Binding;
use crate::error::SimError;
use crate::eval::{eval_expr, EvalContext, Value};
use crate::monitor;
use crate::process::{MonitorArg, ProcId, ProcessBody, SimProcess};
use crate::sched::{Action, FutureEvent, NbaAssign};
use crate::signal::{mask_to_width, SignalId, SimSignal};

/// The default bound on delta cycles at a single tick.
const DEFAULT_MAX_DELTA: u32 = 10_000;

/// The result of a completed simulation run.
#[derive(Debug, Clone)]
pub struct SimResult {
    /// The tick at which the run ended.
    pub final_time: u64,
    /// Whether the run was terminated by `$finish`.
    pub finished_by_user: bool,
    /// The total number of delta cycles executed.
    pub total_deltas: u64,
    /// All monitor lines produced, in firing order.
    pub monitor_output: Vec<String>,
}

/// The event-driven simulation kernel.
///
/// Build one with [`SimKernel::new`] from an elaborated design graph, or
/// start from [`SimKernel::default`] and use the registration API directly,
/// which is the contract generated harness code targets.
pub struct SimKernel {
    /// The current tick.
    current_time: u64,
    /// Monotonic insertion counter for future events.
    next_order: u64,
    /// Set by `finish()`; the loop exits once the current delta cycle drains.
    finished: bool,
    /// Events at future ticks, ordered by `(time, order)`.
    future: BinaryHeap<Reverse<FutureEvent>>,
    /// Work due at the current tick, in insertion order.
    active: VecDeque<Action>,
    /// Deferred non-blocking writes for the current delta cycle.
    nba: Vec<NbaAssign>,
    /// All runtime signals.
    pub(crate) signals: Arena<SignalId, SimSignal>,
    /// All registered processes.
    pub(crate) processes: Arena<ProcId, SimProcess>,
    /// The symbol binding produced by elaboration.
    pub(crate) binding: Binding,
    /// Monitor lines produced so far.
    monitor_output: Vec<String>,
    /// Optional tick limit; events beyond it are left in the queue.
    time_limit: Option<u64>,
    /// Bound on zero-time process wake-ups per tick, to catch
    /// combinational loops.
    max_delta_per_step: u32,
    /// Total delta cycles executed.
    total_deltas: u64,
}

impl Default for SimKernel {
    fn default() -> Self {
        Self {
            current_time: 0,
            next_order: 0,
            finished: false,
            future: BinaryHeap::new(),
            active: VecDeque::new(),
            nba: Vec::new(),
            signals: Arena::new(),
            processes: Arena::new(),
            binding: Binding::new(),
            monitor_output: Vec::new(),
            time_limit: None,
            max_delta_per_step: DEFAULT_MAX_DELTA,
            total_deltas: 0,
        }
    }
}

impl SimKernel {
    /// Builds a kernel from an elaborated design graph: binds every symbol,
    /// registers every process, and expands the testbench onto the time axis.
    pub fn new(design: &strobe_graph::Design) -> Result<Self, SimError> {
        let mut kernel = Self::default();
        kernel.build_from(design)?;
        Ok(kernel)
    }

    /// Returns the current tick.
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// Returns the number of runtime signals.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Returns the number of registered processes.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Returns the monitor lines produced so far.
    pub fn monitor_output(&self) -> &[String] {
        &self.monitor_output
    }

    /// Limits the run to the given tick. Events beyond it stay queued.
    pub fn set_time_limit(&mut self, limit: u64) {
        self.time_limit = Some(limit);
    }

    /// Sets the bound on zero-time process wake-ups per tick.
    pub fn set_max_delta(&mut self, max: u32) {
        self.max_delta_per_step = max;
    }

    /// Finds a signal by hierarchical name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.signals
            .iter()
            .find(|(_, sig)| sig.name == name)
            .map(|(id, _)| id)
    }

    /// Returns a signal's current value.
    pub fn signal_value(&self, signal: SignalId) -> u64 {
        self.signals[signal].value
    }

    /// Allocates a runtime signal. A width of 0 is clamped to 1.
    pub fn add_signal(&mut self, name: impl Into<String>, width: u32) -> SignalId {
        self.signals.alloc(SimSignal::new(name, width))
    }

    /// Binds a design-graph symbol to a runtime signal. Rebinding an already
    /// bound symbol is how port aliasing collapses the hierarchy.
    pub fn bind_net(&mut self, symbol: strobe_graph::SymbolId, signal: SignalId) {
        self.binding.bind(symbol, crate::bind::Bound::Net(signal));
    }

    /// Binds a design-graph symbol to a parameter constant.
    pub fn bind_const(&mut self, symbol: strobe_graph::SymbolId, value: u64) {
        self.binding.bind(symbol, crate::bind::Bound::Const(value));
    }

    /// Sets a signal's value directly, without waking subscribers. Used to
    /// establish initial values before the run starts.
    pub fn init_signal(&mut self, signal: SignalId, value: u64) {
        let sig = &mut self.signals[signal];
        sig.value = mask_to_width(value, sig.width);
    }

    /// Registers a continuous assignment: level-sensitive on `deps` and
    /// scheduled once at the current tick to establish its initial value.
    pub fn register_continuous(
        &mut self,
        target: SignalId,
        rhs: Expr,
        deps: &[SignalId],
    ) -> ProcId {
        let pid = self
            .processes
            .alloc(SimProcess::new(ProcessBody::Assign { target, rhs }));
        for &dep in deps {
            self.signals[dep].level.push(pid);
        }
        self.schedule_process(pid);
        pid
    }

    /// Registers a combinational block: level-sensitive on `deps` and
    /// scheduled once at the current tick to establish initial values.
    pub fn register_comb(&mut self, body: Statement, deps: &[SignalId]) -> ProcId {
        let pid = self
            .processes
            .alloc(SimProcess::new(ProcessBody::Comb { body }));
        for &dep in deps {
            self.signals[dep].level.push(pid);
        }
        self.schedule_process(pid);
        pid
    }

    /// Registers an edge-triggered block. Not pre-scheduled: it first runs
    /// when one of its edges actually occurs.
    pub fn register_edge(&mut self, body: Statement, edges: &[(SignalId, EdgeKind)]) -> ProcId {
        let pid = self
            .processes
            .alloc(SimProcess::new(ProcessBody::Ff { body }));
        for &(signal, edge) in edges {
            let sig = &mut self.signals[signal];
            match edge {
                EdgeKind::Pos => sig.posedge.push(pid),
                EdgeKind::Neg => sig.negedge.push(pid),
                EdgeKind::Any => sig.level.push(pid),
            }
        }
        pid
    }

    /// Registers a monitor: monitor-sensitive on every signal argument and
    /// scheduled once at the current tick to print the first line.
    pub fn register_monitor(&mut self, format: impl Into<String>, args: Vec<MonitorArg>) -> ProcId {
        let pid = self.processes.alloc(SimProcess::new(ProcessBody::Monitor {
            format: format.into(),
            args: args.clone(),
        }));
        for arg in &args {
            if let MonitorArg::Signal(signal) = arg {
                self.signals[*signal].monitor.push(pid);
            }
        }
        self.schedule_process(pid);
        pid
    }

    /// Schedules an action. Work due now (or earlier) goes to the tail of the
    /// active queue, preserving FIFO order for same-tick insertions; future
    /// work goes into the heap with a fresh insertion counter.
    pub fn schedule_at(&mut self, time: u64, action: Action) {
        if time <= self.current_time {
            self.active.push_back(action);
            return;
        }
        let order = self.next_order;
        self.next_order += 1;
        self.future.push(Reverse(FutureEvent {
            time,
            order,
            action,
        }));
    }

    /// Queues a deferred write for the end of the current delta cycle.
    pub fn nba_assign(&mut self, signal: SignalId, value: u64) {
        self.nba.push(NbaAssign { signal, value });
    }

    /// Requests termination at the end of the current delta cycle.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Writes a signal. The value is masked to the signal's width first; a
    /// write that does not change the stored value wakes nobody. On a real
    /// change, level-sensitive subscribers wake on any change, posedge
    /// subscribers when the whole value leaves zero, negedge subscribers when
    /// it reaches zero, and monitor subscribers on any change. The
    /// `scheduled` flag keeps every process in the active queue at most once.
    pub fn set_signal(&mut self, signal: SignalId, value: u64) {
        let sig = &mut self.signals[signal];
        let masked = mask_to_width(value, sig.width);
        if sig.value == masked {
            return;
        }
        let old = sig.value;
        sig.value = masked;

        let sig = &self.signals[signal];
        let mut to_wake: Vec<ProcId> = Vec::new();
        to_wake.extend_from_slice(&sig.level);
        if old == 0 && masked != 0 {
            to_wake.extend_from_slice(&sig.posedge);
        }
        if old != 0 && masked == 0 {
            to_wake.extend_from_slice(&sig.negedge);
        }
        to_wake.extend_from_slice(&sig.monitor);

        for pid in to_wake {
            if !self.processes[pid].scheduled {
                self.schedule_process(pid);
            }
        }
    }

    /// Runs the simulation until the queues drain, `$finish` fires, or the
    /// time limit is reached.
    pub fn run(&mut self) -> Result<SimResult, SimError> {
        // Zero-time process wake-ups since the last time advance. A
        // combinational loop re-schedules its processes without bound, so
        // this is where a runaway design surfaces.
        let mut wakeups_at_tick = 0u32;
        while !self.finished && self.has_pending() {
            if self.active.is_empty() && !self.future.is_empty() {
                let next_time = self.future.peek().map(|Reverse(e)| e.time).unwrap();
                if let Some(limit) = self.time_limit {
                    if next_time > limit {
                        break;
                    }
                }
                if next_time != self.current_time {
                    wakeups_at_tick = 0;
                }
                self.current_time = next_time;
                while self
                    .future
                    .peek()
                    .is_some_and(|Reverse(e)| e.time == next_time)
                {
                    let Reverse(event) = self.future.pop().unwrap();
                    self.active.push_back(event.action);
                }
            }

            while let Some(action) = self.active.pop_front() {
                if matches!(action, Action::Process(_)) {
                    wakeups_at_tick += 1;
                    if wakeups_at_tick >= self.max_delta_per_step {
                        return Err(SimError::DeltaCycleLimit {
                            time: self.current_time,
                            max_deltas: self.max_delta_per_step,
                        });
                    }
                }
                self.dispatch(action);
            }

            if !self.nba.is_empty() {
                self.apply_nba();
            }

            self.total_deltas += 1;
        }

        if self.finished {
            debug!(time = self.current_time, "simulation finished by request");
        }

        Ok(SimResult {
            final_time: self.current_time,
            finished_by_user: self.finished,
            total_deltas: self.total_deltas,
            monitor_output: self.monitor_output.clone(),
        })
    }

    /// Evaluates an expression against the current signal snapshot.
    pub fn eval(&self, expr: &Expr) -> Value {
        let ctx = EvalContext {
            signals: &self.signals,
            binding: &self.binding,
            now: self.current_time,
        };
        eval_expr(&ctx, expr)
    }

    /// Resolves an assignment target to its runtime signal.
    pub(crate) fn target_net(&self, lhs: &Expr) -> Option<SignalId> {
        lhs.symbol().and_then(|symbol| self.binding.net(symbol))
    }

    fn has_pending(&self) -> bool {
        !(self.future.is_empty() && self.active.is_empty() && self.nba.is_empty())
    }

    /// Marks a process scheduled and queues its wake-up at the current tick.
    pub(crate) fn schedule_process(&mut self, pid: ProcId) {
        self.processes[pid].scheduled = true;
        self.schedule_at(self.current_time, Action::Process(pid));
    }

    /// Takes the NBA list and applies every deferred write in insertion
    /// order. Wake-ups land in the active queue and are drained by the next
    /// pass of the main loop.
    fn apply_nba(&mut self) {
        let pending = std::mem::take(&mut self.nba);
        for nba in pending {
            self.set_signal(nba.signal, nba.value);
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Process(pid) => {
                // The flag clears before the body runs, so the body may
                // legitimately re-schedule its own process.
                self.processes[pid].scheduled = false;
                self.run_process(pid);
            }
            Action::Write {
                target,
                rhs,
                non_blocking,
            } => {
                let value = self.eval(&rhs).value;
                if non_blocking {
                    self.nba_assign(target, value);
                } else {
                    self.set_signal(target, value);
                }
            }
            Action::Clock {
                target,
                rhs,
                period,
                non_blocking,
            } => {
                let value = self.eval(&rhs).value;
                if non_blocking {
                    self.nba_assign(target, value);
                } else {
                    self.set_signal(target, value);
                }
                let next = self.current_time + period;
                self.schedule_at(
                    next,
                    Action::Clock {
                        target,
                        rhs,
                        period,
                        non_blocking,
                    },
                );
            }
            Action::RegisterMonitor { format, args } => {
                self.register_monitor(format, args);
            }
            Action::Finish => {
                self.finished = true;
            }
        }
    }

    fn run_process(&mut self, pid: ProcId) {
        let body = Rc::clone(&self.processes[pid].body);
        match &*body {
            ProcessBody::Assign { target, rhs } => {
                let value = self.eval(rhs).value;
                self.set_signal(*target, value);
            }
            ProcessBody::Comb { body } => self.exec_statement(body, false),
            ProcessBody::Ff { body } => self.exec_statement(body, true),
            ProcessBody::Monitor { format, args } => {
                let line = monitor::render(format, args, &self.signals, self.current_time);
                self.monitor_output.push(line);
            }
        }
    }

    /// Executes a statement tree. Blocking assignments write through
    /// immediately; non-blocking assignments are deferred to the NBA region
    /// when `allow_nba` is set (edge-triggered bodies). Statement kinds with
    /// no meaning inside a process body have no effect.
    fn exec_statement(&mut self, stmt: &Statement, allow_nba: bool) {
        match stmt {
            Statement::Block(body) => self.exec_statement(body, allow_nba),
            Statement::List(stmts) => {
                for s in stmts {
                    self.exec_statement(s, allow_nba);
                }
            }
            Statement::Conditional {
                condition,
                if_true,
                if_false,
            } => {
                if self.eval(condition).value != 0 {
                    self.exec_statement(if_true, allow_nba);
                } else if let Some(if_false) = if_false {
                    self.exec_statement(if_false, allow_nba);
                }
            }
            Statement::Expr(Expr::Assignment {
                lhs,
                rhs,
                non_blocking,
            }) => {
                let Some(target) = self.target_net(lhs) else {
                    return;
                };
                let value = self.eval(rhs).value;
                if *non_blocking && allow_nba {
                    self.nba_assign(target, value);
                } else {
                    self.set_signal(target, value);
                }
            }
            Statement::Expr(_)
            | Statement::Timed { .. }
            | Statement::Forever(_)
            | Statement::Empty => {}
        }
    }
}
