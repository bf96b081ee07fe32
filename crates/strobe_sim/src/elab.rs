//! Building a kernel from an elaborated design graph.
//!
//! Three recursive passes over the instance tree:
//!
//! 1. **Binding**: allocate a runtime signal for every net, fold parameters
//!    into constants, and alias port symbols. A child's connected port symbol
//!    is pre-bound to the outer net's signal before the child's own nets are
//!    allocated, so reads and writes cross the hierarchy without copying.
//!    Unconnected ports keep freshly allocated internal signals.
//! 2. **Registration**: continuous assignments and always blocks become
//!    kernel processes with their sensitivity subscriptions.
//! 3. **Testbench expansion**: each initial block is either the clock pattern
//!    `forever { #d assign; }`, compiled to a self-rescheduling action, or a
//!    straight line of delays and statements folded onto the time axis.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use strobe_graph::{
    BlockKind, Design, EdgeKind, Expr, InstanceId, Statement, SymbolId, SymbolKind, TimingControl,
};

use crate::bind::{expr_reads, stmt_reads};
use crate::error::SimError;
use crate::kernel::SimKernel;
use crate::process::MonitorArg;
use crate::sched::Action;
use crate::signal::SignalId;

impl SimKernel {
    /// Populates an empty kernel from a design graph.
    pub(crate) fn build_from(&mut self, design: &Design) -> Result<(), SimError> {
        if design.instances.is_empty() {
            return Err(SimError::EmptyDesign);
        }
        let top = design.top;
        let prefix = design.instances[top].def_name.clone();
        self.bind_instance(design, top, &prefix, &HashMap::new());
        self.register_instance(design, top);
        self.expand_initials(design, top);
        debug!(
            signals = self.signal_count(),
            processes = self.process_count(),
            "design graph elaborated"
        );
        Ok(())
    }

    /// Binds one instance body and recurses into its children.
    ///
    /// `pre_bound` carries port aliases decided by the parent: symbols listed
    /// there reuse the outer net's signal instead of allocating one.
    fn bind_instance(
        &mut self,
        design: &Design,
        id: InstanceId,
        prefix: &str,
        pre_bound: &HashMap<SymbolId, SignalId>,
    ) {
        let inst = &design.instances[id];

        for &sym_id in &inst.symbols {
            let sym = &design.symbols[sym_id];
            match &sym.kind {
                SymbolKind::Param { value } => self.bind_const(sym_id, *value),
                SymbolKind::Net { width, init } => {
                    if let Some(&outer) = pre_bound.get(&sym_id) {
                        self.bind_net(sym_id, outer);
                        continue;
                    }
                    let signal = self.add_signal(format!("{prefix}.{}", sym.name), *width);
                    self.bind_net(sym_id, signal);
                    if let Some(init) = init {
                        let value = self.eval(init).value;
                        self.init_signal(signal, value);
                    }
                }
            }
        }

        for child in &inst.children {
            let child_inst = &design.instances[child.instance];
            let mut child_pre = HashMap::new();
            for conn in &child.connections {
                let Some(port) = child_inst.ports.iter().find(|p| p.name == conn.port) else {
                    continue;
                };
                let Some(actual) = &conn.actual else {
                    continue;
                };
                let Some(outer) = actual.symbol().and_then(|s| self.binding.net(s)) else {
                    continue;
                };
                child_pre.insert(port.internal, outer);
            }
            let child_prefix = format!("{prefix}.{}", child.name);
            self.bind_instance(design, child.instance, &child_prefix, &child_pre);
        }
    }

    /// Registers continuous assignments and always blocks, depth first.
    fn register_instance(&mut self, design: &Design, id: InstanceId) {
        let inst = &design.instances[id];

        for assign in &inst.assigns {
            let Expr::Assignment { lhs, rhs, .. } = &assign.assign else {
                continue;
            };
            let Some(target) = self.target_net(lhs) else {
                continue;
            };
            let deps = expr_reads(rhs, &self.binding);
            self.register_continuous(target, (**rhs).clone(), &deps);
        }

        for block in &inst.blocks {
            match block.kind {
                BlockKind::AlwaysComb => {
                    let deps = stmt_reads(&block.body, &self.binding);
                    self.register_comb(block.body.clone(), &deps);
                }
                BlockKind::AlwaysFF => {
                    let (control, body) = match &block.body {
                        Statement::Timed { control, body } => (Some(control), &**body),
                        other => (None, other),
                    };
                    let mut edges = Vec::new();
                    if let Some(control) = control {
                        self.collect_edges(control, &mut edges);
                    }
                    self.register_edge(body.clone(), &edges);
                }
                BlockKind::Initial => {}
            }
        }

        for child in &inst.children {
            self.register_instance(design, child.instance);
        }
    }

    /// Flattens an event control into `(signal, edge)` subscriptions.
    fn collect_edges(&self, control: &TimingControl, out: &mut Vec<(SignalId, EdgeKind)>) {
        match control {
            TimingControl::EventList(events) => {
                for event in events {
                    self.collect_edges(event, out);
                }
            }
            TimingControl::SignalEvent { expr, edge } => {
                if let Some(signal) = expr.symbol().and_then(|s| self.binding.net(s)) {
                    out.push((signal, *edge));
                }
            }
            TimingControl::Delay(_) => {}
        }
    }

    /// Expands every initial block in the tree onto the time axis.
    fn expand_initials(&mut self, design: &Design, id: InstanceId) {
        let inst = &design.instances[id];
        for block in &inst.blocks {
            if block.kind != BlockKind::Initial {
                continue;
            }
            match block.body.strip_blocks() {
                Statement::Forever(body) => self.setup_clock(body),
                _ => {
                    let mut time = 0u64;
                    self.expand_sequential(&block.body, &mut time);
                }
            }
        }
        for child in &inst.children {
            self.expand_initials(design, child.instance);
        }
    }

    /// Compiles `forever { #d lhs = rhs; }` into a self-rescheduling action.
    /// Anything that does not match the pattern is dropped; a zero delay is
    /// rejected because it would never let time advance.
    fn setup_clock(&mut self, body: &Statement) {
        let Statement::Timed { control, body } = body.strip_blocks() else {
            debug!("forever loop without a leading delay ignored");
            return;
        };
        let TimingControl::Delay(delay) = control else {
            return;
        };
        let Statement::Expr(Expr::Assignment {
            lhs,
            rhs,
            non_blocking,
        }) = body.strip_blocks()
        else {
            return;
        };
        let Some(target) = self.target_net(lhs) else {
            return;
        };
        let period = self.eval(delay).value;
        if period == 0 {
            debug!("forever loop with zero delay ignored");
            return;
        }
        self.schedule_at(
            period,
            Action::Clock {
                target,
                rhs: Rc::new((**rhs).clone()),
                period,
                non_blocking: *non_blocking,
            },
        );
    }

    /// Folds a straight-line initial body onto the time axis: `#d` advances
    /// the running clock, every assignment and system call is scheduled at
    /// the clock's current value. Other control flow is not supported inside
    /// an initial block and expands to nothing.
    fn expand_sequential(&mut self, stmt: &Statement, time: &mut u64) {
        match stmt {
            Statement::Block(body) => self.expand_sequential(body, time),
            Statement::List(stmts) => {
                for s in stmts {
                    self.expand_sequential(s, time);
                }
            }
            Statement::Timed { control, body } => {
                if let TimingControl::Delay(delay) = control {
                    *time += self.eval(delay).value;
                    self.expand_sequential(body, time);
                }
            }
            Statement::Expr(Expr::Assignment {
                lhs,
                rhs,
                non_blocking,
            }) => {
                if let Some(target) = self.target_net(lhs) {
                    self.schedule_at(
                        *time,
                        Action::Write {
                            target,
                            rhs: (**rhs).clone(),
                            non_blocking: *non_blocking,
                        },
                    );
                }
            }
            Statement::Expr(Expr::Call { name, args, system }) if *system => {
                self.expand_system_call(name, args, *time);
            }
            _ => {}
        }
    }

    fn expand_system_call(&mut self, name: &str, args: &[Expr], time: u64) {
        match name {
            "$finish" => self.schedule_at(time, Action::Finish),
            "$monitor" => {
                let Some(Expr::StringLiteral(format)) = args.first() else {
                    return;
                };
                let mut monitor_args = Vec::new();
                for arg in &args[1..] {
                    if arg.is_system_call("$time") {
                        monitor_args.push(MonitorArg::Time);
                    } else if let Some(signal) = arg.symbol().and_then(|s| self.binding.net(s)) {
                        monitor_args.push(MonitorArg::Signal(signal));
                    } else {
                        debug!("monitor argument is neither $time nor a net, skipped");
                    }
                }
                self.schedule_at(
                    time,
                    Action::RegisterMonitor {
                        format: format.clone(),
                        args: monitor_args,
                    },
                );
            }
            _ => {}
        }
    }
}
