//! Event-driven simulation kernel for elaborated hardware designs.
//!
//! This crate consumes a `strobe_graph::Design` and reproduces its
//! cycle-accurate behavior along a logical time axis, printing monitor lines
//! to standard output. The kernel implements two-region delta-cycle
//! semantics: within one tick, all active-region callbacks run to completion
//! in insertion order, then deferred non-blocking assignments are applied at
//! the delta-cycle boundary, and only once both regions are quiet does time
//! advance.
//!
//! # Architecture
//!
//! The elaboration binder flattens the instance hierarchy at construction
//! time by aliasing port symbols onto outer nets, so hierarchy costs nothing
//! at runtime. Signals and processes live in arenas with stable indices;
//! sensitivity lists hold process indices rather than owning references.
//!
//! # Usage
//!
//! ```ignore
//! use strobe_sim::{simulate, SimConfig};
//!
//! let result = simulate(&design, &SimConfig::default())?;
//! println!("finished at tick {}", result.final_time);
//! ```
//!
//! # Modules
//!
//! - `error`: the few conditions that stop a run
//! - `signal`: runtime signal state and width masking
//! - `bind`: the symbol binding and dependency collection
//! - `process`: process records and wake-up coalescing
//! - `eval`: the pure expression evaluator
//! - `sched`: scheduler actions and event ordering
//! - `monitor`: format-string rendering
//! - `kernel`: queues, the write path, and the delta-cycle loop
//! - `elab`: building a kernel from a design graph

#![warn(missing_docs)]

pub mod bind;
mod elab;
pub mod error;
pub mod eval;
pub mod kernel;
mod monitor;
pub mod process;
pub mod sched;
pub mod signal;

use std::io::Write;

pub use bind::{Binding, Bound};
pub use error::SimError;
pub use eval::Value;
pub use kernel::{SimKernel, SimResult};
pub use process::{MonitorArg, ProcId};
pub use sched::Action;
pub use signal::SignalId;

/// Configuration for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// Optional tick limit. If `None`, the run ends when the event queues
    /// drain or `$finish` fires.
    pub time_limit: Option<u64>,
    /// Optional bound on zero-time process wake-ups per tick. Defaults to
    /// 10 000 when `None`.
    pub max_delta: Option<u32>,
}

/// Builds a kernel from a design, runs it, and writes every monitor line to
/// standard output in firing order.
pub fn simulate(
    design: &strobe_graph::Design,
    config: &SimConfig,
) -> Result<SimResult, SimError> {
    let mut kernel = SimKernel::new(design)?;
    if let Some(limit) = config.time_limit {
        kernel.set_time_limit(limit);
    }
    if let Some(max) = config.max_delta {
        kernel.set_max_delta(max);
    }
    let result = kernel.run()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in &result.monitor_output {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strobe_graph::{BlockKind, Design, Expr, ProceduralBlock, Statement, ValueSymbol};

    #[test]
    fn default_config_has_no_limits() {
        let config = SimConfig::default();
        assert!(config.time_limit.is_none());
        assert!(config.max_delta.is_none());
    }

    #[test]
    fn simulate_runs_a_trivial_design() {
        let mut design = Design::new("tb");
        let a = design.declare(design.top, ValueSymbol::net("a", 8));
        design.instances[design.top].blocks.push(ProceduralBlock {
            kind: BlockKind::Initial,
            body: Statement::Expr(Expr::Assignment {
                lhs: Box::new(Expr::Named(a)),
                rhs: Box::new(Expr::IntLiteral {
                    value: 7,
                    width: Some(8),
                }),
                non_blocking: false,
            }),
        });
        let result = simulate(&design, &SimConfig::default()).unwrap();
        assert!(!result.finished_by_user);
        assert!(result.monitor_output.is_empty());
    }

    #[test]
    fn simulate_honors_config_limits() {
        let design = Design::new("tb");
        let config = SimConfig {
            time_limit: Some(100),
            max_delta: Some(50),
        };
        let result = simulate(&design, &config).unwrap();
        assert_eq!(result.final_time, 0);
    }
}
