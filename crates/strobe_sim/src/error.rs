//! Error types for the simulation kernel.
//!
//! The kernel assumes a validated design graph, so almost all malformed input
//! degrades silently (unsupported constructs become no-ops, division by zero
//! yields zero). [`SimError`] covers the few conditions that genuinely stop a
//! run.

use std::io;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The design graph contains no instances at all.
    #[error("design graph contains no instances")]
    EmptyDesign,

    /// Too many delta cycles at a single tick, indicating a combinational loop.
    #[error("delta cycle limit exceeded at tick {time} (max {max_deltas} delta cycles)")]
    DeltaCycleLimit {
        /// The tick at which the limit was hit.
        time: u64,
        /// The configured maximum number of delta cycles per tick.
        max_deltas: u32,
    },

    /// An I/O error occurred while emitting monitor output.
    #[error("monitor output error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_design_display() {
        assert_eq!(
            SimError::EmptyDesign.to_string(),
            "design graph contains no instances"
        );
    }

    #[test]
    fn delta_cycle_limit_display() {
        let e = SimError::DeltaCycleLimit {
            time: 40,
            max_deltas: 10_000,
        };
        assert_eq!(
            e.to_string(),
            "delta cycle limit exceeded at tick 40 (max 10000 delta cycles)"
        );
    }

    #[test]
    fn io_error_wraps() {
        let e = SimError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(e.to_string().contains("monitor output error"));
    }
}
