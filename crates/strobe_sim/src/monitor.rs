//! Monitor format-string rendering.
//!
//! A monitor walks its format string left to right, emitting characters
//! verbatim except for `%` escapes:
//!
//! - `%%` emits a literal `%`.
//! - `%d` renders the next argument as unsigned decimal.
//! - `%b` renders the next argument as binary, exactly `width` digits,
//!   most significant bit first, zero-padded.
//! - `%0t` renders the next argument as unsigned decimal.
//! - Anything else is re-emitted verbatim as `%<spec>`.
//!
//! Every escape other than `%%` consumes one argument. Extra arguments are
//! ignored; once the argument list runs dry, remaining escapes are consumed
//! without producing output.

use crate::process::MonitorArg;
use crate::signal::{SignalId, SimSignal};
use strobe_graph::Arena;

/// Renders one monitor line (without the trailing newline).
pub(crate) fn render(
    format: &str,
    args: &[MonitorArg],
    signals: &Arena<SignalId, SimSignal>,
    now: u64,
) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len());
    let mut arg_index = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        if chars[i + 1] == '%' {
            out.push('%');
            i += 2;
            continue;
        }

        // A spec is one character, or two when it starts with '0' (e.g. "0t").
        let mut spec = String::new();
        spec.push(chars[i + 1]);
        i += 2;
        if spec == "0" && i < chars.len() {
            spec.push(chars[i]);
            i += 1;
        }

        if arg_index >= args.len() {
            continue;
        }
        let (value, width) = match args[arg_index] {
            MonitorArg::Time => (now, 64),
            MonitorArg::Signal(signal) => {
                let sig = &signals[signal];
                (sig.value, sig.width)
            }
        };
        arg_index += 1;

        match spec.as_str() {
            "d" | "0t" => out.push_str(&value.to_string()),
            "b" => {
                for bit in (0..width).rev() {
                    out.push(if (value >> bit) & 1 == 1 { '1' } else { '0' });
                }
            }
            _ => {
                out.push('%');
                out.push_str(&spec);
            }
        }
    }

    out
}
