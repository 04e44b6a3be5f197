//! Shell probing: run a command, keep its stdout, swallow its failures.

use std::process::Command;

use tracing::{debug, trace};

/// Runs an external command and captures its output.
///
/// A trait seam so the selector and scheduler can be driven by a
/// scripted fake in tests; production code uses [`ShellProbe`].
pub trait Probe {
    /// Run `command` and return its stdout with one trailing newline
    /// stripped, or `None` when the command exits non-zero or cannot be
    /// run at all.
    ///
    /// Absence is the only failure mode. A companion service that is
    /// not up yet (an `mpc` call before `mpd` starts, say) reads as
    /// "nothing changed" instead of taking the scroller down with it.
    fn probe(&mut self, command: &str, eval_in_shell: bool) -> Option<String>;
}

/// [`Probe`] implementation over `std::process::Command`.
///
/// With `eval_in_shell` the command line is handed to `sh -c`, enabling
/// environment variables, subshells, and pipes; otherwise it is split
/// into an argv with shell-quoting rules so quoted substrings stay
/// intact, and executed directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellProbe;

impl Probe for ShellProbe {
    fn probe(&mut self, command: &str, eval_in_shell: bool) -> Option<String> {
        trace!(command, eval_in_shell, "running probe");
        let output = if eval_in_shell {
            Command::new("sh").arg("-c").arg(command).output()
        } else {
            let argv = shlex::split(command)?;
            let (program, args) = argv.split_first()?;
            Command::new(program).args(args).output()
        };
        let output = match output {
            Ok(output) => output,
            Err(error) => {
                debug!(command, %error, "probe could not be spawned");
                return None;
            }
        };
        if !output.status.success() {
            debug!(command, status = ?output.status.code(), "probe exited non-zero");
            return None;
        }
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }
}
