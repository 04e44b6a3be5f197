//! The cycle loop: re-evaluate matches, re-derive text, render,
//! advance, sleep.
//!
//! Ordering within one cycle is load-bearing: the match selection can
//! swap the active profile, which decides which command (if any) is
//! probed for derived text, and freshly derived text must be rendered
//! before the offset computed for the old text would have applied.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::probe::Probe;
use crate::profile::FormattingProfile;
use crate::scroller::Scroller;
use crate::selector::MatchRules;

/// Process-wide options that cannot be overridden by match rules.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Scroll from left to right instead of right to left.
    pub reverse: bool,
    /// Terminate frames with `\n`; otherwise `\r` redraws in place.
    pub newline: bool,
    /// Pause between cycles; zero skips sleeping entirely.
    pub delay: Duration,
    /// Stop after this much wall time; zero runs forever.
    pub timeout: Duration,
    /// Stop after this many frames; zero means no limit.
    pub max_shift_count: u64,
    /// Minimum time between probe rounds; zero probes every cycle.
    pub update_interval: Duration,
    /// Run probe commands through `sh -c`.
    pub eval_in_shell: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reverse: false,
            newline: true,
            delay: Duration::from_millis(400),
            timeout: Duration::ZERO,
            max_shift_count: 0,
            update_interval: Duration::ZERO,
            eval_in_shell: false,
        }
    }
}

/// Drives one scroller against a probe and an output sink.
pub struct Scheduler<P, W> {
    settings: Settings,
    scroller: Scroller,
    rules: MatchRules,
    probe: P,
    sink: W,
    shutdown: Arc<AtomicBool>,
    last_probe_time: Option<Instant>,
}

impl<P: Probe, W: Write> Scheduler<P, W> {
    #[must_use]
    pub fn new(
        settings: Settings,
        profile: FormattingProfile,
        rules: MatchRules,
        probe: P,
        sink: W,
    ) -> Self {
        let scroller = Scroller::new(profile, settings.reverse);
        Self {
            settings,
            scroller,
            rules,
            probe,
            sink,
            shutdown: Arc::new(AtomicBool::new(false)),
            last_probe_time: None,
        }
    }

    /// Flag that stops the loop at the next cycle boundary; hand it to
    /// a signal handler for clean interrupt shutdown.
    #[must_use]
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run until the timeout elapses, the frame budget is spent, or the
    /// shutdown flag is raised. All three terminations are clean.
    pub fn run(&mut self) -> Result<()> {
        let started = Instant::now();
        let mut shift_count: u64 = 0;
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                debug!("shutdown requested");
                return Ok(());
            }
            if !self.settings.timeout.is_zero() && started.elapsed() > self.settings.timeout {
                debug!("timeout reached");
                return Ok(());
            }
            if self.settings.max_shift_count > 0 && shift_count == self.settings.max_shift_count {
                debug!(shift_count, "shift count reached");
                return Ok(());
            }
            shift_count += 1;

            self.maybe_update();

            let line = self.scroller.render_line();
            let terminator = if self.settings.newline { '\n' } else { '\r' };
            write!(self.sink, "{line}{terminator}")?;
            self.sink.flush()?;

            self.scroller.advance();

            if !self.settings.delay.is_zero() {
                thread::sleep(self.settings.delay);
            }
        }
    }

    fn update_due(&self) -> bool {
        self.settings.update_interval.is_zero()
            || self
                .last_probe_time
                .is_none_or(|at| at.elapsed() >= self.settings.update_interval)
    }

    /// Probe round, gated by the update interval: match selection
    /// first, then text derivation against whichever profile came out
    /// of it.
    fn maybe_update(&mut self) {
        if !self.update_due() {
            return;
        }
        if !self.rules.is_empty() {
            let selection = self
                .rules
                .select(&mut self.probe, self.settings.eval_in_shell);
            let patch = selection.and_then(|index| self.rules.patch(index));
            self.scroller.activate(selection, patch);
        }
        if self.scroller.active_profile().update_check {
            let command = self.scroller.active_profile().scroll_text.clone();
            if let Some(output) = self.probe.probe(&command, self.settings.eval_in_shell) {
                self.scroller.set_derived_text(output);
            }
        }
        self.last_probe_time = Some(Instant::now());
    }
}
