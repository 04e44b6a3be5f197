#![forbid(unsafe_code)]

//! Core engine for marquee, a status-bar text scroller.
//!
//! The pieces, in the order a cycle touches them:
//! - [`selector::MatchRules`] - probe commands deciding which
//!   formatting profile is active
//! - [`probe::Probe`] / [`probe::ShellProbe`] - run a command, keep its
//!   stdout, treat failure as "no output"
//! - [`scroller::Scroller`] - the scroll state machine: offset,
//!   direction, and wide-character phasing
//! - [`scheduler::Scheduler`] - the cycle loop tying them to an output
//!   sink
//!
//! Everything is synchronous and single-threaded; the only shared state
//! is the scheduler's shutdown flag.

pub mod error;
pub mod probe;
pub mod profile;
pub mod scheduler;
pub mod scroller;
pub mod selector;

pub use error::{MarqueeError, Result};
pub use probe::{Probe, ShellProbe};
pub use profile::{FormattingProfile, ProfileOverride, apply_override};
pub use scheduler::{Scheduler, Settings};
pub use scroller::Scroller;
pub use selector::{MatchRule, MatchRules};
