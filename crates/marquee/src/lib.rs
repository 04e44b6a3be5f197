#![forbid(unsafe_code)]

//! Command-line front end for the marquee scroller.
//!
//! Parses the flag surface, reads stdin when the text is piped in,
//! compiles match rules through the shared override parser, and hands
//! the validated pieces to [`marquee_core`]'s scheduler.

pub mod cli;
pub mod overrides;

pub use cli::{Cli, run, run_from_env};
pub use overrides::parse_override_fragment;
