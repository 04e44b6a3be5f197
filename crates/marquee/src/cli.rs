//! The marquee command line: flag surface, validation, and assembly of
//! the core types.

use std::io::{IsTerminal, Read};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::Parser;

use marquee_core::error::{MarqueeError, Result};
use marquee_core::probe::ShellProbe;
use marquee_core::profile::FormattingProfile;
use marquee_core::scheduler::{Scheduler, Settings};
use marquee_core::selector::{MatchRule, MatchRules};

use crate::overrides::parse_override_fragment;

/// Booleans the way panel configs write them: `-s false`, `-r 1`,
/// `-n no`, any case.
pub(crate) fn parse_lenient_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
        other => Err(format!("{other:?} is not a valid boolean value")),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "marquee",
    about = "Print scrolling text for panels, status bars, and terminals",
    version
)]
pub struct Cli {
    /// Length of the scrolling text in display columns, excluding any
    /// before, after, and padding text.
    #[arg(short, long, default_value_t = 40)]
    pub length: usize,

    /// Stationary text to display to the left of the scrolling text.
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub before_text: String,

    /// Stationary text to display to the right of the scrolling text.
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub after_text: String,

    /// Padding text between the end and start of the scrolling text,
    /// shown only while it scrolls.
    #[arg(short = 'p', long, default_value = " - ", allow_hyphen_values = true)]
    pub scroll_padding: String,

    /// Whether to scroll; mainly useful as a match override.
    #[arg(
        short,
        long,
        default_value = "true",
        action = clap::ArgAction::Set,
        value_parser = parse_lenient_bool
    )]
    pub scroll: bool,

    /// Treat the positional argument as a command whose output is the
    /// text to display; when the output changes, the text updates.
    #[arg(
        short,
        long,
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_lenient_bool
    )]
    pub update_check: bool,

    /// Scroll the text from left to right.
    #[arg(
        short,
        long,
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_lenient_bool
    )]
    pub reverse: bool,

    /// Print a newline after each update; without one the line is
    /// redrawn in place with a carriage return.
    #[arg(
        short,
        long,
        default_value = "true",
        action = clap::ArgAction::Set,
        value_parser = parse_lenient_bool
    )]
    pub newline: bool,

    /// Delay in seconds between scrolling updates; lower for faster
    /// scrolling.
    #[arg(short, long, default_value_t = 0.4)]
    pub delay: f64,

    /// Time in seconds to wait before exiting; 0 means don't exit.
    #[arg(short, long, default_value_t = 0.0)]
    pub timeout: f64,

    /// Number of lines to output before exiting; 0 means don't exit.
    #[arg(short = 'C', long = "shift-count", default_value_t = 0)]
    pub shift_count: u64,

    /// Time in seconds between runs of the update-check and
    /// match commands; 0 means check before every print.
    #[arg(short = 'U', long, default_value_t = 0.0)]
    pub update_interval: f64,

    /// Run probe commands through the shell, enabling environment
    /// variables, subshells, and pipes; quote carefully to prevent
    /// unwanted command injection.
    #[arg(
        short,
        long,
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_lenient_bool
    )]
    pub eval_in_shell: bool,

    /// Command(s) whose output is searched with --match-text; one use
    /// is broadcast to every --match-text pair.
    #[arg(short = 'M', long = "match-command")]
    pub match_command: Vec<String>,

    /// A regexp to search for in match-command output, followed by the
    /// option overrides to apply while it matches.
    #[arg(
        short = 'm',
        long = "match-text",
        num_args = 2,
        value_names = ["PATTERN", "OPTIONS"],
        allow_hyphen_values = true
    )]
    pub match_text: Vec<String>,

    /// Text to scroll; prints in place when it is no longer than the
    /// scroll length. Read from stdin when piped, e.g.
    /// `echo text | marquee`.
    #[arg(allow_hyphen_values = true)]
    pub scroll_text: Option<String>,
}

impl Cli {
    /// Validate and split into the core's typed inputs.
    pub fn into_parts(self) -> Result<(Settings, FormattingProfile, MatchRules)> {
        let scroll_text = match self.scroll_text {
            Some(text) => text,
            None => read_stdin_text()?,
        };
        let profile = FormattingProfile {
            length: self.length,
            before_text: self.before_text,
            after_text: self.after_text,
            scroll_padding: self.scroll_padding,
            scroll: self.scroll,
            update_check: self.update_check,
            scroll_text,
        };
        let rules = build_match_rules(self.match_command, &self.match_text)?;
        let settings = Settings {
            reverse: self.reverse,
            newline: self.newline,
            delay: seconds("--delay", self.delay)?,
            timeout: seconds("--timeout", self.timeout)?,
            max_shift_count: self.shift_count,
            update_interval: seconds("--update-interval", self.update_interval)?,
            eval_in_shell: self.eval_in_shell,
        };
        Ok((settings, profile, rules))
    }
}

/// `Duration::from_secs_f64` panics on negative and non-finite input,
/// which `--delay=-1` can reach through clap's `=` syntax.
fn seconds(option: &'static str, value: f64) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        return Err(MarqueeError::InvalidDuration { option, value });
    }
    Ok(Duration::from_secs_f64(value))
}

fn read_stdin_text() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(MarqueeError::MissingText);
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Compile `(pattern, override-fragment)` pairs into match rules.
///
/// Fragments are parsed here, once, by the shared override parser;
/// nothing is re-parsed while the scroller runs.
fn build_match_rules(commands: Vec<String>, match_text: &[String]) -> Result<MatchRules> {
    let mut rules = Vec::with_capacity(match_text.len() / 2);
    for pair in match_text.chunks_exact(2) {
        let patch = parse_override_fragment(&pair[1])?;
        rules.push(MatchRule::new(&pair[0], patch)?);
    }
    MatchRules::new(commands, rules)
}

pub fn run_from_env() -> Result<()> {
    run(Cli::parse())
}

/// Build the scheduler against stdout and the real shell probe, wire up
/// interrupt handling, and scroll until a termination condition hits.
pub fn run(cli: Cli) -> Result<()> {
    let (settings, profile, rules) = cli.into_parts()?;
    let stdout = std::io::stdout();
    let mut scheduler = Scheduler::new(settings, profile, rules, ShellProbe, stdout.lock());
    install_shutdown_signals(&scheduler.shutdown_flag())?;
    scheduler.run()
}

#[cfg(unix)]
fn install_shutdown_signals(flag: &Arc<AtomicBool>) -> Result<()> {
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(flag))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(flag))?;
    Ok(())
}

#[cfg(not(unix))]
fn install_shutdown_signals(_flag: &Arc<AtomicBool>) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use marquee_core::error::MarqueeError;
    use marquee_core::profile::ProfileOverride;

    use super::{Cli, parse_lenient_bool};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("marquee").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn parse_error(args: &[&str]) -> clap::Error {
        Cli::try_parse_from(std::iter::once("marquee").chain(args.iter().copied()))
            .expect_err("arguments should be rejected")
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = parse(&["foobar"]);
        assert_eq!(cli.length, 40);
        assert_eq!(cli.scroll_padding, " - ");
        assert!(cli.scroll);
        assert!(cli.newline);
        assert!(!cli.reverse);
        assert!(!cli.update_check);
        assert!(!cli.eval_in_shell);
        assert_eq!(cli.delay, 0.4);
        assert_eq!(cli.scroll_text.as_deref(), Some("foobar"));
    }

    #[test]
    fn lenient_booleans_accept_the_usual_spellings() {
        for value in ["t", "T", "yes", "YES", "1", "on", "TrUe"] {
            assert_eq!(parse_lenient_bool(value), Ok(true), "{value}");
        }
        for value in ["f", "F", "no", "No", "0", "off", "FaLsE"] {
            assert_eq!(parse_lenient_bool(value), Ok(false), "{value}");
        }
        assert!(parse_lenient_bool("any").is_err());
    }

    #[test]
    fn boolean_flags_take_lenient_values() {
        let cli = parse(&["-s", "no", "-r", "t", "-n", "0", "foobar"]);
        assert!(!cli.scroll);
        assert!(cli.reverse);
        assert!(!cli.newline);
        let cli = parse(&["-u", "true", "-e", "yes", "foobar"]);
        assert!(cli.update_check);
        assert!(cli.eval_in_shell);
    }

    #[test]
    fn boolean_flag_values_never_leak_into_the_positional() {
        let cli = parse(&["-s", "false", "foobar"]);
        assert!(!cli.scroll);
        assert_eq!(cli.scroll_text.as_deref(), Some("foobar"));
    }

    #[test]
    fn invalid_boolean_value_is_rejected() {
        parse_error(&["-s", "any", "foobar"]);
    }

    #[test]
    fn negative_length_is_rejected() {
        parse_error(&["-l", "-1", "foobar"]);
    }

    #[test]
    fn non_numeric_shift_count_is_rejected() {
        parse_error(&["-C", "two", "foobar"]);
    }

    #[test]
    fn hyphen_leading_values_are_not_flags() {
        let cli = parse(&["-b", "-b:", "-a", "-a", "-p", "--", "--", "-text"]);
        assert_eq!(cli.before_text, "-b:");
        assert_eq!(cli.after_text, "-a");
        assert_eq!(cli.scroll_padding, "--");
        assert_eq!(cli.scroll_text.as_deref(), Some("-text"));
    }

    #[test]
    fn match_text_collects_pattern_options_pairs() {
        let cli = parse(&[
            "-M",
            "echo 1",
            "-m",
            "one",
            "-b b1:",
            "-M",
            "echo 2",
            "-m",
            "two",
            "-b b2:",
            "foobar",
        ]);
        assert_eq!(cli.match_command, ["echo 1", "echo 2"]);
        assert_eq!(cli.match_text, ["one", "-b b1:", "two", "-b b2:"]);
        let (_, _, rules) = cli.into_parts().unwrap();
        assert_eq!(
            rules.patch(1),
            Some(&ProfileOverride {
                before_text: Some("b2:".to_string()),
                ..ProfileOverride::default()
            })
        );
    }

    #[test]
    fn mismatched_match_counts_fail_validation() {
        let cli = parse(&[
            "-M", "echo 1", "-m", "1", "-l 1", "-M", "echo 2", "-m", "2", "-l 2", "-m", "3",
            "-l 3", "foobar",
        ]);
        assert!(matches!(
            cli.into_parts(),
            Err(MarqueeError::MatchCountMismatch {
                commands: 2,
                rules: 3
            })
        ));
    }

    #[test]
    fn single_match_command_broadcasts() {
        let cli = parse(&[
            "-M", "echo 1", "-m", "1", "-l 1", "-m", "2", "-l 2", "foobar",
        ]);
        assert!(cli.into_parts().is_ok());
    }

    #[test]
    fn invalid_match_pattern_fails_validation() {
        let cli = parse(&["-M", "echo 1", "-m", "(unclosed", "-l 1", "foobar"]);
        assert!(matches!(
            cli.into_parts(),
            Err(MarqueeError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn settings_durations_come_from_seconds() {
        let cli = parse(&["-d", "0.1", "-t", "2", "-U", "1.5", "foobar"]);
        let (settings, _, _) = cli.into_parts().unwrap();
        assert_eq!(settings.delay, std::time::Duration::from_millis(100));
        assert_eq!(settings.timeout, std::time::Duration::from_secs(2));
        assert_eq!(settings.update_interval, std::time::Duration::from_millis(1500));
    }

    #[test]
    fn negative_durations_fail_validation() {
        for (args, option) in [
            (&["--delay=-1", "foobar"], "--delay"),
            (&["--timeout=-0.5", "foobar"], "--timeout"),
            (&["--update-interval=-2", "foobar"], "--update-interval"),
        ] {
            let cli = parse(args);
            assert!(matches!(
                cli.into_parts(),
                Err(MarqueeError::InvalidDuration { option: got, .. }) if got == option
            ));
        }
    }

    #[test]
    fn non_finite_delay_fails_validation() {
        let cli = parse(&["-d", "NaN", "foobar"]);
        assert!(matches!(
            cli.into_parts(),
            Err(MarqueeError::InvalidDuration {
                option: "--delay",
                ..
            })
        ));
    }
}
