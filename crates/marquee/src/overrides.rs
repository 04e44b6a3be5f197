//! The shared parser for match-rule option overrides.
//!
//! A `--match-text` pair carries an options fragment like
//! `"-b 'playing: ' -s true"`. The fragment uses the same flags as the
//! main command line, every one optional, and is parsed exactly once at
//! startup — the running scroller only ever sees the resulting
//! [`ProfileOverride`].

use clap::Parser;

use marquee_core::error::{MarqueeError, Result};
use marquee_core::profile::ProfileOverride;

use crate::cli::parse_lenient_bool;

/// The adjustable subset of the flag surface, all fields optional.
#[derive(Debug, Parser)]
#[command(name = "match-options", no_binary_name = true, disable_help_flag = true)]
struct OverrideArgs {
    #[arg(short, long)]
    length: Option<usize>,

    #[arg(short, long, allow_hyphen_values = true)]
    before_text: Option<String>,

    #[arg(short, long, allow_hyphen_values = true)]
    after_text: Option<String>,

    #[arg(short = 'p', long, allow_hyphen_values = true)]
    scroll_padding: Option<String>,

    #[arg(short, long, value_parser = parse_lenient_bool)]
    scroll: Option<bool>,

    #[arg(short, long, value_parser = parse_lenient_bool)]
    update_check: Option<bool>,

    #[arg(allow_hyphen_values = true)]
    scroll_text: Option<String>,
}

/// Parse an override fragment with shell-quoting rules.
pub fn parse_override_fragment(fragment: &str) -> Result<ProfileOverride> {
    let tokens = shlex::split(fragment).ok_or_else(|| MarqueeError::InvalidOverride {
        fragment: fragment.to_string(),
        message: "unbalanced quoting".to_string(),
    })?;
    let args =
        OverrideArgs::try_parse_from(tokens).map_err(|error| MarqueeError::InvalidOverride {
            fragment: fragment.to_string(),
            message: error.to_string(),
        })?;
    Ok(ProfileOverride {
        length: args.length,
        before_text: args.before_text,
        after_text: args.after_text,
        scroll_padding: args.scroll_padding,
        scroll: args.scroll,
        update_check: args.update_check,
        scroll_text: args.scroll_text,
    })
}

#[cfg(test)]
mod tests {
    use marquee_core::error::MarqueeError;
    use marquee_core::profile::ProfileOverride;

    use super::parse_override_fragment;

    #[test]
    fn empty_fragment_overrides_nothing() {
        assert_eq!(
            parse_override_fragment("").unwrap(),
            ProfileOverride::default()
        );
    }

    #[test]
    fn unset_fields_stay_unset() {
        let patch = parse_override_fragment("-b b2:").unwrap();
        assert_eq!(patch.before_text.as_deref(), Some("b2:"));
        assert_eq!(patch.length, None);
        assert_eq!(patch.scroll, None);
        assert_eq!(patch.scroll_text, None);
    }

    #[test]
    fn long_flags_and_values_with_spaces() {
        let patch =
            parse_override_fragment("--before-text 'b: ' --scroll-padding ' | ' -s false").unwrap();
        assert_eq!(patch.before_text.as_deref(), Some("b: "));
        assert_eq!(patch.scroll_padding.as_deref(), Some(" | "));
        assert_eq!(patch.scroll, Some(false));
    }

    #[test]
    fn positional_replaces_the_scroll_text() {
        let patch = parse_override_fragment("bazqux").unwrap();
        assert_eq!(patch.scroll_text.as_deref(), Some("bazqux"));
    }

    #[test]
    fn quoted_command_stays_one_token() {
        let patch = parse_override_fragment("-u t -b > -a < 'echo aaいuえoわし'").unwrap();
        assert_eq!(patch.update_check, Some(true));
        assert_eq!(patch.before_text.as_deref(), Some(">"));
        assert_eq!(patch.after_text.as_deref(), Some("<"));
        assert_eq!(patch.scroll_text.as_deref(), Some("echo aaいuえoわし"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let result = parse_override_fragment("-z nope");
        assert!(matches!(
            result,
            Err(MarqueeError::InvalidOverride { fragment, .. }) if fragment == "-z nope"
        ));
    }

    #[test]
    fn unbalanced_quoting_is_rejected() {
        assert!(matches!(
            parse_override_fragment("-b 'unterminated"),
            Err(MarqueeError::InvalidOverride { message, .. }) if message == "unbalanced quoting"
        ));
    }

    #[test]
    fn lenient_booleans_apply_here_too() {
        let patch = parse_override_fragment("-s no -u YES").unwrap();
        assert_eq!(patch.scroll, Some(false));
        assert_eq!(patch.update_check, Some(true));
    }
}
