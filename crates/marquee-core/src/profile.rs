//! Formatting profiles and the sparse overrides match rules carry.
//!
//! A [`FormattingProfile`] is the fully-populated bundle of options the
//! renderer works from. A [`ProfileOverride`] is the same schema with
//! every field optional; [`apply_override`] merges one over the DEFAULT
//! profile — never over whatever profile happens to be active — so
//! switching straight from one match rule to another can never stack
//! two overrides.

/// Separator shown between the end and start of the text while it
/// scrolls.
pub const DEFAULT_SCROLL_PADDING: &str = " - ";

/// Default visual width of the rendered line.
pub const DEFAULT_LENGTH: usize = 40;

/// The adjustable formatting options, fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingProfile {
    /// Target visual width of the scrolling region in display columns.
    /// Zero degenerates to printing only the before/after text.
    pub length: usize,
    /// Stationary text to the left of the scrolling region.
    pub before_text: String,
    /// Stationary text to the right of the scrolling region.
    pub after_text: String,
    /// Text inserted between the end and start of the text while it
    /// wraps during scrolling.
    pub scroll_padding: String,
    /// Whether the window moves at all.
    pub scroll: bool,
    /// When set, `scroll_text` is a command whose polled output is the
    /// text to display.
    pub update_check: bool,
    /// The literal text to scroll, or the command producing it when
    /// `update_check` is set.
    pub scroll_text: String,
}

impl Default for FormattingProfile {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            before_text: String::new(),
            after_text: String::new(),
            scroll_padding: DEFAULT_SCROLL_PADDING.to_string(),
            scroll: true,
            update_check: false,
            scroll_text: String::new(),
        }
    }
}

/// A sparse patch over [`FormattingProfile`]; unset fields fall back to
/// the default profile's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverride {
    pub length: Option<usize>,
    pub before_text: Option<String>,
    pub after_text: Option<String>,
    pub scroll_padding: Option<String>,
    pub scroll: Option<bool>,
    pub update_check: Option<bool>,
    pub scroll_text: Option<String>,
}

/// Merge a patch over the default profile.
///
/// Pure and default-relative: fields left unset in `patch` come from
/// `default`, not from the previously active profile.
#[must_use]
pub fn apply_override(default: &FormattingProfile, patch: &ProfileOverride) -> FormattingProfile {
    FormattingProfile {
        length: patch.length.unwrap_or(default.length),
        before_text: patch
            .before_text
            .clone()
            .unwrap_or_else(|| default.before_text.clone()),
        after_text: patch
            .after_text
            .clone()
            .unwrap_or_else(|| default.after_text.clone()),
        scroll_padding: patch
            .scroll_padding
            .clone()
            .unwrap_or_else(|| default.scroll_padding.clone()),
        scroll: patch.scroll.unwrap_or(default.scroll),
        update_check: patch.update_check.unwrap_or(default.update_check),
        scroll_text: patch
            .scroll_text
            .clone()
            .unwrap_or_else(|| default.scroll_text.clone()),
    }
}
