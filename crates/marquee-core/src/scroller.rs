//! The scroll state machine: window offset, direction, and the
//! half-step phasing that keeps wide characters scrolling at the same
//! apparent speed as narrow ones.
//!
//! One frame is one [`Scroller::render_line`] followed by one
//! [`Scroller::advance`]. Rendering owns the half-step bookkeeping: a
//! wide character leaving the window is replaced by a single blank
//! column for one frame (never a torn glyph), and the offset is held
//! for exactly one cycle afterwards so the character is not skipped.

use marquee_text::{char_width, visual_slice, visual_width};
use tracing::debug;

use crate::profile::{FormattingProfile, ProfileOverride, apply_override};

/// Scroll state plus the profile it renders with.
///
/// Exclusively owns all mutable state of a running scroller. The
/// default profile is retained so match selections can always be
/// re-derived from it.
#[derive(Debug)]
pub struct Scroller {
    default_profile: FormattingProfile,
    active_profile: FormattingProfile,
    derived_text: Option<String>,
    offset: usize,
    half_step_pending: bool,
    suppress_next_advance: bool,
    active_match: Option<usize>,
    reverse: bool,
}

impl Scroller {
    #[must_use]
    pub fn new(profile: FormattingProfile, reverse: bool) -> Self {
        Self {
            active_profile: profile.clone(),
            default_profile: profile,
            derived_text: None,
            offset: 0,
            half_step_pending: false,
            suppress_next_advance: false,
            active_match: None,
            reverse,
        }
    }

    #[must_use]
    pub fn active_profile(&self) -> &FormattingProfile {
        &self.active_profile
    }

    #[must_use]
    pub fn derived_text(&self) -> Option<&str> {
        self.derived_text.as_deref()
    }

    /// Index of the match rule currently selected, if any.
    #[must_use]
    pub fn active_match(&self) -> Option<usize> {
        self.active_match
    }

    /// The text currently on display: command output when derived,
    /// otherwise the profile's literal text.
    fn effective_text(&self) -> &str {
        self.derived_text
            .as_deref()
            .unwrap_or(&self.active_profile.scroll_text)
    }

    /// Zero the window offset and clear both phase flags.
    ///
    /// Called whenever the effective text or the active profile
    /// changes; a pending half-step must not leak into new text.
    pub fn reset_scroll(&mut self) {
        self.offset = 0;
        self.half_step_pending = false;
        self.suppress_next_advance = false;
    }

    /// Store freshly probed text, resetting scroll state when it
    /// differs from what is already displayed. Returns whether it did.
    pub fn set_derived_text(&mut self, text: String) -> bool {
        if self.derived_text.as_deref() == Some(text.as_str()) {
            return false;
        }
        debug!(text, "derived text changed");
        self.derived_text = Some(text);
        self.reset_scroll();
        true
    }

    /// Switch to the given match selection.
    ///
    /// On change the active profile is rebuilt from the DEFAULT profile
    /// (merged with `patch` when a rule matched), previously derived
    /// text is dropped, and scroll state resets. Returns whether the
    /// selection changed.
    pub fn activate(&mut self, index: Option<usize>, patch: Option<&ProfileOverride>) -> bool {
        if index == self.active_match {
            return false;
        }
        debug!(from = ?self.active_match, to = ?index, "match selection changed");
        self.active_match = index;
        self.active_profile = match patch {
            Some(patch) => apply_override(&self.default_profile, patch),
            None => self.default_profile.clone(),
        };
        self.derived_text = None;
        self.reset_scroll();
        true
    }

    /// Build the current frame.
    ///
    /// Mutates only the half-step flags; the offset is left to
    /// [`advance`](Self::advance) so a frame can be rendered and held.
    pub fn render_line(&mut self) -> String {
        let profile = self.active_profile.clone();
        let text = self.effective_text().to_string();
        let mut before = profile.before_text.clone();

        if visual_width(&before) + visual_width(&text) + visual_width(&profile.after_text)
            <= profile.length
        {
            // Fits as-is; the offset is irrelevant this cycle.
            return format!("{before}{text}{}", profile.after_text);
        }

        let mut remaining = profile
            .length
            .saturating_sub(visual_width(&before) + visual_width(&profile.after_text))
            as isize;

        let body = if profile.scroll {
            let mut buffer = text;
            buffer.push_str(&profile.scroll_padding);
            let mut index = self.offset as isize;
            if self.half_step_pending {
                // Phase the wide character out: one blank column in its
                // place, and hold the offset for one cycle.
                before.push(' ');
                remaining -= 1;
                self.half_step_pending = false;
                self.suppress_next_advance = true;
                if self.reverse {
                    // The blank stands for the trailing half of the
                    // character about to scroll past the window start.
                    index += 1;
                }
            } else if self.wide_at_read_position(&buffer) {
                self.half_step_pending = true;
            }
            visual_slice(&buffer, index, remaining)
        } else {
            visual_slice(&text, 0, remaining)
        };

        format!("{before}{body}{}", profile.after_text)
    }

    /// Whether the character entering (or, reversed, leaving) the
    /// window is double-width.
    fn wide_at_read_position(&self, buffer: &str) -> bool {
        let chars: Vec<char> = buffer.chars().collect();
        if chars.is_empty() {
            return false;
        }
        let index = if self.reverse {
            self.offset as isize - 1
        } else {
            self.offset as isize
        };
        char_width(chars[index.rem_euclid(chars.len() as isize) as usize]) == 2
    }

    /// Move the offset one character (backwards when reversed), wrapping
    /// within the circular buffer of text plus padding.
    pub fn advance(&mut self) {
        if self.suppress_next_advance {
            self.suppress_next_advance = false;
            return;
        }
        let count = self.effective_text().chars().count()
            + self.active_profile.scroll_padding.chars().count();
        if count == 0 {
            return;
        }
        let max = count - 1;
        if self.reverse {
            self.offset = if self.offset == 0 { max } else { self.offset - 1 };
        } else {
            self.offset = if self.offset >= max { 0 } else { self.offset + 1 };
        }
    }
}
