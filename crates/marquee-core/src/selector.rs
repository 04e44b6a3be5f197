//! Match rules: probe commands whose output decides which formatting
//! profile is active.
//!
//! Each rule pairs a regex with a sparse profile override. Every cycle
//! the selector runs each rule's command and search-matches the output;
//! the last rule that matches wins, and no match at all means the
//! default profile. The scroller resets only when the selection
//! actually changes.

use regex_lite::Regex;
use tracing::trace;

use crate::error::{MarqueeError, Result};
use crate::probe::Probe;
use crate::profile::ProfileOverride;

/// One `(pattern, override)` pair.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pattern: Regex,
    patch: ProfileOverride,
}

impl MatchRule {
    /// Compile `pattern` and attach the override applied while it
    /// matches. Search semantics: the pattern may match anywhere in the
    /// probe output, not just the whole of it.
    pub fn new(pattern: &str, patch: ProfileOverride) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| MarqueeError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern, patch })
    }

    #[must_use]
    pub fn patch(&self) -> &ProfileOverride {
        &self.patch
    }
}

/// The configured rules with their probe commands, right-aligned.
#[derive(Debug, Clone, Default)]
pub struct MatchRules {
    commands: Vec<String>,
    rules: Vec<MatchRule>,
}

impl MatchRules {
    /// Pair commands with rules.
    ///
    /// A single command broadcasts to every rule; otherwise the counts
    /// must be equal. Commands without any rules are ignored.
    pub fn new(commands: Vec<String>, rules: Vec<MatchRule>) -> Result<Self> {
        if rules.is_empty() {
            return Ok(Self::default());
        }
        let commands = if commands.len() == rules.len() {
            commands
        } else if commands.len() == 1 {
            vec![commands[0].clone(); rules.len()]
        } else {
            return Err(MarqueeError::MatchCountMismatch {
                commands: commands.len(),
                rules: rules.len(),
            });
        };
        Ok(Self { commands, rules })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule's command and return the index of the last rule
    /// whose output is present and matches its pattern.
    pub fn select<P: Probe>(&self, probe: &mut P, eval_in_shell: bool) -> Option<usize> {
        let mut selected = None;
        for (index, (command, rule)) in self.commands.iter().zip(&self.rules).enumerate() {
            let Some(output) = probe.probe(command, eval_in_shell) else {
                trace!(index, command, "match probe produced no output");
                continue;
            };
            if rule.pattern.is_match(&output) {
                selected = Some(index);
            }
        }
        selected
    }

    /// The override carried by the rule at `index`.
    #[must_use]
    pub fn patch(&self, index: usize) -> Option<&ProfileOverride> {
        self.rules.get(index).map(MatchRule::patch)
    }
}
