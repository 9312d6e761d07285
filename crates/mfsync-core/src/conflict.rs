//! Entry conflict resolution
//!
//! When an entry being copied already exists at the target with different
//! values, the `ConflictResolver` decides what happens. It keeps the
//! session state across the whole run:
//! - "update all" / "skip all" latch and stop further prompting
//! - "abort" stops all remaining entry processing
//!
//! The actual question is asked through an injected prompt, so the CLI can
//! plug in a terminal while tests plug in a scripted policy.

mod render;

use anyhow::Context;

use crate::error::Result;
use crate::model::Metaobject;

/// An entry that exists in both stores with different values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryConflict {
    /// Entry as it exists in the source store
    pub source: Metaobject,
    /// Entry as it exists in the target store
    pub target: Metaobject,
}

impl EntryConflict {
    /// `type/handle` identifier of the conflicting entry
    #[must_use]
    pub fn identifier(&self) -> String {
        self.source.identifier()
    }
}

/// Answer given for one conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Overwrite this entry
    UpdateThis,
    /// Leave this entry untouched
    SkipThis,
    /// Overwrite this and every later conflict without asking
    UpdateAll,
    /// Skip this and every later conflict without asking
    SkipAll,
    /// Stop processing entries altogether
    Abort,
}

/// What the engine should do with a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Overwrite the target entry
    Update,
    /// Keep the target entry
    Skip,
    /// Stop the operation
    Abort,
}

/// Prompt callback asked for each unresolved conflict
pub type ConflictPrompt = Box<dyn FnMut(&EntryConflict) -> Result<Verdict>>;

/// Stateful decision engine for entry conflicts
pub struct ConflictResolver {
    prompt: Option<ConflictPrompt>,
    latched: Option<Resolution>,
    aborted: bool,
    dry_run: bool,
}

impl ConflictResolver {
    /// Create a resolver that asks `prompt` until a verdict latches
    #[must_use]
    pub fn interactive(prompt: ConflictPrompt, dry_run: bool) -> Self {
        Self {
            prompt: Some(prompt),
            latched: None,
            aborted: false,
            dry_run,
        }
    }

    /// Create a resolver that applies `resolution` to every conflict
    #[must_use]
    pub const fn non_interactive(resolution: Resolution, dry_run: bool) -> Self {
        Self {
            prompt: None,
            latched: Some(resolution),
            aborted: matches!(resolution, Resolution::Abort),
            dry_run,
        }
    }

    /// Whether this resolver belongs to a dry run
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether an abort verdict has been given
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Decide what to do with `conflict`
    ///
    /// Dry runs always answer `Update` ("would update") without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt fails (e.g. the terminal is gone).
    pub fn resolve(&mut self, conflict: &EntryConflict) -> Result<Resolution> {
        if self.aborted {
            return Ok(Resolution::Abort);
        }
        if self.dry_run {
            return Ok(Resolution::Update);
        }
        if let Some(resolution) = self.latched {
            return Ok(resolution);
        }

        let Some(prompt) = self.prompt.as_mut() else {
            return Ok(Resolution::Skip);
        };
        let verdict = prompt(conflict)
            .with_context(|| format!("Failed to resolve conflict for {}", conflict.identifier()))?;

        Ok(match verdict {
            Verdict::UpdateThis => Resolution::Update,
            Verdict::SkipThis => Resolution::Skip,
            Verdict::UpdateAll => {
                self.latched = Some(Resolution::Update);
                Resolution::Update
            }
            Verdict::SkipAll => {
                self.latched = Some(Resolution::Skip);
                Resolution::Skip
            }
            Verdict::Abort => {
                self.aborted = true;
                Resolution::Abort
            }
        })
    }
}
