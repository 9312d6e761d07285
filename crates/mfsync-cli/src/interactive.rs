//! Interactive prompting for entry conflicts

use anyhow::{Context, Result};
use dialoguer::console::Term;
use mfsync_core::conflict::{EntryConflict, Verdict};

/// Fallback table width when the terminal size is unknown
const DEFAULT_WIDTH: usize = 100;

/// User's answer to a conflict prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserChoice {
    /// Final answer handed to the resolver
    Decide(Verdict),
    /// Show diff and re-prompt
    Diff,
    /// Enter pressed without a choice
    Default,
}

/// Terminal prompter for conflicting entries
///
/// The latching of "all" answers is done by the resolver; this type only
/// asks about the conflict in front of it.
pub struct InteractivePrompter {
    term: Term,
}

impl InteractivePrompter {
    /// Create a new interactive prompter
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Show `conflict` and ask what to do with it
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    pub fn prompt(&mut self, conflict: &EntryConflict) -> Result<Verdict> {
        let width = self
            .term
            .size_checked()
            .map_or(DEFAULT_WIDTH, |(_, cols)| usize::from(cols));
        println!("\n{}", conflict.render(width));

        loop {
            match self.show_prompt()? {
                UserChoice::Decide(verdict) => return Ok(verdict),
                UserChoice::Diff => println!("\n{}", conflict.diff()),
                UserChoice::Default => {
                    println!("(defaulted to 'skip')");
                    return Ok(Verdict::SkipThis);
                }
            }
        }
    }

    /// Read keys until one is recognized
    fn show_prompt(&self) -> Result<UserChoice> {
        print!("Update target? [u/s/a/n/d/q] (update/skip/update-all/skip-all/diff/quit): ");
        std::io::Write::flush(&mut std::io::stdout()).context("Failed to flush stdout")?;

        loop {
            let key = self.term.read_char().context("Failed to read user input")?;
            println!("{key}");

            if let Some(choice) = Self::parse_key(key) {
                return Ok(choice);
            }

            println!("Invalid key. Press u/s/a/n/d/q");
            print!("Update target? [u/s/a/n/d/q]: ");
            std::io::Write::flush(&mut std::io::stdout()).context("Failed to flush stdout")?;
        }
    }

    fn parse_key(key: char) -> Option<UserChoice> {
        let choice = match key.to_ascii_lowercase() {
            'u' => UserChoice::Decide(Verdict::UpdateThis),
            's' => UserChoice::Decide(Verdict::SkipThis),
            'a' => UserChoice::Decide(Verdict::UpdateAll),
            'n' => UserChoice::Decide(Verdict::SkipAll),
            'q' => UserChoice::Decide(Verdict::Abort),
            'd' => UserChoice::Diff,
            '\n' | '\r' => UserChoice::Default,
            _ => return None,
        };
        Some(choice)
    }
}

impl Default for InteractivePrompter {
    fn default() -> Self {
        Self::new()
    }
}
