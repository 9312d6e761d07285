//! Terminal rendering of entry conflicts

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use super::EntryConflict;
use crate::model::Metaobject;

const MIN_COLUMN_WIDTH: usize = 8;
const KEY_COLUMN_WIDTH: usize = 20;
const ELLIPSIS: &str = "...";

impl EntryConflict {
    /// Side-by-side table of both entries' fields, fitted into `width` columns
    ///
    /// Rows whose values differ are marked with `*`.
    #[must_use]
    pub fn render(&self, width: usize) -> String {
        let value_width = (width.saturating_sub(KEY_COLUMN_WIDTH + 8) / 2).max(MIN_COLUMN_WIDTH);
        let mut output = String::new();

        let _ = writeln!(output, "\x1b[1mConflict: {}\x1b[0m", self.identifier());
        let _ = writeln!(
            output,
            "  {:<kw$} | {:<vw$} | {:<vw$}",
            "field",
            "source",
            "target",
            kw = KEY_COLUMN_WIDTH,
            vw = value_width
        );
        let _ = writeln!(
            output,
            "  {}-+-{}-+-{}",
            "-".repeat(KEY_COLUMN_WIDTH),
            "-".repeat(value_width),
            "-".repeat(value_width)
        );

        for key in self.field_keys() {
            let source = field_value(&self.source, &key);
            let target = field_value(&self.target, &key);
            let marker = if source == target { ' ' } else { '*' };

            let _ = writeln!(
                output,
                "{marker} {:<kw$} | {:<vw$} | {:<vw$}",
                truncate(&key, KEY_COLUMN_WIDTH),
                truncate(source.unwrap_or("-"), value_width),
                truncate(target.unwrap_or("-"), value_width),
                kw = KEY_COLUMN_WIDTH,
                vw = value_width
            );
        }

        output
    }

    /// Color-coded unified diff from the target entry to the source entry
    #[must_use]
    pub fn diff(&self) -> String {
        let target = field_listing(&self.target);
        let source = field_listing(&self.source);
        let diff = TextDiff::from_lines(&target, &source);

        let mut output = String::new();
        let _ = writeln!(output, "\x1b[1m--- target: {}\x1b[0m", self.identifier());
        let _ = writeln!(output, "\x1b[1m+++ source: {}\x1b[0m", self.identifier());

        for change in diff.iter_all_changes() {
            let (sign, color) = match change.tag() {
                ChangeTag::Delete => ("-", "\x1b[31m"),
                ChangeTag::Insert => ("+", "\x1b[32m"),
                ChangeTag::Equal => (" ", "\x1b[0m"),
            };
            let _ = write!(output, "{color}{sign}{}\x1b[0m", change.value());
        }

        output
    }

    /// Field keys of both entries, source order first
    fn field_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for field in self.source.fields.iter().chain(&self.target.fields) {
            if !keys.contains(&field.key) {
                keys.push(field.key.clone());
            }
        }
        keys
    }
}

fn field_value<'a>(entry: &'a Metaobject, key: &str) -> Option<&'a str> {
    entry
        .fields
        .iter()
        .find(|field| field.key == key)
        .and_then(|field| field.value.as_deref())
}

fn field_listing(entry: &Metaobject) -> String {
    let mut fields: Vec<_> = entry
        .fields
        .iter()
        .filter_map(|field| field.value.as_ref().map(|value| (&field.key, value)))
        .collect();
    fields.sort();

    let mut listing = String::new();
    for (key, value) in fields {
        let _ = writeln!(listing, "{key}: {}", value.replace('\n', "\\n"));
    }
    listing
}

/// Cut `text` to at most `width` characters, marking the cut with `...`
fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut cut: String = single_line.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}
