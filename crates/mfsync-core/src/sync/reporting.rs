//! Sync operation reporting and statistics

use std::fmt::Write;

use super::{DefinitionSyncResult, EntrySyncResult, ItemError, OperationResult};

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report for a definition copy or delete
    #[must_use]
    pub fn generate_summary(result: &DefinitionSyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Definition Summary ===\n");
        Self::write_counts(&mut output, "Metaobject definitions: ", &result.object_definitions);
        Self::write_counts(&mut output, "Metafield definitions:  ", &result.field_definitions);

        if !result.skipped.is_empty() {
            let _ = writeln!(output, "\nSkipped (reserved): {}", result.skipped.len());
            for skipped in &result.skipped {
                let _ = writeln!(output, "  - {}: {}", skipped.identifier, skipped.reason);
            }
        }

        let errors: Vec<&ItemError> = result
            .object_definitions
            .errors
            .iter()
            .chain(&result.field_definitions.errors)
            .collect();
        Self::write_errors(&mut output, &errors);

        if result.dry_run {
            output.push_str("\n(dry run: no changes were made)\n");
        }
        if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }

    /// Generate a summary report for an entry copy or delete
    #[must_use]
    pub fn generate_entry_summary(result: &EntrySyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Entry Summary ===\n");
        let _ = writeln!(output, "Created:   {}", result.created);
        let _ = writeln!(output, "Updated:   {}", result.updated);
        let _ = writeln!(output, "Unchanged: {}", result.unchanged);
        let _ = writeln!(output, "Skipped:   {}", result.skipped);
        let _ = writeln!(output, "Deleted:   {}", result.deleted);

        let errors: Vec<&ItemError> = result.errors.iter().collect();
        Self::write_errors(&mut output, &errors);

        let _ = writeln!(output, "\nTotal operations: {}", result.total_operations());

        if result.dry_run {
            output.push_str("(dry run: no changes were made)\n");
        }
        if result.aborted {
            output.push_str("Status: Cancelled by user\n");
        } else if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }

    fn write_counts(output: &mut String, label: &str, result: &OperationResult) {
        let _ = writeln!(
            output,
            "{label}{} succeeded, {} failed",
            result.success,
            result.errors.len()
        );
    }

    fn write_errors(output: &mut String, errors: &[&ItemError]) {
        if errors.is_empty() {
            return;
        }
        let _ = writeln!(output, "\nErrors ({}):", errors.len());
        for error in errors {
            let _ = writeln!(output, "  - {}: {}", error.identifier, error.message);
        }
    }
}
