//! Markdown listing of a store's definitions
//!
//! The listing doubles as a manifest: every definition gets a level-3
//! heading under a "Metafield Definitions" or "Metaobject Definitions"
//! section, which is exactly what `Manifest::parse` reads back.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::model::{DefinitionSet, MetafieldDefinition, MetaobjectDefinition, Validation};

/// Markdown renderer for definition listings
pub struct MarkdownReport;

impl MarkdownReport {
    /// Render `definitions` of `store`
    ///
    /// When `entry_counts` is given (type → number of entries), each
    /// metaobject definition lists its entry count.
    #[must_use]
    pub fn render(
        definitions: &DefinitionSet,
        store: &str,
        entry_counts: Option<&BTreeMap<String, usize>>,
    ) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# Definitions for {store}\n");
        let _ = writeln!(
            output,
            "{} metafield definitions, {} metaobject definitions.\n",
            definitions.field_definitions.len(),
            definitions.object_definitions.len()
        );

        if !definitions.field_definitions.is_empty() {
            output.push_str("## Metafield Definitions\n\n");
            for (identifier, group) in Self::group_fields(&definitions.field_definitions) {
                Self::write_field_group(&mut output, &identifier, &group);
            }
        }

        if !definitions.object_definitions.is_empty() {
            output.push_str("## Metaobject Definitions\n\n");
            let mut objects: Vec<&MetaobjectDefinition> = definitions.object_definitions.iter().collect();
            objects.sort_by(|a, b| a.type_name.cmp(&b.type_name));
            for definition in objects {
                let count = entry_counts.and_then(|counts| counts.get(&definition.type_name).copied());
                Self::write_object(&mut output, definition, count);
            }
        }

        output
    }

    /// Field definitions grouped by `namespace.key`, sorted
    fn group_fields(definitions: &[MetafieldDefinition]) -> BTreeMap<String, Vec<&MetafieldDefinition>> {
        let mut groups: BTreeMap<String, Vec<&MetafieldDefinition>> = BTreeMap::new();
        for definition in definitions {
            groups.entry(definition.identifier()).or_default().push(definition);
        }
        groups
    }

    fn write_field_group(output: &mut String, identifier: &str, group: &[&MetafieldDefinition]) {
        let Some(first) = group.first() else {
            return;
        };

        let _ = writeln!(output, "### {identifier}\n");
        let _ = writeln!(output, "- **Name:** {}", first.name);
        let _ = writeln!(output, "- **Type:** `{}`", first.type_name);
        let owners: Vec<&str> = group.iter().map(|def| def.owner_type.as_str()).collect();
        let _ = writeln!(output, "- **Owner types:** {}", owners.join(", "));
        if let Some(description) = &first.description {
            let _ = writeln!(output, "- **Description:** {description}");
        }
        if let Some(storefront) = &first.access.storefront {
            let _ = writeln!(output, "- **Storefront access:** {storefront}");
        }
        if first.pinned {
            output.push_str("- **Pinned:** yes\n");
        }
        Self::write_validations(output, &first.validations, "");
        output.push('\n');
    }

    fn write_object(output: &mut String, definition: &MetaobjectDefinition, entries: Option<usize>) {
        let _ = writeln!(output, "### {}\n", definition.type_name);
        let _ = writeln!(output, "- **Name:** {}", definition.name);
        if let Some(description) = &definition.description {
            let _ = writeln!(output, "- **Description:** {description}");
        }
        if let Some(key) = &definition.display_name_key {
            let _ = writeln!(output, "- **Display name field:** `{key}`");
        }

        let mut capabilities = Vec::new();
        if definition.capabilities.publishable {
            capabilities.push("publishable");
        }
        if definition.capabilities.translatable {
            capabilities.push("translatable");
        }
        if !capabilities.is_empty() {
            let _ = writeln!(output, "- **Capabilities:** {}", capabilities.join(", "));
        }
        if let Some(count) = entries {
            let _ = writeln!(output, "- **Entries:** {count}");
        }

        if !definition.field_definitions.is_empty() {
            output.push_str("\n| Key | Name | Type | Required |\n|---|---|---|---|\n");
            for field in &definition.field_definitions {
                let _ = writeln!(
                    output,
                    "| `{}` | {} | `{}` | {} |",
                    field.key,
                    field.name.replace('|', "\\|"),
                    field.type_name,
                    if field.required { "yes" } else { "no" }
                );
            }
            for field in &definition.field_definitions {
                Self::write_validations(output, &field.validations, &field.key);
            }
        }
        output.push('\n');
    }

    fn write_validations(output: &mut String, validations: &[Validation], field: &str) {
        if validations.is_empty() {
            return;
        }
        if field.is_empty() {
            output.push_str("- **Validations:**\n");
        } else {
            let _ = writeln!(output, "\nValidations for `{field}`:\n");
        }
        for validation in validations {
            let _ = writeln!(output, "  - `{}`: `{}`", validation.name, validation.value);
        }
    }
}
