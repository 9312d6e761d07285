//! Platform- and app-owned definitions the engine never touches

use tracing::info;

use super::{SkippedDefinition, SyncEngine};
use crate::model::DefinitionSet;

/// Namespace prefixes of reserved metafield definitions
pub const RESERVED_NAMESPACE_PREFIXES: &[&str] = &["shopify", "app--"];

/// Type prefixes of reserved metaobject definitions
pub const RESERVED_TYPE_PREFIXES: &[&str] = &["shopify--", "app--"];

/// Definitions split into those the engine may touch and those it skips
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedPartition {
    /// Definitions safe to create or delete
    pub kept: DefinitionSet,
    /// Reserved definitions with skip reasons
    pub skipped: Vec<SkippedDefinition>,
}

pub(super) fn namespace_reason(namespace: &str) -> Option<String> {
    RESERVED_NAMESPACE_PREFIXES
        .iter()
        .find(|prefix| namespace.starts_with(*prefix))
        .map(|prefix| format!("reserved namespace prefix \"{prefix}\""))
}

pub(super) fn type_reason(type_name: &str) -> Option<String> {
    RESERVED_TYPE_PREFIXES
        .iter()
        .find(|prefix| type_name.starts_with(*prefix))
        .map(|prefix| format!("reserved type prefix \"{prefix}\""))
}

impl SyncEngine {
    /// Split `definitions` into kept and reserved definitions
    ///
    /// Every skip is logged with its reason.
    #[must_use]
    pub fn filter_reserved(definitions: &DefinitionSet) -> ReservedPartition {
        let mut partition = ReservedPartition::default();

        for definition in &definitions.field_definitions {
            match namespace_reason(&definition.namespace) {
                Some(reason) => {
                    let identifier = format!("metafield {}", definition.identifier());
                    info!("Skipping {identifier}: {reason}");
                    partition.skipped.push(SkippedDefinition { identifier, reason });
                }
                None => partition.kept.field_definitions.push(definition.clone()),
            }
        }

        for definition in &definitions.object_definitions {
            match type_reason(&definition.type_name) {
                Some(reason) => {
                    let identifier = format!("metaobject {}", definition.identifier());
                    info!("Skipping {identifier}: {reason}");
                    partition.skipped.push(SkippedDefinition { identifier, reason });
                }
                None => partition.kept.object_definitions.push(definition.clone()),
            }
        }

        partition
    }
}
