//! Definition synchronization engine
//!
//! This module implements copying, deleting and listing definitions and
//! entries between two stores:
//! - reserved (platform/app owned) definitions are filtered out first
//! - metaobject definitions are created in bounded passes so references to
//!   definitions created later in the batch resolve on a later pass
//! - references are rewritten from source ids to target ids on the way
//! - entry conflicts are handed to a `ConflictResolver`
//!
//! Per-item failures are collected in the results and never abort a batch.

mod classify;
mod entries;
mod orchestrator;
mod remap;
mod reporting;
mod reserved;

pub use classify::{is_dependency_error, is_dependency_failure};
pub use orchestrator::{StoreRole, SyncEngine, SyncError, SyncOptions, UNRESOLVED_DEPENDENCY};
pub use remap::IdRemap;
pub use reporting::SyncReporter;
pub use reserved::{RESERVED_NAMESPACE_PREFIXES, RESERVED_TYPE_PREFIXES, ReservedPartition};

/// A failure attributed to one definition or entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Identifier of the failing item (`ns.key`, type or `type/handle`)
    pub identifier: String,
    /// Error message
    pub message: String,
}

impl ItemError {
    /// Create an item error
    pub fn new(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// Outcome counts for one definition collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationResult {
    /// Items processed successfully
    pub success: usize,
    /// Items that failed, with their messages
    pub errors: Vec<ItemError>,
}

impl OperationResult {
    /// Record a terminal failure
    pub fn record_failure(&mut self, identifier: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ItemError::new(identifier, message));
    }

    /// Whether no item failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A definition left alone because it is owned by the platform or an app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDefinition {
    /// Identifier of the skipped definition
    pub identifier: String,
    /// Why it was skipped
    pub reason: String,
}

/// Result of a definition copy or delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionSyncResult {
    /// Metafield definition outcome
    pub field_definitions: OperationResult,
    /// Metaobject definition outcome
    pub object_definitions: OperationResult,
    /// Reserved definitions that were excluded
    pub skipped: Vec<SkippedDefinition>,
    /// Whether the counts describe intended rather than performed work
    pub dry_run: bool,
}

impl DefinitionSyncResult {
    /// Total successfully processed definitions
    #[must_use]
    pub fn total_success(&self) -> usize {
        self.field_definitions.success + self.object_definitions.success
    }

    /// Whether both collections completed without errors
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.field_definitions.is_success() && self.object_definitions.is_success()
    }
}

/// Result of an entry copy or delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySyncResult {
    /// Entries created at the target
    pub created: usize,
    /// Conflicting entries overwritten at the target
    pub updated: usize,
    /// Entries already identical at the target
    pub unchanged: usize,
    /// Conflicting entries left untouched
    pub skipped: usize,
    /// Entries deleted
    pub deleted: usize,
    /// Per-entry failures
    pub errors: Vec<ItemError>,
    /// Whether processing stopped on an abort verdict
    pub aborted: bool,
    /// Whether the counts describe intended rather than performed work
    pub dry_run: bool,
}

impl EntrySyncResult {
    /// Total write operations performed (or intended)
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Whether no entry failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod integration_tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::client::{SchemaClient, UserError};
    use crate::conflict::{ConflictResolver, Resolution, Verdict};
    use crate::model::{DefinitionSet, OwnerType, REFERENCE_VALIDATION, Validation};
    use crate::testing::{MemoryStore, field_definition, metaobject, object_definition};

    const SOURCE: &str = "source.myshopify.com";
    const TARGET: &str = "target.myshopify.com";

    fn options() -> SyncOptions {
        SyncOptions {
            creation_delay: Duration::ZERO,
            pass_delay: Duration::ZERO,
            ..SyncOptions::default()
        }
    }

    fn engine(source: &Arc<MemoryStore>, target: &Arc<MemoryStore>) -> SyncEngine {
        SyncEngine::new(options())
            .with_source(Arc::clone(source) as Arc<dyn SchemaClient>)
            .with_target(Arc::clone(target) as Arc<dyn SchemaClient>)
    }

    fn count_calls(store: &MemoryStore, call: &str) -> usize {
        store.calls().iter().filter(|c| *c == call).count()
    }

    /// `chain-1` has no references, `chain-n` references `chain-(n-1)`
    fn chain(length: usize) -> Vec<crate::model::MetaobjectDefinition> {
        (1..=length)
            .map(|n| {
                let id = format!("src-{n}");
                let previous = format!("src-{}", n - 1);
                let references: Vec<&str> = if n == 1 {
                    Vec::new()
                } else {
                    vec![previous.as_str()]
                };
                object_definition(&id, &format!("chain-{n}"), &references)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_copy_rewrites_references() {
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_object_definition(object_definition("src-typeface", "typeface", &["src-font"]))
                .with_object_definition(object_definition("src-font", "font", &[])),
        );
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = engine(&source, &target);

        let definitions = engine.fetch_all(StoreRole::Source).await.unwrap();
        let result = engine
            .copy_with_dependencies(&definitions, false)
            .await
            .unwrap();

        assert_eq!(result.object_definitions.success, 2);
        assert!(result.object_definitions.errors.is_empty());
        assert_eq!(count_calls(&target, "create_metaobject_definition:typeface"), 2);

        let font = target.object_definition("font").unwrap();
        let typeface = target.object_definition("typeface").unwrap();
        assert_eq!(typeface.referenced_ids(), vec![font.id]);
    }

    #[tokio::test]
    async fn test_copy_rewrites_field_definition_references() {
        let mut rating = field_definition("src-rating", "custom", "font");
        rating.validations = vec![Validation::new(REFERENCE_VALIDATION, "src-font")];
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_object_definition(object_definition("src-font", "font", &[]))
                .with_field_definition(rating),
        );
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = engine(&source, &target);

        let definitions = engine.fetch_all(StoreRole::Source).await.unwrap();
        let result = engine
            .copy_with_dependencies(&definitions, false)
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.field_definitions.success, 1);
        let font = target.object_definition("font").unwrap();
        let copied = &target.field_definitions()[0];
        assert_eq!(copied.validations[0].value, font.id);
    }

    /// Copy `chain(length)` in reverse order, the worst case for the pass loop
    async fn copy_reverse_chain(length: usize) -> DefinitionSyncResult {
        let mut definitions = chain(length);
        definitions.reverse();
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = SyncEngine::new(options()).with_target(Arc::clone(&target) as Arc<dyn SchemaClient>);

        engine
            .copy_with_dependencies(&DefinitionSet::new(Vec::new(), definitions), false)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reverse_chain_within_pass_budget_converges() {
        let length = options().max_passes + 1;

        let result = copy_reverse_chain(length).await;

        assert_eq!(result.object_definitions.success, length);
        assert!(result.object_definitions.errors.is_empty());
    }

    #[tokio::test]
    async fn test_ordered_chain_converges_in_one_pass() {
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = SyncEngine::new(options()).with_target(Arc::clone(&target) as Arc<dyn SchemaClient>);

        let result = engine
            .copy_with_dependencies(&DefinitionSet::new(Vec::new(), chain(4)), false)
            .await
            .unwrap();

        assert_eq!(result.object_definitions.success, 4);
        assert_eq!(target.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_chain_beyond_pass_budget_leaves_tail_unresolved() {
        let length = options().max_passes + 2;

        let result = copy_reverse_chain(length).await;

        assert_eq!(result.object_definitions.success, length - 1);
        assert_eq!(result.object_definitions.errors.len(), 1);
        let tail = &result.object_definitions.errors[0];
        assert_eq!(tail.identifier, format!("chain-{length}"));
        assert!(tail.message.starts_with(UNRESOLVED_DEPENDENCY));
    }

    #[tokio::test]
    async fn test_default_budget_chain_boundaries() {
        assert_eq!(SyncOptions::default().max_passes, 3);

        let four = copy_reverse_chain(4).await;
        assert_eq!(four.object_definitions.success, 4);
        assert!(four.object_definitions.is_success());

        let five = copy_reverse_chain(5).await;
        assert_eq!(five.object_definitions.success, 4);
        let failed: Vec<_> = five
            .object_definitions
            .errors
            .iter()
            .map(|error| error.identifier.as_str())
            .collect();
        assert_eq!(failed, vec!["chain-5"]);
    }

    #[tokio::test]
    async fn test_transport_failure_during_copy_is_isolated() {
        let target = Arc::new(
            MemoryStore::new(TARGET)
                .fail_transport("color")
                .fail_transport("custom.gift_note"),
        );
        let engine = SyncEngine::new(options()).with_target(Arc::clone(&target) as Arc<dyn SchemaClient>);
        let definitions = DefinitionSet::new(
            vec![
                field_definition("f1", "custom", "subtitle"),
                field_definition("f2", "custom", "gift_note"),
                field_definition("f3", "custom", "care_guide"),
            ],
            vec![
                object_definition("src-font", "font", &[]),
                object_definition("src-color", "color", &[]),
                object_definition("src-size", "size", &[]),
            ],
        );

        let result = engine
            .copy_with_dependencies(&definitions, false)
            .await
            .unwrap();

        assert_eq!(result.object_definitions.success, 2);
        assert_eq!(result.object_definitions.errors.len(), 1);
        assert_eq!(result.object_definitions.errors[0].identifier, "color");
        assert!(result.object_definitions.errors[0].message.contains("connection reset"));
        assert_eq!(count_calls(&target, "create_metaobject_definition:color"), 1);
        assert!(target.object_definition("size").is_some());

        assert_eq!(result.field_definitions.success, 2);
        assert_eq!(result.field_definitions.errors.len(), 1);
        assert_eq!(result.field_definitions.errors[0].identifier, "custom.gift_note");
        assert!(result.field_definitions.errors[0].message.contains("network error"));
        assert!(
            target
                .field_definitions()
                .iter()
                .any(|def| def.key == "care_guide")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_during_delete_is_isolated() {
        let target = Arc::new(
            MemoryStore::new(TARGET)
                .with_object_definition(object_definition("o1", "font", &[]))
                .with_object_definition(object_definition("o2", "color", &[]))
                .with_object_definition(object_definition("o3", "size", &[]))
                .with_field_definition(field_definition("f1", "custom", "subtitle"))
                .with_field_definition(field_definition("f2", "custom", "gift_note"))
                .with_field_definition(field_definition("f3", "custom", "care_guide"))
                .fail_transport("o2")
                .fail_transport("f2"),
        );
        let engine = SyncEngine::new(options()).with_target(Arc::clone(&target) as Arc<dyn SchemaClient>);
        let existing = engine.fetch_all(StoreRole::Target).await.unwrap();

        let result = engine.delete_definitions(&existing, false).await.unwrap();

        assert_eq!(result.object_definitions.success, 2);
        assert_eq!(result.object_definitions.errors.len(), 1);
        assert_eq!(result.object_definitions.errors[0].identifier, "color");
        assert!(result.object_definitions.errors[0].message.contains("connection reset"));
        assert_eq!(result.field_definitions.success, 2);
        assert_eq!(result.field_definitions.errors.len(), 1);
        assert_eq!(result.field_definitions.errors[0].identifier, "custom.gift_note");

        let remaining: Vec<_> = target
            .object_definitions()
            .into_iter()
            .map(|def| def.type_name)
            .collect();
        assert_eq!(remaining, vec!["color"]);
        let remaining_fields: Vec<_> = target
            .field_definitions()
            .into_iter()
            .map(|def| def.key)
            .collect();
        assert_eq!(remaining_fields, vec!["gift_note"]);
    }

    #[tokio::test]
    async fn test_non_dependency_failure_is_terminal() {
        let target = Arc::new(
            MemoryStore::new(TARGET)
                .fail_creation("font", UserError::new("Name is too long").with_code("TOO_LONG")),
        );
        let engine = SyncEngine::new(options()).with_target(Arc::clone(&target) as Arc<dyn SchemaClient>);
        let definitions = DefinitionSet::new(
            Vec::new(),
            vec![
                object_definition("src-font", "font", &[]),
                object_definition("src-color", "color", &[]),
            ],
        );

        let result = engine
            .copy_with_dependencies(&definitions, false)
            .await
            .unwrap();

        assert_eq!(result.object_definitions.success, 1);
        assert_eq!(
            result.object_definitions.errors,
            vec![ItemError::new("font", "Name is too long")]
        );
        assert_eq!(count_calls(&target, "create_metaobject_definition:font"), 1);
    }

    #[tokio::test]
    async fn test_reserved_definitions_never_touched() {
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_field_definition(field_definition("f1", "shopify", "color-pattern"))
                .with_field_definition(field_definition("f2", "app--1234--reviews", "score"))
                .with_field_definition(field_definition("f3", "custom", "subtitle"))
                .with_object_definition(object_definition("o1", "shopify--color-pattern", &[]))
                .with_object_definition(object_definition("o2", "app--1234--badge", &[]))
                .with_object_definition(object_definition("o3", "font", &[])),
        );
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = engine(&source, &target);

        let definitions = engine.fetch_all(StoreRole::Source).await.unwrap();
        let result = engine
            .copy_with_dependencies(&definitions, false)
            .await
            .unwrap();

        assert_eq!(result.skipped.len(), 4);
        assert_eq!(result.total_success(), 2);
        assert_eq!(
            target.calls(),
            vec![
                "create_metaobject_definition:font".to_string(),
                "create_metafield_definition:custom.subtitle".to_string(),
            ]
        );

        let deleted = engine
            .delete_definitions(&definitions, false)
            .await
            .unwrap();
        assert_eq!(deleted.skipped.len(), 4);
        let delete_calls = target
            .calls()
            .iter()
            .filter(|call| call.starts_with("delete"))
            .count();
        assert_eq!(delete_calls, 2);
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_calls() {
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_object_definition(object_definition("o1", "font", &[]))
                .with_field_definition(field_definition("f1", "custom", "subtitle")),
        );
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = engine(&source, &target);

        let definitions = engine.fetch_all(StoreRole::Source).await.unwrap();
        let copied = engine
            .copy_with_dependencies(&definitions, true)
            .await
            .unwrap();
        let deleted = engine.delete_definitions(&definitions, true).await.unwrap();

        assert!(copied.dry_run);
        assert_eq!(copied.object_definitions.success, 1);
        assert_eq!(copied.field_definitions.success, 1);
        assert_eq!(deleted.total_success(), 2);
        assert!(target.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_recreate_is_idempotent() {
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_object_definition(object_definition("src-typeface", "typeface", &["src-font"]))
                .with_object_definition(object_definition("src-font", "font", &[]))
                .with_field_definition(field_definition("f1", "custom", "subtitle")),
        );
        let target = Arc::new(MemoryStore::new(TARGET));
        let engine = engine(&source, &target);
        let definitions = engine.fetch_all(StoreRole::Source).await.unwrap();

        let mut snapshots = Vec::new();
        for _ in 0..2 {
            let existing = engine.fetch_all(StoreRole::Target).await.unwrap();
            let deleted = engine.delete_definitions(&existing, false).await.unwrap();
            assert!(deleted.is_success());

            let copied = engine
                .copy_with_dependencies(&definitions, false)
                .await
                .unwrap();
            assert!(copied.is_success());
            assert_eq!(copied.total_success(), 3);

            let mut types: Vec<_> = target
                .object_definitions()
                .into_iter()
                .map(|def| def.type_name)
                .collect();
            types.sort();
            snapshots.push((types, target.field_definitions().len()));
        }

        assert_eq!(snapshots[0], snapshots[1]);
        let font = target.object_definition("font").unwrap();
        let typeface = target.object_definition("typeface").unwrap();
        assert_eq!(typeface.referenced_ids(), vec![font.id]);
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_denied_owner_type() {
        let mut order_field = field_definition("f2", "custom", "gift_note");
        order_field.owner_type = OwnerType::Order;
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_field_definition(field_definition("f1", "custom", "subtitle"))
                .with_field_definition(order_field)
                .with_object_definition(object_definition("o1", "font", &[]))
                .deny_owner_type(OwnerType::Order),
        );
        let target = Arc::new(MemoryStore::new(TARGET));

        let definitions = engine(&source, &target)
            .fetch_all(StoreRole::Source)
            .await
            .unwrap();

        assert_eq!(definitions.field_definitions.len(), 1);
        assert_eq!(definitions.field_definitions[0].key, "subtitle");
        assert_eq!(definitions.object_definitions.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_store_role() {
        let engine = SyncEngine::new(options());

        let err = engine
            .copy_with_dependencies(&DefinitionSet::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::MissingStore(StoreRole::Target))
        ));

        let err = engine.fetch_all(StoreRole::Source).await.unwrap_err();
        assert!(err.to_string().contains("source"));
    }

    fn entry_stores() -> (Arc<MemoryStore>, Arc<MemoryStore>) {
        let source = Arc::new(
            MemoryStore::new(SOURCE)
                .with_object_definition(object_definition("o1", "font", &[]))
                .with_metaobject(metaobject("s1", "font", "inter", &[("name", "Inter")]))
                .with_metaobject(metaobject("s2", "font", "roboto", &[("name", "Roboto")]))
                .with_metaobject(metaobject("s3", "font", "lato", &[("name", "Lato")]))
                .with_metaobject(metaobject("s4", "font", "mono", &[("name", "Mono")])),
        );
        let target = Arc::new(
            MemoryStore::new(TARGET)
                .with_object_definition(object_definition("t1", "font", &[]))
                .with_metaobject(metaobject("t2", "font", "roboto", &[("name", "Roboto")]))
                .with_metaobject(metaobject("t3", "font", "lato", &[("name", "Lato Old")]))
                .with_metaobject(metaobject("t4", "font", "mono", &[("name", "Mono Old")])),
        );
        (source, target)
    }

    fn scripted(verdicts: Vec<Verdict>, asked: Rc<Cell<usize>>) -> ConflictResolver {
        let mut verdicts = verdicts.into_iter();
        ConflictResolver::interactive(
            Box::new(move |_| {
                asked.set(asked.get() + 1);
                verdicts
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("prompt asked more often than scripted"))
            }),
            false,
        )
    }

    #[tokio::test]
    async fn test_copy_entries_creates_updates_and_skips_identical() {
        let (source, target) = entry_stores();
        let engine = engine(&source, &target);
        let definitions = source.object_definitions();
        let mut resolver = ConflictResolver::non_interactive(Resolution::Update, false);

        let result = engine
            .copy_entries(&definitions, &mut resolver)
            .await
            .unwrap();

        assert_eq!(result.created, 1);
        assert_eq!(result.unchanged, 1);
        assert_eq!(result.updated, 2);
        assert!(result.is_success());
        assert!(!result.aborted);

        let lato = target
            .metaobjects()
            .into_iter()
            .find(|entry| entry.handle == "lato")
            .unwrap();
        assert_eq!(lato.fields[0].value.as_deref(), Some("Lato"));
        assert_eq!(count_calls(&target, "upsert_metaobject:font/roboto"), 0);
    }

    #[tokio::test]
    async fn test_copy_entries_update_all_latches() {
        let (source, target) = entry_stores();
        let engine = engine(&source, &target);
        let asked = Rc::new(Cell::new(0));
        let mut resolver = scripted(vec![Verdict::UpdateAll], Rc::clone(&asked));

        let result = engine
            .copy_entries(&source.object_definitions(), &mut resolver)
            .await
            .unwrap();

        assert_eq!(result.updated, 2);
        assert_eq!(asked.get(), 1);
    }

    #[tokio::test]
    async fn test_abort_stops_copy_and_delete() {
        let (source, target) = entry_stores();
        let engine = engine(&source, &target);
        let asked = Rc::new(Cell::new(0));
        let mut resolver = scripted(vec![Verdict::Abort], Rc::clone(&asked));

        let copied = engine
            .copy_entries(&source.object_definitions(), &mut resolver)
            .await
            .unwrap();
        assert!(copied.aborted);
        assert_eq!(copied.updated, 0);
        assert_eq!(asked.get(), 1);
        assert!(
            target
                .calls()
                .iter()
                .all(|call| !call.starts_with("upsert_metaobject"))
        );

        let deleted = engine
            .delete_entries(&target.object_definitions(), &resolver, false)
            .await
            .unwrap();
        assert!(deleted.aborted);
        assert_eq!(deleted.deleted, 0);
        assert_eq!(target.metaobjects().len(), 4);
    }

    #[tokio::test]
    async fn test_copy_entries_dry_run() {
        let (source, target) = entry_stores();
        let engine = engine(&source, &target);
        let mut resolver = ConflictResolver::non_interactive(Resolution::Skip, true);

        let result = engine
            .copy_entries(&source.object_definitions(), &mut resolver)
            .await
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.created, 1);
        assert_eq!(result.updated, 2);
        assert!(target.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_entries_removes_all() {
        let (source, target) = entry_stores();
        let engine = engine(&source, &target);
        let resolver = ConflictResolver::non_interactive(Resolution::Update, false);

        let dry = engine
            .delete_entries(&target.object_definitions(), &resolver, true)
            .await
            .unwrap();
        assert_eq!(dry.deleted, 3);
        assert_eq!(target.metaobjects().len(), 3);

        let result = engine
            .delete_entries(&target.object_definitions(), &resolver, false)
            .await
            .unwrap();
        assert_eq!(result.deleted, 3);
        assert!(target.metaobjects().is_empty());

        let existing = engine.fetch_all(StoreRole::Target).await.unwrap();
        let deleted = engine.delete_definitions(&existing, false).await.unwrap();
        assert!(deleted.is_success());
        assert!(target.object_definitions().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_entries_follows_pages() {
        let mut store = MemoryStore::new(SOURCE).with_object_definition(object_definition("o1", "font", &[]));
        for n in 0..7 {
            store = store.with_metaobject(metaobject(
                &format!("s{n}"),
                "font",
                &format!("font-{n}"),
                &[("name", "x")],
            ));
        }
        let engine = SyncEngine::new(SyncOptions {
            page_size: 3,
            ..options()
        })
        .with_source(Arc::new(store) as Arc<dyn SchemaClient>);

        let entries = engine.fetch_entries(StoreRole::Source, "font").await.unwrap();

        assert_eq!(entries.len(), 7);
        assert_eq!(entries[6].handle, "font-6");
    }

    #[test]
    fn test_sync_reporter() {
        let mut result = DefinitionSyncResult::default();
        result.object_definitions.success = 2;
        result.field_definitions.success = 3;
        result.skipped.push(SkippedDefinition {
            identifier: "metafield shopify.color".to_string(),
            reason: "reserved namespace prefix \"shopify\"".to_string(),
        });

        let summary = SyncReporter::generate_summary(&result);

        assert!(summary.contains("Metaobject definitions: 2 succeeded, 0 failed"));
        assert!(summary.contains("Metafield definitions:  3 succeeded, 0 failed"));
        assert!(summary.contains("Skipped (reserved): 1"));
        assert!(summary.contains("metafield shopify.color"));
        assert!(summary.contains("✓ Success"));
    }

    #[test]
    fn test_sync_reporter_with_errors() {
        let mut result = DefinitionSyncResult::default();
        result
            .object_definitions
            .record_failure("typeface", "unresolved dependency after maximum retries");

        let summary = SyncReporter::generate_summary(&result);

        assert!(summary.contains("Errors (1)"));
        assert!(summary.contains("typeface: unresolved dependency"));
        assert!(summary.contains("✗ Completed with errors"));
        assert!(!result.is_success());
    }

    #[test]
    fn test_entry_reporter() {
        let result = EntrySyncResult {
            created: 1,
            updated: 2,
            unchanged: 4,
            aborted: true,
            dry_run: true,
            ..EntrySyncResult::default()
        };

        let summary = SyncReporter::generate_entry_summary(&result);

        assert!(summary.contains("Created:   1"));
        assert!(summary.contains("Updated:   2"));
        assert!(summary.contains("Unchanged: 4"));
        assert!(summary.contains("Total operations: 3"));
        assert!(summary.contains("Cancelled"));
        assert!(summary.contains("dry run"));
    }
}
