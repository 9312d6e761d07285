//! Sync orchestration - fetch, dependency-ordered copy and delete

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::classify::is_dependency_failure;
use super::remap::IdRemap;
use super::{DefinitionSyncResult, OperationResult};
use crate::client::{ClientResult, MutationOutcome, SchemaClient, UserError};
use crate::error::Result;
use crate::model::{DefinitionSet, MetafieldDefinition, MetaobjectDefinition, OwnerType};

/// Message prefix for definitions still pending after the last pass
pub const UNRESOLVED_DEPENDENCY: &str = "unresolved dependency after maximum retries";

/// Which store an operation reads from or writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRole {
    /// The store definitions are copied from
    Source,
    /// The store definitions are copied to or deleted from
    Target,
}

impl fmt::Display for StoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Engine usage errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// The operation needs a store that was not supplied
    #[error("no {0} store configured for this operation")]
    MissingStore(StoreRole),
}

/// Timing and batching knobs of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Wait after each successful definition creation
    pub creation_delay: Duration,
    /// Wait between retry passes
    pub pass_delay: Duration,
    /// Retry passes after the initial creation attempt
    pub max_passes: usize,
    /// Entries requested per page
    pub page_size: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            creation_delay: Duration::from_millis(500),
            pass_delay: Duration::from_secs(2),
            max_passes: 3,
            page_size: 50,
        }
    }
}

/// Main sync engine
pub struct SyncEngine {
    source: Option<Arc<dyn SchemaClient>>,
    target: Option<Arc<dyn SchemaClient>>,
    options: SyncOptions,
}

impl SyncEngine {
    /// Create an engine without any store attached
    #[must_use]
    pub fn new(options: SyncOptions) -> Self {
        Self {
            source: None,
            target: None,
            options,
        }
    }

    /// Attach the store definitions are read from
    #[must_use]
    pub fn with_source(mut self, client: Arc<dyn SchemaClient>) -> Self {
        self.source = Some(client);
        self
    }

    /// Attach the store definitions are written to or deleted from
    #[must_use]
    pub fn with_target(mut self, client: Arc<dyn SchemaClient>) -> Self {
        self.target = Some(client);
        self
    }

    /// Engine options
    #[must_use]
    pub const fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub(super) fn client(&self, role: StoreRole) -> Result<&dyn SchemaClient> {
        let client = match role {
            StoreRole::Source => self.source.as_deref(),
            StoreRole::Target => self.target.as_deref(),
        };
        client.ok_or_else(|| SyncError::MissingStore(role).into())
    }

    /// Fetch every definition of the store in `role`
    ///
    /// Metafield definitions are queried per owner type concurrently. An
    /// owner type the store cannot serve is logged and contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing or metaobject definitions
    /// cannot be fetched.
    pub async fn fetch_all(&self, role: StoreRole) -> Result<DefinitionSet> {
        let client = self.client(role)?;
        let domain = client.store_domain();
        info!("Fetching definitions from {domain}");

        let branches = OwnerType::ALL.into_iter().map(|owner_type| async move {
            (owner_type, client.fetch_metafield_definitions(owner_type).await)
        });

        let mut field_definitions = Vec::new();
        for (owner_type, fetched) in join_all(branches).await {
            match fetched {
                Ok(definitions) => {
                    debug!(
                        "Fetched {} {owner_type} metafield definitions from {domain}",
                        definitions.len()
                    );
                    field_definitions.extend(definitions);
                }
                Err(err) => warn!("Skipping {owner_type} metafield definitions on {domain}: {err}"),
            }
        }

        let object_definitions = client
            .fetch_metaobject_definitions()
            .await
            .with_context(|| format!("Failed to fetch metaobject definitions from {domain}"))?;

        info!(
            "Fetched {} metafield and {} metaobject definitions from {domain}",
            field_definitions.len(),
            object_definitions.len()
        );
        Ok(DefinitionSet::new(field_definitions, object_definitions))
    }

    /// Copy `definitions` to the target store
    ///
    /// Metaobject definitions are created first: one initial pass, then up
    /// to `max_passes` retry passes. One whose creation fails on a missing
    /// reference is retried on the next pass after its references have been rewritten to the target
    /// ids created so far. Metafield definitions follow, once.
    ///
    /// # Errors
    ///
    /// Returns an error only if no target store is attached. Item failures
    /// are reported in the result.
    pub async fn copy_with_dependencies(
        &self,
        definitions: &DefinitionSet,
        dry_run: bool,
    ) -> Result<DefinitionSyncResult> {
        let target = self.client(StoreRole::Target)?;
        let partition = Self::filter_reserved(definitions);
        let kept = partition.kept;

        let mut result = DefinitionSyncResult {
            skipped: partition.skipped,
            dry_run,
            ..DefinitionSyncResult::default()
        };

        if dry_run {
            result.object_definitions.success = kept.object_definitions.len();
            result.field_definitions.success = kept.field_definitions.len();
            return Ok(result);
        }

        let mut remap = IdRemap::default();
        result.object_definitions = self
            .create_object_definitions(target, &kept.object_definitions, &mut remap)
            .await;
        result.field_definitions = self
            .create_field_definitions(target, &kept.field_definitions, &remap)
            .await;

        Ok(result)
    }

    /// Delete `definitions` from the target store
    ///
    /// Metaobject definitions go first, then metafield definitions (which
    /// takes their values with them).
    ///
    /// # Errors
    ///
    /// Returns an error only if no target store is attached.
    pub async fn delete_definitions(
        &self,
        definitions: &DefinitionSet,
        dry_run: bool,
    ) -> Result<DefinitionSyncResult> {
        let target = self.client(StoreRole::Target)?;
        let partition = Self::filter_reserved(definitions);
        let kept = partition.kept;

        let mut result = DefinitionSyncResult {
            skipped: partition.skipped,
            dry_run,
            ..DefinitionSyncResult::default()
        };

        if dry_run {
            result.object_definitions.success = kept.object_definitions.len();
            result.field_definitions.success = kept.field_definitions.len();
            return Ok(result);
        }

        for definition in &kept.object_definitions {
            let response = target.delete_metaobject_definition(&definition.id).await;
            if settle(&mut result.object_definitions, definition.identifier(), response).is_some() {
                info!("Deleted metaobject definition {}", definition.identifier());
            }
        }

        for definition in &kept.field_definitions {
            let response = target.delete_metafield_definition(&definition.id).await;
            if settle(&mut result.field_definitions, definition.identifier(), response).is_some() {
                info!(
                    "Deleted metafield definition {} ({})",
                    definition.identifier(),
                    definition.owner_type
                );
            }
        }

        Ok(result)
    }

    async fn create_object_definitions(
        &self,
        target: &dyn SchemaClient,
        definitions: &[MetaobjectDefinition],
        remap: &mut IdRemap,
    ) -> OperationResult {
        let mut outcome = OperationResult::default();
        let mut pending: Vec<(&MetaobjectDefinition, String)> = definitions
            .iter()
            .map(|definition| (definition, String::new()))
            .collect();

        // One initial attempt, then up to `max_passes` retry passes
        for pass in 0..=self.options.max_passes {
            if pending.is_empty() {
                break;
            }
            if pass > 0 {
                info!(
                    "Retrying {} metaobject definitions (retry {pass}/{})",
                    pending.len(),
                    self.options.max_passes
                );
                pause(self.options.pass_delay).await;
            }

            let mut requeued = Vec::new();
            for (definition, _) in std::mem::take(&mut pending) {
                let rewritten = remap.rewrite_object_definition(definition);

                match target.create_metaobject_definition(&rewritten).await {
                    Ok(MutationOutcome::Ok(created_id)) => {
                        info!("Created metaobject definition {}", definition.identifier());
                        remap.insert(definition.id.clone(), created_id);
                        outcome.success += 1;
                        pause(self.options.creation_delay).await;
                    }
                    Ok(MutationOutcome::Err(errors)) => {
                        let message = UserError::join(&errors);
                        if is_dependency_failure(&errors) {
                            debug!(
                                "Deferring metaobject definition {}: {message}",
                                definition.identifier()
                            );
                            requeued.push((definition, message));
                        } else {
                            warn!(
                                "Failed to create metaobject definition {}: {message}",
                                definition.identifier()
                            );
                            outcome.record_failure(definition.identifier(), message);
                        }
                    }
                    Err(err) => {
                        warn!(
                            "Failed to create metaobject definition {}: {err}",
                            definition.identifier()
                        );
                        outcome.record_failure(definition.identifier(), err.to_string());
                    }
                }
            }
            pending = requeued;
        }

        for (definition, message) in pending {
            warn!(
                "Giving up on metaobject definition {} after {} retries",
                definition.identifier(),
                self.options.max_passes
            );
            let message = if message.is_empty() {
                UNRESOLVED_DEPENDENCY.to_string()
            } else {
                format!("{UNRESOLVED_DEPENDENCY}: {message}")
            };
            outcome.record_failure(definition.identifier(), message);
        }

        outcome
    }

    async fn create_field_definitions(
        &self,
        target: &dyn SchemaClient,
        definitions: &[MetafieldDefinition],
        remap: &IdRemap,
    ) -> OperationResult {
        let mut outcome = OperationResult::default();

        for definition in definitions {
            let rewritten = remap.rewrite_field_definition(definition);
            let response = target.create_metafield_definition(&rewritten).await;
            if settle(&mut outcome, definition.identifier(), response).is_some() {
                info!(
                    "Created metafield definition {} ({})",
                    definition.identifier(),
                    definition.owner_type
                );
            }
        }

        outcome
    }
}

/// Fold one mutation response into `outcome`, returning the payload on success
pub(super) fn settle<T>(
    outcome: &mut OperationResult,
    identifier: impl Into<String>,
    response: ClientResult<MutationOutcome<T>>,
) -> Option<T> {
    let identifier = identifier.into();
    match response {
        Ok(MutationOutcome::Ok(value)) => {
            outcome.success += 1;
            Some(value)
        }
        Ok(MutationOutcome::Err(errors)) => {
            let message = UserError::join(&errors);
            warn!("{identifier}: {message}");
            outcome.record_failure(identifier, message);
            None
        }
        Err(err) => {
            warn!("{identifier}: {err}");
            outcome.record_failure(identifier, err.to_string());
            None
        }
    }
}

pub(super) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
