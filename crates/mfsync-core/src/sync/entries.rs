//! Entry (metaobject) copy and delete

use anyhow::Context;
use tracing::{debug, info, warn};

use super::orchestrator::{StoreRole, SyncEngine};
use super::reserved::type_reason;
use super::{EntrySyncResult, ItemError};
use crate::client::{ClientResult, MutationOutcome, UserError};
use crate::conflict::{ConflictResolver, EntryConflict, Resolution};
use crate::error::Result;
use crate::model::{Metaobject, MetaobjectDefinition};

impl SyncEngine {
    /// Fetch every entry of `type_name` from the store in `role`, page by page
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing or a page cannot be fetched.
    pub async fn fetch_entries(&self, role: StoreRole, type_name: &str) -> Result<Vec<Metaobject>> {
        let client = self.client(role)?;
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = client
                .fetch_metaobjects(type_name, self.options().page_size, cursor.as_deref())
                .await
                .with_context(|| {
                    format!("Failed to fetch {type_name} entries from {}", client.store_domain())
                })?;
            entries.extend(page.items);

            match (page.has_next_page, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                (true, None) => {
                    warn!("{type_name}: next page announced without a cursor, stopping");
                    break;
                }
                (false, _) => break,
            }
        }

        debug!(
            "Fetched {} {type_name} entries from {}",
            entries.len(),
            client.store_domain()
        );
        Ok(entries)
    }

    /// Copy every entry of `definitions` from source to target
    ///
    /// Missing entries are created, identical ones left alone and differing
    /// ones handed to `resolver`. An abort verdict stops processing at once.
    ///
    /// # Errors
    ///
    /// Returns an error if a store is missing or the resolver's prompt fails.
    pub async fn copy_entries(
        &self,
        definitions: &[MetaobjectDefinition],
        resolver: &mut ConflictResolver,
    ) -> Result<EntrySyncResult> {
        self.client(StoreRole::Source)?;
        let target = self.client(StoreRole::Target)?;
        let dry_run = resolver.is_dry_run();
        let mut result = EntrySyncResult {
            dry_run,
            ..EntrySyncResult::default()
        };

        for definition in definitions {
            if let Some(reason) = type_reason(&definition.type_name) {
                debug!("Not copying {} entries: {reason}", definition.type_name);
                continue;
            }

            let entries = match self.fetch_entries(StoreRole::Source, &definition.type_name).await {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("{err:#}");
                    result
                        .errors
                        .push(ItemError::new(&definition.type_name, format!("{err:#}")));
                    continue;
                }
            };

            for entry in entries {
                if resolver.is_aborted() {
                    result.aborted = true;
                    return Ok(result);
                }
                let identifier = entry.identifier();

                let existing = match target
                    .fetch_metaobject_by_handle(&entry.type_name, &entry.handle)
                    .await
                {
                    Ok(existing) => existing,
                    Err(err) => {
                        warn!("Failed to look up {identifier} at target: {err}");
                        result.errors.push(ItemError::new(identifier, err.to_string()));
                        continue;
                    }
                };

                match existing {
                    None => {
                        if dry_run
                            || record(
                                &mut result,
                                &identifier,
                                target
                                    .create_metaobject(&entry.type_name, &entry.handle, &entry.to_input())
                                    .await,
                            )
                        {
                            info!("Created entry {identifier}");
                            result.created += 1;
                        }
                    }
                    Some(existing) if existing.same_values(&entry) => {
                        debug!("Entry {identifier} is unchanged");
                        result.unchanged += 1;
                    }
                    Some(existing) => {
                        let conflict = EntryConflict {
                            source: entry,
                            target: existing,
                        };
                        match resolver.resolve(&conflict)? {
                            Resolution::Update => {
                                let entry = &conflict.source;
                                if dry_run
                                    || record(
                                        &mut result,
                                        &identifier,
                                        target
                                            .upsert_metaobject(
                                                &entry.type_name,
                                                &entry.handle,
                                                &entry.to_input(),
                                            )
                                            .await,
                                    )
                                {
                                    info!("Updated entry {identifier}");
                                    result.updated += 1;
                                }
                            }
                            Resolution::Skip => {
                                debug!("Skipped entry {identifier}");
                                result.skipped += 1;
                            }
                            Resolution::Abort => {
                                info!("Entry copy cancelled at {identifier}");
                                result.aborted = true;
                                return Ok(result);
                            }
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    /// Delete every target entry of `definitions`
    ///
    /// All entries of a type are collected before the first deletion. The
    /// resolver's abort flag is checked before each entry.
    ///
    /// # Errors
    ///
    /// Returns an error if no target store is attached.
    pub async fn delete_entries(
        &self,
        definitions: &[MetaobjectDefinition],
        resolver: &ConflictResolver,
        dry_run: bool,
    ) -> Result<EntrySyncResult> {
        let target = self.client(StoreRole::Target)?;
        let mut result = EntrySyncResult {
            dry_run,
            ..EntrySyncResult::default()
        };

        for definition in definitions {
            if type_reason(&definition.type_name).is_some() {
                continue;
            }
            if resolver.is_aborted() {
                result.aborted = true;
                return Ok(result);
            }

            let entries = match self.fetch_entries(StoreRole::Target, &definition.type_name).await {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("{err:#}");
                    result
                        .errors
                        .push(ItemError::new(&definition.type_name, format!("{err:#}")));
                    continue;
                }
            };

            for entry in entries {
                if resolver.is_aborted() {
                    result.aborted = true;
                    return Ok(result);
                }
                let identifier = entry.identifier();

                if dry_run
                    || record(&mut result, &identifier, target.delete_metaobject(&entry.id).await)
                {
                    info!("Deleted entry {identifier}");
                    result.deleted += 1;
                }
            }
        }

        Ok(result)
    }
}

/// Record a failed entry mutation, returning whether it succeeded
fn record(
    result: &mut EntrySyncResult,
    identifier: &str,
    response: ClientResult<MutationOutcome<String>>,
) -> bool {
    let message = match response {
        Ok(MutationOutcome::Ok(_)) => return true,
        Ok(MutationOutcome::Err(errors)) => UserError::join(&errors),
        Err(err) => err.to_string(),
    };
    warn!("{identifier}: {message}");
    result.errors.push(ItemError::new(identifier, message));
    false
}
