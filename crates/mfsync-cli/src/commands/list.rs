use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use mfsync_core::report::MarkdownReport;
use mfsync_core::sync::{StoreRole, SyncEngine};
use tracing::warn;

use super::common::{self, CommandOptions};
use crate::cli::Resources;

pub struct List;

impl List {
    pub async fn execute(
        store: &str,
        resources: Resources,
        entries: bool,
        output: Option<&Path>,
        options: &CommandOptions<'_>,
    ) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Listing {resources:?} definitions of store '{store}'");
        }

        let config = common::load_config(options)?;
        let client = common::connect(&config, store)?;
        let domain = client.store_domain().to_string();
        let engine = SyncEngine::new(config.sync_options()).with_source(client);

        let definitions = engine
            .fetch_all(StoreRole::Source)
            .await?
            .retain_kinds(resources.filter());

        let entry_counts = if entries {
            let mut counts = BTreeMap::new();
            for definition in &definitions.object_definitions {
                match engine
                    .fetch_entries(StoreRole::Source, &definition.type_name)
                    .await
                {
                    Ok(found) => {
                        counts.insert(definition.type_name.clone(), found.len());
                    }
                    Err(e) => warn!("{e:#}"),
                }
            }
            Some(counts)
        } else {
            None
        };

        let markdown = MarkdownReport::render(&definitions, &domain, entry_counts.as_ref());

        match output {
            Some(path) => {
                fs::write(path, &markdown)
                    .with_context(|| format!("Failed to write listing: {}", path.display()))?;
                println!("Wrote {} to {}", common::describe(&definitions), path.display());
            }
            None => print!("{markdown}"),
        }

        Ok(())
    }
}
