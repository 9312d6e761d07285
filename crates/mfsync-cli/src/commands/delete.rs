use std::path::Path;

use mfsync_core::conflict::{ConflictResolver, Resolution};
use mfsync_core::sync::{StoreRole, SyncEngine, SyncReporter};

use super::common::{self, CommandOptions};
use crate::cli::Resources;

pub struct Delete;

impl Delete {
    pub async fn execute(
        store: &str,
        resources: Resources,
        manifest: Option<&Path>,
        entries: bool,
        options: &CommandOptions<'_>,
    ) -> anyhow::Result<()> {
        if options.verbose {
            eprintln!("Deleting {resources:?} definitions from store '{store}'");
            eprintln!("Dry run: {}", options.dry_run);
        }

        let config = common::load_config(options)?;
        let client = common::connect(&config, store)?;
        let domain = client.store_domain().to_string();
        let engine = SyncEngine::new(config.sync_options()).with_target(client);

        let existing = engine.fetch_all(StoreRole::Target).await?;
        let selection = common::select(existing, resources.filter(), manifest)?;

        if selection.is_empty() {
            println!("Nothing to delete.");
            return Ok(());
        }

        let question = format!("Delete {} from {domain}?", common::describe(&selection));
        if !common::confirm(&question, options)? {
            println!("Delete cancelled.");
            return Ok(());
        }

        if entries {
            let resolver = ConflictResolver::non_interactive(Resolution::Update, options.dry_run);
            let deleted = engine
                .delete_entries(&selection.object_definitions, &resolver, options.dry_run)
                .await?;
            println!("{}", SyncReporter::generate_entry_summary(&deleted));
        }

        let result = engine
            .delete_definitions(&selection, options.dry_run)
            .await?;
        println!("{}", SyncReporter::generate_summary(&result));

        Ok(())
    }
}
