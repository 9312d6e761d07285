use mfsync_core::sync::{StoreRole, SyncEngine, SyncReporter};

use super::common::{self, CommandOptions};
use crate::cli::TransferArgs;

/// Delete-then-copy: the target's selected definitions are removed before
/// the source's are copied over, using one engine and one resolver.
pub struct Bulk;

impl Bulk {
    pub async fn execute(args: &TransferArgs, options: &CommandOptions<'_>) -> anyhow::Result<()> {
        common::ensure_distinct_stores(&args.from, &args.to)?;

        if options.verbose {
            eprintln!("Replacing definitions on '{}' with those of '{}'", args.to, args.from);
            eprintln!("Resources: {:?}", args.resources);
            eprintln!("Dry run: {}", options.dry_run);
        }

        let config = common::load_config(options)?;
        let target_client = common::connect(&config, &args.to)?;
        let target_domain = target_client.store_domain().to_string();
        let engine = SyncEngine::new(config.sync_options())
            .with_source(common::connect(&config, &args.from)?)
            .with_target(target_client);

        let filter = args.resources.filter();
        let manifest = args.manifest.as_deref();
        let source = common::select(engine.fetch_all(StoreRole::Source).await?, filter, manifest)?;
        let existing = common::select(engine.fetch_all(StoreRole::Target).await?, filter, manifest)?;

        if source.is_empty() && existing.is_empty() {
            println!("Nothing to replace.");
            return Ok(());
        }

        let question = format!(
            "Delete {} from {target_domain} and copy {} in their place?",
            common::describe(&existing),
            common::describe(&source)
        );
        if !common::confirm(&question, options)? {
            println!("Bulk replace cancelled.");
            return Ok(());
        }

        let mut resolver = common::resolver(args.conflict, options);

        println!("Phase 1: deleting from {target_domain}");
        if args.entries {
            let deleted = engine
                .delete_entries(&existing.object_definitions, &resolver, options.dry_run)
                .await?;
            println!("{}", SyncReporter::generate_entry_summary(&deleted));
        }
        let deleted = engine.delete_definitions(&existing, options.dry_run).await?;
        println!("{}", SyncReporter::generate_summary(&deleted));

        println!("Phase 2: copying to {target_domain}");
        let copied = engine
            .copy_with_dependencies(&source, options.dry_run)
            .await?;
        println!("{}", SyncReporter::generate_summary(&copied));

        if args.entries {
            let entries = engine
                .copy_entries(&source.object_definitions, &mut resolver)
                .await?;
            println!("{}", SyncReporter::generate_entry_summary(&entries));

            if entries.aborted {
                eprintln!("\nEntry copy cancelled by user.");
            }
        }

        Ok(())
    }
}
