use mfsync_core::sync::{StoreRole, SyncEngine, SyncReporter};

use super::common::{self, CommandOptions};
use crate::cli::TransferArgs;

pub struct Copy;

impl Copy {
    pub async fn execute(args: &TransferArgs, options: &CommandOptions<'_>) -> anyhow::Result<()> {
        common::ensure_distinct_stores(&args.from, &args.to)?;

        if options.verbose {
            eprintln!("Copying from '{}' to '{}'", args.from, args.to);
            eprintln!("Resources: {:?}", args.resources);
            eprintln!("Conflict mode: {:?}", args.conflict);
            eprintln!("Dry run: {}", options.dry_run);
        }

        let config = common::load_config(options)?;
        let engine = SyncEngine::new(config.sync_options())
            .with_source(common::connect(&config, &args.from)?)
            .with_target(common::connect(&config, &args.to)?);

        let source = engine.fetch_all(StoreRole::Source).await?;
        let selection = common::select(source, args.resources.filter(), args.manifest.as_deref())?;

        if selection.is_empty() {
            println!("Nothing to copy.");
            return Ok(());
        }
        println!("Copying {}", common::describe(&selection));

        let result = engine
            .copy_with_dependencies(&selection, options.dry_run)
            .await?;
        println!("{}", SyncReporter::generate_summary(&result));

        if args.entries {
            let mut resolver = common::resolver(args.conflict, options);
            let entries = engine
                .copy_entries(&selection.object_definitions, &mut resolver)
                .await?;
            println!("{}", SyncReporter::generate_entry_summary(&entries));

            if entries.aborted {
                eprintln!("\nEntry copy cancelled by user.");
            }
        }

        Ok(())
    }
}
