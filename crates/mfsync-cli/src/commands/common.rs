//! Common types and utilities for command execution

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use dialoguer::Confirm;
use mfsync_core::client::{GraphqlClient, SchemaClient};
use mfsync_core::config::{Config, ConfigManager};
use mfsync_core::conflict::{ConflictResolver, EntryConflict, Resolution};
use mfsync_core::manifest::{Manifest, ManifestMatcher};
use mfsync_core::model::{DefinitionSet, ResourceFilter};
use tracing::info;

use crate::cli::ConflictMode;
use crate::interactive::InteractivePrompter;

/// Execution options shared by every command
pub struct CommandOptions<'a> {
    /// Enable verbose output
    pub verbose: bool,
    /// Preview changes without applying (dry-run)
    pub dry_run: bool,
    /// Skip confirmations and update conflicts without prompting
    pub yes: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
}

impl<'a> CommandOptions<'a> {
    /// Create new command options
    #[must_use]
    pub const fn new(verbose: bool, dry_run: bool, yes: bool, config_path: Option<&'a Path>) -> Self {
        Self {
            verbose,
            dry_run,
            yes,
            config_path,
        }
    }
}

/// Load the layered configuration
pub fn load_config(options: &CommandOptions) -> anyhow::Result<Config> {
    ConfigManager::load(options.config_path).context("Failed to load configuration")
}

/// Build a client for the store configured as `name`
pub fn connect(config: &Config, name: &str) -> anyhow::Result<Arc<dyn SchemaClient>> {
    let store = config.store(name)?;
    let client = GraphqlClient::for_store(&store, config)
        .with_context(|| format!("Failed to create client for store '{name}'"))?;
    info!("Using store '{}' ({})", store.name, store.domain);
    Ok(Arc::new(client))
}

/// Fail when both sides of a transfer name the same store
pub fn ensure_distinct_stores(from: &str, to: &str) -> anyhow::Result<()> {
    if from == to {
        anyhow::bail!("Source and target store must differ (both are '{from}')");
    }
    Ok(())
}

/// Narrow `definitions` to `filter` and, when given, to the manifest at `manifest`
///
/// Manifest identifiers with no counterpart are reported and ignored.
pub fn select(
    definitions: DefinitionSet,
    filter: ResourceFilter,
    manifest: Option<&Path>,
) -> anyhow::Result<DefinitionSet> {
    let definitions = definitions.retain_kinds(filter);
    let Some(path) = manifest else {
        return Ok(definitions);
    };

    let manifest = Manifest::from_file(path)?;
    if manifest.is_empty() {
        eprintln!(
            "Warning: manifest {} lists no definitions; nothing selected",
            path.display()
        );
    }

    let matched = ManifestMatcher::find(&manifest, &definitions);
    for id in &matched.not_found {
        eprintln!("Warning: {id} from the manifest was not found");
    }
    Ok(matched.into_definitions())
}

/// Conflict resolver for entry copies
pub fn resolver(mode: ConflictMode, options: &CommandOptions) -> ConflictResolver {
    match mode {
        ConflictMode::Update => ConflictResolver::non_interactive(Resolution::Update, options.dry_run),
        ConflictMode::Skip => ConflictResolver::non_interactive(Resolution::Skip, options.dry_run),
        ConflictMode::Prompt if options.yes => {
            ConflictResolver::non_interactive(Resolution::Update, options.dry_run)
        }
        ConflictMode::Prompt => {
            let mut prompter = InteractivePrompter::new();
            ConflictResolver::interactive(
                Box::new(move |conflict: &EntryConflict| prompter.prompt(conflict)),
                options.dry_run,
            )
        }
    }
}

/// Ask before a destructive step
///
/// Always proceeds with `--yes` or `--dry-run`.
pub fn confirm(question: &str, options: &CommandOptions) -> anyhow::Result<bool> {
    if options.yes || options.dry_run {
        return Ok(true);
    }

    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// One-line description of a selection
pub fn describe(definitions: &DefinitionSet) -> String {
    format!(
        "{} metafield definition(s) and {} metaobject definition(s)",
        definitions.field_definitions.len(),
        definitions.object_definitions.len()
    )
}
