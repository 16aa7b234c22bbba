use crate::config::{apply_overrides, load_base_config, ConfigOverrides};
use crate::error::CliError;
use clap::Args;
use kubediag_io::{OutputFormat, SnapshotPaths};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Path to a single combined snapshot document. Mutually exclusive
    /// with the per-object-kind flags below.
    pub snapshot: Option<PathBuf>,

    #[arg(long)]
    pod: Option<PathBuf>,
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long)]
    pvc: Option<PathBuf>,
    #[arg(long)]
    pv: Option<PathBuf>,
    #[arg(long)]
    storageclass: Option<PathBuf>,
    #[arg(long)]
    node: Option<PathBuf>,
    #[arg(long)]
    owner: Option<PathBuf>,
    #[arg(long)]
    serviceaccount: Option<PathBuf>,
    #[arg(long)]
    secrets: Option<PathBuf>,
    #[arg(long)]
    configmaps: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Restrict evaluation to these categories (repeatable). Empty = all.
    #[arg(long = "enable-category")]
    enable_category: Vec<String>,

    /// Skip these categories even if enabled (repeatable).
    #[arg(long = "disable-category")]
    disable_category: Vec<String>,

    /// Attach per-rule evaluation detail to the output.
    #[arg(long)]
    verbose: bool,

    /// Override the engine version stamped into metadata.
    #[arg(long)]
    engine_version: Option<String>,

    /// Optional TOML/JSON file of `EngineConfig` knobs; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(args: DiagnoseArgs) -> Result<(), CliError> {
    let base = load_base_config(args.config.as_deref())?;
    let config = apply_overrides(
        base,
        ConfigOverrides {
            enable_categories: args.enable_category,
            disable_categories: args.disable_category,
            verbose: args.verbose,
            engine_version: args.engine_version,
        },
    );

    let snapshot = match &args.snapshot {
        Some(path) => kubediag_io::load_combined(path)?,
        None => kubediag_io::load_split(&SnapshotPaths {
            pod: args.pod,
            events: args.events,
            pvc: args.pvc,
            pv: args.pv,
            storageclass: args.storageclass,
            node: args.node,
            owner: args.owner,
            serviceaccount: args.serviceaccount,
            secrets: args.secrets,
            configmaps: args.configmaps,
        })?,
    };

    let registry = kubediag_rules::default_registry()?;
    let explanation = kubediag_engine::explain(snapshot, &registry, &config);
    println!("{}", kubediag_io::render(&explanation, args.format));
    Ok(())
}
