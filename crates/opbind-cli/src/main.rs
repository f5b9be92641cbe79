//! opbind CLI: inspect the operators an engine exposes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use opbind_core::prelude::*;
use opbind_engine::{locate, OperatorManifest};
use opbind_registry::{discover, doc, Registry};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opbind")]
#[command(about = "Discover and inspect engine operators", long_about = None)]
struct Cli {
    /// Operator manifest (YAML or JSON); falls back to OPBIND_MANIFEST
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every bound function with its signature
    List {
        /// Only this namespace (ops, internal, contrib, linalg, sparse)
        #[arg(short, long)]
        namespace: Option<NamespaceName>,
    },

    /// Show documentation for one function
    Describe {
        #[arg(short, long, default_value = "ops")]
        namespace: NamespaceName,

        /// Function name within the namespace
        name: String,
    },

    /// Run discovery and summarize the registry
    Check,

    /// Show where the engine library would be loaded from
    Locate,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = BindConfig::from_env();

    let result = match cli.command {
        Commands::List { namespace } => {
            load_registry(cli.manifest, &cfg).map(|reg| print_lines(listing(&reg, namespace)))
        }
        Commands::Describe { namespace, name } => load_registry(cli.manifest, &cfg)
            .and_then(|reg| reg.entry(namespace, name.as_str()).map(doc::render))
            .map(|text| print!("{text}")),
        Commands::Check => load_registry(cli.manifest, &cfg)
            .and_then(|reg| check_summary(&reg))
            .map(print_lines),
        Commands::Locate => locate_report(&cfg),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_registry(manifest: Option<PathBuf>, cfg: &BindConfig) -> Result<Registry> {
    let path = manifest
        .or_else(|| cfg.manifest_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| {
            Error::Config("no operator manifest given (use --manifest or OPBIND_MANIFEST)".into())
        })?;
    let engine = OperatorManifest::from_path(&path)?.into_engine()?;
    discover(Arc::new(engine))
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn listing(reg: &Registry, namespace: Option<NamespaceName>) -> Vec<String> {
    reg.entries()
        .filter(|e| namespace.map_or(true, |ns| e.namespace == ns))
        .map(|e| e.metadata.signature(&e.qualified_name()))
        .collect()
}

fn check_summary(reg: &Registry) -> Result<Vec<String>> {
    let mut lines = vec![format!(
        "✓ {} functions bound ({} declared names)",
        reg.len(),
        reg.declared_len()
    )];
    for ns in reg.namespaces() {
        lines.push(format!("  {:<9} {}", ns, reg.namespace(ns).count()));
    }
    lines.push(format!("  Fingerprint: {}", reg.fingerprint()?));
    Ok(lines)
}

fn locate_report(cfg: &BindConfig) -> Result<()> {
    let candidates = locate::candidate_paths(cfg);
    println!("Library: {}", locate::library_file_name(&cfg.library_name));
    println!("Candidates:");
    for path in &candidates {
        let mark = if path.is_file() { "found" } else { "missing" };
        println!("  {} ({mark})", path.display());
    }
    let found = locate::locate_library(cfg)?;
    println!("Using: {}", found[0].display());
    Ok(())
}
