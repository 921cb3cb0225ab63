use clap::Parser;
use keiro::prelude::*;
use std::fs;
use std::path::{Path as FsPath, PathBuf};
use std::process;
use std::time::Instant;

/// Resolves nested flows from a directory of `<flowId>.json` files.
struct DirectoryFlows {
    dir: PathBuf,
}

impl FlowFetcher for DirectoryFlows {
    fn fetch_flow(&self, flow_id: &str) -> std::result::Result<FetchedFlow, FlattenError> {
        let path = self.dir.join(format!("{}.json", flow_id));
        let raw = fs::read_to_string(&path).map_err(|e| FlattenError::Fetch {
            flow_id: flow_id.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        let draft: Graph = serde_json::from_str(&raw).map_err(|e| FlattenError::Fetch {
            flow_id: flow_id.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(FetchedFlow {
            slug: flow_id.to_string(),
            team_slug: "local".to_string(),
            draft,
            published: None,
        })
    }
}

/// Flatten and validate a keiro flow graph from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow graph JSON file (an `id -> node` map with a `_root` entry)
    flow_path: String,

    /// Directory containing nested flows as `<flowId>.json`
    #[arg(long)]
    flows_dir: Option<PathBuf>,

    /// Path to a JSON string array of recognised file-type field names
    #[arg(long)]
    file_types: Option<PathBuf>,

    /// Path to a JSON string array of statutory application type values
    #[arg(long)]
    application_types: Option<PathBuf>,

    /// Write the flattened graph and rule reports as a binary artifact
    #[arg(long)]
    artifact: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Load and check the flow graph ---
    let load_start = Instant::now();
    let raw = fs::read_to_string(&cli.flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read flow file '{}': {}", cli.flow_path, e))
    });
    let graph: Graph = serde_json::from_str(&raw)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow JSON: {}", e)));
    graph
        .validate_structure()
        .unwrap_or_else(|e| exit_with_error(&format!("Flow graph is not structurally valid: {}", e)));
    let load_duration = load_start.elapsed();
    println!("Loaded {} nodes in {:?}", graph.len(), load_duration);

    // --- 2. Flatten nested flows ---
    let flatten_start = Instant::now();
    let flattened = match &cli.flows_dir {
        Some(dir) => {
            let flows = DirectoryFlows { dir: dir.clone() };
            Flattener::new(&flows)
                .flatten(&graph, ResolveMode::Draft)
                .unwrap_or_else(|e| exit_with_error(&format!("Flattening failed: {}", e)))
        }
        None => Flattener::new(&NoExternalFlows)
            .flatten(&graph, ResolveMode::Draft)
            .unwrap_or_else(|e| exit_with_error(&format!("Flattening failed: {}", e))),
    };
    let flatten_duration = flatten_start.elapsed();
    println!(
        "Flattened to {} nodes in {:?}",
        flattened.len(),
        flatten_duration
    );

    // --- 3. Validate ---
    let schema = StaticSchemaValues {
        file_types: load_values(cli.file_types.as_deref()),
        application_types: load_values(cli.application_types.as_deref()),
    };
    let validate_start = Instant::now();
    let reports = Validator::new(&schema)
        .validate(&flattened)
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));
    let validate_duration = validate_start.elapsed();

    println!("\n--- Validation Results ---");
    let mut failed = false;
    for report in &reports {
        println!("  [{}] {}: {}", report.status, report.title, report.message);
        if report.status == RuleStatus::Fail {
            failed = true;
        }
    }

    // --- 4. Optional artifact ---
    if let Some(path) = &cli.artifact {
        FlattenedArtifact::new(flattened, reports)
            .save(&path.to_string_lossy())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write artifact: {}", e)));
        println!("\nArtifact written to {}", path.display());
    }

    println!("\n--- Performance Summary ---");
    println!("Loading:     {:?}", load_duration);
    println!("Flattening:  {:?}", flatten_duration);
    println!("Validation:  {:?}", validate_duration);
    println!("Total:       {:?}", total_start.elapsed());

    if failed {
        process::exit(1);
    }
}

fn load_values(path: Option<&FsPath>) -> Vec<String> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
            });
            serde_json::from_str(&raw).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse '{}': {}", path.display(), e))
            })
        }
        None => Vec::new(),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
