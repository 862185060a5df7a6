use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use game_core::map::map_file;
use game_core::mapgen::{GeneratorConfig, generate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a map from a generator config and write it as JSON.
    Generate {
        /// Path to the generator config JSON file
        #[arg(short, long)]
        config: PathBuf,
        /// Name of the generated map (defaults to the config's biome)
        #[arg(short, long)]
        name: Option<String>,
        /// Override the seed from the config
        #[arg(short, long)]
        seed: Option<u64>,
        /// Where to write the map JSON
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Generate the same map twice and verify the fingerprints match.
    Check {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print summary counts of an existing map file.
    Show {
        /// Path to a map JSON file
        map: PathBuf,
    },
}

fn main() -> Result<()> {
    match Args::parse().command {
        Command::Generate { config, name, seed, out } => run_generate(&config, name, seed, &out),
        Command::Check { config, seed } => run_check(&config, seed),
        Command::Show { map } => run_show(&map),
    }
}

fn run_generate(
    config_path: &Path,
    name: Option<String>,
    seed: Option<u64>,
    out: &Path,
) -> Result<()> {
    let config = load_config(config_path, seed)?;
    let name = name.unwrap_or_else(|| config.common().biome.clone());

    let generated = generate(&name, &config)
        .map_err(|error| anyhow::anyhow!("map generation failed: {error}"))?;
    for warning in &generated.warnings {
        eprintln!("warning: {warning}");
    }

    map_file::write_to_path(&generated.map, out)
        .map_err(|error| anyhow::anyhow!("failed to write {}: {error}", out.display()))?;

    println!("Wrote {}", out.display());
    print_summary(&generated.map);
    Ok(())
}

fn run_check(config_path: &Path, seed: Option<u64>) -> Result<()> {
    let config = load_config(config_path, seed)?;
    let name = config.common().biome.clone();

    let first = generate(&name, &config)
        .map_err(|error| anyhow::anyhow!("map generation failed: {error}"))?;
    let second = generate(&name, &config)
        .map_err(|error| anyhow::anyhow!("map generation failed: {error}"))?;

    let first_print = first.map.fingerprint();
    let second_print = second.map.fingerprint();
    println!("Fingerprint: 0x{first_print:016x}");
    if first.map.canonical_bytes() != second.map.canonical_bytes() {
        bail!("generation is not reproducible: 0x{first_print:016x} vs 0x{second_print:016x}");
    }
    println!("Reproducible.");
    Ok(())
}

fn run_show(map_path: &Path) -> Result<()> {
    let map = map_file::load_from_path(map_path)
        .map_err(|error| anyhow::anyhow!("failed to load {}: {error}", map_path.display()))?;
    print_summary(&map);
    Ok(())
}

fn load_config(path: &Path, seed: Option<u64>) -> Result<GeneratorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let mut config: GeneratorConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid generator config: {}", path.display()))?;
    if let Some(seed) = seed {
        config.set_seed(seed);
    }
    Ok(config)
}

fn print_summary(map: &game_core::DetailMap) {
    let decoration_instances: usize = map
        .decorations
        .iter()
        .chain(&map.animated_decorations)
        .map(|decoration| decoration.instances.len())
        .sum();
    println!("Map: {} [{}]", map.name, map.biome);
    println!("Nodes: {}", map.graph.len());
    println!("Edges: {}", map.unique_edges().len());
    println!("Decoration instances: {decoration_instances}");
    println!("Fingerprint: 0x{:016x}", map.fingerprint());
}
