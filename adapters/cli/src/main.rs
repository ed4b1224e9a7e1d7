#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that ranks a dataset and generates randomized nexuses.

mod dataset;
mod generate;
mod link;
mod settings;
mod templates;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{info, warn};
use nexus_randomizer_core::{Args, NexusTemplate};
use nexus_randomizer_system_assignment::{ensure_supply, seed_from_label};

use crate::{
    dataset::{now_nanos, Dataset},
    generate::{filter_candidates, generate, GenerateRequest},
    link::ShareLink,
    settings::{collect_args, Kind},
    templates::load_template,
};

/// Randomized nexus generator.
#[derive(Debug, Parser)]
#[command(name = "nexus-randomizer", version)]
struct Cli {
    /// Raise log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute level difficulty and player skill ranks.
    Rank {
        /// Dataset directory.
        #[arg(long, default_value = "dataset")]
        dataset: PathBuf,
        /// Write the snapshot here instead of standard output.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report how many levels match the filters.
    Count(RunArgs),
    /// Generate a randomized nexus assignment.
    Generate {
        #[command(flatten)]
        run: RunArgs,
        /// Seed label; a time-derived label is used when absent.
        #[arg(long)]
        seed: Option<String>,
        /// Include the complete door table with the template's static doors.
        #[arg(long)]
        full: bool,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Encode or decode share codes.
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },
}

#[derive(Debug, Subcommand)]
enum LinkAction {
    /// Check the supply and print a share code for the run.
    Encode {
        #[command(flatten)]
        run: RunArgs,
        /// Seed label; a time-derived label is used when absent.
        #[arg(long)]
        seed: Option<String>,
    },
    /// Print the contents of a share code.
    Decode {
        /// Share code to decode.
        code: String,
    },
}

/// Dataset, template and filter arguments shared by several commands.
#[derive(Debug, ClapArgs)]
struct RunArgs {
    /// Dataset directory.
    #[arg(long, default_value = "dataset")]
    dataset: PathBuf,
    /// Template JSON path, `linear:N`, or `linear` with `--set num-levels=N`.
    #[arg(long, required_unless_present = "link")]
    template: Option<String>,
    /// Randomizer flavour.
    #[arg(long, value_enum, required_unless_present = "link")]
    kind: Option<Kind>,
    /// Flat TOML table of filter arguments.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override a filter argument; may be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
    /// Share code supplying kind, template, seed and arguments.
    #[arg(long, conflicts_with_all = ["template", "kind"])]
    link: Option<String>,
}

/// Fully resolved run parameters.
struct Run {
    dataset: Dataset,
    kind: Kind,
    template_source: String,
    template: NexusTemplate,
    args: Args,
    seed: Option<String>,
}

impl RunArgs {
    fn resolve(&self, seed: Option<String>) -> Result<Run> {
        let dataset = Dataset::load(&self.dataset)?;
        let mut args = collect_args(self.config.as_deref(), &self.overrides)?;

        let (kind, template_source, seed) = match &self.link {
            Some(code) => {
                let link = ShareLink::decode(code).context("invalid share code")?;
                if link.dataset_id != 0 && link.dataset_id != dataset.rank_gen_time() {
                    warn!(
                        "share code was made against dataset {}, loaded dataset is {}",
                        link.dataset_id,
                        dataset.rank_gen_time()
                    );
                }
                let mut merged = link.args;
                merged.append(&mut args);
                args = merged;
                (link.kind, link.template, seed.or(Some(link.seed)))
            }
            None => match (self.kind, &self.template) {
                (Some(kind), Some(template)) => (kind, template.clone(), seed),
                _ => bail!("--kind and --template are required without --link"),
            },
        };

        let template = load_template(&template_source, &args, &dataset.catalog)?;
        info!("using template {}", template.display_label());
        Ok(Run {
            dataset,
            kind,
            template_source,
            template,
            args,
            seed,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Rank { dataset, output } => rank(&dataset, output.as_deref()),
        Command::Count(run) => count(&run),
        Command::Generate {
            run,
            seed,
            full,
            pretty,
        } => {
            let run = run.resolve(seed)?;
            let seed = run.seed.clone().unwrap_or_else(fresh_seed);
            let request = GenerateRequest {
                kind: run.kind,
                seed: &seed,
                include_full: full,
            };
            let report = generate(request, &run.dataset, &run.template, &run.args)?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
            Ok(())
        }
        Command::Link { action } => match action {
            LinkAction::Encode { run, seed } => {
                let run = run.resolve(seed)?;
                let candidates = filter_candidates(run.kind, &run.dataset, &run.template, &run.args);
                ensure_supply(&candidates.levels, candidates.needed)?;
                let seed = run.seed.clone().unwrap_or_else(fresh_seed);
                let link = ShareLink::new(
                    run.kind,
                    &run.template_source,
                    &seed,
                    run.dataset.rank_gen_time(),
                    &run.args,
                );
                println!("{} levels matching constraints.", candidates.levels.len());
                println!("{}", link.encode()?);
                Ok(())
            }
            LinkAction::Decode { code } => {
                let link = ShareLink::decode(&code)?;
                println!("{}", serde_json::to_string_pretty(&link)?);
                Ok(())
            }
        },
    }
}

fn rank(dataset: &Path, output: Option<&Path>) -> Result<()> {
    let dataset = Dataset::load(dataset)?;
    let snapshot = dataset.compute_ranks();
    let json = serde_json::to_string(&snapshot)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote ranks for {} levels to {}", snapshot.level_ranks.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn count(run: &RunArgs) -> Result<()> {
    let run = run.resolve(None)?;
    let candidates = filter_candidates(run.kind, &run.dataset, &run.template, &run.args);
    println!("{} matching levels, need {}", candidates.levels.len(), candidates.needed);
    Ok(())
}

/// Eight hex digits derived from the current time.
fn fresh_seed() -> String {
    let seed = seed_from_label(&now_nanos().to_string());
    format!("{:08x}", seed >> 32)
}
