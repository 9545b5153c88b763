use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rusty_shelf::data::sentiment::ScoringPolicy;
use rusty_shelf::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "rusty-shelf", version, about = "Book metadata and review analytics")]
pub struct Cli {
    #[arg(long, help = "Books table (csv, tsv, json or parquet)")]
    pub books: Option<PathBuf>,
    #[arg(long, help = "Reviews table (csv, tsv, json or parquet)")]
    pub reviews: Option<PathBuf>,
    #[arg(long, help = "JSON config file; flags override its values")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Length of each ranking")]
    pub top: Option<usize>,
    #[arg(long, value_enum, help = "How to treat reviews the scorer fails on")]
    pub scoring: Option<ScoringPolicy>,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, help = "Open the chart viewer after the run")]
    pub chart: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(p) = &self.books {
            cfg.books_path = p.clone();
        }
        if let Some(p) = &self.reviews {
            cfg.reviews_path = p.clone();
        }
        if let Some(n) = self.top {
            cfg.top_n = n;
        }
        if let Some(policy) = self.scoring {
            cfg.scoring_policy = policy;
        }
        Ok(cfg)
    }
}
