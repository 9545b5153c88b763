mod app;
mod cli;
mod color;
mod state;
mod ui;

use anyhow::Context;
use clap::Parser;
use rusty_shelf::report::JsonOut;
use rusty_shelf::Pipeline;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;

    let report = match Pipeline::new(config).run() {
        Ok(report) => report,
        Err(e) => {
            log::error!("Run aborted: {e}");
            return Err(e).context("loading inputs");
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: &report
            })?
        );
    } else {
        print!("{report}");
    }

    if cli.chart {
        app::show(report)?;
    }
    Ok(())
}
