//! The `gavel` binary: runs the scripted NFT auction scenario against an
//! in-memory EVM and prints the per-step report.

#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;
use gavel_scenario::{AuctionScenario, ScenarioReport};
use yansi::Paint;

mod handler;
mod opts;
mod utils;

use opts::Gavel;

fn main() -> Result<()> {
    handler::install();
    utils::subscriber();
    let args = Gavel::parse();

    let scenario = AuctionScenario::new(args.scenario_config(), &args.evm_opts())?;
    let report = scenario.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Renders the report with one status line per step.
fn print_report(report: &ScenarioReport) {
    for step in &report.steps {
        let gas = step.gas_used.map(|gas| format!(" (gas: {gas})")).unwrap_or_default();
        println!("{} {}{}", "[PASS]".green().bold(), step.label, gas.dim());
        println!("       {}", step.detail);
        for log in &step.logs {
            println!("       {} {log}", "emit".yellow());
        }
    }
    println!();
    println!("Total gas used: {}", report.total_gas());
}
