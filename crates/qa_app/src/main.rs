mod cli;
mod config;

use clap::Parser;
use qa_core::RunReport;
use qa_engine::{export_training_corpus, Pipeline, PipelineConfig};
use qa_logging::{qa_info, qa_warn};

use crate::cli::{Cli, Command};
use crate::config::load_config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    qa_logging::initialize(&cli.log_destination(), cli.log_level());

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Articles => {
            let pipeline = Pipeline::from_config(config);
            print_report(&pipeline.run_articles().await?);
        }
        Command::Table => {
            let pipeline = Pipeline::from_config(config);
            print_report(&pipeline.run_table().await?);
        }
        Command::Papers => {
            let pipeline = Pipeline::from_config(config);
            print_report(&pipeline.run_papers().await?);
        }
        Command::ExportTraining => export_training(&config)?,
        Command::All => run_all(config).await?,
    }
    Ok(())
}

async fn run_all(config: PipelineConfig) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config);
    print_report(&pipeline.run_articles().await?);
    print_report(&pipeline.run_table().await?);
    print_report(&pipeline.run_papers().await?);

    // Nothing to export is not a failure of the collection run.
    if let Err(err) = export_training(pipeline.config()) {
        qa_warn!("Skipping training export: {:#}", err);
    }
    Ok(())
}

fn export_training(config: &PipelineConfig) -> anyhow::Result<()> {
    let summary = export_training_corpus(&config.training)?;
    println!(
        "export-training: {} pairs written to {} ({} non-QA rows skipped)",
        summary.pair_count,
        summary.output_path.display(),
        summary.skipped_rows
    );
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("{report}");
    for diagnostic in &report.diagnostics {
        println!("  {diagnostic}");
    }
    qa_info!(
        "{} pipeline finished with {} skipped items",
        report.pipeline,
        report.total_skipped()
    );
}
