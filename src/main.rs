use anyhow::Context;
use clap::Parser;
use diplo::{Cli, Interrupt, PipelineBuilder, PipelineError, Settings};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli).context("Failed to load settings")?;
    diplo::logging::init(&settings);
    let interrupt = Interrupt::new();
    diplo::interrupt::listen_for_ctrl_c(interrupt.clone())
        .context("Failed to install the Ctrl+C handler")?;

    let pipeline = PipelineBuilder::new(settings)
        .with_interrupt(interrupt)
        .build()?;

    match pipeline.run() {
        Ok(summary) => {
            log::info!("{}", summary);
            Ok(ExitCode::from(summary.status.code()))
        }
        Err(PipelineError::Interrupted) => {
            log::warn!("Interrupted.");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
