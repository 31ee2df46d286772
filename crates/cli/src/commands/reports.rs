use std::{fs::File, io::BufWriter, path::PathBuf};

use pftracker_client::{
    Client, api::DateRange, controllers::ReportsController, export::export_filename,
};

use super::{date_range, require_session};
use crate::{
    cli::ReportsCommand,
    error::{AppError, Result},
    render,
};

pub async fn run(client: &Client, command: ReportsCommand) -> Result<()> {
    require_session(client)?;
    let reports = client.reports();
    match command {
        ReportsCommand::Summary(range) => {
            load(&reports, date_range(&range)?).await?;
            let state = reports.snapshot();
            println!("{}", render::section("Summary", &state.summary, render::summary));
            println!("{}", render::section("Monthly", &state.monthly, render::monthly));
            print!(
                "{}",
                render::section("By category", &state.by_category, render::by_category)
            );
            Ok(())
        }
        ReportsCommand::Export { range, output } => {
            load(&reports, date_range(&range)?).await?;
            if reports.snapshot().has_error() {
                tracing::warn!("exporting with incomplete report data");
            }
            export(&reports, output)
        }
    }
}

/// Section failures stay in the view state and are rendered there; only a
/// rejected session aborts the command.
async fn load(reports: &ReportsController, range: DateRange) -> Result<()> {
    reports.set_range(range);
    match reports.load().await {
        Err(err) if err.is_unauthorized() => Err(err.into()),
        Err(err) => {
            tracing::debug!("report refresh failed: {err}");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

fn export(reports: &ReportsController, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| {
        PathBuf::from(export_filename(chrono::Local::now().date_naive()))
    });
    let file = File::create(&path)?;
    reports
        .export(BufWriter::new(file))
        .map_err(|err| AppError::client(err, "Could not write the export."))?;
    println!("Wrote {}", path.display());
    Ok(())
}
