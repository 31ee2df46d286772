use pftracker_client::Client;

use super::require_session;
use crate::{error::Result, render};

pub async fn show(client: &Client) -> Result<()> {
    require_session(client)?;
    let dashboard = client.dashboard();
    if let Err(err) = dashboard.load().await {
        tracing::debug!("dashboard refresh failed: {err}");
        if err.is_unauthorized() {
            return Err(err.into());
        }
    }

    let state = dashboard.snapshot();
    println!("{}", render::section("Summary", &state.summary, render::summary));
    println!(
        "{}",
        render::section("Expenses by category", &state.by_category, render::by_category)
    );
    println!("{}", render::section("Monthly", &state.monthly, render::monthly));
    print!(
        "{}",
        render::section("Recent transactions", &state.recent, render::transactions)
    );
    Ok(())
}
