//! Command handlers: each builds the view it needs, drives it and prints it.

mod auth;
mod categories;
mod dashboard;
mod reports;
mod transactions;

use pftracker_client::{Client, api::DateRange};

use crate::{
    cli::{Command, RangeArgs},
    config::AppConfig,
    error::{AppError, Result},
};

pub async fn run(command: Command, settings: &AppConfig) -> Result<()> {
    let client = build_client(settings)?;

    match command {
        Command::Login { email } => auth::login(&client, &email).await,
        Command::Register { name, email } => auth::register(&client, &name, &email).await,
        Command::Demo => auth::demo(&client).await,
        Command::Refresh => auth::refresh(&client).await,
        Command::Logout => {
            auth::logout(&client);
            Ok(())
        }
        Command::Whoami => auth::whoami(&client),
        Command::Theme { theme } => auth::theme(&client, theme),
        Command::Dashboard => dashboard::show(&client).await,
        Command::Categories(args) => categories::run(&client, args.command).await,
        Command::Transactions(args) => transactions::run(&client, args.command).await,
        Command::Reports(args) => reports::run(&client, args.command).await,
    }
}

fn build_client(settings: &AppConfig) -> Result<Client> {
    let client = Client::builder()
        .base_url(settings.base_url.as_deref().unwrap_or_default())
        .timeout(settings.timeout())
        .state_dir(&settings.state_dir)
        .page_size(settings.page_size)
        .build()?;
    Ok(client)
}

/// Route guard for commands that need a signed-in user.
fn require_session(client: &Client) -> Result<()> {
    if client.session().is_authenticated() {
        Ok(())
    } else {
        Err(AppError::SignedOut)
    }
}

fn date_range(args: &RangeArgs) -> Result<DateRange> {
    if let (Some(from), Some(to)) = (args.from, args.to)
        && from > to
    {
        return Err(AppError::Input(format!(
            "--from ({from}) is after --to ({to})"
        )));
    }
    Ok(DateRange::new(args.from, args.to))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn reversed_range_is_rejected() {
        let args = RangeArgs {
            from: NaiveDate::from_ymd_opt(2024, 2, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        assert!(matches!(date_range(&args), Err(AppError::Input(_))));
    }

    #[test]
    fn signed_out_client_is_refused() {
        let client = Client::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        assert!(matches!(require_session(&client), Err(AppError::SignedOut)));
    }
}
