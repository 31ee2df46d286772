use api_types::{Amount, TransactionType};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pftracker_client::{controllers::TypeFilter, storage::Theme};

use crate::config::ConfigArgs;

#[derive(Parser, Debug)]
#[command(name = "pftracker")]
#[command(about = "Personal finance tracker client")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with email and password (the password is prompted for).
    Login {
        #[arg(long, env = "PFTRACKER_EMAIL")]
        email: String,
    },
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Sign in to the demo account.
    Demo,
    /// Exchange the refresh token for a new token pair.
    Refresh,
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Show or set the theme preference.
    Theme { theme: Option<Theme> },
    /// All-time overview and the most recent transactions.
    Dashboard,
    Categories(Categories),
    Transactions(Transactions),
    Reports(Reports),
}

#[derive(Args, Debug)]
pub struct Categories {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    List {
        /// Only categories of this type (income, expense or all).
        #[arg(long = "type", default_value = "all")]
        kind: TypeFilter,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: TransactionType,
        /// Hex color; defaults to green for income and red for expenses.
        #[arg(long)]
        color: Option<String>,
    },
    Delete {
        id: i64,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct Transactions {
    #[command(subcommand)]
    pub command: TransactionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TransactionsCommand {
    List(ListArgs),
    Add {
        #[arg(long)]
        category: i64,
        #[arg(long)]
        amount: Amount,
        #[arg(long = "type")]
        kind: TransactionType,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Change fields of an existing transaction; omitted fields are kept.
    Edit {
        id: i64,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        amount: Option<Amount>,
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    Delete {
        id: i64,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// income, expense or all.
    #[arg(long = "type", default_value = "all")]
    pub kind: TypeFilter,
    /// Category id; omit for all categories.
    #[arg(long)]
    pub category: Option<i64>,
    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args, Debug, Default)]
pub struct RangeArgs {
    /// First day included (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct Reports {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    /// Totals, monthly trend and category breakdown.
    Summary(RangeArgs),
    /// Write the report as CSV.
    Export {
        #[command(flatten)]
        range: RangeArgs,
        /// Defaults to reports-<today>.csv in the current directory.
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_transaction_filters() {
        let cli = Cli::try_parse_from([
            "pftracker",
            "transactions",
            "list",
            "--type",
            "expense",
            "--from",
            "2024-01-01",
            "--page",
            "2",
        ])
        .unwrap();

        let Command::Transactions(Transactions {
            command: TransactionsCommand::List(args),
        }) = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(args.page, 2);
        assert_eq!(args.kind, TypeFilter::Expense);
        assert_eq!(args.category, None);
        assert_eq!(args.range.from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn amount_accepts_comma_decimals() {
        let cli = Cli::try_parse_from([
            "pftracker",
            "transactions",
            "add",
            "--category",
            "2",
            "--amount",
            "12,50",
            "--type",
            "expense",
        ])
        .unwrap();

        let Command::Transactions(Transactions {
            command: TransactionsCommand::Add { amount, .. },
        }) = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(amount.cents(), 1250);
    }
}
