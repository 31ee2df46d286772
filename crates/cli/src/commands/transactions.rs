use api_types::{
    Amount, TransactionType,
    transaction::{Transaction, TransactionUpsert},
};
use chrono::NaiveDate;
use pftracker_client::{
    Client,
    controllers::{CategoryFilter, TransactionFilters, TransactionsController},
};

use super::{date_range, require_session};
use crate::{
    cli::{ListArgs, TransactionsCommand},
    error::{AppError, Result},
    prompt, render,
};

const LOAD_FALLBACK: &str = "Could not load transactions.";

pub async fn run(client: &Client, command: TransactionsCommand) -> Result<()> {
    require_session(client)?;
    let controller = client.transactions();
    match command {
        TransactionsCommand::List(args) => list(&controller, &args).await,
        TransactionsCommand::Add {
            category,
            amount,
            kind,
            date,
            note,
        } => {
            controller.open_create();
            let payload = TransactionUpsert {
                category_id: category,
                amount,
                kind,
                note: normalize_note(note),
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
            };
            submit(&controller, payload, "Could not create transaction.").await
        }
        TransactionsCommand::Edit {
            id,
            category,
            amount,
            kind,
            date,
            note,
        } => {
            let existing = find(&controller, id).await?;
            let changes = Changes {
                category,
                amount,
                kind,
                date,
                note,
            };
            let payload = changes.apply(&existing)?;
            controller.open_edit(existing);
            submit(&controller, payload, "Could not update transaction.").await
        }
        TransactionsCommand::Delete { id, yes } => {
            let existing = find(&controller, id).await?;
            let deleted = controller
                .delete(&existing, |question| yes || prompt::confirm(question))
                .await
                .map_err(|err| AppError::client(err, "Could not delete transaction."))?;
            if deleted {
                render::feedback(controller.feedback().current());
            } else {
                println!("Cancelled.");
            }
            Ok(())
        }
    }
}

async fn list(controller: &TransactionsController, args: &ListArgs) -> Result<()> {
    controller.set_filters(TransactionFilters {
        kind: args.kind,
        category: args.category.map_or(CategoryFilter::All, CategoryFilter::Id),
        range: date_range(&args.range)?,
    });
    controller.set_page(args.page);
    controller
        .refresh()
        .await
        .map_err(|err| AppError::client(err, LOAD_FALLBACK))?;

    let state = controller.snapshot();
    if state.page != args.page {
        tracing::info!(requested = args.page, shown = state.page, "page out of range");
    }
    if let Some(data) = state.data {
        print!("{}", render::transactions(&data));
    }
    Ok(())
}

async fn submit(
    controller: &TransactionsController,
    payload: TransactionUpsert,
    fallback: &str,
) -> Result<()> {
    let saved = controller
        .submit(payload)
        .await
        .map_err(|err| AppError::client(err, fallback))?;
    render::feedback(controller.feedback().current());
    println!("{}  {}  {}", saved.id, saved.date, saved.category.name);
    Ok(())
}

/// Walks the unfiltered list page by page until `id` shows up.
async fn find(controller: &TransactionsController, id: i64) -> Result<Transaction> {
    controller.set_filters(TransactionFilters::default());
    let mut page = 1;
    loop {
        controller.set_page(page);
        controller
            .refresh()
            .await
            .map_err(|err| AppError::client(err, LOAD_FALLBACK))?;

        let state = controller.snapshot();
        let Some(data) = state.data else {
            break;
        };
        if let Some(found) = data.items.into_iter().find(|item| item.id == id) {
            return Ok(found);
        }
        if state.page >= data.pagination.total_pages {
            break;
        }
        page = state.page + 1;
    }
    Err(AppError::Input(format!("no transaction with id {id}")))
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty())
}

/// Fields given to `transactions edit`; `None` keeps the current value and an
/// empty note clears it.
struct Changes {
    category: Option<i64>,
    amount: Option<Amount>,
    kind: Option<TransactionType>,
    date: Option<NaiveDate>,
    note: Option<String>,
}

impl Changes {
    fn apply(self, existing: &Transaction) -> Result<TransactionUpsert> {
        let amount = match self.amount {
            Some(amount) => amount,
            None => existing.amount.parse::<Amount>().map_err(|err| {
                AppError::Input(format!("stored amount {:?}: {err}", existing.amount))
            })?,
        };
        let note = match self.note {
            Some(note) => normalize_note(Some(note)),
            None => existing.note.clone(),
        };
        Ok(TransactionUpsert {
            category_id: self.category.unwrap_or(existing.category_id),
            amount,
            kind: self.kind.unwrap_or(existing.kind),
            note,
            date: self.date.unwrap_or(existing.date),
        })
    }
}

#[cfg(test)]
mod tests {
    use api_types::transaction::TransactionCategory;

    use super::*;

    fn existing() -> Transaction {
        Transaction {
            id: 7,
            category_id: 2,
            amount: "12.50".to_string(),
            kind: TransactionType::Expense,
            note: Some("lunch".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            created_at: "2024-03-09T12:00:00Z".to_string(),
            category: TransactionCategory {
                id: 2,
                name: "Food".to_string(),
                kind: TransactionType::Expense,
                color: "#f31260".to_string(),
            },
        }
    }

    #[test]
    fn omitted_fields_are_kept() {
        let changes = Changes {
            category: None,
            amount: Some(Amount::from(900)),
            kind: None,
            date: None,
            note: None,
        };
        let payload = changes.apply(&existing()).unwrap();
        assert_eq!(payload.amount.cents(), 900);
        assert_eq!(payload.category_id, 2);
        assert_eq!(payload.note.as_deref(), Some("lunch"));
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn blank_note_clears_it() {
        let changes = Changes {
            category: None,
            amount: None,
            kind: None,
            date: None,
            note: Some("  ".to_string()),
        };
        let payload = changes.apply(&existing()).unwrap();
        assert_eq!(payload.note, None);
        assert_eq!(payload.amount.cents(), 1250);
    }
}
