use api_types::{TransactionType, category::CategoryCreate};
use pftracker_client::{Client, controllers::TypeFilter};

use super::require_session;
use crate::{
    cli::CategoriesCommand,
    error::{AppError, Result},
    prompt, render,
};

const INCOME_COLOR: &str = "#17c964";
const EXPENSE_COLOR: &str = "#f31260";

pub async fn run(client: &Client, command: CategoriesCommand) -> Result<()> {
    require_session(client)?;
    match command {
        CategoriesCommand::List { kind } => list(client, kind).await,
        CategoriesCommand::Add { name, kind, color } => add(client, name, kind, color).await,
        CategoriesCommand::Delete { id, yes } => delete(client, id, yes).await,
    }
}

fn default_color(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => INCOME_COLOR,
        TransactionType::Expense => EXPENSE_COLOR,
    }
}

async fn list(client: &Client, kind: TypeFilter) -> Result<()> {
    let categories = client.categories();
    categories
        .load()
        .await
        .map_err(|err| AppError::client(err, "Could not load categories."))?;

    print!("{}", render::categories(&categories.items(kind)));
    Ok(())
}

async fn add(
    client: &Client,
    name: String,
    kind: TransactionType,
    color: Option<String>,
) -> Result<()> {
    let categories = client.categories();
    let payload = CategoryCreate {
        name: name.trim().to_string(),
        kind,
        color: color.unwrap_or_else(|| default_color(kind).to_string()),
    };

    let created = categories
        .create(payload)
        .await
        .map_err(|err| AppError::client(err, "Could not create category."))?;
    render::feedback(categories.feedback().current());
    tracing::debug!(id = created.id, "category created");
    Ok(())
}

async fn delete(client: &Client, id: i64, yes: bool) -> Result<()> {
    let categories = client.categories();
    categories
        .load()
        .await
        .map_err(|err| AppError::client(err, "Could not load categories."))?;

    let name = categories
        .snapshot()
        .items
        .unwrap_or_default()
        .into_iter()
        .find(|category| category.id == id)
        .map(|category| category.name)
        .ok_or_else(|| AppError::Input(format!("no category with id {id}")))?;

    let deleted = categories
        .delete(id, &name, |question| yes || prompt::confirm(question))
        .await
        .map_err(|err| AppError::client(err, "Could not delete category."))?;
    if deleted {
        render::feedback(categories.feedback().current());
    } else {
        println!("Cancelled.");
    }
    Ok(())
}
