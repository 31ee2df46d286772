//! Plain-text output of the views.

use std::fmt::Write;

use api_types::{
    category::Category,
    report::{ReportByCategory, ReportMonthly, ReportSummary},
    transaction::{Transaction, TransactionListResponse},
};
use pftracker_client::{
    controllers::Section,
    feedback::{FeedbackLevel, FeedbackMessage},
};

pub fn feedback(message: Option<FeedbackMessage>) {
    let Some(FeedbackMessage { level, message }) = message else {
        return;
    };
    match level {
        FeedbackLevel::Success => println!("{message}"),
        FeedbackLevel::Error => eprintln!("{message}"),
    }
}

pub fn categories(items: &[Category]) -> String {
    if items.is_empty() {
        return "No categories.\n".to_string();
    }
    let mut out = String::new();
    for category in items {
        let _ = writeln!(
            out,
            "{:>5}  {:<24} {:<8} {:<9} {} transactions",
            category.id, category.name, category.kind, category.color, category.transaction_count
        );
    }
    out
}

fn transaction_line(out: &mut String, transaction: &Transaction) {
    let sign = match transaction.kind {
        api_types::TransactionType::Income => '+',
        api_types::TransactionType::Expense => '-',
    };
    let _ = writeln!(
        out,
        "{:>5}  {}  {:<20} {sign}{:>11}  {}",
        transaction.id,
        transaction.date,
        transaction.category.name,
        transaction.amount,
        transaction.note.as_deref().unwrap_or("")
    );
}

pub fn transactions(list: &TransactionListResponse) -> String {
    let mut out = String::new();
    if list.items.is_empty() {
        out.push_str("No transactions.\n");
    }
    for transaction in &list.items {
        transaction_line(&mut out, transaction);
    }
    let meta = list.pagination;
    let _ = writeln!(
        out,
        "page {} of {} ({} transactions)",
        meta.page,
        meta.total_pages.max(1),
        meta.total
    );
    out
}

pub fn summary(summary: &ReportSummary) -> String {
    format!(
        "Income    {:>12}\nExpenses  {:>12}\nNet       {:>12}\n",
        summary.income, summary.expenses, summary.net
    )
}

pub fn monthly(monthly: &ReportMonthly) -> String {
    let mut out = String::new();
    for item in &monthly.items {
        let _ = writeln!(
            out,
            "{:<8} income {:>12}  expenses {:>12}  net {:>12}",
            item.month, item.income, item.expenses, item.net
        );
    }
    out
}

pub fn by_category(report: &ReportByCategory) -> String {
    let mut out = String::new();
    for item in &report.items {
        let _ = writeln!(
            out,
            "{:<24} {:<8} {:>12} {:>6}%",
            item.category_name, item.kind, item.total, item.percentage
        );
    }
    let _ = writeln!(out, "{:<33} {:>12}", "total", report.total);
    out
}

/// A titled section; a failed section shows its error instead.
pub fn section<T>(title: &str, section: &Section<T>, body: impl FnOnce(&T) -> String) -> String {
    let content = match (&section.data, &section.error) {
        (_, Some(error)) => format!("  ! {error}\n"),
        (Some(data), None) => body(data),
        (None, None) => "  (no data)\n".to_string(),
    };
    format!("== {title} ==\n{content}")
}
