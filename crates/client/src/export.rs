//! CSV export of the reports view.

use std::io;

use api_types::report::{ReportByCategory, ReportMonthly, ReportSummary};
use chrono::NaiveDate;

pub const HEADER: [&str; 4] = ["Section", "Metric", "Value", "Notes"];

pub type Row = [String; 4];

/// Header, three summary rows, then one row per monthly and per category
/// item. Sections that have not loaded contribute zeros (summary) or
/// nothing (monthly, category).
pub fn export_rows(
    summary: Option<&ReportSummary>,
    monthly: Option<&ReportMonthly>,
    by_category: Option<&ReportByCategory>,
) -> Vec<Row> {
    let mut rows = vec![HEADER.map(str::to_string)];

    let (income, expenses, net) = match summary {
        Some(summary) => (
            summary.income.clone(),
            summary.expenses.clone(),
            summary.net.clone(),
        ),
        None => ("0".to_string(), "0".to_string(), "0".to_string()),
    };
    rows.push(row("Summary", "Income", income, String::new()));
    rows.push(row("Summary", "Expenses", expenses, String::new()));
    rows.push(row("Summary", "Net", net, String::new()));

    for item in monthly.map(|m| m.items.as_slice()).unwrap_or_default() {
        rows.push(row(
            "Monthly",
            &item.month,
            item.net.clone(),
            format!("Income:{} Expenses:{}", item.income, item.expenses),
        ));
    }

    for item in by_category.map(|c| c.items.as_slice()).unwrap_or_default() {
        rows.push(row(
            "Category",
            &item.category_name,
            item.total.clone(),
            format!("{} ({}%)", item.kind, item.percentage),
        ));
    }

    rows
}

fn row(section: &str, metric: &str, value: String, notes: String) -> Row {
    [section.to_string(), metric.to_string(), value, notes]
}

/// Writes `rows` as comma separated records joined by `\n`, with no line
/// break after the last one. Fields containing a quote, comma or line break
/// are quoted with internal quotes doubled.
pub fn write_csv<W: io::Write>(mut writer: W, rows: &[Row]) -> csv::Result<()> {
    let mut records = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        records.write_record(row)?;
    }
    let mut bytes = records.into_inner().map_err(|err| err.into_error())?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("reports-{}.csv", today.format("%Y-%m-%d"))
}
