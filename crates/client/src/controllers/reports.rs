use std::{
    io,
    sync::{Arc, Mutex},
};

use api_types::report::{ReportByCategory, ReportMonthly, ReportSummary};

use super::{Section, fetch, lock, settle};
use crate::{
    Client,
    api::{ByCategoryParams, DateRange, ReportsApi},
    error::Result,
    export::{self, Row},
    query::{QueryCache, QueryKey, keys},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportsState {
    pub range: DateRange,
    pub summary: Section<ReportSummary>,
    pub by_category: Section<ReportByCategory>,
    pub monthly: Section<ReportMonthly>,
    /// Range the sections were last fully loaded for.
    loaded: Option<DateRange>,
}

impl ReportsState {
    pub fn has_error(&self) -> bool {
        self.summary.error.is_some() || self.by_category.error.is_some() || self.monthly.error.is_some()
    }
}

fn range_key(section: &str, range: &DateRange) -> QueryKey {
    let bound = |date: Option<chrono::NaiveDate>| date.map(|date| date.to_string()).unwrap_or_default();
    keys::reports()
        .with(section)
        .with(format!("start={}", bound(range.start)))
        .with(format!("end={}", bound(range.end)))
}

/// The reports view: a date range and three aggregates over it.
#[derive(Clone)]
pub struct ReportsController {
    api: ReportsApi,
    cache: Arc<QueryCache>,
    state: Arc<Mutex<ReportsState>>,
}

impl ReportsController {
    pub fn new(client: &Client) -> Self {
        Self {
            api: client.reports_api(),
            cache: client.cache().clone(),
            state: Arc::new(Mutex::new(ReportsState::default())),
        }
    }

    pub fn snapshot(&self) -> ReportsState {
        lock(&self.state).clone()
    }

    pub fn set_range(&self, range: DateRange) {
        lock(&self.state).range = range;
    }

    /// Back to an unbounded range.
    pub fn clear(&self) {
        self.set_range(DateRange::default());
    }

    /// Fetches unless all three aggregates for the current range are loaded
    /// and still fresh.
    pub async fn load(&self) -> Result<()> {
        let (range, loaded) = {
            let state = lock(&self.state);
            let loaded = state.summary.data.is_some()
                && state.by_category.data.is_some()
                && state.monthly.data.is_some()
                && state.loaded == Some(state.range);
            (state.range, loaded)
        };
        let stale = ["summary", "by-category", "monthly"]
            .iter()
            .any(|section| self.cache.is_stale(&range_key(section, &range)));
        if loaded && !stale {
            return Ok(());
        }
        self.refresh().await
    }

    /// Loads the three aggregates concurrently. A failing aggregate keeps its
    /// previous data and records an error; the others are still applied. The
    /// first failure is returned.
    pub async fn refresh(&self) -> Result<()> {
        let range = lock(&self.state).range;
        let by_category = ByCategoryParams { range, kind: None };

        let (
            (summary_ticket, summary),
            (category_ticket, categories),
            (monthly_ticket, monthly),
        ) = tokio::join!(
            fetch(&self.cache, range_key("summary", &range), || {
                self.api.summary(&range)
            }),
            fetch(&self.cache, range_key("by-category", &range), || {
                self.api.by_category(&by_category)
            }),
            fetch(&self.cache, range_key("monthly", &range), || {
                self.api.monthly(&range)
            }),
        );

        let mut state = lock(&self.state);
        if state.range != range {
            tracing::debug!("report range changed while loading, ignoring results");
            return Ok(());
        }

        let mut errors = Vec::new();
        let mut settled = 0;
        if settle(&self.cache, &summary_ticket, &summary) {
            settled += 1;
            errors.extend(state.summary.apply(summary, "Could not load summary."));
        }
        if settle(&self.cache, &category_ticket, &categories) {
            settled += 1;
            errors.extend(
                state
                    .by_category
                    .apply(categories, "Could not load category breakdown."),
            );
        }
        if settle(&self.cache, &monthly_ticket, &monthly) {
            settled += 1;
            errors.extend(state.monthly.apply(monthly, "Could not load monthly trend."));
        }
        if settled == 3 && errors.is_empty() {
            state.loaded = Some(range);
        }

        match errors.into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn export_rows(&self) -> Vec<Row> {
        let state = lock(&self.state);
        export::export_rows(
            state.summary.data.as_ref(),
            state.monthly.data.as_ref(),
            state.by_category.data.as_ref(),
        )
    }

    pub fn export<W: io::Write>(&self, writer: W) -> Result<()> {
        export::write_csv(writer, &self.export_rows())?;
        Ok(())
    }
}
