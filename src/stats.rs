use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use crate::record::VisitRecord;
use crate::tally::Tally;

pub const TOP_PAGES: usize = 20;
pub const TOP_REFERRERS: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Summary of a batch of visits. Page and referrer breakdowns only keep
/// their most frequent entries.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub total_visits: u64,
    pub by_date: Tally,
    pub by_page: Tally,
    pub by_referrer: Tally,
    pub by_device: Tally,
    pub unique_dates: usize,
    pub date_range: DateRange,
}

/// Stats as persisted to disk.
#[derive(Debug, Serialize)]
pub struct StatsSnapshot<'a> {
    #[serde(flatten)]
    pub stats: &'a AggregateStats,
    pub last_updated: String,
}

pub fn aggregate_visits(visits: &[VisitRecord]) -> AggregateStats {
    let mut by_date = Tally::new();
    let mut by_page = Tally::new();
    let mut by_referrer = Tally::new();
    let mut by_device = Tally::new();
    let mut dates = BTreeSet::new();

    for visit in visits {
        by_date.increment(&visit.date);
        by_page.increment(&visit.path);
        by_referrer.increment(&visit.referrer);
        by_device.increment(&visit.device);
        dates.insert(visit.date.as_str());
    }

    let date_range = DateRange {
        start: dates.first().map(|d| d.to_string()),
        end: dates.last().map(|d| d.to_string()),
    };

    let stats = AggregateStats {
        total_visits: visits.len() as u64,
        by_date,
        by_page: by_page.most_common(TOP_PAGES),
        by_referrer: by_referrer.most_common(TOP_REFERRERS),
        by_device,
        unique_dates: dates.len(),
        date_range,
    };

    info!(
        action = "complete",
        component = "aggregator",
        total_visits = stats.total_visits,
        unique_dates = stats.unique_dates,
        "Visits aggregated"
    );

    stats
}
