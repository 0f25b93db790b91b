use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::category::Category;
use super::session::WorkerId;
use crate::error::CoreError;

/// Age histogram buckets, inclusive lower bound and optional inclusive upper bound.
pub const AGE_BUCKETS: [(&str, i16, Option<i16>); 6] = [
    ("0-4", 0, Some(4)),
    ("5-9", 5, Some(9)),
    ("10-19", 10, Some(19)),
    ("20-39", 20, Some(39)),
    ("40-59", 40, Some(59)),
    ("60+", 60, None),
];

pub const UNKNOWN_AGE_BUCKET: &str = "unknown";

/// Bucket label for an age in whole years.
pub fn age_bucket(age: i16) -> &'static str {
    AGE_BUCKETS
        .iter()
        .find(|(_, min, max)| age >= *min && max.is_none_or(|m| age <= m))
        .map(|(label, _, _)| *label)
        .unwrap_or(UNKNOWN_AGE_BUCKET)
}

/// Completed years between `birth` and `on`.
pub fn age_on(birth: Date, on: Date) -> i16 {
    let mut years = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// The period a dashboard query covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum TimeWindow {
    #[default]
    All,
    Month {
        year: i16,
        month: i8,
    },
    Range {
        from: Date,
        to: Date,
    },
}

impl TimeWindow {
    pub fn validate(&self) -> Result<(), CoreError> {
        match *self {
            Self::All => Ok(()),
            Self::Month { month, .. } if !(1..=12).contains(&month) => Err(
                CoreError::InvalidWindow(format!("month {month} is outside 1-12")),
            ),
            Self::Month { .. } => Ok(()),
            Self::Range { from, to } if from > to => Err(CoreError::InvalidWindow(format!(
                "range start {from} is after end {to}"
            ))),
            Self::Range { .. } => Ok(()),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        match *self {
            Self::All => true,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Range { from, to } => date >= from && date <= to,
        }
    }

    /// Series bucket for a date: days inside a single month, months otherwise.
    pub fn period_of(&self, date: Date) -> String {
        match self {
            Self::Month { .. } => date.to_string(),
            _ => format!("{:04}-{:02}", date.year(), date.month()),
        }
    }
}

/// Demographic split for total counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Variant {
    Sex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalCount {
    pub total: u64,
    /// Per-variant counts; empty unless a variant was requested.
    #[serde(default)]
    pub by_variant: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeBucket {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeSegmentation {
    pub buckets: Vec<AgeBucket>,
}

impl AgeSegmentation {
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.count == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeriesPoint {
    pub period: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Query string shared by every statistics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl StatsQuery {
    pub fn new(
        category: Category,
        worker: Option<WorkerId>,
        window: TimeWindow,
        variant: Option<Variant>,
    ) -> Self {
        let mut query = Self {
            category_name: Some(category.label().to_string()),
            worker_id: worker.map(|w| w.0),
            variant,
            ..Self::default()
        };
        match window {
            TimeWindow::All => {}
            TimeWindow::Month { year, month } => {
                query.year = Some(year);
                query.month = Some(month);
            }
            TimeWindow::Range { from, to } => {
                query.from = Some(from);
                query.to = Some(to);
            }
        }
        query
    }

    /// Rebuild the window from the query parameters.
    ///
    /// `month` and `year` must come together, as must `from` and `to`;
    /// the two forms are mutually exclusive.
    pub fn window(&self) -> Result<TimeWindow, CoreError> {
        let window = match (self.month, self.year, self.from, self.to) {
            (None, None, None, None) => TimeWindow::All,
            (Some(month), Some(year), None, None) => TimeWindow::Month { year, month },
            (None, None, Some(from), Some(to)) => TimeWindow::Range { from, to },
            _ => {
                return Err(CoreError::InvalidWindow(
                    "expected month+year or from+to".to_string(),
                ));
            }
        };
        window.validate()?;
        Ok(window)
    }

    pub fn worker(&self) -> Option<WorkerId> {
        self.worker_id.map(WorkerId)
    }
}
