//! Read-only statistics projections over the store.
//!
//! Every query is scoped to one program, an optional worker and a
//! [`TimeWindow`]. Only active clients are counted. Calendar dates are
//! taken in UTC.

use std::collections::BTreeMap;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{Client, ClientStatus};
use kalinga_core::models::enrollment::Enrollment;
use kalinga_core::models::session::WorkerId;
use kalinga_core::models::statistics::{
    AGE_BUCKETS, AgeBucket, AgeSegmentation, SeriesPoint, TimeSeries, TimeWindow, TotalCount,
    UNKNOWN_AGE_BUCKET, Variant, age_bucket, age_on,
};

use crate::store::RecordStore;

const UNSPECIFIED_SEX: &str = "unspecified";

fn utc_date(ts: Timestamp) -> Date {
    ts.to_zoned(TimeZone::UTC).date()
}

impl RecordStore {
    /// Enrollments in the window whose client is active and in scope.
    fn enrolled<'a>(
        &'a self,
        category: Category,
        worker: Option<WorkerId>,
        window: &'a TimeWindow,
    ) -> impl Iterator<Item = (&'a Enrollment, &'a Client)> + 'a {
        self.enrollments()
            .iter()
            .filter(move |e| e.category == category)
            .filter(move |e| window.contains(utc_date(e.enrolled_at)))
            .filter_map(move |e| self.client(e.client_id).ok().map(|c| (e, c)))
            .filter(|(_, c)| c.status == ClientStatus::Active)
            .filter(move |(_, c)| worker.is_none_or(|w| c.worker_id == Some(w)))
    }

    pub fn total_count(
        &self,
        category: Category,
        worker: Option<WorkerId>,
        window: TimeWindow,
        variant: Option<Variant>,
    ) -> TotalCount {
        let mut count = TotalCount::default();
        for (_, client) in self.enrolled(category, worker, &window) {
            count.total += 1;
            if let Some(Variant::Sex) = variant {
                let key = client.sex.map_or(UNSPECIFIED_SEX, |s| s.as_str());
                *count.by_variant.entry(key.to_string()).or_default() += 1;
            }
        }
        count
    }

    /// Age histogram with every bucket present, ages taken on `today`.
    pub fn age_segmentation(
        &self,
        category: Category,
        worker: Option<WorkerId>,
        window: TimeWindow,
        today: Date,
    ) -> AgeSegmentation {
        let mut counts: BTreeMap<&'static str, u64> = BTreeMap::new();
        for (_, client) in self.enrolled(category, worker, &window) {
            let bucket = client
                .birth_date
                .map_or(UNKNOWN_AGE_BUCKET, |birth| age_bucket(age_on(birth, today)));
            *counts.entry(bucket).or_default() += 1;
        }

        let labels = AGE_BUCKETS
            .iter()
            .map(|(label, _, _)| *label)
            .chain([UNKNOWN_AGE_BUCKET]);
        AgeSegmentation {
            buckets: labels
                .map(|label| AgeBucket {
                    label: label.to_string(),
                    count: counts.get(label).copied().unwrap_or(0),
                })
                .collect(),
        }
    }

    /// Enrollments per period.
    pub fn registrations(
        &self,
        category: Category,
        worker: Option<WorkerId>,
        window: TimeWindow,
    ) -> TimeSeries {
        series(
            &window,
            self.enrolled(category, worker, &window)
                .map(|(e, _)| utc_date(e.enrolled_at)),
        )
    }

    /// Visit records last updated in each period.
    pub fn updates(&self, category: Category, worker: Option<WorkerId>, window: TimeWindow) -> TimeSeries {
        let dates = self
            .records()
            .iter()
            .filter(|r| r.category == category)
            .filter(|r| {
                self.client(r.client_id).is_ok_and(|c| {
                    c.status == ClientStatus::Active
                        && worker.is_none_or(|w| c.worker_id == Some(w))
                })
            })
            .map(|r| utc_date(r.updated_at))
            .filter(|d| window.contains(*d));
        series(&window, dates)
    }
}

fn series(window: &TimeWindow, dates: impl Iterator<Item = Date>) -> TimeSeries {
    let mut periods: BTreeMap<String, u64> = BTreeMap::new();
    for date in dates {
        *periods.entry(window.period_of(date)).or_default() += 1;
    }
    TimeSeries {
        points: periods
            .into_iter()
            .map(|(period, count)| SeriesPoint { period, count })
            .collect(),
    }
}
