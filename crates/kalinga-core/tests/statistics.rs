use jiff::civil::date;
use kalinga_core::models::category::Category;
use kalinga_core::models::session::WorkerId;
use kalinga_core::models::statistics::{
    age_bucket, age_on, StatsQuery, TimeWindow, Variant, UNKNOWN_AGE_BUCKET,
};

#[test]
fn age_counts_completed_years() {
    assert_eq!(age_on(date(2000, 6, 15), date(2026, 6, 14)), 25);
    assert_eq!(age_on(date(2000, 6, 15), date(2026, 6, 15)), 26);
}

#[test]
fn buckets_cover_every_non_negative_age() {
    assert_eq!(age_bucket(0), "0-4");
    assert_eq!(age_bucket(4), "0-4");
    assert_eq!(age_bucket(5), "5-9");
    assert_eq!(age_bucket(19), "10-19");
    assert_eq!(age_bucket(39), "20-39");
    assert_eq!(age_bucket(59), "40-59");
    assert_eq!(age_bucket(60), "60+");
    assert_eq!(age_bucket(104), "60+");
    assert_eq!(age_bucket(-1), UNKNOWN_AGE_BUCKET);
}

#[test]
fn month_window_groups_by_day() {
    let window = TimeWindow::Month { year: 2026, month: 3 };
    assert!(window.contains(date(2026, 3, 31)));
    assert!(!window.contains(date(2026, 4, 1)));
    assert_eq!(window.period_of(date(2026, 3, 9)), "2026-03-09");
    assert_eq!(TimeWindow::All.period_of(date(2026, 3, 9)), "2026-03");
}

#[test]
fn query_round_trips_window() {
    let window = TimeWindow::Range {
        from: date(2026, 1, 1),
        to: date(2026, 6, 30),
    };
    let query = StatsQuery::new(
        Category::SeniorCitizen,
        Some(WorkerId(4)),
        window,
        Some(Variant::Sex),
    );
    assert_eq!(query.category_name.as_deref(), Some("Senior Citizen"));
    assert_eq!(query.worker(), Some(WorkerId(4)));
    assert_eq!(query.window().unwrap(), window);
}

#[test]
fn half_specified_windows_are_rejected() {
    let query = StatsQuery {
        month: Some(3),
        ..StatsQuery::default()
    };
    assert!(query.window().is_err());

    let inverted = StatsQuery {
        from: Some(date(2026, 6, 1)),
        to: Some(date(2026, 1, 1)),
        ..StatsQuery::default()
    };
    assert!(inverted.window().is_err());

    let bad_month = StatsQuery {
        month: Some(13),
        year: Some(2026),
        ..StatsQuery::default()
    };
    assert!(bad_month.window().is_err());
}
