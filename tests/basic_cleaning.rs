//! Integration tests for the standard cleaning pipeline.

use approx::assert_relative_eq;
use basic_cleaning::pipeline::{
    CALCULATED_HOST_LISTINGS_COUNT, LAST_REVIEW, LATITUDE, LONGITUDE, PRICE,
};
use basic_cleaning::prelude::*;
use proptest::prelude::*;

const LISTINGS: &str = include_str!("data/listings.csv");

fn listings() -> Table {
    Table::from_reader(LISTINGS.as_bytes()).unwrap()
}

fn ids(table: &Table) -> Vec<i64> {
    let idx = table.column_index("id").unwrap();
    table
        .rows()
        .iter()
        .map(|r| match r[idx] {
            Value::Integer(id) => id,
            ref other => panic!("unexpected id {other:?}"),
        })
        .collect()
}

fn numeric(table: &Table, column: &str) -> Vec<f64> {
    table
        .numeric_column(column)
        .unwrap()
        .into_iter()
        .map(|v| v.expect("no missing values after cleaning"))
        .collect()
}

#[test]
fn test_standard_cleaning_on_sample() {
    let table = listings();
    assert_eq!(table.n_rows(), 36);

    let outcome = run_basic_cleaning(&table, 10.0, 350.0).unwrap();

    let removed: Vec<usize> = outcome.reports.iter().map(|r| r.n_removed()).collect();
    // price, reviews, nights, host listings, bounding box, missing, dates
    assert_eq!(removed, vec![1, 1, 6, 1, 1, 3, 0]);

    let reviews = outcome.reports[1].bounds.unwrap();
    assert_relative_eq!(reviews.lower, -166.0);
    assert_relative_eq!(reviews.upper, 322.0);
    let nights = outcome.reports[2].bounds.unwrap();
    assert_relative_eq!(nights.lower, -0.625);
    assert_relative_eq!(nights.upper, 6.375);

    assert_eq!(outcome.n_output(), 23);
    let kept = ids(&outcome.table);
    for dropped in [9783, 5178, 5121, 6090, 9785, 9784, 3647, 8700, 9782] {
        assert!(!kept.contains(&dropped), "{dropped} should be dropped");
    }
    // Input order is preserved.
    let mut sorted = kept.clone();
    sorted.sort_unstable();
    assert_eq!(kept, sorted);
}

#[test]
fn test_output_invariants() {
    let outcome = run_basic_cleaning(&listings(), 10.0, 350.0).unwrap();
    let table = &outcome.table;

    assert!(table.n_rows() <= listings().n_rows());
    assert!(numeric(table, PRICE).iter().all(|p| (10.0..=350.0).contains(p)));
    assert!(numeric(table, CALCULATED_HOST_LISTINGS_COUNT)
        .iter()
        .all(|c| (0.0..=10.0).contains(c)));
    for (lon, lat) in numeric(table, LONGITUDE)
        .into_iter()
        .zip(numeric(table, LATITUDE))
    {
        assert!(NYC_BOUNDING_BOX.contains(lon, lat));
    }
    assert!(table.rows().iter().all(|r| r.iter().all(|v| !v.is_missing())));

    let idx = table.column_index(LAST_REVIEW).unwrap();
    assert!(table
        .rows()
        .iter()
        .all(|r| matches!(r[idx], Value::Timestamp(_))));
}

#[test]
fn test_rows_are_unmodified_apart_from_dates() {
    let input = listings();
    let outcome = run_basic_cleaning(&input, 10.0, 350.0).unwrap();
    let date_idx = input.column_index(LAST_REVIEW).unwrap();

    for row in outcome.table.rows() {
        let original = input
            .rows()
            .iter()
            .find(|r| r[0] == row[0])
            .expect("output row comes from the input");
        for (i, (a, b)) in original.iter().zip(row).enumerate() {
            if i == date_idx {
                assert_eq!(a.to_string(), b.to_string());
            } else {
                assert_eq!(a, b);
            }
        }
    }
}

#[test]
fn test_cleaning_is_idempotent() {
    let first = run_basic_cleaning(&listings(), 10.0, 350.0).unwrap();
    let second = run_basic_cleaning(&first.table, 10.0, 350.0).unwrap();
    assert_eq!(second.table, first.table);

    // Same through a CSV round trip, where dates come back as text.
    let mut first_csv = Vec::new();
    first.table.to_writer(&mut first_csv).unwrap();
    let reloaded = Table::from_reader(first_csv.as_slice()).unwrap();
    let third = run_basic_cleaning(&reloaded, 10.0, 350.0).unwrap();
    let mut third_csv = Vec::new();
    third.table.to_writer(&mut third_csv).unwrap();
    assert_eq!(
        String::from_utf8(third_csv).unwrap(),
        String::from_utf8(first_csv).unwrap()
    );
}

#[test]
fn test_price_outlier_scenario() {
    let text = "\
id,price
1,50
2,150
3,1000000
4,80
5,90
";
    let table = Table::from_reader(text.as_bytes()).unwrap();
    let filtered = filter_range(&table, PRICE, Bounds::new(0.0, 1000.0).unwrap()).unwrap();
    assert_eq!(filtered.n_rows(), 4);
    assert_eq!(ids(&filtered), vec![1, 2, 4, 5]);
}

#[test]
fn test_row_outside_nyc_is_dropped() {
    let outcome = run_basic_cleaning(&listings(), 10.0, 350.0).unwrap();
    // 9784 sits at latitude 42.0 and is otherwise valid.
    assert!(!ids(&outcome.table).contains(&9784));
    assert_eq!(outcome.reports[4].n_removed(), 1);
}

#[test]
fn test_missing_minimum_nights_never_survives() {
    let text = LISTINGS.replacen(
        "2539,Clean & quiet apt home by the park,2787,Brooklyn,149,1,",
        "2539,Clean & quiet apt home by the park,2787,Brooklyn,149,,",
        1,
    );
    let table = Table::from_reader(text.as_bytes()).unwrap();
    assert_eq!(table.missing_count("minimum_nights").unwrap(), 1);

    let outcome = run_basic_cleaning(&table, 10.0, 350.0).unwrap();
    assert!(!ids(&outcome.table).contains(&2539));
}

#[test]
fn test_quartile_scenario() {
    let values: Vec<Option<f64>> = [1.0, 1.0, 10.0, 10.0, 24.0, -13.0]
        .iter()
        .map(|v| Some(*v))
        .collect();
    // Sorted: -13, 1, 1, 10, 10, 24 -> q1 = 1, q3 = 10
    let bounds = iqr_bounds("number_of_reviews", &values).unwrap();
    assert_relative_eq!(bounds.lower, -12.5);
    assert_relative_eq!(bounds.upper, 23.5);
    assert!(!bounds.contains(24.0));
    assert!(!bounds.contains(-13.0));
    assert!(bounds.contains(23.5));
}

fn listing_row() -> impl Strategy<
    Value = (
        Option<f64>,
        Option<i64>,
        Option<i64>,
        Option<i64>,
        Option<f64>,
        Option<f64>,
        bool,
    ),
> {
    (
        proptest::option::weighted(0.95, 0.0f64..2000.0),
        proptest::option::weighted(0.95, 0i64..500),
        proptest::option::weighted(0.95, 1i64..60),
        proptest::option::weighted(0.95, 0i64..20),
        proptest::option::weighted(0.95, -75.0f64..-73.0),
        proptest::option::weighted(0.95, 40.0f64..42.0),
        proptest::bool::weighted(0.9),
    )
}

fn build_table(
    rows: &[(
        Option<f64>,
        Option<i64>,
        Option<i64>,
        Option<i64>,
        Option<f64>,
        Option<f64>,
        bool,
    )],
) -> Table {
    let columns = [
        "price",
        "number_of_reviews",
        "minimum_nights",
        "calculated_host_listings_count",
        "longitude",
        "latitude",
        "last_review",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    let float = |v: Option<f64>| v.map(Value::Float).unwrap_or(Value::Missing);
    let int = |v: Option<i64>| v.map(Value::Integer).unwrap_or(Value::Missing);
    let data = rows
        .iter()
        .map(|&(price, reviews, nights, listings, lon, lat, reviewed)| {
            vec![
                float(price),
                int(reviews),
                int(nights),
                int(listings),
                float(lon),
                float(lat),
                if reviewed {
                    Value::String("2019-06-01".to_string())
                } else {
                    Value::Missing
                },
            ]
        })
        .collect();
    Table::new(columns, data).unwrap()
}

proptest! {
    #[test]
    fn prop_output_satisfies_all_predicates(
        rows in proptest::collection::vec(listing_row(), 0..60),
        min_price in 0.0f64..200.0,
        span in 0.0f64..1500.0,
    ) {
        let max_price = min_price + span;
        let table = build_table(&rows);

        match run_basic_cleaning(&table, min_price, max_price) {
            Ok(outcome) => {
                let out = &outcome.table;
                prop_assert!(out.n_rows() <= table.n_rows());
                prop_assert!(out.rows().iter().all(|r| r.iter().all(|v| !v.is_missing())));
                for p in numeric(out, PRICE) {
                    prop_assert!(min_price <= p && p <= max_price);
                }
                for c in numeric(out, CALCULATED_HOST_LISTINGS_COUNT) {
                    prop_assert!((0.0..=10.0).contains(&c));
                }
                for (lon, lat) in numeric(out, LONGITUDE).into_iter().zip(numeric(out, LATITUDE)) {
                    prop_assert!(NYC_BOUNDING_BOX.contains(lon, lat));
                }
            }
            Err(CleanError::Step { source, .. }) => {
                prop_assert!(matches!(*source, CleanError::EmptySeries(_)));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
