//! Unit tests for archive merge and trim

use fuel_mix_archiver::series::{self, Merge, Trim};
use fuel_mix_archiver::Row;

fn row(stamp: &str) -> Row {
    Row::from_fields(["FUELINST", &stamp[..8], "1", stamp, "6030"])
}

fn stamps(rows: &[Row]) -> Vec<&str> {
    rows.iter().map(|r| r.timestamp()).collect()
}

#[test]
fn test_merge_appends_strictly_newer_suffix_only() {
    let existing = vec![
        row("20230101000400"),
        row("20230101000430"),
        row("20230101000500"),
    ];
    let candidate = vec![
        row("20230101000430"),
        row("20230101000500"),
        row("20230101000530"),
        row("20230101000600"),
    ];

    match series::merge(&existing, &candidate).unwrap() {
        Merge::Extended(merged) => {
            assert_eq!(
                stamps(&merged),
                vec![
                    "20230101000400",
                    "20230101000430",
                    "20230101000500",
                    "20230101000530",
                    "20230101000600",
                ]
            );
        }
        Merge::Unchanged => panic!("expected an extension"),
    }
}

#[test]
fn test_merge_noop_when_candidate_holds_nothing_new() {
    let existing = vec![row("20230101000500")];

    // Non-empty candidates ending at or before the archive's last stamp.
    let stale = vec![row("20230101000400"), row("20230101000500")];
    assert_eq!(series::merge(&existing, &stale).unwrap(), Merge::Unchanged);

    let older = vec![row("20230101000300")];
    assert_eq!(series::merge(&existing, &older).unwrap(), Merge::Unchanged);
}

#[test]
fn test_merge_bootstrap_from_empty_archive() {
    let candidate = vec![row("20230101000400"), row("20230101000500")];
    match series::merge(&[], &candidate).unwrap() {
        Merge::Extended(merged) => assert_eq!(merged, candidate),
        Merge::Unchanged => panic!("expected an extension"),
    }
}

#[test]
fn test_trim_bounds_span_to_most_recent_hours() {
    // Half-hourly rows spanning 30 hours.
    let mut rows = Vec::new();
    for day in 1..=2u32 {
        for half_hour in 0..48u32 {
            if day == 2 && half_hour > 13 {
                break;
            }
            rows.push(row(&format!(
                "2023010{day}{:02}{}000",
                half_hour / 2,
                if half_hour % 2 == 0 { "0" } else { "3" }
            )));
        }
    }
    let last = rows.last().unwrap().timestamp().to_string();
    assert_eq!(last, "20230102063000");

    match series::trim(&rows, 24).unwrap() {
        Trim::Trimmed(kept) => {
            // Cutoff is 24 hours before the last stamp, inclusive.
            assert_eq!(kept.first().unwrap().timestamp(), "20230101063000");
            assert_eq!(kept.last().unwrap().timestamp(), last);
            assert!(kept.len() < rows.len());
        }
        Trim::Unchanged => panic!("expected a trim"),
    }
}

#[test]
fn test_trim_noop_cases() {
    // Fewer than two rows is never trimmed.
    assert_eq!(series::trim(&[], 24).unwrap(), Trim::Unchanged);
    assert_eq!(
        series::trim(&[row("20230101000000")], 24).unwrap(),
        Trim::Unchanged
    );

    // A sequence already within the span is untouched.
    let rows = vec![row("20230101000000"), row("20230101230000")];
    assert_eq!(series::trim(&rows, 24).unwrap(), Trim::Unchanged);
}
