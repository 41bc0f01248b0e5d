//! Unit tests for the legacy CSV envelope codec

use fuel_mix_archiver::codec::legacy_csv;
use fuel_mix_archiver::Row;

fn rows_with_uniform_shape(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let stamp = format!("20230621{:02}4500", 10 + i % 14);
            Row::from_fields([
                "FUELINST".to_string(),
                "20230621".to_string(),
                format!("{}", 20 + i),
                stamp,
                format!("{}", 6000 + i),
                "0".to_string(),
                format!("{}", 800 + i),
            ])
        })
        .collect()
}

/// Round-trip: decode(encode(R)) == R for well-formed row sequences.
#[test]
fn test_round_trip_preserves_rows_exactly() {
    for count in [1, 3, 10] {
        let rows = rows_with_uniform_shape(count);
        let text = legacy_csv::encode(&rows, "FUELINST").unwrap();
        let decoded = legacy_csv::decode(&text, None).unwrap();
        assert_eq!(decoded, rows, "round trip broke for {count} rows");
    }
}

#[test]
fn test_encoded_envelope_shape() {
    let rows = rows_with_uniform_shape(2);
    let text = legacy_csv::encode(&rows, "FUELINST").unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "HDR");
    assert!(lines[1].starts_with("FUELINST,20230621,"));
    assert_eq!(lines[3], "FTR,2");
}

#[test]
fn test_decode_real_world_sample() {
    let text = "HDR\n\
        FUELINST,20230621,23,20230621114500,6030,0,1407,4425,3065,0,391,0,78,1010,124,504,0,864,706\n\
        FUELINST,20230621,23,20230621115000,6100,0,1398,4423,3120,0,390,0,78,1010,126,504,0,864,700\n\
        FTR,2\n";
    let rows = legacy_csv::decode(text, None).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].fields().len(), 19);
    assert_eq!(rows[1].timestamp(), "20230621115000");
}

#[test]
fn test_decode_does_not_reorder_or_filter() {
    // Out-of-order rows are the validator's problem, not the codec's.
    let text = "HDR\n\
        FUELINST,20230621,23,20230621115000,6100\n\
        FUELINST,20230621,23,20230621114500,6030\n\
        FTR,2\n";
    let rows = legacy_csv::decode(text, None).unwrap();
    assert_eq!(rows[0].timestamp(), "20230621115000");
    assert_eq!(rows[1].timestamp(), "20230621114500");
}

#[test]
fn test_truncated_transfer_detected() {
    let full = "HDR\n\
        FUELINST,20230621,23,20230621114500,6030\n\
        FUELINST,20230621,23,20230621115000,6100\n\
        FTR,2\n";

    // Chop the payload mid-way: the missing footer must be fatal.
    let truncated = &full[..full.len() / 2];
    assert!(legacy_csv::decode(truncated, None).is_err());
}
