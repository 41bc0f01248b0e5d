//! Unit tests for the JSON stream codec

use fuel_mix_archiver::codec::stream_json;
use fuel_mix_archiver::FieldTemplate;

fn record(start: &str, fuel: &str, generation: i64) -> String {
    format!(
        r#"{{"dataset":"FUELINST","publishTime":"2023-06-21T11:50:00Z","startTime":"{start}","settlementDate":"2023-06-21","settlementPeriod":24,"fuelType":"{fuel}","generation":{generation}}}"#
    )
}

/// Grouped interval with `{BIOMASS: 864, CCGT: 6030}` against the template
/// `type,date,period,timestamp,BIOMASS,CCGT,COAL` yields a row with the
/// missing COAL position filled with "0".
#[test]
fn test_grouped_interval_to_legacy_row() {
    let payload = format!(
        "[{},{}]",
        record("2023-06-21T11:30:00Z", "BIOMASS", 864),
        record("2023-06-21T11:30:00Z", "CCGT", 6030),
    );
    let template: FieldTemplate = "type,date,period,timestamp,BIOMASS,CCGT,COAL"
        .parse()
        .unwrap();

    let grouped = stream_json::decode(payload.as_bytes(), "FUELINST", false).unwrap();
    let rows = grouped.to_rows(&template, "FUELINST").unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].fields(),
        &["FUELINST", "20230621", "24", "20230621113000", "864", "6030", "0"]
    );
}

#[test]
fn test_multiple_intervals_produce_ordered_rows() {
    let payload = format!(
        "[{},{},{}]",
        record("2023-06-21T12:00:00Z", "CCGT", 6100),
        record("2023-06-21T11:30:00Z", "CCGT", 6030),
        record("2023-06-21T12:30:00Z", "CCGT", 6200),
    );
    let template: FieldTemplate = "type,date,period,timestamp,CCGT".parse().unwrap();

    let grouped = stream_json::decode(payload.as_bytes(), "FUELINST", false).unwrap();
    let rows = grouped.to_rows(&template, "FUELINST").unwrap();

    let stamps: Vec<&str> = rows.iter().map(|r| r.timestamp()).collect();
    assert_eq!(
        stamps,
        vec!["20230621113000", "20230621120000", "20230621123000"]
    );
}

#[test]
fn test_decode_rejects_wrong_dataset() {
    let payload = r#"[{"dataset":"FUELHH","startTime":"2023-06-21T11:30:00Z","settlementPeriod":24,"fuelType":"CCGT","generation":6030}]"#;
    assert!(stream_json::decode(payload.as_bytes(), "FUELINST", false).is_err());
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(stream_json::decode(b"not json", "FUELINST", false).is_err());
    assert!(stream_json::decode(b"{\"unexpected\":true}", "FUELINST", false).is_err());
}

#[test]
fn test_synthesized_rows_survive_envelope_round_trip() {
    use fuel_mix_archiver::codec::legacy_csv;

    let payload = format!(
        "[{},{}]",
        record("2023-06-21T11:30:00Z", "CCGT", 6030),
        record("2023-06-21T12:00:00Z", "CCGT", 6100),
    );
    let template: FieldTemplate = "type,date,period,timestamp,CCGT,COAL".parse().unwrap();

    let grouped = stream_json::decode(payload.as_bytes(), "FUELINST", false).unwrap();
    let rows = grouped.to_rows(&template, "FUELINST").unwrap();

    let text = legacy_csv::encode(&rows, "FUELINST").unwrap();
    assert_eq!(legacy_csv::decode(&text, None).unwrap(), rows);
}
