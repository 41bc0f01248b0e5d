//! JSON stream format codec
//!
//! The newer upstream endpoint publishes one flat JSON object per fuel type
//! per settlement interval. Decoding buckets those records by interval start
//! time; a grouped interval can then be flattened back into one legacy-shaped
//! row so the archive format stays the same regardless of wire origin.
//!
//! `startTime` is the canonical instant. `publishTime` is deliberately not
//! used: upstream processing delay can lump several intervals together under
//! one publish time.

use crate::codec::{CodecError, CodecResult};
use crate::{format_date, format_timestamp, FieldTemplate, FuelSample, Row};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One wire record as published by the stream endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    dataset: String,
    #[serde(default)]
    #[allow(dead_code)]
    publish_time: Option<String>,
    start_time: String,
    #[serde(default)]
    #[allow(dead_code)]
    settlement_date: Option<String>,
    settlement_period: i64,
    fuel_type: String,
    generation: i64,
}

/// The live endpoint wraps the record array in a `data` field; archived
/// captures are a bare array. Both are accepted.
#[derive(Debug, Deserialize)]
struct WireEnvelope {
    data: Vec<WireRecord>,
}

/// Per-fuel samples bucketed by settlement-interval start time, ascending.
///
/// This is the bridge between the stream decoder and legacy row synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedIntervals {
    intervals: BTreeMap<DateTime<Utc>, BTreeMap<String, FuelSample>>,
}

impl GroupedIntervals {
    /// Number of distinct settlement intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True when no interval was decoded.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The fuel-type map for one interval, if present.
    pub fn get(&self, time: &DateTime<Utc>) -> Option<&BTreeMap<String, FuelSample>> {
        self.intervals.get(time)
    }

    /// Iterate intervals in ascending time order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&DateTime<Utc>, &BTreeMap<String, FuelSample>)> {
        self.intervals.iter()
    }

    /// Flatten every interval into a legacy-shaped row, ascending by time.
    pub fn to_rows(&self, template: &FieldTemplate, tag: &str) -> CodecResult<Vec<Row>> {
        self.intervals
            .iter()
            .map(|(time, samples)| interval_to_row(*time, samples, template, tag))
            .collect()
    }
}

/// Decode a stream JSON payload into grouped intervals.
///
/// Every record's dataset name must equal `expected_dataset`. Duplicate
/// (time, fuel type) pairs overwrite rather than accumulate - upstream
/// resends overlapping windows. With `clamp_negative` set, generation values
/// are clamped to >= 0 (interconnectors report net flow and can go negative).
pub fn decode(
    bytes: &[u8],
    expected_dataset: &str,
    clamp_negative: bool,
) -> CodecResult<GroupedIntervals> {
    let records: Vec<WireRecord> = match serde_json::from_slice::<Vec<WireRecord>>(bytes) {
        Ok(records) => records,
        Err(_) => serde_json::from_slice::<WireEnvelope>(bytes)
            .map(|envelope| envelope.data)
            .map_err(|e| CodecError::Format(format!("unparseable stream payload: {e}")))?,
    };

    let mut grouped = GroupedIntervals::default();

    for (idx, record) in records.into_iter().enumerate() {
        if record.dataset != expected_dataset {
            return Err(CodecError::Format(format!(
                "record {idx} carries dataset '{}', expected '{expected_dataset}'",
                record.dataset
            )));
        }

        let time = parse_instant(&record.start_time).map_err(|e| {
            CodecError::Format(format!("record {idx}: bad startTime: {e}"))
        })?;

        let settlement_period = u32::try_from(record.settlement_period)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| {
                CodecError::Format(format!(
                    "record {idx}: settlement period must be a positive integer, got {}",
                    record.settlement_period
                ))
            })?;

        let generation = if clamp_negative {
            record.generation.max(0)
        } else {
            record.generation
        };

        let sample = FuelSample {
            time,
            fuel_type: record.fuel_type,
            generation,
            settlement_period,
        };
        sample
            .validate()
            .map_err(|e| CodecError::Format(format!("record {idx}: {e}")))?;

        // Last write wins for a resent (time, fuel) pair.
        grouped
            .intervals
            .entry(time)
            .or_default()
            .insert(sample.fuel_type.clone(), sample);
    }

    debug!(intervals = grouped.len(), "decoded stream payload");
    Ok(grouped)
}

/// Flatten one interval's fuel map into a legacy-shaped row.
///
/// Produces `[tag, YYYYMMDD, period, YYYYMMDDHHmmss, v...]` with one value
/// per template fuel position and `"0"` where that fuel is absent from the
/// interval. Any present sample whose own fuel type, time or settlement
/// period disagrees with the interval's canonical values is an integrity
/// error - it means mismatched intervals were merged by accident upstream
/// of this call.
pub fn interval_to_row(
    time: DateTime<Utc>,
    samples: &BTreeMap<String, FuelSample>,
    template: &FieldTemplate,
    tag: &str,
) -> CodecResult<Row> {
    let period = samples
        .values()
        .next()
        .map(|s| s.settlement_period)
        .ok_or_else(|| {
            CodecError::Integrity(format!("interval at {time} has no samples"))
        })?;

    for (fuel, sample) in samples {
        if sample.fuel_type != *fuel {
            return Err(CodecError::Integrity(format!(
                "sample keyed '{fuel}' carries fuel type '{}'",
                sample.fuel_type
            )));
        }
        if sample.time != time {
            return Err(CodecError::Integrity(format!(
                "sample {fuel} carries time {}, interval is {time}",
                sample.time
            )));
        }
        if sample.settlement_period != period {
            return Err(CodecError::Integrity(format!(
                "sample {fuel} carries settlement period {}, interval is {period}",
                sample.settlement_period
            )));
        }
    }

    let mut fields = Vec::with_capacity(template.len());
    fields.push(tag.to_string());
    fields.push(format_date(&time));
    fields.push(period.to_string());
    fields.push(format_timestamp(&time));
    for pos in fields.len()..template.len() {
        let name = template.name(pos).unwrap_or("");
        let value = if name.is_empty() {
            "0".to_string()
        } else {
            samples
                .get(name)
                .map(|s| s.generation.to_string())
                .unwrap_or_else(|| "0".to_string())
        };
        fields.push(value);
    }

    for fuel in samples.keys() {
        if !template.fuels().any(|(_, name)| name == fuel.as_str()) {
            warn!(fuel = %fuel, %time, "fuel type not in template, value dropped");
        }
    }

    Ok(Row::new(fields))
}

/// Parse an ISO-8601 UTC instant, accepting minute-granularity stamps
/// without a seconds component.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("'{s}' is not an ISO-8601 UTC instant: {e}"))
}
