//! Pipeline configuration constants

use crate::FieldTemplate;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Record-type tag carried by every data row of the dataset.
pub const RECORD_TYPE: &str = "FUELINST";

/// Width of the sort-key timestamp field (`YYYYMMDDHHmmss`).
/// Fixed width and zero padding make lexical comparison of the raw field
/// equivalent to chronological comparison, which the merge path relies on.
pub const TIMESTAMP_LEN: usize = 14;

/// Minimum number of fields a structurally valid row carries
/// (type tag, date, settlement period, timestamp).
pub const MIN_ROW_FIELDS: usize = 4;

/// Default maximum archive span in hours.
/// 24 hours covers a full settlement day, which is what the downstream
/// carbon-intensity calculation consumes; anything older is dead weight
/// in a file that is re-read and re-published every ingest cycle.
pub const DEFAULT_MAX_SPAN_HOURS: u32 = 24;

/// Allowed clock slack, in minutes, when checking that no record claims to
/// be from the future. A few minutes absorbs ordinary skew between the
/// publisher's clock and ours; anything beyond that indicates a systemic
/// clock or format problem rather than a transient data hiccup.
pub const FRESHNESS_TOLERANCE_MINS: i64 = 5;

/// HTTP timeout for a single payload fetch.
/// The feed payloads are small (tens of KB); 30 seconds is generous enough
/// for a slow origin without leaving a wedged cron run hanging.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default positional column template for the dataset, matching the
/// published FUELINST column order. Positions 0..3 are the fixed columns;
/// the remainder are fuel-type codes aligned with row field offsets.
pub const DEFAULT_FUEL_TEMPLATE: &str = "type,date,period,timestamp,CCGT,OIL,COAL,NUCLEAR,\
WIND,PS,NPSHYD,OCGT,OTHER,INTFR,INTIRL,INTNED,INTEW,BIOMASS,INTNEM";

/// Parsed form of [`DEFAULT_FUEL_TEMPLATE`].
pub static DEFAULT_TEMPLATE: Lazy<FieldTemplate> = Lazy::new(|| {
    DEFAULT_FUEL_TEMPLATE
        .parse()
        .unwrap_or_else(|e| panic!("built-in fuel template is invalid: {e}"))
});
