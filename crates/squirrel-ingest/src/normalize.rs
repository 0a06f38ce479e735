//! Normalization of loosely typed census rows into [`Record`] values.
//!
//! Rows come from JSON objects or CSV lines keyed by the merged census column
//! names. Every attribute except the identifier is optional: a missing or
//! unparseable value takes its "not observed" default instead of failing the
//! row.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::trace;

use squirrel_model::{Activity, AgeGroup, FurColor, GeoPoint, Record, RecordId, Shift};

pub const ID_COLUMN: &str = "Unique Squirrel ID";
pub const HECTARE_COLUMN: &str = "Hectare";
pub const SHIFT_COLUMN: &str = "Shift";
pub const DATE_COLUMN: &str = "Date";
pub const AGE_COLUMN: &str = "Age";
pub const FUR_COLOR_COLUMN: &str = "Primary Fur Color";
pub const DOGS_COLUMN: &str = "Dogs";
pub const TEMPERATURE_COLUMN: &str = "Weather";
pub const LON_COLUMN: &str = "X";
pub const LAT_COLUMN: &str = "Y";

/// Build a record from one census row.
///
/// Returns the skip reason when the row has no usable identifier.
pub fn record_from_row(row: &Map<String, Value>) -> Result<Record, String> {
    let id = row
        .get(ID_COLUMN)
        .and_then(text_value)
        .ok_or_else(|| format!("missing '{ID_COLUMN}'"))?;
    let id = RecordId::new(id).map_err(|error| error.to_string())?;

    let mut record = Record::new(id);
    record.hectare = row.get(HECTARE_COLUMN).and_then(text_value);
    record.shift = row
        .get(SHIFT_COLUMN)
        .and_then(text_value)
        .and_then(|raw| raw.parse::<Shift>().ok());
    record.date = row.get(DATE_COLUMN).and_then(census_date);
    record.age = AgeGroup::from_census(row.get(AGE_COLUMN).and_then(Value::as_str));
    record.fur_color = FurColor::from_census(row.get(FUR_COLOR_COLUMN).and_then(Value::as_str));
    for activity in Activity::ALL {
        if row.get(activity.as_str()).is_some_and(flag_value) {
            record.activities.insert(activity);
        }
    }
    record.dogs = row.get(DOGS_COLUMN).and_then(count_value).unwrap_or(0);
    record.temperature = row.get(TEMPERATURE_COLUMN).and_then(finite_number);
    record.location = match (
        row.get(LON_COLUMN).and_then(finite_number),
        row.get(LAT_COLUMN).and_then(finite_number),
    ) {
        (Some(lon), Some(lat)) => GeoPoint::new(lon, lat).ok(),
        _ => None,
    };
    if record.location.is_none() {
        trace!(id = %record.id, "record has no usable location");
    }
    Ok(record)
}

/// Truthiness of an activity flag: `true`, `1`, or a `"true"` string.
pub fn flag_value(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 1.0),
        Value::String(text) => {
            let text = text.trim();
            text.eq_ignore_ascii_case("true") || text == "1"
        }
        _ => false,
    }
}

/// Non-empty trimmed text; numbers are rendered as text.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// A finite number, accepting numeric strings.
pub fn finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// A non-negative count; booleans count as 0/1.
pub fn count_value(value: &Value) -> Option<u32> {
    if let Value::Bool(flag) = value {
        return Some(u32::from(*flag));
    }
    let number = finite_number(value)?;
    if number < 0.0 {
        return None;
    }
    Some(number.round().min(f64::from(u32::MAX)) as u32)
}

/// Census dates are `MMDDYYYY`, stored as integers (leading zero lost) or text.
pub fn census_date(value: &Value) -> Option<NaiveDate> {
    let digits = match value {
        Value::Number(number) => format!("{:08}", number.as_u64()?),
        Value::String(text) => format!("{:0>8}", text.trim()),
        _ => return None,
    };
    NaiveDate::parse_from_str(&digits, "%m%d%Y").ok()
}
