//! Serde helpers for the date and time formats used in JSON bodies, forms and
//! query strings.

use serde::{Deserialize, Deserializer, de::Error as _};
use time::{
    Date, Time, format_description::BorrowedFormatItem, macros::format_description,
};

/// Dates are written as "2025-01-31".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
/// Times are written as "14:30:00".
pub const TIME_FORMAT: &[BorrowedFormatItem] = format_description!("[hour]:[minute]:[second]");
const SHORT_TIME_FORMAT: &[BorrowedFormatItem] = format_description!("[hour]:[minute]");

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Parse "HH:MM:SS" or "HH:MM", the latter being what browsers send for
/// `<input type="time">`.
pub fn parse_time_of_day(text: &str) -> Result<Time, time::error::Parse> {
    let text = text.trim();

    Time::parse(text, TIME_FORMAT).or_else(|_| Time::parse(text, SHORT_TIME_FORMAT))
}

/// Serialize a [Time] as "HH:MM:SS" and accept "HH:MM:SS" or "HH:MM".
pub mod time_of_day {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::Time;

    use super::{TIME_FORMAT, parse_time_of_day};

    pub fn serialize<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let text = time.format(TIME_FORMAT).map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let text = String::deserialize(deserializer)?;

        parse_time_of_day(&text).map_err(D::Error::custom)
    }
}

/// Deserialize an optional "YYYY-MM-DD" date where a missing or blank value
/// means no date, as sent by an empty `<input type="date">`.
pub fn blank_as_none_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Date>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => Date::parse(text.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize an optional ID where a missing or blank value means no ID, as
/// sent by a `<select>` with an empty "any" option.
pub fn blank_as_none_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => {
            text.trim().parse().map(Some).map_err(D::Error::custom)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use time::macros::{date, time};

    use super::{blank_as_none_date, iso_date, parse_time_of_day, time_of_day};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "iso_date")]
        date: time::Date,
        #[serde(with = "time_of_day")]
        time: time::Time,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "blank_as_none_date")]
        start: Option<time::Date>,
    }

    #[test]
    fn writes_iso_date_and_full_time() {
        let sample = Sample {
            date: date!(2025 - 01 - 05),
            time: time!(9:00),
        };

        assert_eq!(
            serde_json::to_string(&sample).unwrap(),
            r#"{"date":"2025-01-05","time":"09:00:00"}"#
        );
    }

    #[test]
    fn accepts_time_without_seconds() {
        assert_eq!(parse_time_of_day("14:30"), Ok(time!(14:30)));
        assert_eq!(parse_time_of_day("14:30:15"), Ok(time!(14:30:15)));
        assert!(parse_time_of_day("2pm").is_err());
    }

    #[test]
    fn blank_date_is_none() {
        let filter: Filter = serde_urlencoded::from_str("start=").unwrap();
        assert_eq!(filter, Filter { start: None });

        let filter: Filter = serde_urlencoded::from_str("").unwrap();
        assert_eq!(filter, Filter { start: None });

        let filter: Filter = serde_urlencoded::from_str("start=2025-02-03").unwrap();
        assert_eq!(
            filter,
            Filter {
                start: Some(date!(2025 - 02 - 03))
            }
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(serde_urlencoded::from_str::<Filter>("start=03/02/2025").is_err());
    }
}
