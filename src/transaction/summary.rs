//! Transaction totals grouped by category or by calendar month.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{Error, money::from_cents};

/// The earliest year that can be summarised by month.
pub const MIN_SUMMARY_YEAR: i32 = 1900;
/// The latest year that can be summarised by month.
pub const MAX_SUMMARY_YEAR: i32 = 2100;

/// The total and number of transactions in one group.
///
/// `category` holds a category description or an English month name,
/// depending on how the transactions were grouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub transaction_count: i64,
}

/// Sum transactions by category description, largest total first.
///
/// Categories with equal totals keep the order they were created in.
/// Categories without transactions are left out.
pub fn summarise_by_category(connection: &Connection) -> Result<Vec<TransactionSummary>, Error> {
    connection
        .prepare(
            "SELECT c.description, SUM(t.amount_cents) AS total, COUNT(*)
            FROM \"transaction\" t
            INNER JOIN category c ON c.id = t.category_id
            GROUP BY c.description
            ORDER BY total DESC, MIN(c.id) ASC;",
        )?
        .query_map([], |row| {
            Ok(TransactionSummary {
                category: row.get(0)?,
                total_amount: from_cents(row.get(1)?),
                transaction_count: row.get(2)?,
            })
        })?
        .map(|maybe_summary| maybe_summary.map_err(Error::from))
        .collect()
}

/// Sum the transactions dated in `year` by calendar month, January first.
///
/// Months without transactions are left out.
///
/// # Errors
///
/// Returns [Error::YearOutOfRange] if `year` is before [MIN_SUMMARY_YEAR] or
/// after [MAX_SUMMARY_YEAR].
pub fn summarise_by_month(year: i32, connection: &Connection) -> Result<Vec<TransactionSummary>, Error> {
    if !(MIN_SUMMARY_YEAR..=MAX_SUMMARY_YEAR).contains(&year) {
        return Err(Error::YearOutOfRange(year));
    }

    let start = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| Error::YearOutOfRange(year))?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|_| Error::YearOutOfRange(year))?;

    let rows: Vec<(u8, i64, i64)> = connection
        .prepare(
            "SELECT CAST(strftime('%m', date) AS INTEGER) AS month,
                SUM(amount_cents), COUNT(*)
            FROM \"transaction\"
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY month
            ORDER BY month ASC;",
        )?
        .query_map((start, end), |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<_, _>>()?;

    rows.into_iter()
        .map(|(month, total_cents, count)| {
            let month = Month::try_from(month).map_err(|error| {
                tracing::error!("Stored transaction has an invalid month {month}: {error}");
                Error::SqlError(rusqlite::Error::IntegralValueOutOfRange(0, month.into()))
            })?;

            Ok(TransactionSummary {
                category: month.to_string(),
                total_amount: from_cents(total_cents),
                transaction_count: count,
            })
        })
        .collect()
}
