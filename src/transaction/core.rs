//! Defines the core data models and database queries for transactions.

use rand::Rng;
use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Time, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::{CustomerId, DatabaseId, TransactionNumber},
    money::{from_cents, round_amount, to_cents},
    time_format::{TIME_FORMAT, iso_date, parse_time_of_day, time_of_day},
};

// ============================================================================
// MODELS
// ============================================================================

/// The maximum number of characters in a transaction number.
pub const MAX_TRANSACTION_NUMBER_LENGTH: usize = 50;

const TRANSACTION_NUMBER_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year][month][day]");

/// The transaction fields sent by clients when creating or updating a
/// transaction.
///
/// Positive amounts are income and negative amounts are expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// Left empty to have a number generated on create. Ignored on update.
    #[serde(default)]
    pub trans_num: Option<TransactionNumber>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "time_of_day")]
    pub time: Time,
    pub category_id: DatabaseId,
    pub customer_id: CustomerId,
}

/// A transaction as sent to clients, with the description of its category and
/// the full name of its customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub trans_num: TransactionNumber,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "time_of_day")]
    pub time: Time,
    pub category_id: DatabaseId,
    pub customer_id: CustomerId,
    pub category_description: Option<String>,
    pub customer_full_name: Option<String>,
}

/// Which transactions to retrieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    /// Every transaction.
    #[default]
    All,
    /// The transactions of one customer.
    Customer(CustomerId),
    /// The transactions in one category.
    Category(DatabaseId),
    /// The transactions dated between `start` and `end`, both inclusive.
    DateRange { start: Date, end: Date },
}

/// Income, expenses and their difference over every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// The sum of the positive amounts.
    pub income: Decimal,
    /// The sum of the negative amounts.
    pub expenses: Decimal,
    /// The sum of every amount.
    pub net: Decimal,
    /// The number of transactions.
    pub count: i64,
}

/// Check that a caller supplied transaction number fits in the column.
///
/// Any characters are allowed, only the length is limited.
///
/// # Errors
///
/// Returns [Error::Validation] if `trans_num` is longer than
/// [MAX_TRANSACTION_NUMBER_LENGTH] characters.
pub fn validate_transaction_number(trans_num: &str) -> Result<(), Error> {
    if trans_num.chars().count() > MAX_TRANSACTION_NUMBER_LENGTH {
        return Err(Error::Validation(format!(
            "Transaction number must be at most {MAX_TRANSACTION_NUMBER_LENGTH} characters long."
        )));
    }

    Ok(())
}

/// Generate a transaction number such as "TR-20250131-482913" from `today` and
/// a random six digit number.
pub fn generate_transaction_number(today: Date) -> TransactionNumber {
    let date = today
        .format(TRANSACTION_NUMBER_DATE_FORMAT)
        .unwrap_or_else(|_| {
            format!(
                "{:04}{:02}{:02}",
                today.year(),
                today.month() as u8,
                today.day()
            )
        });
    let suffix: u32 = rand::thread_rng().gen_range(100_000..=999_999);

    format!("TR-{date}-{suffix}")
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str = "SELECT t.trans_num, t.amount_cents, t.date, t.time,
    t.category_id, t.customer_id, c.description, cu.first_name || ' ' || cu.last_name
    FROM \"transaction\" t
    INNER JOIN category c ON c.id = t.category_id
    INNER JOIN customer cu ON cu.id = t.customer_id";

const ORDER_MOST_RECENT_FIRST: &str = "ORDER BY t.date DESC, t.time DESC, t.trans_num ASC";

/// Create the transaction table.
///
/// The category and customer tables must exist first.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            trans_num TEXT PRIMARY KEY NOT NULL,
            amount_cents INTEGER NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            customer_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(customer_id) REFERENCES customer(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_customer_id ON \"transaction\"(customer_id);",
    )
}

/// Insert a transaction under `trans_num`.
///
/// The amount is rounded to cents.
///
/// # Errors
///
/// Returns [Error::DuplicateTransactionNumber] if `trans_num` is taken, or
/// [Error::InvalidForeignKey] if the category or customer does not exist.
pub fn insert_transaction(
    trans_num: &str,
    input: &TransactionInput,
    connection: &Connection,
) -> Result<(), Error> {
    let amount_cents = to_cents(input.amount)?;
    let time = format_time(input.time)?;

    connection.execute(
        "INSERT INTO \"transaction\" (trans_num, amount_cents, date, time, category_id, customer_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            trans_num,
            amount_cents,
            input.date,
            time,
            input.category_id,
            input.customer_id,
        ),
    )?;

    Ok(())
}

/// Retrieve the transaction with `trans_num` and its display fields.
pub fn get_transaction(trans_num: &str, connection: &Connection) -> Result<TransactionDto, Error> {
    connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE t.trans_num = :trans_num;"))?
        .query_row(&[(":trans_num", &trans_num)], map_transaction_row)
        .map_err(Error::from)
}

/// Retrieve the transactions matching `filter`, most recent first.
pub fn query_transactions(
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionDto>, Error> {
    match filter {
        TransactionFilter::All => connection
            .prepare(&format!("{SELECT_TRANSACTION} {ORDER_MOST_RECENT_FIRST};"))?
            .query_map([], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect(),
        TransactionFilter::Customer(customer_id) => connection
            .prepare(&format!(
                "{SELECT_TRANSACTION} WHERE t.customer_id = ?1 {ORDER_MOST_RECENT_FIRST};"
            ))?
            .query_map([customer_id], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect(),
        TransactionFilter::Category(category_id) => connection
            .prepare(&format!(
                "{SELECT_TRANSACTION} WHERE t.category_id = ?1 {ORDER_MOST_RECENT_FIRST};"
            ))?
            .query_map([category_id], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect(),
        TransactionFilter::DateRange { start, end } => connection
            .prepare(&format!(
                "{SELECT_TRANSACTION} WHERE t.date BETWEEN ?1 AND ?2 {ORDER_MOST_RECENT_FIRST};"
            ))?
            .query_map((start, end), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect(),
    }
}

/// Retrieve up to `limit` of the most recent transactions.
pub fn get_recent_transactions(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<TransactionDto>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} {ORDER_MOST_RECENT_FIRST} LIMIT ?1;"
        ))?
        .query_map([limit], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Overwrite the amount, date, time, category and customer of the
/// transaction with `trans_num`.
///
/// Returns zero if there is no such transaction.
pub fn update_transaction(
    trans_num: &str,
    input: &TransactionInput,
    connection: &Connection,
) -> Result<usize, Error> {
    let amount_cents = to_cents(input.amount)?;
    let time = format_time(input.time)?;

    connection
        .execute(
            "UPDATE \"transaction\"
            SET amount_cents = ?1, date = ?2, time = ?3, category_id = ?4, customer_id = ?5
            WHERE trans_num = ?6;",
            (
                amount_cents,
                input.date,
                time,
                input.category_id,
                input.customer_id,
                trans_num,
            ),
        )
        .map_err(Error::from)
}

/// Delete the transaction with `trans_num`.
///
/// Returns zero if there is no such transaction.
pub fn delete_transaction(trans_num: &str, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE trans_num = ?1;",
            [trans_num],
        )
        .map_err(Error::from)
}

/// Whether a transaction with `trans_num` exists.
pub fn transaction_exists(trans_num: &str, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE trans_num = ?1);",
            [trans_num],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Sum income and expenses over every transaction.
pub fn get_totals(connection: &Connection) -> Result<Totals, Error> {
    connection
        .query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN amount_cents > 0 THEN amount_cents END), 0),
                COALESCE(SUM(CASE WHEN amount_cents < 0 THEN amount_cents END), 0),
                COUNT(*)
            FROM \"transaction\";",
            [],
            |row| {
                let income = from_cents(row.get(0)?);
                let expenses = from_cents(row.get(1)?);

                Ok(Totals {
                    income,
                    expenses,
                    net: income + expenses,
                    count: row.get(2)?,
                })
            },
        )
        .map_err(Error::from)
}

/// The number of transactions.
pub fn count_transactions(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM \"transaction\";", [], |row| row.get(0))
        .map_err(Error::from)
}

fn format_time(time: Time) -> Result<String, Error> {
    time.format(TIME_FORMAT)
        .map_err(|error| Error::Validation(format!("Invalid time: {error}")))
}

/// Map a row from [SELECT_TRANSACTION] to a [TransactionDto].
pub fn map_transaction_row(row: &Row) -> Result<TransactionDto, rusqlite::Error> {
    let time_text: String = row.get(3)?;
    let time = parse_time_of_day(&time_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;

    Ok(TransactionDto {
        trans_num: row.get(0)?,
        amount: round_amount(from_cents(row.get(1)?)),
        date: row.get(2)?,
        time,
        category_id: row.get(4)?,
        customer_id: row.get(5)?,
        category_description: row.get(6)?,
        customer_full_name: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use time::macros::date;

    use crate::Error;

    use super::{generate_transaction_number, validate_transaction_number};

    #[test]
    fn generated_number_has_date_and_six_digits() {
        let got = generate_transaction_number(date!(2025 - 01 - 31));

        let (prefix, suffix) = got.split_at("TR-20250131-".len());
        assert_eq!(prefix, "TR-20250131-");
        assert_eq!(suffix.len(), 6);
        let suffix: u32 = suffix.parse().unwrap();
        assert!((100_000..=999_999).contains(&suffix));
    }

    #[test]
    fn generated_number_is_valid() {
        let got = generate_transaction_number(date!(2025 - 12 - 01));

        assert_eq!(validate_transaction_number(&got), Ok(()));
    }

    #[test]
    fn accepts_any_characters() {
        assert_eq!(validate_transaction_number("INV_2025-0042"), Ok(()));
        assert_eq!(validate_transaction_number("INV 1"), Ok(()));
        assert_eq!(validate_transaction_number("Ñ-7"), Ok(()));
        assert_eq!(validate_transaction_number("TR/1"), Ok(()));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(validate_transaction_number(&"Ñ".repeat(50)), Ok(()));
    }

    #[test]
    fn rejects_long_numbers() {
        let got = validate_transaction_number(&"A".repeat(51));

        assert!(matches!(got, Err(Error::Validation(_))));
    }
}
