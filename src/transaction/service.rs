//! Transaction operations used by both the JSON API and the pages.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    database_id::{CustomerId, DatabaseId},
    transaction::core::{
        TransactionDto, TransactionFilter, TransactionInput, delete_transaction,
        generate_transaction_number, get_transaction, insert_transaction, query_transactions,
        transaction_exists, update_transaction, validate_transaction_number,
    },
};

/// How many times to draw a new generated transaction number when the
/// previous one is already taken.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Every transaction, most recent first.
pub fn list_all(connection: &Connection) -> Result<Vec<TransactionDto>, Error> {
    query_transactions(TransactionFilter::All, connection)
}

/// The transaction with `trans_num`, or [Error::NotFound].
pub fn get_by_number(trans_num: &str, connection: &Connection) -> Result<TransactionDto, Error> {
    get_transaction(trans_num, connection)
}

/// The transactions of the customer with `customer_id`, most recent first.
pub fn list_by_customer(
    customer_id: CustomerId,
    connection: &Connection,
) -> Result<Vec<TransactionDto>, Error> {
    query_transactions(TransactionFilter::Customer(customer_id), connection)
}

/// The transactions in the category with `category_id`, most recent first.
pub fn list_by_category(
    category_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<TransactionDto>, Error> {
    query_transactions(TransactionFilter::Category(category_id), connection)
}

/// The transactions dated from `start` to `end` inclusive, most recent first.
///
/// # Errors
///
/// Returns [Error::InvalidDateRange] if `start` is after `end`.
pub fn list_by_date_range(
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<TransactionDto>, Error> {
    if start > end {
        return Err(Error::InvalidDateRange);
    }

    query_transactions(TransactionFilter::DateRange { start, end }, connection)
}

/// Store a new transaction and return it with its display fields.
///
/// A missing or empty transaction number is replaced with a generated one
/// based on `today`. Any other number is kept exactly as given, whitespace
/// included.
///
/// # Errors
///
/// Returns [Error::Validation] for a transaction number that is too long,
/// [Error::DuplicateTransactionNumber] if the number is taken, or
/// [Error::InvalidForeignKey] if the category or customer does not exist.
pub fn create(
    input: &TransactionInput,
    today: Date,
    connection: &Connection,
) -> Result<TransactionDto, Error> {
    let trans_num = match input.trans_num.as_deref() {
        Some(trans_num) if !trans_num.is_empty() => {
            validate_transaction_number(trans_num)?;
            trans_num.to_owned()
        }
        _ => unused_transaction_number(today, connection)?,
    };

    insert_transaction(&trans_num, input, connection)?;

    get_transaction(&trans_num, connection)
}

fn unused_transaction_number(today: Date, connection: &Connection) -> Result<String, Error> {
    let mut trans_num = generate_transaction_number(today);

    for _ in 1..MAX_GENERATION_ATTEMPTS {
        if !transaction_exists(&trans_num, connection)? {
            break;
        }

        tracing::debug!("Generated transaction number {trans_num} is taken, trying again");
        trans_num = generate_transaction_number(today);
    }

    Ok(trans_num)
}

/// Overwrite the transaction with `trans_num`.
///
/// The transaction number in `input` is ignored.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no transaction with `trans_num`, or
/// [Error::InvalidForeignKey] if the category or customer does not exist.
pub fn update(
    trans_num: &str,
    input: &TransactionInput,
    connection: &Connection,
) -> Result<TransactionDto, Error> {
    match update_transaction(trans_num, input, connection)? {
        0 => Err(Error::NotFound),
        _ => get_transaction(trans_num, connection),
    }
}

/// Delete the transaction with `trans_num`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no transaction with `trans_num`.
pub fn delete(trans_num: &str, connection: &Connection) -> Result<(), Error> {
    match delete_transaction(trans_num, connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}
