//! Fills a fresh database with the reference data and a few sample customers
//! and transactions.

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Duration, Time, macros::date};

use crate::{
    Error,
    customer::{CustomerInput, count_customers, create_customer},
    database_id::{CustomerId, DatabaseId},
    reference::{Category, Gender, Profession, ReferenceEntity, count_rows, insert},
    transaction::{TransactionInput, insert_transaction},
};

const GENDERS: [&str; 4] = ["Male", "Female", "Non-Binary", "Other"];

const PROFESSIONS: [&str; 8] = [
    "Software Engineer",
    "Doctor",
    "Teacher",
    "Accountant",
    "Lawyer",
    "Sales Representative",
    "Marketing Specialist",
    "Student",
];

const CATEGORIES: [&str; 15] = [
    "Groceries",
    "Utilities",
    "Rent",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Education",
    "Dining Out",
    "Shopping",
    "Savings",
    "Investment",
    "Salary",
    "Bonus",
    "Other Income",
    "Other Expense",
];

// Category IDs follow the order of CATEGORIES.
const GROCERIES: DatabaseId = 1;
const ENTERTAINMENT: DatabaseId = 5;
const DINING_OUT: DatabaseId = 8;
const SALARY: DatabaseId = 12;

/// A sample transaction, dated relative to the day the database is seeded.
struct SampleTransaction {
    trans_num: &'static str,
    amount_cents: i64,
    days_ago: i64,
    time: Time,
    category_id: DatabaseId,
    /// Index into the seeded customers.
    customer: usize,
}

const SAMPLE_TRANSACTIONS: [SampleTransaction; 5] = [
    SampleTransaction {
        trans_num: "TR-20250101-123456",
        amount_cents: 150_000,
        days_ago: 15,
        time: time::macros::time!(14:30),
        category_id: SALARY,
        customer: 0,
    },
    SampleTransaction {
        trans_num: "TR-20250101-123457",
        amount_cents: -5_025,
        days_ago: 10,
        time: time::macros::time!(18:45),
        category_id: GROCERIES,
        customer: 0,
    },
    SampleTransaction {
        trans_num: "TR-20250101-123458",
        amount_cents: -2_575,
        days_ago: 5,
        time: time::macros::time!(12:15),
        category_id: DINING_OUT,
        customer: 0,
    },
    SampleTransaction {
        trans_num: "TR-20250101-123459",
        amount_cents: 120_000,
        days_ago: 20,
        time: time::macros::time!(09:00),
        category_id: SALARY,
        customer: 1,
    },
    SampleTransaction {
        trans_num: "TR-20250101-123460",
        amount_cents: -3_550,
        days_ago: 8,
        time: time::macros::time!(16:20),
        category_id: ENTERTAINMENT,
        customer: 1,
    },
];

/// Insert the reference data and the sample customers and transactions.
///
/// Does nothing if the gender, profession and category tables all have rows,
/// even when every customer has since been deleted. Otherwise each empty
/// reference table is filled, and the samples are added if there are no
/// customers. Sample transactions are dated relative to `today`.
///
/// # Errors
/// Returns an error if there is an SQL error. Nothing is written in that case.
pub fn seed_database(today: Date, connection: &Connection) -> Result<(), Error> {
    if count_rows::<Gender>(connection)? > 0
        && count_rows::<Profession>(connection)? > 0
        && count_rows::<Category>(connection)? > 0
    {
        tracing::debug!("Reference data already exists, skipping seeding");
        return Ok(());
    }

    let transaction = connection.unchecked_transaction()?;

    seed_reference_table::<Gender>(&GENDERS, &transaction)?;
    seed_reference_table::<Profession>(&PROFESSIONS, &transaction)?;
    seed_reference_table::<Category>(&CATEGORIES, &transaction)?;

    if count_customers(&transaction)? == 0 {
        seed_customers_and_transactions(today, &transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

fn seed_reference_table<R: ReferenceEntity>(
    labels: &[&str],
    connection: &Connection,
) -> Result<(), Error> {
    if count_rows::<R>(connection)? > 0 {
        tracing::debug!("Table \"{}\" already has data, skipping", R::TABLE);
        return Ok(());
    }

    for label in labels {
        insert::<R>(label, connection)?;
    }

    tracing::info!("Seeded {} rows into \"{}\"", labels.len(), R::TABLE);

    Ok(())
}

fn seed_customers_and_transactions(today: Date, connection: &Connection) -> Result<(), Error> {
    let customers = [
        CustomerInput {
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            gender_id: 1,
            date_of_birth: date!(1985 - 05 - 15),
            city: "New York".to_owned(),
            profession_id: 1,
        },
        CustomerInput {
            first_name: "Jane".to_owned(),
            last_name: "Smith".to_owned(),
            gender_id: 2,
            date_of_birth: date!(1990 - 08 - 22),
            city: "Los Angeles".to_owned(),
            profession_id: 3,
        },
    ];

    let customer_ids = customers
        .into_iter()
        .map(|input| create_customer(input, today, connection).map(|customer| customer.id))
        .collect::<Result<Vec<CustomerId>, Error>>()?;

    for sample in &SAMPLE_TRANSACTIONS {
        let input = TransactionInput {
            trans_num: None,
            amount: Decimal::new(sample.amount_cents, 2),
            date: today - Duration::days(sample.days_ago),
            time: sample.time,
            category_id: sample.category_id,
            customer_id: customer_ids[sample.customer],
        };

        insert_transaction(sample.trans_num, &input, connection)?;
    }

    tracing::info!(
        "Seeded {} customers and {} transactions",
        customer_ids.len(),
        SAMPLE_TRANSACTIONS.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        db::initialize,
        reference::{Category, Gender, Profession, count_rows},
        transaction::{count_transactions, get_recent_transactions, get_totals},
    };

    use super::seed_database;

    const TODAY: time::Date = date!(2025 - 03 - 31);

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn count_customers(connection: &Connection) -> i64 {
        crate::customer::count_customers(connection).unwrap()
    }

    #[test]
    fn seeds_empty_database() {
        let connection = get_test_connection();

        seed_database(TODAY, &connection).unwrap();

        assert_eq!(count_rows::<Gender>(&connection).unwrap(), 4);
        assert_eq!(count_rows::<Profession>(&connection).unwrap(), 8);
        assert_eq!(count_rows::<Category>(&connection).unwrap(), 15);
        assert_eq!(count_customers(&connection), 2);
        assert_eq!(count_transactions(&connection).unwrap(), 5);
    }

    #[test]
    fn seeding_twice_changes_nothing() {
        let connection = get_test_connection();

        seed_database(TODAY, &connection).unwrap();
        seed_database(TODAY, &connection).unwrap();

        assert_eq!(count_rows::<Gender>(&connection).unwrap(), 4);
        assert_eq!(count_rows::<Category>(&connection).unwrap(), 15);
        assert_eq!(count_customers(&connection), 2);
        assert_eq!(count_transactions(&connection).unwrap(), 5);
    }

    #[test]
    fn sample_amounts_net_to_expected_total() {
        let connection = get_test_connection();

        seed_database(TODAY, &connection).unwrap();

        let totals = get_totals(&connection).unwrap();
        assert_eq!(totals.net, Decimal::new(258_850, 2));
    }

    #[test]
    fn does_not_restore_samples_after_customers_are_deleted() {
        let connection = get_test_connection();
        seed_database(TODAY, &connection).unwrap();
        connection
            .execute_batch("DELETE FROM \"transaction\"; DELETE FROM customer;")
            .unwrap();

        seed_database(TODAY, &connection).unwrap();

        assert_eq!(count_customers(&connection), 0);
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[test]
    fn fills_missing_reference_table() {
        let connection = get_test_connection();
        seed_database(TODAY, &connection).unwrap();
        connection
            .execute_batch("DELETE FROM \"transaction\"; DELETE FROM customer; DELETE FROM gender;")
            .unwrap();

        seed_database(TODAY, &connection).unwrap();

        assert_eq!(count_rows::<Gender>(&connection).unwrap(), 4);
        assert_eq!(count_rows::<Profession>(&connection).unwrap(), 8);
        assert_eq!(count_customers(&connection), 2);
    }

    #[test]
    fn sample_transactions_are_dated_relative_to_today() {
        let connection = get_test_connection();

        seed_database(TODAY, &connection).unwrap();

        let mut dates: Vec<time::Date> = get_recent_transactions(10, &connection)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.date)
            .collect();
        dates.sort();
        assert_eq!(
            dates,
            [
                date!(2025 - 03 - 11),
                date!(2025 - 03 - 16),
                date!(2025 - 03 - 21),
                date!(2025 - 03 - 23),
                date!(2025 - 03 - 26),
            ]
        );
    }
}
