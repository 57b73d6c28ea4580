//! Customer persistence.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    customer::domain::{Customer, CustomerInput},
    database_id::CustomerId,
};

/// The number of rows changed by an UPDATE or DELETE.
pub type RowsAffected = usize;

const SELECT_CUSTOMER: &str = "SELECT c.id, c.first_name, c.last_name, c.gender_id,
    c.date_of_birth, c.city, c.profession_id, g.name, p.description
    FROM customer c
    INNER JOIN gender g ON g.id = c.gender_id
    INNER JOIN profession p ON p.id = c.profession_id";

/// Create the customer table.
///
/// The gender and profession tables must exist first.
pub fn create_customer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS customer (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            gender_id INTEGER NOT NULL,
            date_of_birth TEXT NOT NULL,
            city TEXT NOT NULL,
            profession_id INTEGER NOT NULL,
            FOREIGN KEY(gender_id) REFERENCES gender(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(profession_id) REFERENCES profession(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_customer_gender_id ON customer(gender_id);
        CREATE INDEX IF NOT EXISTS idx_customer_profession_id ON customer(profession_id);",
    )
}

/// Insert a validated customer and return its ID.
///
/// # Errors
///
/// Returns [Error::InvalidForeignKey] if the gender or profession does not exist.
pub fn insert(input: &CustomerInput, connection: &Connection) -> Result<CustomerId, Error> {
    connection.execute(
        "INSERT INTO customer (first_name, last_name, gender_id, date_of_birth, city, profession_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            input.first_name,
            input.last_name,
            input.gender_id,
            input.date_of_birth,
            input.city,
            input.profession_id,
        ],
    )?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve the customer with `id` and its display fields.
pub fn get(id: CustomerId, connection: &Connection) -> Result<Customer, Error> {
    connection
        .prepare(&format!("{SELECT_CUSTOMER} WHERE c.id = :id;"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(Error::from)
}

/// Retrieve every customer ordered by ID.
pub fn get_all(connection: &Connection) -> Result<Vec<Customer>, Error> {
    connection
        .prepare(&format!("{SELECT_CUSTOMER} ORDER BY c.id ASC;"))?
        .query_map([], map_row)?
        .map(|maybe_customer| maybe_customer.map_err(Error::from))
        .collect()
}

/// Retrieve the customers whose first name, last name or city contains
/// `search`, ignoring ASCII case.
pub fn search(search: &str, connection: &Connection) -> Result<Vec<Customer>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_CUSTOMER}
            WHERE instr(lower(c.first_name), lower(?1)) > 0
                OR instr(lower(c.last_name), lower(?1)) > 0
                OR instr(lower(c.city), lower(?1)) > 0
            ORDER BY c.id ASC;"
        ))?
        .query_map((search,), map_row)?
        .map(|maybe_customer| maybe_customer.map_err(Error::from))
        .collect()
}

/// Overwrite every mutable field of the customer with `id`.
///
/// Returns zero if there is no such customer.
pub fn update(
    id: CustomerId,
    input: &CustomerInput,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE customer
            SET first_name = ?1, last_name = ?2, gender_id = ?3,
                date_of_birth = ?4, city = ?5, profession_id = ?6
            WHERE id = ?7;",
            params![
                input.first_name,
                input.last_name,
                input.gender_id,
                input.date_of_birth,
                input.city,
                input.profession_id,
                id,
            ],
        )
        .map_err(Error::from)
}

/// Delete the customer with `id`.
///
/// Returns zero if there is no such customer.
pub fn delete(id: CustomerId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM customer WHERE id = ?1;", [id])
        .map_err(Error::from)
}

/// Whether a customer with `id` exists.
pub fn exists(id: CustomerId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM customer WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The number of transactions that belong to the customer with `id`.
pub fn count_transactions(id: CustomerId, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM \"transaction\" WHERE customer_id = ?1;",
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The number of customers.
pub fn count(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM customer;", [], |row| row.get(0))
        .map_err(Error::from)
}

fn map_row(row: &Row) -> Result<Customer, rusqlite::Error> {
    Ok(Customer {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        gender_id: row.get(3)?,
        date_of_birth: row.get(4)?,
        city: row.get(5)?,
        profession_id: row.get(6)?,
        gender_name: row.get(7)?,
        profession_description: row.get(8)?,
    })
}
