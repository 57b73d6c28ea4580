//! Database operations shared by all reference entities.
//!
//! Table and column names come from [ReferenceEntity] constants, never from
//! user input, so they are interpolated into the SQL directly.

use rusqlite::{Connection, Row};

use crate::{Error, database_id::DatabaseId, reference::ReferenceEntity};

/// The number of rows changed by an UPDATE or DELETE.
pub type RowsAffected = usize;

/// Initialize the table for `R`.
pub fn create_reference_table<R: ReferenceEntity>(
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (
            id INTEGER PRIMARY KEY,
            {label} TEXT NOT NULL
        );",
        table = R::TABLE,
        label = R::LABEL_COLUMN,
    ))
}

/// Insert an `R` with the already validated `label` and return it with its
/// generated ID.
pub fn insert<R: ReferenceEntity>(label: &str, connection: &Connection) -> Result<R, Error> {
    connection.execute(
        &format!(
            "INSERT INTO \"{}\" ({}) VALUES (?1);",
            R::TABLE,
            R::LABEL_COLUMN
        ),
        (label,),
    )?;

    Ok(R::new(connection.last_insert_rowid(), label.to_owned()))
}

/// Retrieve a single `R` by ID.
pub fn get<R: ReferenceEntity>(id: DatabaseId, connection: &Connection) -> Result<R, Error> {
    connection
        .prepare(&format!(
            "SELECT id, {} FROM \"{}\" WHERE id = :id;",
            R::LABEL_COLUMN,
            R::TABLE
        ))?
        .query_row(&[(":id", &id)], map_row::<R>)
        .map_err(Error::from)
}

/// Retrieve every `R` ordered by ID.
pub fn get_all<R: ReferenceEntity>(connection: &Connection) -> Result<Vec<R>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, {} FROM \"{}\" ORDER BY id ASC;",
            R::LABEL_COLUMN,
            R::TABLE
        ))?
        .query_map([], map_row::<R>)?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

/// Retrieve every `R` whose text contains `search` (ignoring ASCII case),
/// each paired with the number of rows that depend on it.
///
/// An empty `search` matches everything.
pub fn get_all_with_dependent_counts<R: ReferenceEntity>(
    search: &str,
    connection: &Connection,
) -> Result<Vec<(R, i64)>, Error> {
    connection
        .prepare(&format!(
            "SELECT r.id, r.{label}, COUNT(d.{dependent_column})
            FROM \"{table}\" r
            LEFT JOIN \"{dependent_table}\" d ON d.{dependent_column} = r.id
            WHERE instr(lower(r.{label}), lower(?1)) > 0
            GROUP BY r.id, r.{label}
            ORDER BY r.id ASC;",
            label = R::LABEL_COLUMN,
            table = R::TABLE,
            dependent_table = R::DEPENDENT_TABLE,
            dependent_column = R::DEPENDENT_COLUMN,
        ))?
        .query_map((search,), |row| Ok((map_row::<R>(row)?, row.get(2)?)))?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

/// Replace the text of the `R` with `id`.
///
/// Returns zero if there is no such row.
pub fn update<R: ReferenceEntity>(
    id: DatabaseId,
    label: &str,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            &format!(
                "UPDATE \"{}\" SET {} = ?1 WHERE id = ?2;",
                R::TABLE,
                R::LABEL_COLUMN
            ),
            (label, id),
        )
        .map_err(Error::from)
}

/// Delete the `R` with `id`.
///
/// Returns zero if there is no such row.
pub fn delete<R: ReferenceEntity>(
    id: DatabaseId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(&format!("DELETE FROM \"{}\" WHERE id = ?1;", R::TABLE), [id])
        .map_err(Error::from)
}

/// Whether an `R` with `id` exists.
pub fn exists<R: ReferenceEntity>(id: DatabaseId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE id = ?1);", R::TABLE),
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The number of rows that refer to the `R` with `id`.
pub fn count_dependents<R: ReferenceEntity>(
    id: DatabaseId,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM \"{}\" WHERE {} = ?1;",
                R::DEPENDENT_TABLE,
                R::DEPENDENT_COLUMN
            ),
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The number of rows in the table for `R`.
pub fn count<R: ReferenceEntity>(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(&format!("SELECT COUNT(*) FROM \"{}\";", R::TABLE), [], |row| {
            row.get(0)
        })
        .map_err(Error::from)
}

fn map_row<R: ReferenceEntity>(row: &Row) -> Result<R, rusqlite::Error> {
    let id = row.get(0)?;
    let label = row.get(1)?;

    Ok(R::new(id, label))
}
