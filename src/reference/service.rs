//! Reference data operations used by both the JSON API and the pages.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::DatabaseId,
    reference::{ReferenceEntity, db, domain::validate_label},
};

/// Every `R` ordered by ID.
pub fn list<R: ReferenceEntity>(connection: &Connection) -> Result<Vec<R>, Error> {
    db::get_all(connection)
}

/// Every `R` matching `search` with its number of dependents.
pub fn list_with_counts<R: ReferenceEntity>(
    search: &str,
    connection: &Connection,
) -> Result<Vec<(R, i64)>, Error> {
    db::get_all_with_dependent_counts(search.trim(), connection)
}

/// The `R` with `id`, or [Error::NotFound].
pub fn get<R: ReferenceEntity>(id: DatabaseId, connection: &Connection) -> Result<R, Error> {
    db::get(id, connection)
}

/// Validate `label` and store it as a new `R`.
pub fn create<R: ReferenceEntity>(label: &str, connection: &Connection) -> Result<R, Error> {
    let label = validate_label::<R>(label)?;

    db::insert(&label, connection)
}

/// Validate `label` and store it as the text of the `R` with `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no `R` with `id`.
pub fn update<R: ReferenceEntity>(
    id: DatabaseId,
    label: &str,
    connection: &Connection,
) -> Result<R, Error> {
    let label = validate_label::<R>(label)?;

    match db::update::<R>(id, &label, connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(R::new(id, label)),
    }
}

/// Delete the `R` with `id` if nothing refers to it.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no `R` with `id`, or
/// [Error::ReferentialConflict] if any dependent row refers to it.
pub fn delete<R: ReferenceEntity>(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    if !db::exists::<R>(id, connection)? {
        return Err(Error::NotFound);
    }

    if db::count_dependents::<R>(id, connection)? > 0 {
        return Err(Error::ReferentialConflict(format!(
            "Cannot delete {} with existing {}.",
            R::SINGULAR,
            R::DEPENDENTS
        )));
    }

    db::delete::<R>(id, connection)?;

    Ok(())
}
