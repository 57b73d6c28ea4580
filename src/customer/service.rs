//! Customer operations used by both the JSON API and the pages.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    customer::{
        db,
        domain::{CustomerDto, CustomerInput},
    },
    database_id::CustomerId,
};

/// Every customer ordered by ID, with ages as of `today`.
pub fn list_all(today: Date, connection: &Connection) -> Result<Vec<CustomerDto>, Error> {
    Ok(db::get_all(connection)?
        .into_iter()
        .map(|customer| customer.into_dto(today))
        .collect())
}

/// The customers whose names or city contain `query`, ignoring case.
///
/// A blank `query` returns every customer.
pub fn search(
    query: &str,
    today: Date,
    connection: &Connection,
) -> Result<Vec<CustomerDto>, Error> {
    let query = query.trim();

    if query.is_empty() {
        return list_all(today, connection);
    }

    Ok(db::search(query, connection)?
        .into_iter()
        .map(|customer| customer.into_dto(today))
        .collect())
}

/// The customer with `id`, or [Error::NotFound].
pub fn get_by_id(id: CustomerId, today: Date, connection: &Connection) -> Result<CustomerDto, Error> {
    db::get(id, connection).map(|customer| customer.into_dto(today))
}

/// Validate and store a new customer, returning it with its display fields.
///
/// # Errors
///
/// Returns [Error::Validation] for bad text fields or
/// [Error::InvalidForeignKey] if the gender or profession does not exist.
pub fn create(
    input: CustomerInput,
    today: Date,
    connection: &Connection,
) -> Result<CustomerDto, Error> {
    let input = input.validate()?;
    let id = db::insert(&input, connection)?;

    get_by_id(id, today, connection)
}

/// Validate `input` and overwrite the customer with `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no customer with `id`, otherwise the
/// same errors as [create].
pub fn update(
    id: CustomerId,
    input: CustomerInput,
    today: Date,
    connection: &Connection,
) -> Result<CustomerDto, Error> {
    let input = input.validate()?;

    match db::update(id, &input, connection)? {
        0 => Err(Error::NotFound),
        _ => get_by_id(id, today, connection),
    }
}

/// Delete the customer with `id` if it has no transactions.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no customer with `id`, or
/// [Error::ReferentialConflict] if any transaction belongs to the customer.
pub fn delete(id: CustomerId, connection: &Connection) -> Result<(), Error> {
    if !db::exists(id, connection)? {
        return Err(Error::NotFound);
    }

    if db::count_transactions(id, connection)? > 0 {
        return Err(Error::ReferentialConflict(
            "Cannot delete customer with existing transactions.".to_owned(),
        ));
    }

    db::delete(id, connection)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        customer::domain::CustomerInput,
        initialize_db,
        reference::{Category, Gender, Profession, insert as insert_reference},
    };

    use super::{create, delete, get_by_id, list_all, search, update};

    const TODAY: time::Date = date!(2025 - 05 - 01);

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        insert_reference::<Gender>("Female", &connection).unwrap();
        insert_reference::<Profession>("Teacher", &connection).unwrap();
        insert_reference::<Category>("Salary", &connection).unwrap();
        connection
    }

    fn jane() -> CustomerInput {
        CustomerInput {
            first_name: "Jane".to_owned(),
            last_name: "Smith".to_owned(),
            gender_id: 1,
            date_of_birth: date!(1990 - 08 - 22),
            city: "Los Angeles".to_owned(),
            profession_id: 1,
        }
    }

    #[test]
    fn create_returns_dto_with_derived_fields() {
        let connection = get_test_connection();

        let got = create(jane(), TODAY, &connection).unwrap();

        assert_eq!(got.id, 1);
        assert_eq!(got.full_name, "Jane Smith");
        assert_eq!(got.age, 34);
        assert_eq!(got.gender_name.as_deref(), Some("Female"));
        assert_eq!(got.profession_description.as_deref(), Some("Teacher"));
    }

    #[test]
    fn create_rejects_invalid_input_without_storing() {
        let connection = get_test_connection();

        let result = create(
            CustomerInput {
                first_name: String::new(),
                ..jane()
            },
            TODAY,
            &connection,
        );

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(list_all(TODAY, &connection).unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_fields() {
        let connection = get_test_connection();
        let created = create(jane(), TODAY, &connection).unwrap();

        let got = update(
            created.id,
            CustomerInput {
                last_name: "Jones".to_owned(),
                ..jane()
            },
            TODAY,
            &connection,
        )
        .unwrap();

        assert_eq!(got.full_name, "Jane Jones");
        assert_eq!(get_by_id(created.id, TODAY, &connection), Ok(got));
    }

    #[test]
    fn update_missing_customer_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            update(3, jane(), TODAY, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn blank_search_lists_everyone() {
        let connection = get_test_connection();
        create(jane(), TODAY, &connection).unwrap();

        assert_eq!(search("  ", TODAY, &connection).unwrap().len(), 1);
        assert_eq!(search("angeles", TODAY, &connection).unwrap().len(), 1);
        assert!(search("Tokyo", TODAY, &connection).unwrap().is_empty());
    }

    #[test]
    fn delete_is_blocked_by_transactions() {
        let connection = get_test_connection();
        let created = create(jane(), TODAY, &connection).unwrap();
        connection
            .execute(
                "INSERT INTO \"transaction\" (trans_num, amount_cents, date, time, category_id, customer_id)
                VALUES ('TR-1', 120000, '2025-04-01', '09:00:00', 1, ?1)",
                [created.id],
            )
            .unwrap();

        assert_eq!(
            delete(created.id, &connection),
            Err(Error::ReferentialConflict(
                "Cannot delete customer with existing transactions.".to_owned()
            ))
        );
        assert!(get_by_id(created.id, TODAY, &connection).is_ok());
    }

    #[test]
    fn delete_removes_customer() {
        let connection = get_test_connection();
        let created = create(jane(), TODAY, &connection).unwrap();

        assert_eq!(delete(created.id, &connection), Ok(()));
        assert_eq!(delete(created.id, &connection), Err(Error::NotFound));
    }
}
