//! Core customer types, validation and derived fields.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CustomerId, DatabaseId},
    time_format::iso_date,
};

/// The maximum number of characters in a customer's names and city.
pub const MAX_TEXT_LENGTH: usize = 100;

/// The customer fields sent by clients when creating or updating a customer.
///
/// Read-only fields in the body, e.g. `fullName`, are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub gender_id: DatabaseId,
    #[serde(with = "iso_date")]
    pub date_of_birth: Date,
    pub city: String,
    pub profession_id: DatabaseId,
}

impl CustomerInput {
    /// Check the text fields and trim surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] naming the first text field that is blank
    /// or longer than [MAX_TEXT_LENGTH] characters.
    pub fn validate(self) -> Result<Self, Error> {
        Ok(Self {
            first_name: validate_text("First name", &self.first_name)?,
            last_name: validate_text("Last name", &self.last_name)?,
            city: validate_text("City", &self.city)?,
            ..self
        })
    }
}

fn validate_text(field: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::Validation(format!("{field} is required.")));
    }

    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(Error::Validation(format!(
            "{field} must be at most {MAX_TEXT_LENGTH} characters long."
        )));
    }

    Ok(value.to_owned())
}

/// A stored customer joined with the text of its gender and profession.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub gender_id: DatabaseId,
    pub date_of_birth: Date,
    pub city: String,
    pub profession_id: DatabaseId,
    pub gender_name: String,
    pub profession_description: String,
}

/// A customer as sent to clients, with its display fields and derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub gender_id: DatabaseId,
    #[serde(with = "iso_date")]
    pub date_of_birth: Date,
    pub city: String,
    pub profession_id: DatabaseId,
    pub gender_name: Option<String>,
    pub profession_description: Option<String>,
    pub full_name: String,
    pub age: i32,
}

impl Customer {
    /// Build the transfer object, computing the age as of `today`.
    pub fn into_dto(self, today: Date) -> CustomerDto {
        CustomerDto {
            full_name: full_name(&self.first_name, &self.last_name),
            age: age_on(self.date_of_birth, today),
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            gender_id: self.gender_id,
            date_of_birth: self.date_of_birth,
            city: self.city,
            profession_id: self.profession_id,
            gender_name: Some(self.gender_name),
            profession_description: Some(self.profession_description),
        }
    }
}

/// The first and last name separated by a space.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

/// The number of whole years between `date_of_birth` and `today`.
///
/// The birthday has to have happened this year for it to count, so someone
/// born on the 29th of February turns a year older on the 1st of March in
/// non-leap years.
pub fn age_on(date_of_birth: Date, today: Date) -> i32 {
    let age = today.year() - date_of_birth.year();
    let birthday_passed = (today.month() as u8, today.day())
        >= (date_of_birth.month() as u8, date_of_birth.day());

    if birthday_passed { age } else { age - 1 }
}
