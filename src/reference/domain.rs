//! The reference entities and the trait that lets them share one implementation.

use std::fmt::Debug;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, database_id::DatabaseId, endpoints};

/// A lookup table with an integer ID and a single required text column that
/// other rows refer to by ID.
///
/// Implementors describe where they are stored and which rows depend on them;
/// the queries, handlers and pages are shared.
pub trait ReferenceEntity:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// The table the entity is stored in.
    const TABLE: &'static str;
    /// The text column, e.g. "name" for genders.
    const LABEL_COLUMN: &'static str;
    /// How the text column is shown to users, e.g. "Name".
    const LABEL: &'static str;
    /// The maximum number of characters allowed in the text column.
    const MAX_LENGTH: usize;
    /// The entity name used in messages, e.g. "gender".
    const SINGULAR: &'static str;
    /// The page title for the list of entities, e.g. "Genders".
    const TITLE: &'static str;
    /// The table holding rows that refer to this entity.
    const DEPENDENT_TABLE: &'static str;
    /// The column in [Self::DEPENDENT_TABLE] holding this entity's ID.
    const DEPENDENT_COLUMN: &'static str;
    /// The dependents named in messages, e.g. "customers".
    const DEPENDENTS: &'static str;

    /// The JSON collection route.
    const API_ENDPOINT: &'static str;
    /// The JSON route for a single entity.
    const API_ITEM_ENDPOINT: &'static str;
    /// The list page, which also accepts the create form.
    const VIEW_ENDPOINT: &'static str;
    /// The form route for updating and deleting a single entity.
    const ITEM_VIEW_ENDPOINT: &'static str;
    /// The edit page for a single entity.
    const EDIT_VIEW_ENDPOINT: &'static str;

    /// Create the entity from its stored values.
    fn new(id: DatabaseId, label: String) -> Self;

    /// The ID, if known.
    fn id(&self) -> Option<DatabaseId>;

    /// The text column's value.
    fn label(&self) -> &str;
}

/// Check that `label` is usable as the text of an `R`.
///
/// Surrounding whitespace is removed.
///
/// # Errors
///
/// Returns [Error::Validation] if `label` is blank or longer than
/// [ReferenceEntity::MAX_LENGTH] characters.
pub fn validate_label<R: ReferenceEntity>(label: &str) -> Result<String, Error> {
    let label = label.trim();

    if label.is_empty() {
        return Err(Error::Validation(format!("{} is required.", R::LABEL)));
    }

    if label.chars().count() > R::MAX_LENGTH {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters long.",
            R::LABEL,
            R::MAX_LENGTH
        )));
    }

    Ok(label.to_owned())
}

/// A customer's gender, e.g. "Female".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gender {
    #[serde(default)]
    pub id: Option<DatabaseId>,
    pub name: String,
}

impl ReferenceEntity for Gender {
    const TABLE: &'static str = "gender";
    const LABEL_COLUMN: &'static str = "name";
    const LABEL: &'static str = "Name";
    const MAX_LENGTH: usize = 20;
    const SINGULAR: &'static str = "gender";
    const TITLE: &'static str = "Genders";
    const DEPENDENT_TABLE: &'static str = "customer";
    const DEPENDENT_COLUMN: &'static str = "gender_id";
    const DEPENDENTS: &'static str = "customers";

    const API_ENDPOINT: &'static str = endpoints::GENDERS_API;
    const API_ITEM_ENDPOINT: &'static str = endpoints::GENDER_API;
    const VIEW_ENDPOINT: &'static str = endpoints::GENDERS_VIEW;
    const ITEM_VIEW_ENDPOINT: &'static str = endpoints::GENDER_VIEW;
    const EDIT_VIEW_ENDPOINT: &'static str = endpoints::EDIT_GENDER_VIEW;

    fn new(id: DatabaseId, label: String) -> Self {
        Self {
            id: Some(id),
            name: label,
        }
    }

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// A customer's occupation, e.g. "Teacher".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    #[serde(default)]
    pub id: Option<DatabaseId>,
    pub description: String,
}

impl ReferenceEntity for Profession {
    const TABLE: &'static str = "profession";
    const LABEL_COLUMN: &'static str = "description";
    const LABEL: &'static str = "Description";
    const MAX_LENGTH: usize = 300;
    const SINGULAR: &'static str = "profession";
    const TITLE: &'static str = "Professions";
    const DEPENDENT_TABLE: &'static str = "customer";
    const DEPENDENT_COLUMN: &'static str = "profession_id";
    const DEPENDENTS: &'static str = "customers";

    const API_ENDPOINT: &'static str = endpoints::PROFESSIONS_API;
    const API_ITEM_ENDPOINT: &'static str = endpoints::PROFESSION_API;
    const VIEW_ENDPOINT: &'static str = endpoints::PROFESSIONS_VIEW;
    const ITEM_VIEW_ENDPOINT: &'static str = endpoints::PROFESSION_VIEW;
    const EDIT_VIEW_ENDPOINT: &'static str = endpoints::EDIT_PROFESSION_VIEW;

    fn new(id: DatabaseId, label: String) -> Self {
        Self {
            id: Some(id),
            description: label,
        }
    }

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }

    fn label(&self) -> &str {
        &self.description
    }
}

/// A spending or income category for transactions, e.g. "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<DatabaseId>,
    pub description: String,
}

impl ReferenceEntity for Category {
    const TABLE: &'static str = "category";
    const LABEL_COLUMN: &'static str = "description";
    const LABEL: &'static str = "Description";
    const MAX_LENGTH: usize = 200;
    const SINGULAR: &'static str = "category";
    const TITLE: &'static str = "Categories";
    const DEPENDENT_TABLE: &'static str = "transaction";
    const DEPENDENT_COLUMN: &'static str = "category_id";
    const DEPENDENTS: &'static str = "transactions";

    const API_ENDPOINT: &'static str = endpoints::CATEGORIES_API;
    const API_ITEM_ENDPOINT: &'static str = endpoints::CATEGORY_API;
    const VIEW_ENDPOINT: &'static str = endpoints::CATEGORIES_VIEW;
    const ITEM_VIEW_ENDPOINT: &'static str = endpoints::CATEGORY_VIEW;
    const EDIT_VIEW_ENDPOINT: &'static str = endpoints::EDIT_CATEGORY_VIEW;

    fn new(id: DatabaseId, label: String) -> Self {
        Self {
            id: Some(id),
            description: label,
        }
    }

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }

    fn label(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod validate_label_tests {
    use crate::{
        Error,
        reference::{Category, Gender, Profession},
    };

    use super::validate_label;

    #[test]
    fn fails_on_empty_string() {
        assert_eq!(
            validate_label::<Gender>(""),
            Err(Error::Validation("Name is required.".to_owned()))
        );
    }

    #[test]
    fn fails_on_just_whitespace() {
        assert_eq!(
            validate_label::<Category>("\n\t \r"),
            Err(Error::Validation("Description is required.".to_owned()))
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            validate_label::<Gender>("  Female "),
            Ok("Female".to_owned())
        );
    }

    #[test]
    fn enforces_max_length_per_entity() {
        assert!(validate_label::<Gender>(&"a".repeat(20)).is_ok());
        assert_eq!(
            validate_label::<Gender>(&"a".repeat(21)),
            Err(Error::Validation(
                "Name must be at most 20 characters long.".to_owned()
            ))
        );
        assert!(validate_label::<Profession>(&"a".repeat(300)).is_ok());
        assert!(validate_label::<Profession>(&"a".repeat(301)).is_err());
        assert!(validate_label::<Category>(&"a".repeat(200)).is_ok());
        assert!(validate_label::<Category>(&"a".repeat(201)).is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(validate_label::<Gender>(&"é".repeat(20)).is_ok());
    }
}
