//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a customer.
pub type CustomerId = DatabaseId;

/// The primary key of a transaction, e.g. "TR-20250101-123456".
pub type TransactionNumber = String;
