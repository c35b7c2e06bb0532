//! Service layer for the coffee catalog.
//! - `coffee::repository` defines the record store contract.
//! - `coffee::repo` holds the SQLite and Airtable implementations.
//! - `coffee::service` applies validation and turns missing records into errors.

pub mod errors;
pub mod coffee;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
