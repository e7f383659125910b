//! Service layer for the pokemon catalog.
//! - Validates listing requests against a closed pagination menu.
//! - Builds storage-agnostic query specifications.
//! - Orchestrates CRUD with audit stamping on top of `models`.

pub mod errors;
pub mod pagination;
pub mod pokemon;
#[cfg(test)]
pub mod test_support;
