//! Pokemon catalog: listing validation, query construction, storage
//! abstraction and the CRUD service.
//!
//! Listing path: [`listing::ListingValidator`] -> [`query::QuerySpec::build`]
//! -> [`repository::PokemonRepository::query`].
//! CRUD path: [`service::PokemonService`] -> existence guard -> repository write.

pub mod domain;
pub mod listing;
pub mod query;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::PokemonService;
