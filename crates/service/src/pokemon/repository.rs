use async_trait::async_trait;

use crate::errors::ServiceError;

use super::domain::{NewPokemon, Pokemon, PokemonChanges, PokemonId};
use super::query::QuerySpec;

/// Storage collaborator for the pokemon catalog.
///
/// Implementations own identity assignment, ordering and windowing. They
/// do not re-check existence; callers that need the not-found guard run
/// it through [`super::PokemonService`].
#[async_trait]
pub trait PokemonRepository: Send + Sync {
    async fn create(&self, record: NewPokemon) -> Result<Pokemon, ServiceError>;
    async fn find_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, ServiceError>;
    async fn update(&self, id: PokemonId, changes: PokemonChanges) -> Result<Pokemon, ServiceError>;
    async fn delete(&self, id: PokemonId) -> Result<(), ServiceError>;
    /// Rows matching every predicate, sorted and windowed per `spec`.
    async fn query(&self, spec: &QuerySpec) -> Result<Vec<Pokemon>, ServiceError>;
}

/// In-process repository used by tests, benches and local demos.
pub mod memory {
    use super::*;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    use crate::pokemon::query::{NumericAttribute, Predicate, SortDirection, SortKey, TextAttribute};

    #[derive(Default)]
    struct Table {
        next_id: PokemonId,
        rows: BTreeMap<PokemonId, Pokemon>,
    }

    #[derive(Default)]
    pub struct InMemoryPokemonRepository {
        table: Mutex<Table>,
        writes: AtomicUsize,
    }

    impl InMemoryPokemonRepository {
        pub fn new() -> Self { Self::default() }

        /// Number of create/update/delete calls that reached this store.
        pub fn write_count(&self) -> usize { self.writes.load(AtomicOrdering::SeqCst) }

        pub fn len(&self) -> Result<usize, ServiceError> { Ok(self.lock()?.rows.len()) }

        pub fn is_empty(&self) -> Result<bool, ServiceError> { Ok(self.len()? == 0) }

        fn lock(&self) -> Result<MutexGuard<'_, Table>, ServiceError> {
            self.table.lock().map_err(|e| ServiceError::storage(format!("pokemon table poisoned: {e}")))
        }
    }

    fn matches(row: &Pokemon, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Equals { attribute: TextAttribute::Name, value } => row.name == *value,
            Predicate::Between { attribute: NumericAttribute::Height, range } => range.contains(row.height),
            Predicate::Between { attribute: NumericAttribute::Weight, range } => range.contains(row.weight),
        }
    }

    fn compare(a: &Pokemon, b: &Pokemon, key: SortKey) -> Ordering {
        match key {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Height => a.height.cmp(&b.height),
            SortKey::Weight => a.weight.cmp(&b.weight),
        }
    }

    #[async_trait]
    impl PokemonRepository for InMemoryPokemonRepository {
        async fn create(&self, record: NewPokemon) -> Result<Pokemon, ServiceError> {
            self.writes.fetch_add(1, AtomicOrdering::SeqCst);
            let mut table = self.lock()?;
            table.next_id += 1;
            let now = Utc::now().into();
            let row = Pokemon {
                id: table.next_id,
                name: record.attributes.name,
                height: record.attributes.height,
                weight: record.attributes.weight,
                image: record.attributes.image,
                created_by: record.created_by,
                updated_by: record.updated_by,
                created_at: now,
                updated_at: now,
            };
            table.rows.insert(row.id, row.clone());
            Ok(row)
        }

        async fn find_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, ServiceError> {
            Ok(self.lock()?.rows.get(&id).cloned())
        }

        async fn update(&self, id: PokemonId, changes: PokemonChanges) -> Result<Pokemon, ServiceError> {
            self.writes.fetch_add(1, AtomicOrdering::SeqCst);
            let mut table = self.lock()?;
            let row = table.rows.get_mut(&id).ok_or_else(ServiceError::pokemon_not_found)?;
            changes.patch.apply_to(row);
            row.updated_by = changes.updated_by;
            row.updated_at = Utc::now().into();
            Ok(row.clone())
        }

        async fn delete(&self, id: PokemonId) -> Result<(), ServiceError> {
            self.writes.fetch_add(1, AtomicOrdering::SeqCst);
            self.lock()?.rows.remove(&id);
            Ok(())
        }

        async fn query(&self, spec: &QuerySpec) -> Result<Vec<Pokemon>, ServiceError> {
            let table = self.lock()?;
            let mut rows: Vec<Pokemon> = table
                .rows
                .values()
                .filter(|row| spec.predicates().iter().all(|p| matches(row, p)))
                .cloned()
                .collect();
            let sort = spec.sort();
            rows.sort_by(|a, b| {
                let ord = compare(a, b, sort.key);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
            let window = spec.window();
            let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
            let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
            Ok(rows.into_iter().skip(offset).take(limit).collect())
        }
    }

}
