use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::pagination::PaginationMenu;

use super::domain::{NewPokemon, Pokemon, PokemonAttributes, PokemonChanges, PokemonId, PokemonPatch, PrincipalId};
use super::listing::{ListingRequest, ListingValidator};
use super::query::QuerySpec;
use super::repository::PokemonRepository;

/// Catalog business service independent of web framework.
///
/// Edit and delete run an explicit two-step protocol: read the row, branch
/// on presence, then write. The two steps are not atomic; a concurrent
/// delete between them surfaces as `NotFound` from storage.
pub struct PokemonService<R: PokemonRepository + ?Sized> {
    repo: Arc<R>,
    validator: ListingValidator,
}

impl<R: PokemonRepository + ?Sized> PokemonService<R> {
    pub fn new(repo: Arc<R>, menu: PaginationMenu) -> Self {
        Self { repo, validator: ListingValidator::new(menu) }
    }

    pub fn validator(&self) -> &ListingValidator { &self.validator }

    /// Create a pokemon stamped with the calling principal.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::pagination::PaginationMenu;
    /// use service::pokemon::PokemonService;
    /// use service::pokemon::domain::PokemonAttributes;
    /// use service::pokemon::repository::memory::InMemoryPokemonRepository;
    ///
    /// let svc = PokemonService::new(Arc::new(InMemoryPokemonRepository::new()), PaginationMenu::default());
    /// let attrs = PokemonAttributes { name: "Pikachu".into(), height: 1, weight: 1, image: "https://x".into() };
    /// let p = tokio_test::block_on(svc.create(attrs, 1)).unwrap();
    /// assert_eq!((p.created_by, p.updated_by), (1, 1));
    /// ```
    #[instrument(skip(self, attributes), fields(name = %attributes.name))]
    pub async fn create(&self, attributes: PokemonAttributes, principal: PrincipalId) -> Result<Pokemon, ServiceError> {
        attributes.validate()?;
        let created = self.repo.create(NewPokemon::stamped(attributes, principal)).await?;
        info!(pokemon_id = created.id, principal, "pokemon_created");
        Ok(created)
    }

    /// Validate a listing request, build its query and return the rows in
    /// storage order. `None` lists with the menu defaults.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::pagination::PaginationMenu;
    /// use service::pokemon::PokemonService;
    /// use service::pokemon::listing::ListingRequest;
    /// use service::pokemon::repository::memory::InMemoryPokemonRepository;
    ///
    /// let svc = PokemonService::new(Arc::new(InMemoryPokemonRepository::new()), PaginationMenu::default());
    /// assert!(tokio_test::block_on(svc.list(None)).unwrap().is_empty());
    /// assert!(tokio_test::block_on(svc.list(Some(&ListingRequest::page(15, 0)))).is_err());
    /// ```
    #[instrument(skip(self, request))]
    pub async fn list(&self, request: Option<&ListingRequest>) -> Result<Vec<Pokemon>, ServiceError> {
        let listing = self.validator.validate(request)?;
        let spec = QuerySpec::build(&listing);
        debug!(?spec, "pokemon_query_built");
        let rows = self.repo.query(&spec).await?;
        debug!(returned = rows.len(), "pokemon_listed");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: PokemonId) -> Result<Pokemon, ServiceError> {
        self.require_existing(id).await
    }

    /// Apply the present fields of `patch` and stamp `updated_by`, even when
    /// the patch is empty. Any authenticated principal may edit any row.
    #[instrument(skip(self, patch))]
    pub async fn edit_by_id(&self, id: PokemonId, principal: PrincipalId, patch: PokemonPatch) -> Result<Pokemon, ServiceError> {
        patch.validate()?;
        let existing = self.require_existing(id).await?;
        if patch.is_empty() {
            debug!(pokemon_id = id, "empty patch; stamping updated_by only");
        }
        let updated = self.repo.update(existing.id, PokemonChanges { patch, updated_by: principal }).await?;
        info!(pokemon_id = id, principal, created_by = updated.created_by, "pokemon_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: PokemonId) -> Result<(), ServiceError> {
        let existing = self.require_existing(id).await?;
        self.repo.delete(existing.id).await?;
        info!(pokemon_id = id, "pokemon_deleted");
        Ok(())
    }

    /// Existence guard shared by get, edit and delete.
    async fn require_existing(&self, id: PokemonId) -> Result<Pokemon, ServiceError> {
        match self.repo.find_by_id(id).await? {
            Some(p) => Ok(p),
            None => {
                debug!(pokemon_id = id, "pokemon_missing");
                Err(ServiceError::pokemon_not_found())
            }
        }
    }
}
