use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, Order, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, Unchanged,
};

use models::pokemon;

use crate::errors::ServiceError;
use crate::pokemon::domain::{NewPokemon, Pokemon, PokemonChanges, PokemonId};
use crate::pokemon::query::{NumericAttribute, Predicate, QuerySpec, SortDirection, SortKey, TextAttribute};
use crate::pokemon::repository::PokemonRepository;

pub struct SeaOrmPokemonRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmPokemonRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn text_column(attribute: TextAttribute) -> pokemon::Column {
    match attribute {
        TextAttribute::Name => pokemon::Column::Name,
    }
}

fn numeric_column(attribute: NumericAttribute) -> pokemon::Column {
    match attribute {
        NumericAttribute::Height => pokemon::Column::Height,
        NumericAttribute::Weight => pokemon::Column::Weight,
    }
}

fn sort_column(key: SortKey) -> pokemon::Column {
    match key {
        SortKey::Id => pokemon::Column::Id,
        SortKey::Name => pokemon::Column::Name,
        SortKey::Height => pokemon::Column::Height,
        SortKey::Weight => pokemon::Column::Weight,
    }
}

/// Render a [`QuerySpec`] as a SeaORM select over the pokemon table.
pub fn select_for(spec: &QuerySpec) -> Select<pokemon::Entity> {
    let mut select = pokemon::Entity::find();
    for predicate in spec.predicates() {
        select = match predicate {
            Predicate::Equals { attribute, value } => select.filter(text_column(*attribute).eq(value.clone())),
            Predicate::Between { attribute, range } => {
                let col = numeric_column(*attribute);
                select.filter(col.gte(range.min)).filter(col.lte(range.max))
            }
        };
    }
    let sort = spec.sort();
    let order = match sort.direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    };
    let window = spec.window();
    select.order_by(sort_column(sort.key), order).offset(window.offset).limit(window.limit)
}

#[async_trait]
impl PokemonRepository for SeaOrmPokemonRepository {
    async fn create(&self, record: NewPokemon) -> Result<Pokemon, ServiceError> {
        let attrs = record.attributes;
        let created = pokemon::create(
            &self.db,
            &attrs.name,
            attrs.height,
            attrs.weight,
            &attrs.image,
            record.created_by,
            record.updated_by,
        )
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, ServiceError> {
        pokemon::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::storage)
    }

    async fn update(&self, id: PokemonId, changes: PokemonChanges) -> Result<Pokemon, ServiceError> {
        let patch = changes.patch;
        let am = pokemon::ActiveModel {
            id: Unchanged(id),
            name: patch.name.map(Set).unwrap_or(NotSet),
            height: patch.height.map(Set).unwrap_or(NotSet),
            weight: patch.weight.map(Set).unwrap_or(NotSet),
            image: patch.image.map(Set).unwrap_or(NotSet),
            created_by: NotSet,
            updated_by: Set(changes.updated_by),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        };
        am.update(&self.db).await.map_err(|e| match e {
            // Row removed between the existence check and this write.
            DbErr::RecordNotUpdated => ServiceError::pokemon_not_found(),
            other => ServiceError::storage(other),
        })
    }

    async fn delete(&self, id: PokemonId) -> Result<(), ServiceError> {
        pokemon::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    async fn query(&self, spec: &QuerySpec) -> Result<Vec<Pokemon>, ServiceError> {
        select_for(spec).all(&self.db).await.map_err(ServiceError::storage)
    }
}
