use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Catalog entry. `id` is assigned by the database sequence and never
/// written by application code.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pokemon")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub image: String,
    pub created_by: i32,
    pub updated_by: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_IMAGE_LEN: usize = 2048;

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name should not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(errors::ModelError::Validation(format!("name must be at most {MAX_NAME_LEN} characters")));
    }
    Ok(())
}

/// Accepts absolute http(s) URLs with a non-empty host.
pub fn validate_image_url(image: &str) -> Result<(), errors::ModelError> {
    let rest = image
        .strip_prefix("https://")
        .or_else(|| image.strip_prefix("http://"))
        .ok_or_else(|| errors::ModelError::Validation("image must be a URL address".into()))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || image.chars().any(char::is_whitespace) {
        return Err(errors::ModelError::Validation("image must be a URL address".into()));
    }
    if image.len() > MAX_IMAGE_LEN {
        return Err(errors::ModelError::Validation(format!("image must be at most {MAX_IMAGE_LEN} characters")));
    }
    Ok(())
}

/// Insert a new row with both audit columns stamped by the caller.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    height: i32,
    weight: i32,
    image: &str,
    created_by: i32,
    updated_by: i32,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_image_url(image)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: sea_orm::NotSet,
        name: Set(name.to_string()),
        height: Set(height),
        weight: Set(weight),
        image: Set(image.to_string()),
        created_by: Set(created_by),
        updated_by: Set(updated_by),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
