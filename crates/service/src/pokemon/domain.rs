use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// The stored resource as returned to callers.
pub type Pokemon = models::pokemon::Model;

/// Storage-assigned identity.
pub type PokemonId = i32;

/// Identifier of the authenticated caller, supplied by the auth layer.
pub type PrincipalId = i32;

/// Full attribute set required to create a pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonAttributes {
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub image: String,
}

impl PokemonAttributes {
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::pokemon::validate_name(&self.name)?;
        models::pokemon::validate_image_url(&self.image)?;
        Ok(())
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl PokemonPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(name) = &self.name {
            models::pokemon::validate_name(name)?;
        }
        if let Some(image) = &self.image {
            models::pokemon::validate_image_url(image)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.height.is_none() && self.weight.is_none() && self.image.is_none()
    }

    /// Overlay the present fields onto `target`.
    pub fn apply_to(&self, target: &mut Pokemon) {
        if let Some(name) = &self.name { target.name = name.clone(); }
        if let Some(height) = self.height { target.height = height; }
        if let Some(weight) = self.weight { target.weight = weight; }
        if let Some(image) = &self.image { target.image = image.clone(); }
    }
}

/// Insert payload handed to storage: attributes plus both audit stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPokemon {
    pub attributes: PokemonAttributes,
    pub created_by: PrincipalId,
    pub updated_by: PrincipalId,
}

impl NewPokemon {
    /// The creating write stamps the same principal into both audit fields.
    pub fn stamped(attributes: PokemonAttributes, principal: PrincipalId) -> Self {
        Self { attributes, created_by: principal, updated_by: principal }
    }
}

/// Update payload handed to storage. `updated_by` is always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonChanges {
    pub patch: PokemonPatch,
    pub updated_by: PrincipalId,
}
