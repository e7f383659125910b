use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use serde::Serialize;
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub service: String, pub version: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDoc {
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub image: String,
    pub created_by: i32,
    pub updated_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreatePokemonDoc { pub name: String, pub height: i32, pub weight: i32, pub image: String }

#[derive(ToSchema)]
pub struct EditPokemonDoc {
    pub name: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub image: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RangeDoc { pub min: i32, pub max: i32 }

/// `take` ∈ {10, 20, 50}, `skip` ∈ {0, 10, 20, 50} with the default menu.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequestDoc {
    pub take: u64,
    pub skip: u64,
    #[schema(example = "id")]
    pub order_by: Option<String>,
    #[schema(example = "asc")]
    pub order: Option<String>,
    pub pokemon_name_filter: Option<String>,
    pub pokemon_height_range: Option<RangeDoc>,
    pub pokemon_weight_range: Option<RangeDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBodyDoc { pub status_code: u16, pub error: String, pub message: String }

pub struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::pokemons::create,
        crate::routes::pokemons::list,
        crate::routes::pokemons::get,
        crate::routes::pokemons::edit,
        crate::routes::pokemons::delete,
    ),
    components(
        schemas(
            HealthResponse,
            PokemonDoc,
            CreatePokemonDoc,
            EditPokemonDoc,
            RangeDoc,
            ListingRequestDoc,
            ErrorBodyDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "pokemons")
    )
)]
pub struct ApiDoc;
