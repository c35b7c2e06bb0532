//! OpenAPI document served at `/openapi.json`.
//!
//! The `*Doc` types mirror the wire shapes for schema generation only.

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// A coffee as returned by the API. `id` is an integer (SQLite) or a record id string (Airtable).
#[derive(ToSchema)]
pub struct CoffeeDoc {
    #[schema(value_type = Object, example = 1)]
    pub id: Option<serde_json::Value>,
    #[schema(example = "Espresso")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "/static/espresso.jpg")]
    pub image_url: Option<String>,
    pub votes: i64,
}

/// Create/update body. `id` and `votes` may be sent but are not stored.
#[derive(ToSchema)]
pub struct CoffeeInputDoc {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct DetailDoc { pub detail: String }

#[derive(OpenApi)]
#[openapi(
    info(title = "Coffee Vote API"),
    paths(
        crate::routes::health,
        crate::routes::coffees::list,
        crate::routes::coffees::create,
        crate::routes::coffees::update,
        crate::routes::coffees::delete,
        crate::routes::coffees::vote,
    ),
    components(
        schemas(
            HealthResponse,
            CoffeeDoc,
            CoffeeInputDoc,
            MessageDoc,
            DetailDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "coffees")
    )
)]
pub struct ApiDoc;
