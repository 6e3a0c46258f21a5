//! Documentation OpenAPI du catalogue (morceaux et utilisateurs).

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Déclare le schéma `Authorization: User <nom>`
pub struct UserAuthAddon;

impl Modify for UserAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "user_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "User <username>",
            ))),
        );
    }
}

/// Documentation OpenAPI de l'API des morceaux.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::search_songs,
        crate::api::get_song,
        crate::api::create_song,
        crate::api::update_song,
        crate::api::delete_song,
    ),
    components(
        schemas(
            crate::song::Song,
            crate::song::SongMetadata,
            lpserver::ErrorResponse,
        )
    ),
    modifiers(&UserAuthAddon),
    tags(
        (name = "songs", description = "Catalogue des morceaux")
    ),
    info(
        title = "LivePlaylist Songs API",
        version = "0.1.0",
        description = r#"
# Catalogue des morceaux

- recherche par sous-chaîne sur l'artiste ou le titre (`searchTerm`)
- un couple artiste/titre est unique, sans tenir compte de la casse
- les modifications demandent l'en-tête `Authorization: User <nom>`
        "#,
    )
)]
pub struct SongsApiDoc;

/// Documentation OpenAPI de l'API des utilisateurs.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_users,
        crate::api::get_user,
        crate::api::create_user,
        crate::api::delete_user,
    ),
    components(
        schemas(
            crate::users::User,
            lpserver::ErrorResponse,
        )
    ),
    modifiers(&UserAuthAddon),
    tags(
        (name = "users", description = "Annuaire des utilisateurs")
    ),
    info(
        title = "LivePlaylist Users API",
        version = "0.1.0",
    )
)]
pub struct UsersApiDoc;
