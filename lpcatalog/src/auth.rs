//! Identification de l'appelant par l'en-tête `Authorization: User <nom>`.
//!
//! L'identité retenue est le nom tel qu'enregistré dans l'annuaire ; un nom
//! inconnu ou un en-tête mal formé donnent un appelant anonyme.

use crate::users::UserDirectory;

/// Schéma attendu dans l'en-tête `Authorization`
pub const AUTH_SCHEME: &str = "User";

/// Extrait le nom d'utilisateur d'un en-tête `User <nom>`
///
/// Le schéma est insensible à la casse, le nom doit être alphanumérique et
/// les espaces autour sont tolérés.
pub fn parse_authorization(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case(AUTH_SCHEME) {
        return None;
    }
    let username = rest.trim();
    crate::users::is_valid_username(username).then_some(username)
}

/// Identité de l'appelant, `None` s'il n'est pas authentifié
pub async fn resolve_caller(users: &UserDirectory, header: Option<&str>) -> Option<String> {
    let username = parse_authorization(header?)?;
    users.get_by_name(username).await.map(|u| u.username)
}

#[cfg(feature = "lpserver")]
mod extract {
    use axum::{
        extract::{FromRef, FromRequestParts},
        http::{header::AUTHORIZATION, request::Parts},
    };
    use std::convert::Infallible;

    use super::resolve_caller;
    use crate::error::Error;
    use crate::users::UserDirectory;

    /// Appelant éventuellement authentifié
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CallerIdentity(pub Option<String>);

    /// Appelant authentifié ; rejette la requête en 401 sinon
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AuthenticatedUser(pub String);

    fn authorization(parts: &Parts) -> Option<&str> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    impl<S> FromRequestParts<S> for CallerIdentity
    where
        UserDirectory: FromRef<S>,
        S: Send + Sync,
    {
        type Rejection = Infallible;

        async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
            let users = UserDirectory::from_ref(state);
            Ok(Self(resolve_caller(&users, authorization(parts)).await))
        }
    }

    impl<S> FromRequestParts<S> for AuthenticatedUser
    where
        UserDirectory: FromRef<S>,
        S: Send + Sync,
    {
        type Rejection = Error;

        async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
            let CallerIdentity(caller) = CallerIdentity::from_request_parts(parts, state)
                .await
                .unwrap_or(CallerIdentity(None));
            caller.map(Self).ok_or(Error::Unauthenticated)
        }
    }
}

#[cfg(feature = "lpserver")]
pub use extract::{AuthenticatedUser, CallerIdentity};
