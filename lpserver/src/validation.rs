//! Validation des corps de requête JSON.
//!
//! Un handler qui prend un [`ValidatedJson<T>`] ne reçoit que des payloads
//! désérialisés et validés ; toute erreur est rejetée en `400 Bad Request`
//! avec un corps [`ErrorResponse`].

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

/// Corps JSON des réponses d'erreur
#[derive(Debug, Clone, Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Règles de validation d'un payload
///
/// Retourne la liste des violations, vide si le payload est valide.
pub trait Validate {
    fn validate(&self) -> Vec<String>;
}

/// Extracteur JSON qui applique [`Validate`] après désérialisation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

/// Rejet de [`ValidatedJson`]
#[derive(Debug)]
pub enum ValidationRejection {
    /// Corps absent, mal formé ou de mauvais type
    Body(JsonRejection),
    /// Corps bien formé mais règles métier non respectées
    Invalid(Vec<String>),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let body = match self {
            ValidationRejection::Body(rejection) => {
                ErrorResponse::new("INVALID_BODY", rejection.body_text())
            }
            ValidationRejection::Invalid(errors) => {
                ErrorResponse::new("VALIDATION_FAILED", errors.join("; "))
            }
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(ValidationRejection::Body)?;

        let errors = value.validate();
        if !errors.is_empty() {
            tracing::debug!(errors = ?errors, "Request body rejected");
            return Err(ValidationRejection::Invalid(errors));
        }
        Ok(Self(value))
    }
}

/// Vérifie qu'un champ texte n'est pas vide
pub fn require_non_empty(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("'{}' must not be empty", field));
    }
}
