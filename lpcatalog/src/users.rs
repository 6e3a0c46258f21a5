//! Annuaire des utilisateurs.
//!
//! Les noms d'utilisateur sont comparés sans tenir compte de la casse.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "lpserver", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub display_name: String,
}

impl User {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
        }
    }

    /// Violations des règles de forme, vide si l'utilisateur est valide
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !is_valid_username(&self.username) {
            errors.push("'username' must be a non-empty alphanumeric string".to_string());
        }
        if self.display_name.trim().is_empty() {
            errors.push("'displayName' must not be empty".to_string());
        }
        errors
    }
}

/// Lettres et chiffres ASCII uniquement, au moins un caractère
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric())
}

fn key(username: &str) -> String {
    username.to_lowercase()
}

#[derive(Default)]
struct UsersInner {
    users: HashMap<String, User>,
    order: Vec<String>,
}

/// Annuaire des utilisateurs, partagé entre les handlers
#[derive(Clone, Default)]
pub struct UserDirectory {
    inner: Arc<RwLock<UsersInner>>,
    admin: Option<Arc<str>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annuaire contenant l'administrateur, qui ne pourra pas être supprimé
    pub async fn with_admin(username: &str) -> Self {
        let mut directory = Self::new();
        directory.admin = Some(Arc::from(key(username)));
        directory
            .create(User::new(username, "Administrator"))
            .await;
        info!(admin = %username, "Administrator account seeded");
        directory
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.admin
            .as_deref()
            .is_some_and(|admin| admin == key(username))
    }

    pub async fn get_all(&self) -> Vec<User> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|k| inner.users.get(k).cloned())
            .collect()
    }

    pub async fn get_by_name(&self, username: &str) -> Option<User> {
        self.inner.read().await.users.get(&key(username)).cloned()
    }

    /// Ajoute un utilisateur ; `false` si le nom est déjà pris
    pub async fn create(&self, user: User) -> bool {
        let mut inner = self.inner.write().await;
        let k = key(&user.username);
        if inner.users.contains_key(&k) {
            return false;
        }
        inner.order.push(k.clone());
        inner.users.insert(k, user);
        true
    }

    /// Remplace un utilisateur existant ; `false` s'il n'existe pas
    pub async fn update(&self, user: User) -> bool {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&key(&user.username)) {
            Some(existing) => {
                *existing = user;
                true
            }
            None => false,
        }
    }

    /// Retire un utilisateur ; indique s'il était présent
    pub async fn delete(&self, username: &str) -> bool {
        let mut inner = self.inner.write().await;
        let k = key(username);
        if inner.users.remove(&k).is_some() {
            inner.order.retain(|o| *o != k);
            true
        } else {
            false
        }
    }

    /// Inscription : forme valide et nom libre
    pub async fn register(&self, user: User) -> Result<User> {
        let errors = user.violations();
        if !errors.is_empty() {
            return Err(Error::InvalidInput(errors.join("; ")));
        }
        if !self.create(user.clone()).await {
            return Err(Error::UserAlreadyExists(user.username));
        }
        info!(username = %user.username, "User created");
        Ok(user)
    }

    /// Suppression demandée par un client ; l'administrateur est protégé
    pub async fn remove_user(&self, username: &str) -> Result<()> {
        if self.is_admin(username) {
            return Err(Error::Forbidden(format!(
                "user '{}' cannot be deleted",
                username
            )));
        }
        if !self.delete(username).await {
            return Err(Error::UserNotFound(username.to_string()));
        }
        info!(username = %username, "User deleted");
        Ok(())
    }
}
