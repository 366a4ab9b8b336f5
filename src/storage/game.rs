//! Inventory record
//!
//! Field names match the keys in `inventario.json`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::store::Keyed;

/// Release date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rule a game failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("release date must use the YYYY-MM-DD format: {0:?}")]
    InvalidDate(String),

    #[error("name is required")]
    MissingName,

    #[error("price must be greater than zero")]
    NonPositivePrice,

    #[error("stock cannot be negative")]
    NegativeStock,

    #[error("company is required")]
    MissingCompany,

    #[error("cover is required")]
    MissingCover,

    #[error("id is required")]
    MissingId,
}

/// Fields supplied by the caller; the id is assigned on build
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub nombre: String,
    pub precio: f64,
    pub cantidad: i64,
    pub compania: String,
    pub fecha_publicacion: String,
}

/// One videogame in the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub nombre: String,
    pub precio: f64,
    pub cantidad: i64,
    pub compania: String,
    /// Relative path of the stored cover image
    pub portada: String,
    /// Kept as the original `YYYY-MM-DD` string
    pub fecha_publicacion: String,
}

impl Game {
    /// Builds a game from a draft and a saved cover path, assigning a fresh
    /// UUID v4 id.
    pub fn from_draft(draft: NewGame, portada: impl Into<String>) -> Result<Self, ValidationError> {
        let game = Self {
            id: Uuid::new_v4().to_string(),
            nombre: draft.nombre.trim().to_string(),
            precio: draft.precio,
            cantidad: draft.cantidad,
            compania: draft.compania.trim().to_string(),
            portada: portada.into(),
            fecha_publicacion: draft.fecha_publicacion,
        };
        game.validate()?;
        Ok(game)
    }

    /// Checks every rule, reporting the first one violated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if NaiveDate::parse_from_str(&self.fecha_publicacion, DATE_FORMAT).is_err() {
            return Err(ValidationError::InvalidDate(self.fecha_publicacion.clone()));
        }
        if self.nombre.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        // NaN fails this comparison too
        if !(self.precio > 0.0) {
            return Err(ValidationError::NonPositivePrice);
        }
        if self.cantidad < 0 {
            return Err(ValidationError::NegativeStock);
        }
        if self.compania.trim().is_empty() {
            return Err(ValidationError::MissingCompany);
        }
        if self.portada.is_empty() {
            return Err(ValidationError::MissingCover);
        }
        if self.id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        Ok(())
    }
}

impl Keyed for Game {
    fn key(&self) -> &str {
        &self.id
    }
}
