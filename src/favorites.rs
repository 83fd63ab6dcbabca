//! Favorites Store
//!
//! Saved recipes per user. Independent of matching.

use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::db;
use crate::error::LarderResult;
use crate::recipe::Recipe;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub meal_id: String,
    #[serde(default)]
    pub meal_name: String,
    #[serde(default)]
    pub meal_thumb: String,
}

impl From<&Recipe> for Favorite {
    fn from(recipe: &Recipe) -> Self {
        Self {
            meal_id: recipe.id.clone(),
            meal_name: recipe.name.clone(),
            meal_thumb: recipe.thumbnail.clone(),
        }
    }
}

pub struct FavoritesStore {
    db_path: PathBuf,
}

impl FavoritesStore {
    pub fn new(db_path: PathBuf) -> LarderResult<Self> {
        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> LarderResult<()> {
        let conn = db::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                meal_id TEXT NOT NULL,
                meal_name TEXT,
                meal_thumb TEXT,
                UNIQUE(user_id, meal_id)
            )",
            [],
        )?;
        Ok(())
    }

    /// Favorites in the order they were saved
    pub fn get(&self, user_id: i64) -> LarderResult<Vec<Favorite>> {
        let conn = db::open(&self.db_path)?;
        let mut stmt = conn.prepare(
            "SELECT meal_id, meal_name, meal_thumb FROM favorites WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(Favorite {
                meal_id: row.get(0)?,
                meal_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                meal_thumb: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;

        let mut favorites = Vec::new();
        for row in rows {
            favorites.push(row?);
        }
        Ok(favorites)
    }

    pub fn contains(&self, user_id: i64, meal_id: &str) -> LarderResult<bool> {
        let conn = db::open(&self.db_path)?;
        let exists = conn
            .prepare("SELECT 1 FROM favorites WHERE user_id = ?1 AND meal_id = ?2 LIMIT 1")?
            .exists(params![user_id, meal_id])?;
        Ok(exists)
    }

    /// Save a favorite; saving the same meal twice keeps one entry
    pub fn add(&self, user_id: i64, favorite: &Favorite) -> LarderResult<()> {
        let conn = db::open(&self.db_path)?;
        conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, meal_id, meal_name, meal_thumb)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                favorite.meal_id,
                favorite.meal_name,
                favorite.meal_thumb
            ],
        )?;
        Ok(())
    }

    /// Returns whether a favorite was removed
    pub fn remove(&self, user_id: i64, meal_id: &str) -> LarderResult<bool> {
        let conn = db::open(&self.db_path)?;
        let removed = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND meal_id = ?2",
            params![user_id, meal_id],
        )?;
        Ok(removed > 0)
    }

    /// Flip the favorite state of a recipe; returns the new state
    pub fn toggle(&self, user_id: i64, recipe: &Recipe) -> LarderResult<bool> {
        if self.remove(user_id, &recipe.id)? {
            info!("💔 {} removed from favorites of user {}", recipe.name, user_id);
            return Ok(false);
        }
        self.add(user_id, &Favorite::from(recipe))?;
        info!("❤️ {} added to favorites of user {}", recipe.name, user_id);
        Ok(true)
    }
}
