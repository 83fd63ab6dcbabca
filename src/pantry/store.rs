//! Ingredient submissions
//!
//! Each time the user submits their pantry a new submission row is written
//! with its ingredient rows. The latest submission is the remote copy of the
//! pantry that the mobile app restores on launch.

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::db;
use crate::error::{LarderError, LarderResult};
use crate::pantry::PantryIngredient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedIngredient {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl From<&PantryIngredient> for SubmittedIngredient {
    fn from(item: &PantryIngredient) -> Self {
        Self {
            name: item.name.clone(),
            quantity: default_quantity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub submission_id: i64,
    pub user_id: i64,
    pub submitted_at: String,
    pub ingredients: Vec<SubmittedIngredient>,
}

impl Submission {
    pub fn names(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.name.clone()).collect()
    }
}

pub struct SubmissionStore {
    db_path: PathBuf,
}

impl SubmissionStore {
    pub fn new(db_path: PathBuf) -> LarderResult<Self> {
        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> LarderResult<()> {
        let conn = db::open(&self.db_path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS submissions (
                submission_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                submitted_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                submission_id INTEGER NOT NULL
                    REFERENCES submissions(submission_id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_submissions_user ON submissions(user_id);",
        )?;
        Ok(())
    }

    /// Store a full pantry snapshot; returns the new submission id
    pub fn submit(
        &self,
        user_id: i64,
        submitted_at: &str,
        items: &[SubmittedIngredient],
    ) -> LarderResult<i64> {
        if items.is_empty() || submitted_at.trim().is_empty() {
            return Err(LarderError::Validation(
                "Missing ingredients, timestamp, or user ID".to_string(),
            ));
        }

        let mut conn = db::open(&self.db_path)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO submissions (user_id, submitted_at) VALUES (?1, ?2)",
            params![user_id, submitted_at],
        )?;
        let submission_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO ingredients (submission_id, name, quantity) VALUES (?1, ?2, ?3)",
            )?;
            for item in items {
                stmt.execute(params![submission_id, item.name, item.quantity])?;
            }
        }
        tx.commit()?;

        info!(
            "🧺 Saved submission {} for user {} ({} ingredients)",
            submission_id,
            user_id,
            items.len()
        );
        Ok(submission_id)
    }

    /// Most recent submission for a user, if any
    pub fn latest(&self, user_id: i64) -> LarderResult<Option<Submission>> {
        let conn = db::open(&self.db_path)?;
        let header: Option<(i64, String)> = conn
            .query_row(
                "SELECT submission_id, submitted_at FROM submissions
                 WHERE user_id = ?1 ORDER BY submission_id DESC LIMIT 1",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((submission_id, submitted_at)) = header else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT name, quantity FROM ingredients WHERE submission_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([submission_id], |row| {
            Ok(SubmittedIngredient {
                name: row.get(0)?,
                quantity: row.get(1)?,
            })
        })?;
        let mut ingredients = Vec::new();
        for row in rows {
            ingredients.push(row?);
        }

        Ok(Some(Submission {
            submission_id,
            user_id,
            submitted_at,
            ingredients,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> SubmittedIngredient {
        SubmittedIngredient {
            name: name.to_string(),
            quantity: 1,
        }
    }

    #[test]
    fn test_latest_returns_newest_submission() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::new(dir.path().join("larder.db")).unwrap();

        store
            .submit(7, "2025-01-01 10:00:00", &[item("Egg")])
            .unwrap();
        let second = store
            .submit(7, "2025-01-02 10:00:00", &[item("Milk"), item("Flour")])
            .unwrap();
        store.submit(8, "2025-01-03 10:00:00", &[item("Rice")]).unwrap();

        let latest = store.latest(7).unwrap().expect("has submission");
        assert_eq!(latest.submission_id, second);
        assert_eq!(latest.names(), vec!["Milk", "Flour"]);
    }

    #[test]
    fn test_latest_without_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::new(dir.path().join("larder.db")).unwrap();
        assert!(store.latest(1).unwrap().is_none());
    }

    #[test]
    fn test_empty_submission_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubmissionStore::new(dir.path().join("larder.db")).unwrap();
        let err = store.submit(1, "2025-01-01 10:00:00", &[]).unwrap_err();
        assert!(matches!(err, LarderError::Validation(_)));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let parsed: SubmittedIngredient = serde_json::from_str(r#"{"name": "Egg"}"#).unwrap();
        assert_eq!(parsed.quantity, 1);
    }
}
