//! TheMealDB catalog client
//!
//! Thin wrapper over the public JSON API (`search.php`, `filter.php`,
//! `lookup.php`, `list.php`). Every endpoint answers `{"meals": [...] | null}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::RecipeCatalog;
use crate::config::Config;
use crate::error::LarderResult;
use crate::recipe::Recipe;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    #[serde(rename = "strIngredient")]
    name: Option<String>,
}

pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(config: &Config) -> LarderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.catalog_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET an endpoint and return the raw `meals` array.
    ///
    /// Connection failures are retried; anything still failing yields an empty list.
    async fn fetch_meals(&self, endpoint: &str, query: &[(&str, &str)]) -> Vec<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("MealDB Request: {} {:?}", url, query);

        for attempt in 0..MAX_RETRIES {
            match self.client.get(&url).query(query).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        warn!("❌ MealDB {} answered {}", endpoint, resp.status());
                        return vec![];
                    }
                    return match resp.json::<MealsEnvelope>().await {
                        Ok(envelope) => envelope.meals.unwrap_or_default(),
                        Err(e) => {
                            warn!("❌ Failed to decode MealDB {} response: {}", endpoint, e);
                            vec![]
                        }
                    };
                }
                Err(e) if attempt < MAX_RETRIES - 1 && (e.is_connect() || e.is_timeout()) => {
                    warn!(
                        "⚠️ MealDB retry {}/{} for '{}': {}",
                        attempt + 1,
                        MAX_RETRIES,
                        endpoint,
                        e
                    );
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) => {
                    warn!("❌ MealDB request to {} failed: {}", endpoint, e);
                    return vec![];
                }
            }
        }

        vec![]
    }

    async fn fetch_recipes(&self, endpoint: &str, query: &[(&str, &str)]) -> Vec<Recipe> {
        self.fetch_meals(endpoint, query)
            .await
            .iter()
            .filter_map(Recipe::from_meal_json)
            .collect()
    }
}

#[async_trait]
impl RecipeCatalog for MealDbClient {
    async fn list_by_letter(&self, letter: char) -> Vec<Recipe> {
        let letter = letter.to_ascii_lowercase().to_string();
        self.fetch_recipes("search.php", &[("f", letter.as_str())]).await
    }

    async fn list_by_category(&self, category: &str) -> Vec<Recipe> {
        self.fetch_recipes("filter.php", &[("c", category)]).await
    }

    async fn list_by_area(&self, area: &str) -> Vec<Recipe> {
        self.fetch_recipes("filter.php", &[("a", area)]).await
    }

    async fn list_by_ingredient(&self, ingredient: &str) -> Vec<Recipe> {
        self.fetch_recipes("filter.php", &[("i", ingredient)]).await
    }

    async fn get_by_id(&self, id: &str) -> Option<Recipe> {
        self.fetch_recipes("lookup.php", &[("i", id)])
            .await
            .into_iter()
            .next()
    }

    async fn list_all_ingredient_names(&self) -> Vec<String> {
        self.fetch_meals("list.php", &[("i", "list")])
            .await
            .into_iter()
            .filter_map(|v| serde_json::from_value::<IngredientRecord>(v).ok())
            .filter_map(|r| r.name)
            .filter(|n| !n.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_null_meals() {
        let envelope: MealsEnvelope = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.meals.is_none());
    }

    #[test]
    fn test_ingredient_record() {
        let record: IngredientRecord = serde_json::from_str(
            r#"{"idIngredient": "1", "strIngredient": "Chicken", "strDescription": null}"#,
        )
        .unwrap();
        assert_eq!(record.name.as_deref(), Some("Chicken"));
    }

    #[tokio::test]
    async fn test_unreachable_catalog_yields_empty_results() {
        let config = Config {
            // Nothing listens on the local discard port
            catalog_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 1,
            ..Config::default()
        };
        let client = MealDbClient::new(&config).unwrap();
        assert!(client.get_by_id("52772").await.is_none());
        assert!(client.list_all_ingredient_names().await.is_empty());
    }
}
