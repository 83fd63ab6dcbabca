//! API routes
//!
//! Paths and payloads follow what the mobile app already sends.

use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use super::AppState;
use crate::accounts::{LoginRequest, SignupRequest, User};
use crate::browser::{detail_for, MealDetail, RecipeBrowser};
use crate::catalog::CategoryFilter;
use crate::error::{LarderError, LarderResult};
use crate::favorites::Favorite;
use crate::matching::{AnnotatedRecipe, NormalizedPantry, ViewKind};
use crate::pantry::SubmittedIngredient;
use crate::recipe::Recipe;
use crate::speech::candidate_from;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(health))
        .route("/speech", post(speech))
        .route("/recipes/:ingredient", get(recipes_by_ingredient))
        .route("/api/proxy/meals", get(proxy_meals))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/api/ingredient", post(submit_ingredients))
        .route("/api/ingredients/latest", get(latest_ingredients))
        .route(
            "/api/favorites",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/api/favorites/:user_id", get(list_favorites))
        .route("/api/menu", get(menu))
        .route("/api/explore", get(explore))
        .route("/api/meals/:meal_id", get(meal_detail))
        .route("/api/catalog/refresh", post(refresh_catalog))
}

async fn health() -> &'static str {
    "Backend is working!"
}

/// Run synchronous SQLite work on the blocking thread pool
async fn blocking<T, F>(state: &AppStateArc, work: F) -> LarderResult<T>
where
    F: FnOnce(&AppState) -> LarderResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || work(&state)).await?
}

// ============================================================================
// Speech
// ============================================================================

async fn speech(
    State(state): State<AppStateArc>,
    mut multipart: Multipart,
) -> LarderResult<Json<Value>> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LarderError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() == Some("audio") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| LarderError::Validation(format!("Malformed upload: {e}")))?;
            audio = Some(bytes);
            break;
        }
    }

    let audio = audio.ok_or_else(|| LarderError::Validation("Missing audio file".to_string()))?;

    match state.speech.transcribe(&audio).await {
        Ok(transcript) => Ok(Json(json!({
            "candidate": candidate_from(&transcript),
            "transcript": transcript,
        }))),
        Err(e) => {
            error!("❌ Error transcribing audio: {}", e);
            Err(LarderError::Speech("Failed to transcribe".to_string()))
        }
    }
}

// ============================================================================
// Catalog proxy
// ============================================================================

#[derive(Debug, Deserialize)]
struct LetterQuery {
    f: Option<String>,
}

fn meals_json(recipes: &[Recipe]) -> Value {
    if recipes.is_empty() {
        return json!({ "meals": null });
    }
    json!({ "meals": recipes.iter().map(Recipe::to_meal_json).collect::<Vec<_>>() })
}

async fn recipes_by_ingredient(
    State(state): State<AppStateArc>,
    Path(ingredient): Path<String>,
) -> LarderResult<Json<Value>> {
    let recipes = state.catalog.list_by_ingredient(&ingredient).await;
    if recipes.is_empty() {
        return Err(LarderError::NotFound(
            "No recipes found for this ingredient".to_string(),
        ));
    }
    Ok(Json(meals_json(&recipes)))
}

async fn proxy_meals(
    State(state): State<AppStateArc>,
    Query(query): Query<LetterQuery>,
) -> Json<Value> {
    let letter = query
        .f
        .as_deref()
        .and_then(|f| f.trim().chars().next())
        .unwrap_or('a');
    Json(meals_json(&state.catalog.list_by_letter(letter).await))
}

async fn refresh_catalog(State(state): State<AppStateArc>) -> Json<Value> {
    state.invalidate_recipes().await;
    let count = state.all_recipes().await.len();
    Json(json!({ "recipes": count }))
}

// ============================================================================
// Accounts
// ============================================================================

async fn signup(
    State(state): State<AppStateArc>,
    Json(req): Json<SignupRequest>,
) -> LarderResult<Json<User>> {
    let user = blocking(&state, move |s| s.accounts.signup(&req)).await?;
    Ok(Json(user))
}

async fn login(
    State(state): State<AppStateArc>,
    Json(req): Json<LoginRequest>,
) -> LarderResult<Json<User>> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let user = blocking(&state, move |s| s.accounts.login(&email, &password)).await?;
    Ok(Json(user))
}

// ============================================================================
// Pantry submissions
// ============================================================================

#[derive(Debug, Deserialize)]
struct SubmissionRequest {
    #[serde(default)]
    ingredients: Option<Vec<SubmittedIngredient>>,
    #[serde(default)]
    submitted_at: Option<String>,
    #[serde(default)]
    user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UserQuery {
    user_id: Option<i64>,
}

async fn submit_ingredients(
    State(state): State<AppStateArc>,
    Json(req): Json<SubmissionRequest>,
) -> LarderResult<Json<Value>> {
    let missing = || LarderError::Validation("Missing ingredients, timestamp, or user ID".into());
    let user_id = req.user_id.ok_or_else(missing)?;
    let submitted_at = req.submitted_at.ok_or_else(missing)?;
    let ingredients = req.ingredients.ok_or_else(missing)?;

    let submission_id = blocking(&state, move |s| {
        s.submissions.submit(user_id, &submitted_at, &ingredients)
    })
    .await?;
    Ok(Json(json!({
        "message": "Submission and ingredients saved",
        "submission_id": submission_id,
    })))
}

async fn latest_ingredients(
    State(state): State<AppStateArc>,
    Query(query): Query<UserQuery>,
) -> LarderResult<Json<Value>> {
    let user_id = query
        .user_id
        .ok_or_else(|| LarderError::Validation("Missing user ID".to_string()))?;

    let latest = blocking(&state, move |s| s.submissions.latest(user_id)).await?;
    Ok(Json(match latest {
        Some(submission) => json!({
            "submission_id": submission.submission_id,
            "ingredients": submission.ingredients,
        }),
        None => json!({ "ingredients": [] }),
    }))
}

/// Latest submitted pantry of a user; empty when no user or no submission
async fn pantry_for(state: &AppStateArc, user_id: Option<i64>) -> LarderResult<Vec<String>> {
    let Some(id) = user_id else {
        return Ok(Vec::new());
    };
    let latest = blocking(state, move |s| s.submissions.latest(id)).await?;
    Ok(latest.map(|s| s.names()).unwrap_or_default())
}

// ============================================================================
// Favorites
// ============================================================================

#[derive(Debug, Deserialize)]
struct FavoriteRequest {
    user_id: Option<i64>,
    meal_id: Option<String>,
    #[serde(default)]
    meal_name: Option<String>,
    #[serde(default)]
    meal_thumb: Option<String>,
}

impl FavoriteRequest {
    fn keys(&self) -> LarderResult<(i64, String)> {
        match (self.user_id, self.meal_id.as_deref().map(str::trim)) {
            (Some(user_id), Some(meal_id)) if !meal_id.is_empty() => {
                Ok((user_id, meal_id.to_string()))
            }
            _ => Err(LarderError::Validation(
                "Missing user ID or meal ID".to_string(),
            )),
        }
    }
}

async fn add_favorite(
    State(state): State<AppStateArc>,
    Json(req): Json<FavoriteRequest>,
) -> LarderResult<Json<Value>> {
    let (user_id, meal_id) = req.keys()?;
    let favorite = Favorite {
        meal_id,
        meal_name: req.meal_name.unwrap_or_default(),
        meal_thumb: req.meal_thumb.unwrap_or_default(),
    };
    blocking(&state, move |s| s.favorites.add(user_id, &favorite)).await?;
    Ok(Json(json!({ "message": "Favorite saved" })))
}

async fn remove_favorite(
    State(state): State<AppStateArc>,
    Json(req): Json<FavoriteRequest>,
) -> LarderResult<Json<Value>> {
    let (user_id, meal_id) = req.keys()?;
    blocking(&state, move |s| s.favorites.remove(user_id, &meal_id)).await?;
    Ok(Json(json!({ "message": "Favorite removed" })))
}

async fn list_favorites(
    State(state): State<AppStateArc>,
    Path(user_id): Path<i64>,
) -> LarderResult<Json<Value>> {
    let favorites = blocking(&state, move |s| s.favorites.get(user_id)).await?;
    Ok(Json(json!({ "favorites": favorites })))
}

// ============================================================================
// Matcher-backed views
// ============================================================================

#[derive(Debug, Deserialize)]
struct ViewQuery {
    user_id: Option<i64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    q: Option<String>,
}

/// Recipe row as rendered by the list screens
#[derive(Debug, Serialize)]
pub struct RecipeCard {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub area: Option<String>,
    pub matched_count: usize,
    pub total_count: usize,
    pub missing_count: usize,
    pub missing_label: Option<String>,
}

impl From<&AnnotatedRecipe> for RecipeCard {
    fn from(a: &AnnotatedRecipe) -> Self {
        Self {
            id: a.recipe.id.clone(),
            name: a.recipe.name.clone(),
            thumbnail: a.recipe.thumbnail.clone(),
            area: a.recipe.area.clone(),
            matched_count: a.matched_count,
            total_count: a.total_count,
            missing_count: a.missing_count(),
            missing_label: a.missing_label(),
        }
    }
}

async fn build_cards(
    state: &AppStateArc,
    query: ViewQuery,
    kind: ViewKind,
) -> LarderResult<Json<Value>> {
    let pantry = pantry_for(state, query.user_id).await?;
    let filter: CategoryFilter = query
        .category
        .as_deref()
        .unwrap_or("")
        .parse()
        .unwrap_or_default();
    let selector = filter.resolve(state.catalog.as_ref(), &state.config).await;

    let browser = RecipeBrowser::new(state.all_recipes().await, pantry, state.matcher);
    let view = browser.view(kind, &selector, query.q.as_deref().unwrap_or(""));
    info!(
        "🍽️ {:?} view for user {:?}: {} recipes",
        kind,
        query.user_id,
        view.len()
    );

    let cards: Vec<RecipeCard> = view.iter().map(RecipeCard::from).collect();
    Ok(Json(json!({ "recipes": cards })))
}

async fn menu(
    State(state): State<AppStateArc>,
    Query(query): Query<ViewQuery>,
) -> LarderResult<Json<Value>> {
    build_cards(&state, query, ViewKind::Menu).await
}

async fn explore(
    State(state): State<AppStateArc>,
    Query(query): Query<ViewQuery>,
) -> LarderResult<Json<Value>> {
    build_cards(&state, query, ViewKind::Explore).await
}

#[derive(Debug, Serialize)]
struct MealDetailResponse {
    #[serde(flatten)]
    detail: MealDetail,
    is_favorite: bool,
}

async fn meal_detail(
    State(state): State<AppStateArc>,
    Path(meal_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> LarderResult<Json<MealDetailResponse>> {
    let recipe = state
        .catalog
        .get_by_id(&meal_id)
        .await
        .ok_or_else(|| LarderError::NotFound(format!("Meal {meal_id} not found")))?;

    let pantry = NormalizedPantry::from_names(pantry_for(&state, query.user_id).await?);
    let is_favorite = match query.user_id {
        Some(user_id) => {
            let meal_id = recipe.id.clone();
            blocking(&state, move |s| s.favorites.contains(user_id, &meal_id)).await?
        }
        None => false,
    };

    Ok(Json(MealDetailResponse {
        detail: detail_for(&recipe, &pantry, &state.matcher),
        is_favorite,
    }))
}
