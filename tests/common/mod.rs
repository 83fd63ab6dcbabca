pub mod mock_catalog;
pub mod mock_speech;

use larder::config::Config;
use larder::recipe::Recipe;
use tempfile::TempDir;

/// Config pointing every store at a throwaway database
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config {
            db_path: temp_dir
                .path()
                .join("data/larder.db")
                .to_string_lossy()
                .into_owned(),
            ..Config::default()
        };
        Self { temp_dir, config }
    }
}

/// Small catalog covering the interesting match cases
pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("52772", "Teriyaki Chicken Casserole")
            .with_area("Japanese")
            .with_category("Chicken")
            .with_ingredients(["soy sauce", "water", "brown sugar", "chicken breasts"]),
        Recipe::new("52959", "Baked salmon with fennel & tomatoes")
            .with_area("British")
            .with_category("Seafood")
            .with_ingredients(["fennel", "parsley", "lemon", "salmon", "tomatoes"]),
        Recipe::new("52814", "Thai Green Curry")
            .with_area("Thai")
            .with_category("Chicken")
            .with_ingredients(["chicken", "green curry paste", "coconut milk", "basil"]),
        Recipe::new("52807", "Baingan Bharta")
            .with_area("Indian")
            .with_category("Vegetarian")
            .with_ingredients(["aubergine", "onion", "tomatoes", "garlic"]),
        Recipe::new("52870", "Chicken Marengo")
            .with_area("French")
            .with_category("Chicken")
            .with_ingredients(["olive oil", "mushrooms", "chicken legs", "passata"]),
    ]
}
