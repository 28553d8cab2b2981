use serde::{Deserialize, Serialize};

use super::repo_types::{Product, Recipe};
use crate::generation::prompt::{ANY_MEAL_TYPE, DEFAULT_SERVINGS};

/// Form body of `POST /generar-receta`.
#[derive(Debug, Deserialize)]
pub struct GenerateRecipeForm {
    /// Comma-separated product ids, e.g. `3,7,12`.
    pub productos_ids: String,
    #[serde(default)]
    pub tipo_comida_id: Option<String>,
    /// Raw number input; a cleared field arrives as an empty string.
    #[serde(default)]
    pub porciones: Option<String>,
}

/// JSON body of `POST /api/recetas/generar`.
#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    #[serde(default)]
    pub productos_ids: Vec<i64>,
    #[serde(default = "default_meal_type")]
    pub tipo_comida: String,
    #[serde(default = "default_servings")]
    pub porciones: i32,
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipeResponse {
    pub receta: Recipe,
    pub texto_generado: String,
    pub productos_utilizados: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct RecipesResponse {
    pub recetas: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub port: u16,
}

fn default_servings() -> i32 {
    DEFAULT_SERVINGS
}

fn default_meal_type() -> String {
    ANY_MEAL_TYPE.to_string()
}

/// Ids from the CSV form field; blanks and non-integers are skipped.
pub fn parse_product_ids(csv: &str) -> Vec<i64> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

/// Optional meal-type select value; empty and unparseable mean "none chosen".
pub fn parse_meal_type_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
}

/// Servings form field; empty, absent or unparseable fall back to the default.
pub fn parse_servings(raw: Option<&str>) -> i32 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(DEFAULT_SERVINGS)
}
