use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use time::{macros::format_description, Date};

pub const PRODUCTS: &str = "productos";
pub const MEAL_TYPES: &str = "tipos_comida";
pub const RECIPES: &str = "recetas";
pub const RECIPE_PRODUCTS: &str = "productos_relacionados";
pub const AI_RECOMMENDATIONS: &str = "recomendaciones_ia";

/// `estado` value of products close to their expiration date.
pub const NEAR_EXPIRY: &str = "proximo_vencer";

/// Inventory product, owned by the inventory module; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub cantidad_stock: Option<Number>,
    #[serde(default)]
    pub fecha_caducidad: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    // other inventory columns, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn stock(&self) -> String {
        self.cantidad_stock
            .as_ref()
            .map(Number::to_string)
            .unwrap_or_else(|| "-".into())
    }

    pub fn expires_on(&self) -> &str {
        self.fecha_caducidad.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealType {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub instrucciones: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub porciones: Option<i32>,
    pub tipo_comida_id: Option<i64>,
    #[serde(default)]
    pub generada_por_ia: Option<bool>,
    pub prompt_ia: Option<String>,
    /// Kept as stored; `timestamptz` and naive `timestamp` columns both occur.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    pub fn is_ai(&self) -> bool {
        self.generada_por_ia.unwrap_or(false)
    }

    /// `YYYY-MM-DD` of creation, empty when unknown.
    pub fn created_on(&self) -> String {
        self.created_at
            .as_deref()
            .and_then(|ts| ts.get(..10))
            .and_then(|day| Date::parse(day, format_description!("[year]-[month]-[day]")).ok())
            .map(|d| d.to_string())
            .unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.descripcion.as_deref().unwrap_or("")
    }

    pub fn instructions(&self) -> &str {
        self.instrucciones.as_deref().unwrap_or("")
    }

    pub fn prep_minutes(&self) -> String {
        self.tiempo_preparacion
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".into())
    }

    pub fn servings(&self) -> String {
        self.porciones
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into())
    }
}

#[derive(Debug, Serialize)]
pub struct NewRecipe<'a> {
    pub nombre: &'a str,
    pub descripcion: &'a str,
    pub instrucciones: &'a str,
    pub tiempo_preparacion: i32,
    pub porciones: i32,
    pub tipo_comida_id: Option<i64>,
    pub generada_por_ia: bool,
    pub prompt_ia: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeProductLink {
    pub receta_id: i64,
    pub producto_id: i64,
    pub cantidad_necesaria: i32,
}

#[derive(Debug, Serialize)]
pub struct AiRecommendation {
    /// Input ids as a JSON list, e.g. `[1, 2]`.
    pub productos_input: String,
    pub receta_generada_id: i64,
    pub confianza_score: f64,
    pub modelo_usado: String,
}
