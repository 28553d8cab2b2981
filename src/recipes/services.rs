use tracing::{error, info, instrument, warn};

use super::dto::GenerateRecipeResponse;
use super::repo;
use super::repo_types::{AiRecommendation, NewRecipe, Product, Recipe};
use crate::error::AppError;
use crate::generation::{generate_recipe, prompt::ANY_MEAL_TYPE, GeneratedRecipe};
use crate::state::AppState;
use crate::store::{DataStore, StoreError};

/// Score stored with every recommendation log row.
pub const CONFIDENCE_SCORE: f64 = 0.85;

const NO_PRODUCTS_SELECTED: &str = "Debe seleccionar al menos un producto";
const PRODUCTS_NOT_FOUND: &str = "No se encontraron los productos seleccionados";

async fn load_products(store: &dyn DataStore, ids: &[i64]) -> Result<Vec<Product>, AppError> {
    let products = repo::find_products(store, ids).await?;
    if products.is_empty() {
        warn!(?ids, "no products matched the selection");
        return Err(AppError::NotFound(PRODUCTS_NOT_FOUND.into()));
    }
    Ok(products)
}

/// Inserts the recipe row, then one link row per requested id.
/// Not transactional: rows written before a failure stay written.
async fn persist(
    store: &dyn DataStore,
    generated: &GeneratedRecipe,
    porciones: i32,
    tipo_comida_id: Option<i64>,
    product_ids: &[i64],
) -> Result<Recipe, StoreError> {
    let recipe = repo::insert_recipe(
        store,
        &NewRecipe {
            nombre: &generated.nombre,
            descripcion: &generated.descripcion,
            instrucciones: &generated.texto_completo,
            tiempo_preparacion: generated.tiempo,
            porciones,
            tipo_comida_id,
            generada_por_ia: true,
            prompt_ia: &generated.prompt,
        },
    )
    .await?;

    for producto_id in product_ids {
        repo::link_product(store, recipe.id, *producto_id).await?;
    }
    Ok(recipe)
}

fn ids_as_json(ids: &[i64]) -> String {
    let inner = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}

/// Form flow: validate, generate, store recipe + links + recommendation log.
/// Returns the new recipe id.
#[instrument(skip(state))]
pub async fn create_from_form(
    state: &AppState,
    product_ids: Vec<i64>,
    tipo_comida_id: Option<i64>,
    porciones: i32,
) -> Result<i64, AppError> {
    if product_ids.is_empty() {
        warn!("empty product selection");
        return Err(AppError::BadRequest(NO_PRODUCTS_SELECTED.into()));
    }

    let store = state.store.as_ref();
    let products = load_products(store, &product_ids).await?;

    let mut meal_type = ANY_MEAL_TYPE.to_string();
    // id 0 is stored as sent but never names a meal type
    if let Some(id) = tipo_comida_id.filter(|id| *id != 0) {
        if let Some(nombre) = repo::meal_type_name(store, id).await? {
            meal_type = nombre;
        }
    }

    let generated = generate_recipe(state.completion.as_ref(), &products, &meal_type, porciones)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?;

    let recipe = persist(store, &generated, porciones, tipo_comida_id, &product_ids)
        .await
        .map_err(|e| {
            error!(error = %e, "storing generated recipe failed");
            AppError::Generation(e.to_string())
        })?;

    repo::log_recommendation(
        store,
        &AiRecommendation {
            productos_input: ids_as_json(&product_ids),
            receta_generada_id: recipe.id,
            confianza_score: CONFIDENCE_SCORE,
            modelo_usado: generated.modelo.clone(),
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, receta_id = recipe.id, "storing recommendation log failed");
        AppError::Generation(e.to_string())
    })?;

    info!(receta_id = recipe.id, "recipe created from form");
    Ok(recipe.id)
}

/// JSON flow: same generation and storage, minus the recommendation log,
/// answered with the stored row, the raw reply and the products used.
#[instrument(skip(state))]
pub async fn create_from_api(
    state: &AppState,
    product_ids: Vec<i64>,
    tipo_comida: String,
    porciones: i32,
) -> Result<GenerateRecipeResponse, AppError> {
    let store = state.store.as_ref();
    let products = load_products(store, &product_ids).await?;

    let generated = generate_recipe(state.completion.as_ref(), &products, &tipo_comida, porciones)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?;

    let recipe = persist(store, &generated, porciones, None, &product_ids)
        .await
        .map_err(|e| {
            error!(error = %e, "storing generated recipe failed");
            AppError::Generation(e.to_string())
        })?;

    let receta = repo::get_recipe(store, recipe.id)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?
        .ok_or_else(|| {
            AppError::Generation(format!("recipe {} not found after insert", recipe.id))
        })?;

    info!(receta_id = receta.id, "recipe created from api");
    Ok(GenerateRecipeResponse {
        receta,
        texto_generado: generated.texto_completo,
        productos_utilizados: products,
    })
}
