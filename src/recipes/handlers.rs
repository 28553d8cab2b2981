use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument};

use super::dto::{
    parse_meal_type_id, parse_product_ids, parse_servings, GenerateRecipeForm, GenerateRecipeRequest,
    GenerateRecipeResponse, HealthResponse, RecipesResponse,
};
use super::repo;
use super::services::{create_from_api, create_from_form};
use super::views::{GenerateRecipeTemplate, IndexTemplate, RecipeTemplate};
use crate::{error::AppError, state::AppState};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/generar-receta", get(generate_form).post(generate_from_form))
        .route("/recetas/:id", get(recipe_page))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/recetas", get(list_recipes))
        .route("/api/recetas/generar", axum::routing::post(generate_from_json))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: "recetas",
        port: state.config.port,
    })
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<IndexTemplate, AppError> {
    let store = state.store.as_ref();
    let recetas = repo::list_recipes(store).await.map_err(|e| {
        error!(error = %e, "list recipes failed");
        AppError::from(e)
    })?;
    let productos_proximos = repo::list_near_expiry_products(store).await.map_err(|e| {
        error!(error = %e, "list near-expiry products failed");
        AppError::from(e)
    })?;

    Ok(IndexTemplate {
        recetas,
        productos_proximos,
        fecha_actual: OffsetDateTime::now_utc().date().to_string(),
    })
}

#[instrument(skip(state))]
pub async fn generate_form(State(state): State<AppState>) -> Result<GenerateRecipeTemplate, AppError> {
    let store = state.store.as_ref();
    let productos = repo::list_near_expiry_products(store).await?;
    let tipos_comida = repo::list_meal_types(store).await?;
    Ok(GenerateRecipeTemplate {
        productos,
        tipos_comida,
    })
}

#[instrument(skip(state, form))]
pub async fn generate_from_form(
    State(state): State<AppState>,
    Form(form): Form<GenerateRecipeForm>,
) -> Result<Redirect, AppError> {
    let product_ids = parse_product_ids(&form.productos_ids);
    let tipo_comida_id = parse_meal_type_id(form.tipo_comida_id.as_deref());

    let porciones = parse_servings(form.porciones.as_deref());

    let receta_id = create_from_form(&state, product_ids, tipo_comida_id, porciones).await?;
    Ok(Redirect::to(&format!("/recetas/{}", receta_id)))
}

#[instrument(skip(state))]
pub async fn recipe_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<RecipeTemplate, AppError> {
    let store = state.store.as_ref();
    let receta = repo::get_recipe(store, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Receta no encontrada".into()))?;
    let productos = repo::products_for_recipe(store, id).await?;
    Ok(RecipeTemplate { receta, productos })
}

#[instrument(skip(state))]
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<RecipesResponse>, AppError> {
    let recetas = repo::list_recipes(state.store.as_ref()).await.map_err(|e| {
        error!(error = %e, "list recipes failed");
        AppError::from(e)
    })?;
    Ok(Json(RecipesResponse { recetas }))
}

#[instrument(skip(state, body))]
pub async fn generate_from_json(
    State(state): State<AppState>,
    Json(body): Json<GenerateRecipeRequest>,
) -> Result<Json<GenerateRecipeResponse>, AppError> {
    let resp = create_from_api(&state, body.productos_ids, body.tipo_comida, body.porciones).await?;
    Ok(Json(resp))
}
