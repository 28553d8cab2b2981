use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::repo_types::{
    AiRecommendation, MealType, NewRecipe, Product, Recipe, RecipeProductLink, AI_RECOMMENDATIONS,
    MEAL_TYPES, NEAR_EXPIRY, PRODUCTS, RECIPES, RECIPE_PRODUCTS,
};
use crate::store::{DataStore, Direction, Query, StoreError};

fn decode<T: DeserializeOwned>(table: &str, row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode {
        table: table.to_string(),
        reason: e.to_string(),
    })
}

fn decode_all<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(|r| decode(table, r)).collect()
}

fn encode<T: Serialize>(table: &str, row: &T) -> Result<Value, StoreError> {
    serde_json::to_value(row).map_err(|e| StoreError::Decode {
        table: table.to_string(),
        reason: e.to_string(),
    })
}

/// All recipes, newest first.
pub async fn list_recipes(store: &dyn DataStore) -> Result<Vec<Recipe>, StoreError> {
    let q = Query::table(RECIPES).order("created_at", Direction::Desc);
    decode_all(RECIPES, store.select(&q).await?)
}

/// Near-expiry products, soonest to expire first.
pub async fn list_near_expiry_products(store: &dyn DataStore) -> Result<Vec<Product>, StoreError> {
    let q = Query::table(PRODUCTS)
        .eq("estado", NEAR_EXPIRY)
        .order("fecha_caducidad", Direction::Asc);
    decode_all(PRODUCTS, store.select(&q).await?)
}

pub async fn list_meal_types(store: &dyn DataStore) -> Result<Vec<MealType>, StoreError> {
    let q = Query::table(MEAL_TYPES);
    decode_all(MEAL_TYPES, store.select(&q).await?)
}

pub async fn find_products(store: &dyn DataStore, ids: &[i64]) -> Result<Vec<Product>, StoreError> {
    let q = Query::table(PRODUCTS).in_("id", ids.iter().copied());
    decode_all(PRODUCTS, store.select(&q).await?)
}

pub async fn meal_type_name(store: &dyn DataStore, id: i64) -> Result<Option<String>, StoreError> {
    let q = Query::table(MEAL_TYPES).select("nombre").eq("id", id);
    let rows = store.select(&q).await?;
    Ok(rows
        .into_iter()
        .next()
        .and_then(|r| r.get("nombre").and_then(Value::as_str).map(str::to_string)))
}

pub async fn get_recipe(store: &dyn DataStore, id: i64) -> Result<Option<Recipe>, StoreError> {
    let q = Query::table(RECIPES).eq("id", id).limit(1);
    match store.select(&q).await?.into_iter().next() {
        Some(row) => Ok(Some(decode(RECIPES, row)?)),
        None => Ok(None),
    }
}

pub async fn insert_recipe(store: &dyn DataStore, recipe: &NewRecipe<'_>) -> Result<Recipe, StoreError> {
    let row = store.insert(RECIPES, encode(RECIPES, recipe)?).await?;
    decode(RECIPES, row)
}

pub async fn link_product(
    store: &dyn DataStore,
    receta_id: i64,
    producto_id: i64,
) -> Result<(), StoreError> {
    let link = RecipeProductLink {
        receta_id,
        producto_id,
        cantidad_necesaria: 1,
    };
    store
        .insert(RECIPE_PRODUCTS, encode(RECIPE_PRODUCTS, &link)?)
        .await?;
    Ok(())
}

pub async fn log_recommendation(
    store: &dyn DataStore,
    recommendation: &AiRecommendation,
) -> Result<(), StoreError> {
    store
        .insert(
            AI_RECOMMENDATIONS,
            encode(AI_RECOMMENDATIONS, recommendation)?,
        )
        .await?;
    Ok(())
}

/// Products linked to a recipe through `productos_relacionados`.
pub async fn products_for_recipe(
    store: &dyn DataStore,
    receta_id: i64,
) -> Result<Vec<Product>, StoreError> {
    let q = Query::table(RECIPE_PRODUCTS).eq("receta_id", receta_id);
    let links: Vec<RecipeProductLink> = decode_all(RECIPE_PRODUCTS, store.select(&q).await?)?;
    if links.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = links.iter().map(|l| l.producto_id).collect();
    find_products(store, &ids).await
}
