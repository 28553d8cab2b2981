use thiserror::Error;
use tracing::{error, info, instrument};

use super::client::CompletionClient;
use super::parse::parse_reply;
use super::prompt::{build_prompt, SYSTEM_MESSAGE};
use crate::recipes::repo_types::Product;

#[derive(Debug, Error)]
#[error("Error al generar receta con OpenAI: {0}")]
pub struct GenerationError(pub String);

/// A recipe as produced by the model, before it is stored.
#[derive(Debug, Clone)]
pub struct GeneratedRecipe {
    pub nombre: String,
    pub descripcion: String,
    pub tiempo: i32,
    /// The raw reply, kept verbatim whether or not parsing found anything.
    pub texto_completo: String,
    pub prompt: String,
    pub modelo: String,
}

#[instrument(skip(client, products), fields(product_count = products.len()))]
pub async fn generate_recipe(
    client: &dyn CompletionClient,
    products: &[Product],
    meal_type: &str,
    servings: i32,
) -> Result<GeneratedRecipe, GenerationError> {
    let prompt = build_prompt(products, meal_type, servings);

    let texto = client
        .complete(SYSTEM_MESSAGE, &prompt)
        .await
        .map_err(|e| {
            error!(error = %e, "completion request failed");
            GenerationError(e.to_string())
        })?;

    let parsed = parse_reply(&texto);
    info!(nombre = %parsed.nombre, tiempo = parsed.tiempo, "recipe generated");

    Ok(GeneratedRecipe {
        nombre: parsed.nombre,
        descripcion: parsed.descripcion,
        tiempo: parsed.tiempo,
        texto_completo: texto,
        prompt,
        modelo: client.model().to_string(),
    })
}
