use crate::recipes::repo_types::Product;

pub const SYSTEM_MESSAGE: &str =
    "Eres un chef experto en crear recetas para reducir el desperdicio alimentario.";

/// Meal-type label used when the caller names none.
pub const ANY_MEAL_TYPE: &str = "cualquiera";
pub const DEFAULT_SERVINGS: i32 = 4;

/// One product as the model sees it: `Leche (2 unidades, vence: 2024-01-01)`.
pub fn describe_product(p: &Product) -> String {
    format!(
        "{} ({} unidades, vence: {})",
        p.nombre,
        p.stock(),
        p.expires_on()
    )
}

pub fn build_prompt(products: &[Product], meal_type: &str, servings: i32) -> String {
    let productos = products
        .iter()
        .map(describe_product)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
    Eres un chef experto en reducir desperdicio alimentario.

    Tengo estos productos que están próximos a vencer:
    {productos}

    Tipo de comida deseada: {meal_type}
    Porciones: {servings}

    Por favor, genera una receta que:
    1. Use la mayoría de estos productos
    2. Sea deliciosa y nutritiva
    3. Ayude a evitar el desperdicio
    4. Sea fácil de preparar

    Formato de respuesta:
    NOMBRE: [nombre de la receta]
    DESCRIPCIÓN: [breve descripción]
    TIEMPO: [tiempo en minutos]
    INGREDIENTES:
    - [ingrediente 1]
    - [ingrediente 2]
    ...
    INSTRUCCIONES:
    1. [paso 1]
    2. [paso 2]
    ...
    "#
    )
}
