use askama::Template;

use super::repo_types::{MealType, Product, Recipe};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub recetas: Vec<Recipe>,
    pub productos_proximos: Vec<Product>,
    pub fecha_actual: String,
}

#[derive(Template)]
#[template(path = "generar_receta.html")]
pub struct GenerateRecipeTemplate {
    pub productos: Vec<Product>,
    pub tipos_comida: Vec<MealType>,
}

#[derive(Template)]
#[template(path = "receta.html")]
pub struct RecipeTemplate {
    pub receta: Recipe,
    pub productos: Vec<Product>,
}
