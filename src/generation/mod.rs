pub mod client;
pub mod parse;
pub mod prompt;
pub mod services;

pub use client::{CompletionClient, OpenAiClient};
pub use services::{generate_recipe, GeneratedRecipe};
