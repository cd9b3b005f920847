//! Deterministic dataset export: recipe selection, token normalisation,
//! temporal slices and the written artifact set.

pub mod dataset;
pub mod scope;
pub mod slices;
pub mod tokenizer;

pub use dataset::{export_dataset, GroupStats, Manifest, SourceStats};
pub use scope::{sampling_key, ExportScope, RecipeMetrics, Selection};
pub use slices::{slice_for, Slice};
pub use tokenizer::{normalize_token, recipe_tokens, IngredientRow, TOKENIZATION_RULE};
