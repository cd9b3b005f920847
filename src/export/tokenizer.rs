//! Ingredient token normalisation for the long ingredient table.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED_RE: Regex = Regex::new(r"[^\p{L}\p{N} \-]").unwrap();
    static ref SPACES_RE: Regex = Regex::new(r" {2,}").unwrap();
}

/// How tokens are derived, stated verbatim in the export manifest
pub const TOKENIZATION_RULE: &str = "token source: ingredient product, falling back to the \
original ingredient string when product is missing or blank; cross-reference ingredients \
(flagged cross_reference or carrying referenced_recipe_id) are skipped; normalisation: \
lowercase, strip, replace every character that is not a letter, digit, space or hyphen \
with a space, collapse runs of spaces, strip again, drop empty tokens; tokens are \
de-duplicated within a recipe keeping the first occurrence";

/// One ingredient as read from the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientRow {
    pub original_string: String,
    pub product: Option<String>,
    pub cross_reference: bool,
    pub referenced_recipe_id: Option<i64>,
}

impl IngredientRow {
    /// Points at another recipe instead of a food item
    pub fn is_cross_reference(&self) -> bool {
        self.cross_reference || self.referenced_recipe_id.is_some()
    }
}

/// Normalise one ingredient string. `None` in, or nothing left after
/// normalisation, gives `None`.
pub fn normalize_token(raw: Option<&str>) -> Option<String> {
    let lowered = raw?.trim().to_lowercase();
    let replaced = DISALLOWED_RE.replace_all(&lowered, " ");
    let collapsed = SPACES_RE.replace_all(replaced.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Distinct tokens of a recipe's ingredients, in ingredient order.
pub fn recipe_tokens(ingredients: &[IngredientRow]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for ingredient in ingredients.iter().filter(|i| !i.is_cross_reference()) {
        let source = ingredient
            .product
            .as_deref()
            .filter(|product| !product.trim().is_empty())
            .unwrap_or(ingredient.original_string.as_str());
        if let Some(token) = normalize_token(Some(source)) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token_cases() {
        assert_eq!(normalize_token(Some("Butter")).as_deref(), Some("butter"));
        assert_eq!(normalize_token(Some("  sugar  ")).as_deref(), Some("sugar"));
        assert_eq!(normalize_token(Some("salt & pepper")).as_deref(), Some("salt pepper"));
        assert_eq!(
            normalize_token(Some("self-raising flour")).as_deref(),
            Some("self-raising flour")
        );
        assert_eq!(normalize_token(Some("café")).as_deref(), Some("café"));
        assert_eq!(normalize_token(Some("")), None);
        assert_eq!(normalize_token(Some(" &; ")), None);
        assert_eq!(normalize_token(None), None);
    }

    #[test]
    fn test_normalize_token_tabs_and_digits() {
        assert_eq!(normalize_token(Some("Eggs\t(2)")).as_deref(), Some("eggs 2"));
    }

    #[test]
    fn test_recipe_tokens_policy() {
        let rows = vec![
            IngredientRow {
                original_string: "a pound of Butter".to_string(),
                product: Some("Butter".to_string()),
                ..Default::default()
            },
            IngredientRow {
                original_string: "Sugar".to_string(),
                product: Some("  ".to_string()),
                ..Default::default()
            },
            IngredientRow {
                original_string: "the forcemeat, No. 12".to_string(),
                cross_reference: true,
                ..Default::default()
            },
            IngredientRow {
                original_string: "sauce as before".to_string(),
                referenced_recipe_id: Some(4),
                ..Default::default()
            },
            IngredientRow {
                original_string: "more butter".to_string(),
                product: Some("butter".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(recipe_tokens(&rows), vec!["butter", "sugar"]);
    }
}
