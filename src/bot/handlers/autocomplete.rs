//! Autocomplete handlers for Discord slash command parameters.
//!
//! Product names are not unique, so suggestions carry the product id as a `#<id>` prefix
//! that [`parse::parse_product_ref`](super::parse::parse_product_ref) reads back.

use crate::{bot::BotData, core::product, entities::ProductModel, errors::Error};

/// Discord's limit on autocomplete suggestions.
const MAX_SUGGESTIONS: usize = 25;
/// Discord's limit on the length of one suggestion.
const MAX_SUGGESTION_LEN: usize = 100;

/// Suggestion text for a product: `#<id> <name> - <model> (<stock> db)`.
#[must_use]
pub fn product_suggestion(product: &ProductModel) -> String {
    let text = format!(
        "#{} {} ({} db)",
        product.id,
        product.display_name(),
        product.stock_quantity
    );
    text.chars().take(MAX_SUGGESTION_LEN).collect()
}

/// Suggestions for `partial` from `products`, matching id, name or model case-insensitively.
#[must_use]
pub fn matching_products(products: &[ProductModel], partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().trim_start_matches('#').to_lowercase();

    products
        .iter()
        .filter(|p| {
            partial_lower.is_empty()
                || p.id.to_string().starts_with(&partial_lower)
                || p.display_name().to_lowercase().contains(&partial_lower)
        })
        .map(product_suggestion)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Provides autocomplete suggestions for product parameters.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
pub async fn autocomplete_product(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(products) = product::list_products(db).await else {
        return Vec::new();
    };

    matching_products(&products, partial)
}
