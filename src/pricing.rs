//! Price and rating derivation plus catalog filtering.

use crate::catalog::{Catalog, Product};
use serde::Serialize;

/// Catalog price in USD: popularity lifts the per-gram gold value by up to 2x.
pub fn calculate_price(popularity_score: f64, weight: f64, gold_price_per_gram: f64) -> f64 {
    (popularity_score + 1.0) * weight * gold_price_per_gram
}

/// Popularity rescaled to a 0-5 star rating with one decimal place,
/// round-half-up on the scaled value.
pub fn star_rating(popularity_score: f64) -> f64 {
    (popularity_score * 50.0).round() / 10.0
}

/// A product with its derived, per-request pricing fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub price: f64,
    pub star_rating: f64,
    /// The per-gram gold price this price was computed from.
    pub gold_price: f64,
}

impl PricedProduct {
    pub fn derive(product: &Product, gold_price: f64) -> Self {
        PricedProduct {
            product: product.clone(),
            price: calculate_price(product.popularity_score, product.weight, gold_price),
            star_rating: star_rating(product.popularity_score),
            gold_price,
        }
    }
}

/// Optional inclusive range filters. An absent bound imposes no constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_popularity: Option<f64>,
    pub max_popularity: Option<f64>,
}

impl ProductFilter {
    fn matches(&self, priced: &PricedProduct) -> bool {
        if self.min_price.is_some_and(|min| priced.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| priced.price > max) {
            return false;
        }
        // The popularity bounds intentionally compare against the derived
        // 0-5 star rating, not the raw 0-1 score: the UI exposes rating
        // filters under the "popularity" parameter names.
        if self.min_popularity.is_some_and(|min| priced.star_rating < min) {
            return false;
        }
        if self.max_popularity.is_some_and(|max| priced.star_rating > max) {
            return false;
        }
        true
    }
}

/// Prices every catalog product against one gold-price snapshot and applies
/// the filters. Stable: output preserves catalog insertion order.
pub fn list_products(catalog: &Catalog, gold_price: f64, filter: &ProductFilter) -> Vec<PricedProduct> {
    catalog
        .products()
        .iter()
        .map(|p| PricedProduct::derive(p, gold_price))
        .filter(|p| filter.matches(p))
        .collect()
}

/// Single-product lookup. `None` when the id is absent from the catalog.
pub fn get_product(catalog: &Catalog, id: i64, gold_price: f64) -> Option<PricedProduct> {
    catalog.find(id).map(|p| PricedProduct::derive(p, gold_price))
}
