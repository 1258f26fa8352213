use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Metal colors a product photo set covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalColor {
    Yellow,
    Rose,
    White,
}

/// A catalog entry. Loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Raw popularity metric in [0, 1]; feeds both price and star rating.
    pub popularity_score: f64,
    /// Weight in grams.
    pub weight: f64,
    pub images: HashMap<MetalColor, String>,
}

/// Immutable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

const SEED_PRODUCTS: &str = include_str!("../data/products.json");

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    /// The embedded seed catalog of 8 engagement rings.
    pub fn builtin() -> Result<Self> {
        let products: Vec<Product> =
            serde_json::from_str(SEED_PRODUCTS).context("Failed to parse embedded catalog")?;
        Ok(Catalog { products })
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {}", path.as_ref().display()))?;
        let products: Vec<Product> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file: {}", path.as_ref().display()))?;
        Ok(Catalog { products })
    }

    /// Products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// First product matching `id`, if any. Absence is a normal outcome.
    pub fn find(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
