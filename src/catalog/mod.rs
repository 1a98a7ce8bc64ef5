//! Product catalog records and the catalog-to-geometry adapter.
//!
//! The catalog is owned by the storefront; the workspace only reads it.
//! [`archetype_for`] picks which furniture template renders a product.

pub mod archetype;

pub use archetype::{archetype_for, Archetype};

use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Catalog item as published by the storefront.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub style: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub ar_available: bool,
    #[serde(default)]
    pub rating: f32,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Minimal product record; the optional storefront fields stay empty.
    pub fn new(id: &str, name: &str, category: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price,
            images: Vec::new(),
            colors: Vec::new(),
            description: String::new(),
            dimensions: None,
            material: String::new(),
            style: String::new(),
            in_stock: true,
            ar_available: false,
            rating: 0.0,
        }
    }

    pub fn archetype(&self) -> Archetype {
        archetype_for(&self.name, &self.category)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Read-only product list in storefront order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&json)?;
        let catalog = Self::from_products(products)?;
        log::info!("Catalog loaded: {} products from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_json_uses_storefront_field_names() {
        let json = r#"{
            "id": "p1",
            "name": "Velvet Sofa",
            "category": "Living Room",
            "price": 1299.0,
            "images": ["sofa.jpg"],
            "colors": ["Navy"],
            "inStock": false,
            "arAvailable": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "p1");
        assert!(!product.in_stock);
        assert!(product.ar_available);
        assert_eq!(product.primary_image(), Some("sofa.jpg"));
        assert_eq!(product.archetype(), Archetype::Sofa);

        let out = serde_json::to_string(&product).unwrap();
        assert!(out.contains("\"arAvailable\":true"));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{ "id": "p2", "name": "Lamp", "category": "Decor", "price": 49.5 }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.images.is_empty());
        assert!(product.in_stock);
        assert_eq!(product.dimensions, None);
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let products = vec![
            Product::new("a", "Desk", "Office", 10.0),
            Product::new("a", "Bed", "Bedroom", 20.0),
        ];
        match Catalog::from_products(products) {
            Err(CatalogError::DuplicateProduct(id)) => assert_eq!(id, "a"),
            other => panic!("Expected duplicate error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn catalog_lookup_by_id() {
        let catalog = Catalog::from_products(vec![
            Product::new("a", "Desk", "Office", 10.0),
            Product::new("b", "Bed", "Bedroom", 20.0),
        ])
        .unwrap();
        assert_eq!(catalog.get("b").map(|p| p.name.as_str()), Some("Bed"));
        assert!(catalog.get("zzz").is_none());
        assert_eq!(catalog.len(), 2);
    }
}
