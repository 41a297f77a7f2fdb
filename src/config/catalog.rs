//! Seed catalog loading from config.toml
//!
//! The optional `[[products]]` list in config.toml is inserted into an empty database on
//! startup, so a fresh install starts with the usual product line-up.

use crate::{
    core::product::{self, ProductInput},
    entities::Product,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Products to seed into an empty database
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// One seeded product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Model designation
    pub model: String,
    /// Purchase price per unit
    pub purchase_price: i64,
    /// Initial stock
    #[serde(default)]
    pub stock_quantity: i64,
}

/// Loads the seed catalog from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads ./config.toml, or an empty catalog if the file does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

/// Inserts the seed products when the products table is empty.
///
/// Returns how many products were inserted (0 when the table already had rows).
pub async fn seed_products(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    if Product::find().count(db).await? > 0 {
        return Ok(0);
    }

    for seed in &config.products {
        product::record_product(
            db,
            ProductInput {
                name: seed.name.clone(),
                model: seed.model.clone(),
                purchase_price: seed.purchase_price.to_string(),
                stock_quantity: seed.stock_quantity.to_string(),
            },
        )
        .await?;
    }

    if !config.products.is_empty() {
        info!("Seeded {} default products", config.products.len());
    }
    Ok(config.products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    const SAMPLE: &str = r#"
        [[products]]
        name = "AirPods 2. generáció"
        model = "AirPods 2"
        purchase_price = 45000
        stock_quantity = 10

        [[products]]
        name = "AirPods Pro 2. generáció"
        model = "AirPods Pro 2"
        purchase_price = 80000
    "#;

    #[test]
    fn test_parse_catalog() -> Result<()> {
        let config: Config = toml::from_str(SAMPLE).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        assert_eq!(config.products.len(), 2);
        assert_eq!(config.products[0].purchase_price, 45000);
        assert_eq!(config.products[1].stock_quantity, 0);
        Ok(())
    }

    #[test]
    fn test_missing_products_section_is_empty() -> Result<()> {
        let config: Config = toml::from_str("").map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        assert!(config.products.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_only_into_empty_table() -> Result<()> {
        let db = setup_test_db().await?;
        let config: Config = toml::from_str(SAMPLE).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;

        assert_eq!(seed_products(&db, &config).await?, 2);
        assert_eq!(seed_products(&db, &config).await?, 0);
        assert_eq!(Product::find().count(&db).await?, 2);
        Ok(())
    }
}
