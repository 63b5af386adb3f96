use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub address: String,
    pub share: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// A named categorical attribute with a discrete value set and optional
/// per-value weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitConfig {
    pub name: String,
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl TraitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(ForgeError::InvalidConfig(format!(
                "Trait '{}' has no values",
                self.name
            )));
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.values.len() {
                return Err(ForgeError::InvalidConfig(format!(
                    "Trait '{}' has {} weights for {} values",
                    self.name,
                    weights.len(),
                    self.values.len()
                )));
            }
            if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
                return Err(ForgeError::InvalidConfig(format!(
                    "Trait '{}' has a negative or non-finite weight",
                    self.name
                )));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(ForgeError::InvalidConfig(format!(
                    "Trait '{}' weights must sum to more than zero",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub size: u32,
    pub seller_fee_basis_points: u16,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub traits: Vec<TraitConfig>,
}

impl CollectionConfig {
    /// Rejects malformed configs before any sampling or archive work starts.
    /// Creator shares must sum to 100 when creators are listed.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForgeError::InvalidConfig(
                "Collection name must not be empty".into(),
            ));
        }
        if self.size < 1 {
            return Err(ForgeError::InvalidConfig(
                "Collection size must be at least 1".into(),
            ));
        }
        if !self.creators.is_empty() {
            let total: u32 = self.creators.iter().map(|c| c.share).sum();
            if total != 100 {
                return Err(ForgeError::InvalidConfig(format!(
                    "Creator shares must sum to 100, got {}",
                    total
                )));
            }
        }
        for trait_config in &self.traits {
            trait_config.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    pub uri: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Properties {
    pub files: Vec<FileSpec>,
    pub category: String,
    pub creators: Vec<Creator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRef {
    pub name: String,
    pub family: String,
}

/// Per-item metadata record following the MPL token metadata layout.
/// Built once at packaging time, written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seller_fee_basis_points: u16,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub properties: Properties,
    pub collection: CollectionRef,
}

impl NftMetadata {
    /// Builds the record for item `index` (0-based) from an already-sampled
    /// trait mapping. Display name and image reference are 1-based.
    pub fn build(config: &CollectionConfig, index: u32, traits: &[(String, String)]) -> Self {
        let image = format!("{}.png", index + 1);

        NftMetadata {
            name: format!("{} #{}", config.name, index + 1),
            symbol: config.symbol.clone(),
            description: config.description.clone(),
            seller_fee_basis_points: config.seller_fee_basis_points,
            image: image.clone(),
            attributes: traits
                .iter()
                .map(|(trait_type, value)| Attribute {
                    trait_type: trait_type.clone(),
                    value: value.clone(),
                })
                .collect(),
            properties: Properties {
                files: vec![FileSpec {
                    uri: image,
                    file_type: "image/png".to_string(),
                }],
                category: "image".to_string(),
                creators: config.creators.clone(),
            },
            collection: CollectionRef {
                name: config.name.clone(),
                family: config.symbol.clone(),
            },
        }
    }
}

/// Collection-level record, written once as `collection.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seller_fee_basis_points: u16,
    pub image: String,
    pub properties: Properties,
}

impl CollectionMetadata {
    pub fn build(config: &CollectionConfig) -> Self {
        CollectionMetadata {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            description: config.description.clone(),
            seller_fee_basis_points: config.seller_fee_basis_points,
            image: "collection.png".to_string(),
            properties: Properties {
                files: vec![FileSpec {
                    uri: "collection.png".to_string(),
                    file_type: "image/png".to_string(),
                }],
                category: "image".to_string(),
                creators: config.creators.clone(),
            },
        }
    }
}
