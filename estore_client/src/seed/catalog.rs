use crate::contract::ProductEntry;
use crate::error::{ClientError, Result};
use crate::units::{to_wei, EtherUnit};
use chrono::{DateTime, Utc};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category shared by the sample products
pub const SAMPLE_CATEGORY: &str = "Cell Phones & Accessories";

/// Auction window shared by every entry of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedWindow {
    pub start_time: u64,
    pub end_time: u64,
}

impl SeedWindow {
    /// Capture the current wall-clock second and open a window of `length_secs`
    pub fn capture(length_secs: u64) -> Result<Self> {
        Self::starting_at(Utc::now(), length_secs)
    }

    /// Window opening at `now`, rounded to the nearest second
    pub fn starting_at(now: DateTime<Utc>, length_secs: u64) -> Result<Self> {
        let millis = now.timestamp_millis().max(0) as u64;
        let start_time = (millis + 500) / 1000;
        let end_time = start_time.checked_add(length_secs).ok_or_else(|| {
            ClientError::Config(format!(
                "seed window of {} seconds overflows the end time",
                length_secs
            ))
        })?;
        Ok(Self {
            start_time,
            end_time,
        })
    }
}

/// One product of a catalog, before it is stamped with a window and price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub category: String,
    pub image_link: String,
    pub desc_link: String,
    /// Price override in ether
    #[serde(default)]
    pub price_ether: Option<String>,
    /// Status override
    #[serde(default)]
    pub status: Option<u64>,
}

/// Ordered list of products to seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
}

impl Catalog {
    /// The four sample phones
    pub fn sample() -> Self {
        let items = ["iphone6", "iphone6s", "iphone7", "iphone7s"]
            .iter()
            .map(|name| CatalogItem {
                name: name.to_string(),
                category: SAMPLE_CATEGORY.to_string(),
                image_link: "imagelink".to_string(),
                desc_link: "desclink".to_string(),
                price_ether: None,
                status: None,
            })
            .collect();
        Self { items }
    }

    /// Load a catalog from a JSON file holding either `{"items": [...]}` or a bare array
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let catalog = if value.is_array() {
            Catalog {
                items: serde_json::from_value::<Vec<CatalogItem>>(value)?,
            }
        } else {
            serde_json::from_value::<Catalog>(value)?
        };
        if catalog.items.is_empty() {
            return Err(ClientError::Config(format!(
                "catalog {} has no entries",
                path.as_ref().display()
            )));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stamp every item with the shared window and default price/status.
    ///
    /// `default_price` is already in wei; item overrides are converted here.
    pub fn into_entries(
        self,
        window: SeedWindow,
        default_price: U256,
        default_status: u64,
    ) -> Result<Vec<ProductEntry>> {
        self.items
            .into_iter()
            .map(|item| {
                let price = match &item.price_ether {
                    Some(amount) => to_wei(amount, EtherUnit::Ether)?,
                    None => default_price,
                };
                Ok(ProductEntry {
                    name: item.name,
                    category: item.category,
                    image_link: item.image_link,
                    desc_link: item.desc_link,
                    start_time: window.start_time,
                    end_time: window.end_time,
                    price,
                    status: item.status.unwrap_or(default_status),
                })
            })
            .collect()
    }
}
