//! Asset records as stored in the shared key-value store.

use serde::{Deserialize, Serialize};

use crate::geo::Site;

/// An exposed asset: an identified object at a site carrying a monetary
/// value. The serde field names match the wire records written by the risk
/// computation, which this subsystem only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "AssetID")]
    pub asset_id: String,

    #[serde(rename = "AssetValue")]
    pub value: f64,

    pub lon: f64,
    pub lat: f64,
}

impl Asset {
    pub fn new(asset_id: impl Into<String>, value: f64, lon: f64, lat: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            value,
            lon,
            lat,
        }
    }

    /// The asset's location.
    pub fn site(&self) -> Site {
        Site::new(self.lon, self.lat)
    }
}
