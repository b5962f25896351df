use reqwest::Url;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::RetailerId;

pub const THAI_WATSADU: &str = "thai_watsadu";
pub const HOMEPRO: &str = "homepro";
pub const GLOBAL_HOUSE: &str = "global_house";
pub const DOHOME: &str = "dohome";
pub const BOONTHAVORN: &str = "boonthavorn";
pub const MEGA_HOME: &str = "mega_home";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetailerInfo {
    pub id: RetailerId,
    pub name: String,
    pub name_th: String,
    pub domains: Vec<String>,
    pub color: String,
    pub primary: bool,
}

impl RetailerInfo {
    pub fn new(id: &str, name: &str, name_th: &str, domains: &[&str], color: &str) -> Self {
        Self {
            id: RetailerId::new(id),
            name: name.to_string(),
            name_th: name_th.to_string(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            color: color.to_string(),
            primary: false,
        }
    }

    /// True when `url` parses and its host is one of this retailer's domains
    /// (or a subdomain of one).
    pub fn owns_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        self.domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }
}

/// Known retailers, in display order. Exactly one entry is the primary
/// (home) retailer the others are compared against.
#[derive(Debug, Clone)]
pub struct RetailerRegistry {
    retailers: Vec<RetailerInfo>,
}

impl Default for RetailerRegistry {
    fn default() -> Self {
        let mut primary = RetailerInfo::new(
            THAI_WATSADU,
            "Thai Watsadu",
            "ไทวัสดุ",
            &["thaiwatsadu.com", "www.thaiwatsadu.com"],
            "#DC2626",
        );
        primary.primary = true;

        Self {
            retailers: vec![
                primary,
                RetailerInfo::new(
                    HOMEPRO,
                    "HomePro",
                    "โฮมโปร",
                    &["homepro.co.th", "www.homepro.co.th"],
                    "#1E88E5",
                ),
                RetailerInfo::new(
                    GLOBAL_HOUSE,
                    "Global House",
                    "โกลบอลเฮ้าส์",
                    &["globalhouse.co.th", "www.globalhouse.co.th", "global-house.co.th"],
                    "#F57C00",
                ),
                RetailerInfo::new(
                    DOHOME,
                    "DoHome",
                    "ดูโฮม",
                    &["dohome.co.th", "www.dohome.co.th"],
                    "#E64A19",
                ),
                RetailerInfo::new(
                    BOONTHAVORN,
                    "Boonthavorn",
                    "บุญถาวร",
                    &["boonthavorn.com", "www.boonthavorn.com"],
                    "#7B1FA2",
                ),
                RetailerInfo::new(
                    MEGA_HOME,
                    "MegaHome",
                    "เมกาโฮม",
                    &["megahome.co.th", "www.megahome.co.th"],
                    "#43A047",
                ),
            ],
        }
    }
}

impl RetailerRegistry {
    pub fn all(&self) -> &[RetailerInfo] {
        &self.retailers
    }

    pub fn primary(&self) -> &RetailerInfo {
        self.retailers
            .iter()
            .find(|r| r.primary)
            .unwrap_or(&self.retailers[0])
    }

    pub fn competitors(&self) -> impl Iterator<Item = &RetailerInfo> {
        self.retailers.iter().filter(|r| !r.primary)
    }

    pub fn get(&self, id: &RetailerId) -> Option<&RetailerInfo> {
        self.retailers.iter().find(|r| r.id == *id)
    }

    /// Resolves a free-form retailer name (`HOMEPRO`, `homepro`, `Global House`).
    pub fn resolve(&self, name: &str) -> Option<&RetailerInfo> {
        self.get(&RetailerId::new(name))
    }

    pub fn ids(&self) -> impl Iterator<Item = &RetailerId> {
        self.retailers.iter().map(|r| &r.id)
    }
}

/// Pulls a SKU out of a retailer product URL.
///
/// Tries `/product/<sku>` and `/p/<sku>`, then `?sku=` / `?id=`, then the last
/// path segment when it looks like an identifier.
pub fn extract_sku_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if let Some(pos) = segments.iter().position(|s| *s == "product" || *s == "p") {
        if let Some(sku) = segments.get(pos + 1) {
            return Some((*sku).to_string());
        }
    }

    if let Some((_, value)) = parsed
        .query_pairs()
        .find(|(k, v)| (k == "sku" || k == "id") && !v.is_empty())
    {
        return Some(value.into_owned());
    }

    segments
        .last()
        .filter(|seg| {
            seg.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map(|seg| (*seg).to_string())
}
