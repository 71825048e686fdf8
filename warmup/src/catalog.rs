//! Section to asset lookup and warm-up planning.
//!
//! A catalog answers "which images does this page section need, and how
//! urgently". [`StaticCatalog`] is a read-only table, usually loaded from a
//! JSON manifest:
//!
//! ```json
//! {
//!   "sections": {
//!     "hero": {
//!       "critical": ["https://cdn.example.com/hero.webp"],
//!       "lazy": [{ "id": "hero/pattern", "locator": "https://cdn.example.com/p.png" }]
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::asset::{AssetRef, Priority};

/// How urgently a group of assets is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetTier {
    /// Needed for first paint.
    Critical,
    /// Needed shortly after.
    Important,
    /// Can arrive whenever.
    Lazy,
}

impl AssetTier {
    /// All tiers, most urgent first.
    pub const ALL: [AssetTier; 3] = [AssetTier::Critical, AssetTier::Important, AssetTier::Lazy];

    /// Fetch priority hint used for this tier.
    pub fn default_priority(&self) -> Priority {
        match self {
            AssetTier::Critical => Priority::High,
            AssetTier::Important => Priority::Auto,
            AssetTier::Lazy => Priority::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetTier::Critical => "critical",
            AssetTier::Important => "important",
            AssetTier::Lazy => "lazy",
        }
    }
}

impl fmt::Display for AssetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(AssetTier::Critical),
            "important" => Ok(AssetTier::Important),
            "lazy" => Ok(AssetTier::Lazy),
            _ => Err(format!(
                "Invalid tier '{}'. Valid options: critical, important, lazy",
                s
            )),
        }
    }
}

/// Errors from loading a catalog or building a plan.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown section '{0}'")]
    UnknownSection(String),
}

/// Read-only lookup from page section to tiered asset lists.
pub trait AssetCatalog: Send + Sync {
    /// Section names in a stable order.
    fn sections(&self) -> Vec<String>;

    /// Assets for one tier of one section, or `None` if the section is unknown.
    fn assets(&self, section: &str, tier: AssetTier) -> Option<Vec<AssetRef>>;
}

#[derive(Debug, Deserialize)]
struct Manifest {
    sections: BTreeMap<String, ManifestSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ManifestSection {
    critical: Vec<ManifestEntry>,
    important: Vec<ManifestEntry>,
    lazy: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Locator(String),
    Handle { id: String, locator: String },
}

impl From<ManifestEntry> for AssetRef {
    fn from(entry: ManifestEntry) -> Self {
        match entry {
            ManifestEntry::Locator(locator) => AssetRef::locator(locator),
            ManifestEntry::Handle { id, locator } => AssetRef::handle(id, locator),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SectionAssets {
    critical: Vec<AssetRef>,
    important: Vec<AssetRef>,
    lazy: Vec<AssetRef>,
}

impl SectionAssets {
    fn tier(&self, tier: AssetTier) -> &[AssetRef] {
        match tier {
            AssetTier::Critical => &self.critical,
            AssetTier::Important => &self.important,
            AssetTier::Lazy => &self.lazy,
        }
    }

    fn tier_mut(&mut self, tier: AssetTier) -> &mut Vec<AssetRef> {
        match tier {
            AssetTier::Critical => &mut self.critical,
            AssetTier::Important => &mut self.important,
            AssetTier::Lazy => &mut self.lazy,
        }
    }
}

/// In-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    sections: BTreeMap<String, SectionAssets>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add assets to a section tier, creating the section if needed.
    pub fn with_assets<I, A>(mut self, section: &str, tier: AssetTier, assets: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AssetRef>,
    {
        self.sections
            .entry(section.to_string())
            .or_default()
            .tier_mut(tier)
            .extend(assets.into_iter().map(Into::into));
        self
    }

    /// Parse a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let sections = manifest
            .sections
            .into_iter()
            .map(|(name, section)| {
                let assets = SectionAssets {
                    critical: section.critical.into_iter().map(Into::into).collect(),
                    important: section.important.into_iter().map(Into::into).collect(),
                    lazy: section.lazy.into_iter().map(Into::into).collect(),
                };
                (name, assets)
            })
            .collect();
        Ok(Self { sections })
    }

    /// Read and parse a JSON manifest file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl AssetCatalog for StaticCatalog {
    fn sections(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    fn assets(&self, section: &str, tier: AssetTier) -> Option<Vec<AssetRef>> {
        self.sections
            .get(section)
            .map(|assets| assets.tier(tier).to_vec())
    }
}

/// Assets of one tier, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTier {
    pub tier: AssetTier,
    pub assets: Vec<AssetRef>,
}

impl PlannedTier {
    pub fn priority(&self) -> Priority {
        self.tier.default_priority()
    }
}

/// Ordered warm-up work for a set of sections.
///
/// Tiers run critical first. An asset listed more than once (within or
/// across sections and tiers) is kept only at its first, most urgent
/// position. Empty tiers are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmupPlan {
    tiers: Vec<PlannedTier>,
}

impl WarmupPlan {
    /// Plan the given sections, in the given order.
    pub fn for_sections<C, S>(catalog: &C, sections: &[S]) -> Result<Self, CatalogError>
    where
        C: AssetCatalog + ?Sized,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut tiers = Vec::new();

        for tier in AssetTier::ALL {
            let mut assets = Vec::new();
            for section in sections {
                let section = section.as_ref();
                let listed = catalog
                    .assets(section, tier)
                    .ok_or_else(|| CatalogError::UnknownSection(section.to_string()))?;
                for asset in listed {
                    if seen.insert(asset.as_locator().to_string()) {
                        assets.push(asset);
                    }
                }
            }
            if !assets.is_empty() {
                tiers.push(PlannedTier { tier, assets });
            }
        }

        Ok(Self { tiers })
    }

    /// Plan every section in the catalog.
    pub fn for_all<C>(catalog: &C) -> Self
    where
        C: AssetCatalog + ?Sized,
    {
        let sections = catalog.sections();
        // Sections come from the catalog itself, so lookup cannot fail.
        Self::for_sections(catalog, &sections).unwrap_or_default()
    }

    pub fn tiers(&self) -> &[PlannedTier] {
        &self.tiers
    }

    /// Total number of assets across all tiers.
    pub fn total(&self) -> usize {
        self.tiers.iter().map(|t| t.assets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "sections": {
            "hero": {
                "critical": ["https://cdn.test/hero.png"],
                "important": [{ "id": "hero/portrait", "locator": "https://cdn.test/portrait.png" }],
                "lazy": ["https://cdn.test/pattern.png"]
            },
            "skills": {
                "critical": ["https://cdn.test/pattern.png"],
                "lazy": ["https://cdn.test/badge.png", "https://cdn.test/hero.png"]
            }
        }
    }"#;

    fn locators(tier: &PlannedTier) -> Vec<&str> {
        tier.assets.iter().map(|a| a.as_locator()).collect()
    }

    #[test]
    fn test_tier_priorities() {
        assert_eq!(AssetTier::Critical.default_priority(), Priority::High);
        assert_eq!(AssetTier::Important.default_priority(), Priority::Auto);
        assert_eq!(AssetTier::Lazy.default_priority(), Priority::Low);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("Critical".parse::<AssetTier>(), Ok(AssetTier::Critical));
        assert!("urgent".parse::<AssetTier>().is_err());
    }

    #[test]
    fn test_manifest_parses_both_entry_forms() {
        let catalog = StaticCatalog::from_json(MANIFEST).unwrap();

        assert_eq!(catalog.sections(), vec!["hero", "skills"]);
        let important = catalog.assets("hero", AssetTier::Important).unwrap();
        assert_eq!(
            important,
            vec![AssetRef::handle("hero/portrait", "https://cdn.test/portrait.png")]
        );
        // Missing tiers are empty
        assert_eq!(catalog.assets("skills", AssetTier::Important), Some(vec![]));
        assert_eq!(catalog.assets("footer", AssetTier::Critical), None);
    }

    #[test]
    fn test_invalid_manifest() {
        let result = StaticCatalog::from_json(r#"{ "sections": { "hero": { "critical": [42] } } }"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = StaticCatalog::load(Path::new("/nonexistent/warmup/manifest.json"));
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let catalog = StaticCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_plan_orders_and_deduplicates() {
        let catalog = StaticCatalog::from_json(MANIFEST).unwrap();
        let plan = WarmupPlan::for_sections(&catalog, &["hero", "skills"]).unwrap();

        let tiers = plan.tiers();
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].tier, AssetTier::Critical);
        assert_eq!(
            locators(&tiers[0]),
            vec!["https://cdn.test/hero.png", "https://cdn.test/pattern.png"]
        );
        assert_eq!(locators(&tiers[1]), vec!["https://cdn.test/portrait.png"]);
        // pattern and hero were already planned as critical
        assert_eq!(locators(&tiers[2]), vec!["https://cdn.test/badge.png"]);
        assert_eq!(plan.total(), 4);
    }

    #[test]
    fn test_plan_skips_empty_tiers() {
        let catalog = StaticCatalog::new().with_assets("nav", AssetTier::Lazy, ["a.png", "b.png"]);
        let plan = WarmupPlan::for_sections(&catalog, &["nav"]).unwrap();

        assert_eq!(plan.tiers().len(), 1);
        assert_eq!(plan.tiers()[0].priority(), Priority::Low);
    }

    #[test]
    fn test_plan_unknown_section() {
        let catalog = StaticCatalog::new();
        let result = WarmupPlan::for_sections(&catalog, &["hero"]);
        assert!(matches!(result, Err(CatalogError::UnknownSection(s)) if s == "hero"));
    }

    #[test]
    fn test_plan_all_sections() {
        let catalog = StaticCatalog::from_json(MANIFEST).unwrap();
        let plan = WarmupPlan::for_all(&catalog);
        assert_eq!(plan.total(), 4);
    }

    #[test]
    fn test_empty_plan() {
        let plan = WarmupPlan::for_all(&StaticCatalog::new());
        assert!(plan.is_empty());
        assert_eq!(plan.total(), 0);
    }
}
