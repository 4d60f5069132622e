// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use networth_app::{
    Asset, CustomCategoryTemplate, EntityKind, Liability, find_template_for_record,
};
use networth_testkit::{DemoPortfolio, PortfolioFaker};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Seed for `--demo` so repeated runs show the same household.
pub const DEMO_SEED: u64 = 2026;

/// Everything the CLI renders, as stored in a JSON snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub liabilities: Vec<Liability>,
    #[serde(default)]
    pub templates: Vec<CustomCategoryTemplate>,
}

impl Snapshot {
    pub fn demo() -> Self {
        PortfolioFaker::new(DEMO_SEED).portfolio().into()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!(
                "read snapshot {} -- set [data].snapshot_path, pass --snapshot, or use --demo",
                path.display()
            )
        })?;
        let snapshot: Self = serde_json::from_str(&raw)
            .with_context(|| format!("decode snapshot {}", path.display()))?;
        snapshot.check()?;
        debug!(
            path = %path.display(),
            assets = snapshot.assets.len(),
            liabilities = snapshot.liabilities.len(),
            templates = snapshot.templates.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("encode snapshot as JSON")
    }

    /// Rejects duplicate ids; unmatched custom category names only warn since
    /// their stored fields still render.
    fn check(&self) -> Result<()> {
        unique_ids("asset", self.assets.iter().map(|asset| asset.id.as_str()))?;
        unique_ids(
            "liability",
            self.liabilities.iter().map(|liability| liability.id.as_str()),
        )?;

        let mut template_ids = HashSet::new();
        for template in &self.templates {
            if !template_ids.insert(template.id.as_str()) {
                bail!(
                    "snapshot contains template id {} more than once -- ids must be unique",
                    template.id
                );
            }
        }

        let custom_names = self
            .assets
            .iter()
            .filter_map(|asset| asset.category.template_name())
            .map(|name| (EntityKind::Asset, name))
            .chain(
                self.liabilities
                    .iter()
                    .filter_map(|liability| liability.category.template_name())
                    .map(|name| (EntityKind::Liability, name)),
            );
        for (kind, name) in custom_names {
            if find_template_for_record(&self.templates, kind, name).is_none() {
                warn!(%kind, name, "custom record has no matching template");
            }
        }
        Ok(())
    }
}

/// Ids only need to be unique within one collection.
fn unique_ids<'a>(collection: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            bail!("snapshot contains {collection} id {id} more than once -- ids must be unique");
        }
    }
    Ok(())
}

impl From<DemoPortfolio> for Snapshot {
    fn from(portfolio: DemoPortfolio) -> Self {
        Self {
            assets: portfolio.assets,
            liabilities: portfolio.liabilities,
            templates: portfolio.templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use anyhow::Result;
    use networth_app::{AssetCategory, CategoryShape};
    use networth_testkit::temp_snapshot_path;

    #[test]
    fn demo_snapshot_survives_a_file_round_trip() -> Result<()> {
        let (_dir, path) = temp_snapshot_path()?;
        let demo = Snapshot::demo();
        std::fs::write(&path, demo.to_json()?)?;

        let loaded = Snapshot::load(&path)?;
        assert_eq!(loaded.assets.len(), demo.assets.len());
        assert_eq!(loaded.liabilities.len(), demo.liabilities.len());
        assert_eq!(loaded.templates, demo.templates);
        Ok(())
    }

    #[test]
    fn rest_payload_shapes_decode() -> Result<()> {
        let (_dir, path) = temp_snapshot_path()?;
        std::fs::write(
            &path,
            r#"{
                "assets": [{
                    "_id": "64f1c0",
                    "name": "Salem plot",
                    "category": "land",
                    "value": 1250000.5,
                    "owner": "Meena",
                    "location": "Salem",
                    "purchaseDate": "2019-04-01T00:00:00.000Z",
                    "updatedAt": "2026-01-10T08:00:00Z"
                }]
            }"#,
        )?;
        let snapshot = Snapshot::load(&path)?;
        assert!(snapshot.liabilities.is_empty());
        let asset = &snapshot.assets[0];
        assert_eq!(asset.id.as_str(), "64f1c0");
        assert_eq!(asset.value_cents, 125_000_050);
        assert_eq!(asset.category, CategoryShape::Fixed(AssetCategory::Land));
        Ok(())
    }

    #[test]
    fn missing_file_mentions_how_to_fix() -> Result<()> {
        let (_dir, path) = temp_snapshot_path()?;
        let error = Snapshot::load(&path).expect_err("missing snapshot should fail");
        assert!(format!("{error:#}").contains("--demo"));
        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() -> Result<()> {
        let (_dir, path) = temp_snapshot_path()?;
        let mut demo = Snapshot::demo();
        let copy = demo.assets[0].clone();
        demo.assets.push(copy);
        std::fs::write(&path, demo.to_json()?)?;

        let error = Snapshot::load(&path).expect_err("duplicate id should fail");
        assert!(error.to_string().contains("more than once"));
        Ok(())
    }

    #[test]
    fn asset_and_liability_may_share_an_id() -> Result<()> {
        let (_dir, path) = temp_snapshot_path()?;
        let mut demo = Snapshot::demo();
        demo.liabilities[0].id = demo.assets[0].id.clone();
        std::fs::write(&path, demo.to_json()?)?;

        let loaded = Snapshot::load(&path)?;
        assert_eq!(loaded.liabilities[0].id, loaded.assets[0].id);
        Ok(())
    }

    #[test]
    fn malformed_json_reports_decode_context() -> Result<()> {
        let (_dir, path) = temp_snapshot_path()?;
        std::fs::write(&path, "{\"assets\": [")?;
        let error = Snapshot::load(&path).expect_err("truncated JSON should fail");
        assert!(error.to_string().contains("decode snapshot"));
        Ok(())
    }
}
