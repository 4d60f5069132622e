// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Dashboard totals. Percentages with a zero or negative denominator are `None`.

use serde::Serialize;
use tracing::debug;

use crate::grid::EMPTY_CELL;
use crate::ids::RecordId;
use crate::model::{Asset, CategoryCode, CategoryShape, Liability};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighestAsset {
    pub id: RecordId,
    pub name: String,
    pub value_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub label: String,
    pub total_cents: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_assets_cents: i64,
    pub total_liabilities_cents: i64,
    pub net_worth_cents: i64,
    pub asset_count: usize,
    pub liability_count: usize,
    pub total_appreciation_cents: i64,
    pub tracked_initial_cents: i64,
    pub assets_with_initial_value: usize,
    pub appreciation_percent: Option<f64>,
    pub highest_asset: Option<HighestAsset>,
    pub average_asset_cents: i64,
    pub debt_ratio_percent: Option<f64>,
    pub asset_breakdown: Vec<CategoryTotal>,
    pub liability_breakdown: Vec<CategoryTotal>,
}

impl FinancialSummary {
    pub fn compute(assets: &[Asset], liabilities: &[Liability]) -> Self {
        let total_assets_cents = saturating_total(assets.iter().map(|asset| asset.value_cents));
        let total_liabilities_cents =
            saturating_total(liabilities.iter().map(|liability| liability.balance_cents));

        let mut total_appreciation_cents = 0_i64;
        let mut tracked_initial_cents = 0_i64;
        let mut assets_with_initial_value = 0_usize;
        for asset in assets {
            if let Some(initial) = asset.details.initial_value_cents
                && initial > 0
            {
                total_appreciation_cents = total_appreciation_cents
                    .saturating_add(asset.value_cents.saturating_sub(initial));
                tracked_initial_cents = tracked_initial_cents.saturating_add(initial);
                assets_with_initial_value += 1;
            }
        }

        let mut highest: Option<&Asset> = None;
        for asset in assets {
            if highest.is_none_or(|max| asset.value_cents > max.value_cents) {
                highest = Some(asset);
            }
        }

        let average_asset_cents = if assets.is_empty() {
            0
        } else {
            total_assets_cents / assets.len() as i64
        };

        let summary = Self {
            total_assets_cents,
            total_liabilities_cents,
            net_worth_cents: total_assets_cents.saturating_sub(total_liabilities_cents),
            asset_count: assets.len(),
            liability_count: liabilities.len(),
            total_appreciation_cents,
            tracked_initial_cents,
            assets_with_initial_value,
            appreciation_percent: ratio_percent(total_appreciation_cents, tracked_initial_cents),
            highest_asset: highest.map(|asset| HighestAsset {
                id: asset.id.clone(),
                name: asset.name.clone(),
                value_cents: asset.value_cents,
            }),
            average_asset_cents,
            debt_ratio_percent: ratio_percent(total_liabilities_cents, total_assets_cents),
            asset_breakdown: breakdown(assets.iter().map(|asset| (&asset.category, asset.value_cents))),
            liability_breakdown: breakdown(
                liabilities
                    .iter()
                    .map(|liability| (&liability.category, liability.balance_cents)),
            ),
        };
        debug!(
            assets = summary.asset_count,
            liabilities = summary.liability_count,
            tracked = summary.assets_with_initial_value,
            "computed financial summary"
        );
        summary
    }
}

/// Gain or loss of one asset relative to its initial value, in percent.
pub fn percent_change(initial_cents: Option<i64>, current_cents: i64) -> Option<f64> {
    let initial = initial_cents?;
    ratio_percent(current_cents.saturating_sub(initial), initial)
}

/// `part / whole * 100`, undefined when `whole` is not positive.
pub fn ratio_percent(part: i64, whole: i64) -> Option<f64> {
    if whole <= 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| EMPTY_CELL.to_owned(), |value| format!("{value:.decimals$}%"))
}

/// Totals clamp at the `i64` range instead of wrapping.
fn saturating_total(cents: impl Iterator<Item = i64>) -> i64 {
    cents.fold(0, i64::saturating_add)
}

fn breakdown<'a, C: CategoryCode>(
    records: impl Iterator<Item = (&'a CategoryShape<C>, i64)>,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for (category, cents) in records {
        let label = category.label();
        match totals.iter_mut().find(|total| total.label == label) {
            Some(total) => {
                total.total_cents = total.total_cents.saturating_add(cents);
                total.count += 1;
            }
            None => totals.push(CategoryTotal {
                label: label.to_owned(),
                total_cents: cents,
                count: 1,
            }),
        }
    }
    totals.sort_by(|left, right| {
        right
            .total_cents
            .cmp(&left.total_cents)
            .then_with(|| left.label.cmp(&right.label))
    });
    totals
}

#[cfg(test)]
mod tests {
    use super::{FinancialSummary, format_percent, percent_change, ratio_percent};
    use crate::ids::RecordId;
    use crate::model::{
        Asset, AssetCategory, AssetDetails, CategoryShape, Liability, LiabilityCategory,
    };
    use time::macros::datetime;

    fn asset(id: &str, category: AssetCategory, value_cents: i64, initial: Option<i64>) -> Asset {
        Asset {
            id: RecordId::new(id),
            name: id.to_owned(),
            category: CategoryShape::Fixed(category),
            value_cents,
            owner: "Lakshmi".to_owned(),
            notes: String::new(),
            details: AssetDetails {
                initial_value_cents: initial,
                ..AssetDetails::default()
            },
            documents: Vec::new(),
            created_at: None,
            updated_at: datetime!(2026-01-01 0:00 UTC),
        }
    }

    fn liability(id: &str, balance_cents: i64) -> Liability {
        Liability {
            id: RecordId::new(id),
            name: id.to_owned(),
            category: CategoryShape::Fixed(LiabilityCategory::Loan),
            balance_cents,
            interest_rate: None,
            due_date: None,
            institution: None,
            owner: "Lakshmi".to_owned(),
            notes: String::new(),
            updated_at: datetime!(2026-01-01 0:00 UTC),
        }
    }

    #[test]
    fn totals_and_appreciation() {
        let assets = vec![
            asset("plot", AssetCategory::Land, 60_000, Some(40_000)),
            asset("coins", AssetCategory::Gold, 30_000, None),
            asset("fd", AssetCategory::FixedDeposit, 10_000, Some(0)),
        ];
        let liabilities = vec![liability("car", 25_000)];
        let summary = FinancialSummary::compute(&assets, &liabilities);

        assert_eq!(summary.total_assets_cents, 100_000);
        assert_eq!(summary.net_worth_cents, 75_000);
        assert_eq!(summary.total_appreciation_cents, 20_000);
        assert_eq!(summary.tracked_initial_cents, 40_000);
        assert_eq!(summary.assets_with_initial_value, 1);
        assert_eq!(summary.appreciation_percent, Some(50.0));
        assert_eq!(summary.debt_ratio_percent, Some(25.0));
        assert_eq!(summary.average_asset_cents, 33_333);
        assert_eq!(
            summary.highest_asset.map(|highest| highest.name),
            Some("plot".to_owned())
        );
        assert_eq!(summary.asset_breakdown[0].label, "Land");
        assert_eq!(summary.liability_breakdown[0].count, 1);
    }

    #[test]
    fn empty_inputs_leave_percentages_undefined() {
        let summary = FinancialSummary::compute(&[], &[]);
        assert_eq!(summary.appreciation_percent, None);
        assert_eq!(summary.debt_ratio_percent, None);
        assert_eq!(summary.highest_asset, None);
        assert_eq!(summary.average_asset_cents, 0);
        assert_eq!(format_percent(summary.debt_ratio_percent, 1), "—");
    }

    #[test]
    fn highest_asset_keeps_first_on_ties() {
        let assets = vec![
            asset("first", AssetCategory::Gold, 500, None),
            asset("second", AssetCategory::Gold, 500, None),
        ];
        let summary = FinancialSummary::compute(&assets, &[]);
        assert_eq!(
            summary.highest_asset.map(|highest| highest.name),
            Some("first".to_owned())
        );
        assert_eq!(summary.asset_breakdown.len(), 1);
        assert_eq!(summary.asset_breakdown[0].count, 2);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let assets = vec![
            asset("first", AssetCategory::Gold, 9_000_000_000_000_000_000, None),
            asset("second", AssetCategory::Gold, 9_000_000_000_000_000_000, Some(1)),
        ];
        let liabilities = vec![liability("loan", i64::MAX), liability("more", i64::MAX)];
        let summary = FinancialSummary::compute(&assets, &liabilities);
        assert_eq!(summary.total_assets_cents, i64::MAX);
        assert_eq!(summary.total_liabilities_cents, i64::MAX);
        assert_eq!(summary.net_worth_cents, 0);
        assert_eq!(summary.asset_breakdown[0].total_cents, i64::MAX);
        assert_eq!(percent_change(Some(-1), i64::MAX), None);
    }

    #[test]
    fn percent_change_policy() {
        assert_eq!(percent_change(Some(10_000), 12_500), Some(25.0));
        assert_eq!(percent_change(Some(0), 12_500), None);
        assert_eq!(percent_change(Some(-5), 12_500), None);
        assert_eq!(percent_change(None, 12_500), None);
        assert_eq!(ratio_percent(1, 4), Some(25.0));
        assert_eq!(format_percent(Some(-12.346), 2), "-12.35%");
    }
}
