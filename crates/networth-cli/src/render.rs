// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use networth_app::validation::format_cents;
use networth_app::{
    CustomCategoryTemplate, FieldDefinition, FinancialSummary, FormSlot, FormStructure, Grid,
    GridRow, View, format_percent, render_cell,
};

const COLUMN_GAP: &str = "  ";

/// Fixed-width table of the current page followed by a `1-10 of 25` footer.
pub fn grid_table<T: GridRow>(grid: &Grid<T>, view: &View<'_, T>) -> String {
    if view.total() == 0 {
        return "No data available\n".to_owned();
    }

    let header = grid
        .columns
        .iter()
        .map(|column| column.label.clone())
        .collect::<Vec<_>>();
    let body = view
        .rows()
        .iter()
        .map(|row| {
            grid.columns
                .iter()
                .map(|column| render_cell(column, *row))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut lines = aligned(&header, &body);
    let range = view.range();
    lines.push(String::new());
    lines.push(format!(
        "{}-{} of {} (page {}/{})",
        range.start + 1,
        range.end,
        view.total(),
        view.page() + 1,
        view.page_count()
    ));
    lines.join("\n") + "\n"
}

pub fn form_structure(structure: &FormStructure<'_>) -> String {
    let mut lines = vec![format!("{} form", capitalize(structure.kind.as_str()))];
    for slot in structure.slots() {
        match slot {
            FormSlot::Field(definition) => lines.push(field_line(definition)),
            FormSlot::CustomFields(Some(template)) => {
                lines.push(format!("  [{} fields]", template.name));
                for field in &template.fields {
                    lines.push(format!(
                        "    {} <{}>{}",
                        field.name,
                        field.field_type.as_str(),
                        if field.required { " *" } else { "" }
                    ));
                }
            }
            FormSlot::CustomFields(None) => {
                lines.push("  [custom fields from the chosen template]".to_owned());
            }
        }
    }
    lines.join("\n") + "\n"
}

fn field_line(definition: &FieldDefinition) -> String {
    let mut line = format!(
        "  {} ({}) <{}>",
        definition.label,
        definition.field_name,
        definition.field_type.as_str()
    );
    if definition.required {
        line.push_str(" *");
    }
    if let Some(helper) = definition.helper_text {
        line.push_str(" -- ");
        line.push_str(helper);
    }
    line
}

pub fn summary_report(summary: &FinancialSummary, currency_symbol: &str) -> String {
    let money = |cents: i64| format_cents(cents, currency_symbol);
    let mut rows = vec![
        ("Total Assets".to_owned(), money(summary.total_assets_cents)),
        ("Total Items".to_owned(), plural(summary.asset_count, "asset", "assets")),
    ];
    if summary.average_asset_cents > 0 {
        rows.push(("Average Value".to_owned(), money(summary.average_asset_cents)));
    }
    rows.extend([
        (
            "Total Liabilities".to_owned(),
            money(summary.total_liabilities_cents),
        ),
        (
            "Total Debts".to_owned(),
            plural(summary.liability_count, "liability", "liabilities"),
        ),
        (
            "Debt Ratio".to_owned(),
            format_percent(summary.debt_ratio_percent, 1),
        ),
        ("Net Worth".to_owned(), money(summary.net_worth_cents)),
        (
            "Status".to_owned(),
            if summary.net_worth_cents >= 0 {
                "Positive"
            } else {
                "Needs Attention"
            }
            .to_owned(),
        ),
    ]);
    if let Some(highest) = &summary.highest_asset {
        rows.push(("Top Asset".to_owned(), highest.name.clone()));
    }
    if summary.assets_with_initial_value > 0 {
        rows.push((
            "Appreciation".to_owned(),
            format!(
                "{} ({})",
                money(summary.total_appreciation_cents),
                format_percent(summary.appreciation_percent, 2)
            ),
        ));
    }

    let mut lines = rows
        .into_iter()
        .map(|(label, value)| format!("{label:<18}{value}"))
        .collect::<Vec<_>>();
    for (title, breakdown) in [
        ("Asset Distribution", &summary.asset_breakdown),
        ("Liabilities Distribution", &summary.liability_breakdown),
    ] {
        if breakdown.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.to_owned());
        let body = breakdown
            .iter()
            .map(|total| {
                vec![
                    total.label.clone(),
                    total.count.to_string(),
                    money(total.total_cents),
                ]
            })
            .collect::<Vec<_>>();
        let header = ["Category", "Count", "Total"].map(str::to_owned);
        lines.extend(aligned(&header, &body));
    }
    lines.join("\n") + "\n"
}

pub fn templates_table(templates: &[CustomCategoryTemplate]) -> String {
    if templates.is_empty() {
        return "No custom categories yet\n".to_owned();
    }
    let header = ["Id", "Name", "Type", "Fields"].map(str::to_owned);
    let body = templates
        .iter()
        .map(|template| {
            let fields = template
                .fields
                .iter()
                .map(|field| field.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                template.id.to_string(),
                template.name.clone(),
                template.category_type.as_str().to_owned(),
                fields,
            ]
        })
        .collect::<Vec<_>>();
    aligned(&header, &body).join("\n") + "\n"
}

fn aligned(header: &[String], body: &[Vec<String>]) -> Vec<String> {
    let mut widths = header
        .iter()
        .map(|cell| cell.chars().count())
        .collect::<Vec<_>>();
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_owned()
    };
    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);

    let mut lines = vec![line(header), rule];
    lines.extend(body.iter().map(|row| line(row.as_slice())));
    lines
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{form_structure, grid_table, summary_report, templates_table};
    use anyhow::Result;
    use networth_app::{
        EntityKind, FinancialSummary, PageSize, SortDirection, SortSpec, ViewState, asset_grid,
        build_form_structure, compute_view, resolve_fields,
    };
    use networth_testkit::{PortfolioFaker, vehicle_template};

    #[test]
    fn grid_table_shows_page_footer() {
        let portfolio = PortfolioFaker::new(5).portfolio();
        let grid = asset_grid("₹");
        let state = ViewState {
            page_size: PageSize::new(5).expect("allowed size"),
            sort: Some(SortSpec {
                key: "value".to_owned(),
                direction: SortDirection::Desc,
            }),
            ..ViewState::default()
        };
        let view = compute_view(&portfolio.assets, &grid, &state);
        let table = grid_table(&grid, &view);

        let lines = table.lines().collect::<Vec<_>>();
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].starts_with("----"));
        // header, rule, five rows, blank, footer
        assert_eq!(lines.len(), 9);
        assert_eq!(
            lines[8],
            format!("1-5 of {} (page 1/3)", portfolio.assets.len())
        );
    }

    #[test]
    fn empty_grid_says_so() {
        let grid = asset_grid("₹");
        let view = compute_view(&[], &grid, &ViewState::default());
        assert_eq!(grid_table(&grid, &view), "No data available\n");
    }

    #[test]
    fn form_lists_fields_in_render_order() -> Result<()> {
        let resolved = resolve_fields(EntityKind::Liability, "mortgage", &[])?;
        let rendered = form_structure(&build_form_structure(EntityKind::Liability, resolved));
        let name = rendered.find("(name)").expect("name field");
        let institution = rendered.find("(institution)").expect("institution field");
        let balance = rendered.find("(balance)").expect("balance field");
        let notes = rendered.find("(notes)").expect("notes field");
        assert!(rendered.starts_with("Liability form"));
        assert!(name < institution && institution < balance && balance < notes);
        Ok(())
    }

    #[test]
    fn form_expands_template_fields() -> Result<()> {
        let templates = [vehicle_template()];
        let resolved = resolve_fields(EntityKind::Asset, "tpl-vehicle", &templates)?;
        let rendered = form_structure(&build_form_structure(EntityKind::Asset, resolved));
        assert!(rendered.contains("[Vehicle fields]"));
        assert!(rendered.contains("Registration <text> *"));
        Ok(())
    }

    #[test]
    fn summary_mentions_status_and_distribution() {
        let portfolio = PortfolioFaker::new(8).portfolio();
        let summary = FinancialSummary::compute(&portfolio.assets, &portfolio.liabilities);
        let report = summary_report(&summary, "₹");
        assert!(report.contains("Total Assets"));
        assert!(report.contains("Net Worth"));
        assert!(report.contains("Asset Distribution"));
        assert!(report.contains("Positive") || report.contains("Needs Attention"));
    }

    #[test]
    fn empty_summary_shows_dash_for_ratio() {
        let report = summary_report(&FinancialSummary::compute(&[], &[]), "$");
        assert!(report.contains("Debt Ratio        —"));
        assert!(report.contains("0 assets"));
        assert!(!report.contains("Top Asset"));
    }

    #[test]
    fn templates_table_lists_field_names() {
        let table = templates_table(&[vehicle_template()]);
        assert!(table.contains("tpl-vehicle"));
        assert!(table.contains("Registration, Model Year, Insurance Renewal"));
        assert_eq!(templates_table(&[]), "No custom categories yet\n");
    }
}
