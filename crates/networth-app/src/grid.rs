// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! In-memory table view: search, category filter, column filters, sort, page.
//!
//! `compute_view` is a pure function of the rows, the column set and a
//! [`ViewState`]. Nothing here mutates the source rows.

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::{Arc, LazyLock};
use time::macros::format_description;
use tracing::{debug, warn};

use crate::model::{
    Asset, AssetCategory, CategoryCode, Liability, LiabilityCategory, Scalar, major_to_cents,
};
use crate::validation::{format_cents, parse_date};

pub const EMPTY_CELL: &str = "—";

/// A row the grid can read cells from by column id.
pub trait GridRow {
    fn cell(&self, column_id: &str) -> Scalar;
}

impl GridRow for Asset {
    fn cell(&self, column_id: &str) -> Scalar {
        self.field(column_id)
    }
}

impl GridRow for Liability {
    fn cell(&self, column_id: &str) -> Scalar {
        self.field(column_id)
    }
}

impl GridRow for BTreeMap<String, Scalar> {
    fn cell(&self, column_id: &str) -> Scalar {
        self.get(column_id).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Text,
    Number,
    Date,
    Select,
}

pub type CellFormat<T> = Arc<dyn Fn(&Scalar, &T) -> String + Send + Sync>;

pub struct Column<T> {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    pub filterable: bool,
    pub filter_type: FilterType,
    pub format: Option<CellFormat<T>>,
}

impl<T> Column<T> {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sortable: true,
            filterable: true,
            filter_type: FilterType::Text,
            format: None,
        }
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn format(mut self, format: impl Fn(&Scalar, &T) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(Arc::new(format));
        self
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            filter_type: self.filter_type,
            format: self.format.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("filter_type", &self.filter_type)
            .field("format", &self.format.is_some())
            .finish()
    }
}

/// One entry of the category filter selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
    pub field: String,
}

#[derive(Debug, Clone)]
pub struct Grid<T> {
    pub columns: Vec<Column<T>>,
    pub filter_options: Vec<FilterOption>,
}

impl<T> Grid<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            filter_options: Vec::new(),
        }
    }

    pub fn with_filter_options(mut self, filter_options: Vec<FilterOption>) -> Self {
        self.filter_options = filter_options;
        self
    }

    pub fn column(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|column| column.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub const ALLOWED: [usize; 5] = [5, 10, 25, 50, 100];

    pub fn new(size: usize) -> Option<Self> {
        Self::ALLOWED.contains(&size).then_some(Self(size))
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size).ok_or_else(|| {
            format!(
                "page size {size} is not one of {:?}",
                Self::ALLOWED
            )
        })
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// Transient interaction state; held apart from the data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub search_query: String,
    pub column_filters: BTreeMap<String, String>,
    pub category_filter: Option<String>,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: PageSize,
}

impl ViewState {
    /// Same state with paging dropped; paging never changes which rows match.
    fn match_key(&self) -> Self {
        Self {
            page: 0,
            page_size: PageSize::default(),
            ..self.clone()
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct View<'a, T> {
    matches: Vec<&'a T>,
    page: usize,
    page_size: PageSize,
}

impl<'a, T> View<'a, T> {
    fn new(matches: Vec<&'a T>, requested_page: usize, page_size: PageSize) -> Self {
        let page = effective_page(matches.len(), requested_page, page_size);
        Self {
            matches,
            page,
            page_size,
        }
    }

    /// Every row that passed the filters, in sorted order.
    pub fn matches(&self) -> &[&'a T] {
        &self.matches
    }

    pub fn rows(&self) -> &[&'a T] {
        &self.matches[self.range()]
    }

    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.page_size.get()).min(self.matches.len());
        let end = (start + self.page_size.get()).min(self.matches.len());
        start..end
    }

    pub fn total(&self) -> usize {
        self.matches.len()
    }

    /// The page actually shown; differs from the request when it was out of range.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.matches.len().div_ceil(self.page_size.get())
    }
}

/// Requested page when it starts inside the result, otherwise the first page.
pub fn effective_page(total: usize, page: usize, page_size: PageSize) -> usize {
    let max_page = total.div_ceil(page_size.get()).saturating_sub(1);
    if page > max_page { 0 } else { page }
}

pub fn compute_view<'a, T: GridRow>(rows: &'a [T], grid: &Grid<T>, state: &ViewState) -> View<'a, T> {
    let indices = matching_indices(rows, grid, state);
    let view = View::new(
        indices.into_iter().map(|index| &rows[index]).collect(),
        state.page,
        state.page_size,
    );
    debug!(
        rows = rows.len(),
        matched = view.total(),
        page = view.page(),
        "computed grid view"
    );
    view
}

fn matching_indices<T: GridRow>(rows: &[T], grid: &Grid<T>, state: &ViewState) -> Vec<usize> {
    let mut indices = (0..rows.len()).collect::<Vec<_>>();

    let query = state.search_query.trim().to_lowercase();
    if !query.is_empty() {
        indices.retain(|&index| matches_search(&rows[index], grid, &query));
    }

    if let Some(value) = state.category_filter.as_deref().filter(|value| !value.is_empty()) {
        match grid.filter_options.iter().find(|option| option.value == value) {
            Some(option) => indices.retain(|&index| {
                matches!(rows[index].cell(&option.field), Scalar::Text(text) if text == value)
            }),
            None => warn!(value, "ignoring category filter without a matching option"),
        }
    }

    for (column_id, filter) in &state.column_filters {
        if filter.is_empty() {
            continue;
        }
        let Some(column) = grid.column(column_id) else {
            continue;
        };
        if !column.filterable {
            continue;
        }
        indices.retain(|&index| matches_column_filter(&rows[index].cell(column_id), column, filter));
    }

    if let Some(sort) = &state.sort {
        let mut keyed = indices
            .into_iter()
            .map(|index| (rows[index].cell(&sort.key), index))
            .collect::<Vec<_>>();
        keyed.sort_by(|(left, _), (right, _)| compare_cells(left, right, sort.direction));
        indices = keyed.into_iter().map(|(_, index)| index).collect();
    }

    indices
}

fn matches_search<T: GridRow>(row: &T, grid: &Grid<T>, query: &str) -> bool {
    grid.columns.iter().any(|column| {
        let value = row.cell(&column.id);
        !value.is_null() && value.display().to_lowercase().contains(query)
    })
}

fn matches_column_filter<T>(value: &Scalar, column: &Column<T>, filter: &str) -> bool {
    if value.is_null() {
        return false;
    }
    let needle = filter.to_lowercase();
    let haystack = value.display().to_lowercase();
    if column.filter_type == FilterType::Number {
        let wanted = parse_numeric(filter);
        let actual = match value {
            Scalar::Number(number) => Some(*number),
            Scalar::Text(text) => parse_numeric(text),
            Scalar::Null => None,
        };
        if matches!((wanted, actual), (Some(wanted), Some(actual)) if wanted == actual) {
            return true;
        }
    }
    haystack.contains(&needle)
}

fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Nulls sort last whatever the direction; only non-null comparisons flip.
pub fn compare_cells(left: &Scalar, right: &Scalar, direction: SortDirection) -> Ordering {
    match (left.is_null(), right.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let ordering = match (left, right) {
        (Scalar::Number(left), Scalar::Number(right)) => {
            left.partial_cmp(right).unwrap_or(Ordering::Equal)
        }
        _ => compare_text(&left.display(), &right.display()),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

static COLLATOR: LazyLock<CollatorBorrowed<'static>> = LazyLock::new(|| {
    Collator::try_new(Default::default(), CollatorOptions::default())
        .expect("compiled root collation data")
});

/// Root-locale collation; raw code-point order breaks collator ties so the order is total.
fn compare_text(left: &str, right: &str) -> Ordering {
    COLLATOR
        .compare(left, right)
        .then_with(|| left.cmp(right))
}

/// Display text for one cell: the column's formatter, else the raw value, else an em-dash.
pub fn render_cell<T: GridRow>(column: &Column<T>, row: &T) -> String {
    let value = row.cell(&column.id);
    if let Some(format) = &column.format {
        return format(&value, row);
    }
    if value.is_null() {
        EMPTY_CELL.to_owned()
    } else {
        value.display()
    }
}

/// Remembers the last matching set so unchanged inputs are not recomputed.
///
/// Callers bump `revision` whenever the rows or the column set change.
#[derive(Debug, Default)]
pub struct ViewMemo {
    key: Option<(u64, ViewState)>,
    indices: Vec<usize>,
    computations: usize,
}

impl ViewMemo {
    pub fn view<'a, T: GridRow>(
        &mut self,
        revision: u64,
        rows: &'a [T],
        grid: &Grid<T>,
        state: &ViewState,
    ) -> View<'a, T> {
        let key = (revision, state.match_key());
        let stale = self.key.as_ref() != Some(&key)
            || self.indices.iter().any(|&index| index >= rows.len());
        if stale {
            self.indices = matching_indices(rows, grid, state);
            self.key = Some(key);
            self.computations += 1;
        }
        View::new(
            self.indices.iter().map(|&index| &rows[index]).collect(),
            state.page,
            state.page_size,
        )
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// How many times the pipeline actually ran.
    pub fn computations(&self) -> usize {
        self.computations
    }
}

fn money_cell(value: &Scalar, currency_symbol: &str) -> String {
    value
        .as_number()
        .and_then(major_to_cents)
        .map_or_else(|| EMPTY_CELL.to_owned(), |cents| format_cents(cents, currency_symbol))
}

fn long_date_cell(value: &Scalar) -> String {
    let Scalar::Text(text) = value else {
        return EMPTY_CELL.to_owned();
    };
    let day = text.get(..10).unwrap_or(text);
    parse_date(day)
        .ok()
        .and_then(|date| {
            date.format(&format_description!(
                "[day padding:none] [month repr:long] [year]"
            ))
            .ok()
        })
        .unwrap_or_else(|| text.clone())
}

fn text_or_dash(value: &Scalar) -> String {
    match value {
        Scalar::Text(text) if !text.is_empty() => text.clone(),
        Scalar::Number(_) => value.display(),
        _ => EMPTY_CELL.to_owned(),
    }
}

pub fn asset_grid(currency_symbol: &str) -> Grid<Asset> {
    let symbol = currency_symbol.to_owned();
    Grid::new(vec![
        Column::new("name", "Name"),
        Column::new("category", "Category")
            .format(|_, asset: &Asset| asset.category.label().to_owned()),
        Column::new("institution", "Institution").format(|value, _| text_or_dash(value)),
        Column::new("owner", "Owner"),
        Column::new("value", "Value")
            .filter_type(FilterType::Number)
            .format(move |value, _| money_cell(value, &symbol)),
        Column::new("updatedAt", "Updated")
            .filter_type(FilterType::Date)
            .format(|value, _| long_date_cell(value)),
    ])
    .with_filter_options(category_options(
        AssetCategory::ALL.iter().map(|category| (category.as_str(), category.label())),
    ))
}

pub fn liability_grid(currency_symbol: &str) -> Grid<Liability> {
    let symbol = currency_symbol.to_owned();
    Grid::new(vec![
        Column::new("name", "Name"),
        Column::new("category", "Category")
            .format(|_, liability: &Liability| liability.category.label().to_owned()),
        Column::new("institution", "Institution").format(|value, _| text_or_dash(value)),
        Column::new("owner", "Owner"),
        Column::new("balance", "Balance")
            .filter_type(FilterType::Number)
            .format(move |value, _| money_cell(value, &symbol)),
        Column::new("interestRate", "Interest Rate")
            .filter_type(FilterType::Number)
            .format(|value, _| match value {
                Scalar::Null => EMPTY_CELL.to_owned(),
                other => format!("{}%", other.display()),
            }),
        Column::new("dueDate", "Due Date")
            .filter_type(FilterType::Date)
            .format(|value, _| long_date_cell(value)),
        Column::new("updatedAt", "Updated")
            .filter_type(FilterType::Date)
            .format(|value, _| long_date_cell(value)),
    ])
    .with_filter_options(category_options(
        LiabilityCategory::ALL
            .iter()
            .map(|category| (category.as_str(), category.label())),
    ))
}

fn category_options<'a>(
    categories: impl Iterator<Item = (&'a str, &'a str)>,
) -> Vec<FilterOption> {
    categories
        .map(|(value, label)| FilterOption {
            label: label.to_owned(),
            value: value.to_owned(),
            field: "category".to_owned(),
        })
        .collect()
}
