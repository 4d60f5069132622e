// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::grid::{Grid, PageSize, SortDirection, SortSpec, ViewState, effective_page};

/// Interaction state of one table, driven by commands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridState {
    pub view: ViewState,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCommand {
    RequestSort(String),
    SetSearch(String),
    SetColumnFilter { column: String, value: String },
    ClearColumnFilter(String),
    ClearColumnFilters,
    SetCategoryFilter(Option<String>),
    SetPage(usize),
    SetPageSize(usize),
    /// Re-applies the page clamp after the result size changed.
    Reconcile { total: usize },
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    SortChanged(SortSpec),
    SortUnavailable(String),
    SearchChanged(String),
    ColumnFiltersChanged,
    CategoryFilterChanged(Option<String>),
    PageChanged(usize),
    PageSizeChanged(PageSize),
    PageReset,
    StatusUpdated(String),
    StatusCleared,
}

impl GridState {
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            status_line: None,
        }
    }

    pub fn dispatch<T>(&mut self, grid: &Grid<T>, command: GridCommand) -> Vec<GridEvent> {
        match command {
            GridCommand::RequestSort(column) => self.request_sort(grid, column),
            GridCommand::SetSearch(query) => {
                self.view.search_query = query.clone();
                vec![GridEvent::SearchChanged(query)]
            }
            GridCommand::SetColumnFilter { column, value } => {
                if value.is_empty() {
                    self.view.column_filters.remove(&column);
                } else {
                    self.view.column_filters.insert(column, value);
                }
                vec![GridEvent::ColumnFiltersChanged]
            }
            GridCommand::ClearColumnFilter(column) => {
                self.view.column_filters.remove(&column);
                vec![GridEvent::ColumnFiltersChanged]
            }
            GridCommand::ClearColumnFilters => {
                self.view.column_filters.clear();
                vec![
                    GridEvent::ColumnFiltersChanged,
                    self.set_status("column filters cleared"),
                ]
            }
            GridCommand::SetCategoryFilter(value) => {
                let value = value.filter(|value| !value.is_empty());
                self.view.category_filter = value.clone();
                vec![GridEvent::CategoryFilterChanged(value)]
            }
            GridCommand::SetPage(page) => {
                self.view.page = page;
                vec![GridEvent::PageChanged(page)]
            }
            GridCommand::SetPageSize(size) => match PageSize::new(size) {
                Some(size) => {
                    self.view.page_size = size;
                    self.view.page = 0;
                    vec![GridEvent::PageSizeChanged(size), GridEvent::PageChanged(0)]
                }
                None => {
                    let message = format!(
                        "page size {size} not allowed; choose one of {:?}",
                        PageSize::ALLOWED
                    );
                    vec![self.set_status(&message)]
                }
            },
            GridCommand::Reconcile { total } => {
                let page = effective_page(total, self.view.page, self.view.page_size);
                if page == self.view.page {
                    return Vec::new();
                }
                self.view.page = page;
                vec![GridEvent::PageReset]
            }
            GridCommand::ClearStatus => {
                self.status_line = None;
                vec![GridEvent::StatusCleared]
            }
        }
    }

    fn request_sort<T>(&mut self, grid: &Grid<T>, column: String) -> Vec<GridEvent> {
        let sortable = grid.column(&column).is_some_and(|column| column.sortable);
        if !sortable {
            let message = format!("column {column} is not sortable");
            return vec![GridEvent::SortUnavailable(column), self.set_status(&message)];
        }
        let direction = match &self.view.sort {
            Some(current) if current.key == column && current.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        let spec = SortSpec {
            key: column,
            direction,
        };
        self.view.sort = Some(spec.clone());
        vec![GridEvent::SortChanged(spec)]
    }

    fn set_status(&mut self, message: &str) -> GridEvent {
        self.status_line = Some(message.to_owned());
        GridEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{GridCommand, GridEvent, GridState};
    use crate::grid::{Column, Grid, PageSize, SortDirection, SortSpec};
    use crate::model::Scalar;
    use std::collections::BTreeMap;

    type Row = BTreeMap<String, Scalar>;

    fn grid() -> Grid<Row> {
        Grid::new(vec![
            Column::new("name", "Name"),
            Column::new("notes", "Notes").not_sortable(),
        ])
    }

    #[test]
    fn sort_requests_toggle_direction() {
        let grid = grid();
        let mut state = GridState::default();

        let events = state.dispatch(&grid, GridCommand::RequestSort("name".to_owned()));
        let ascending = SortSpec {
            key: "name".to_owned(),
            direction: SortDirection::Asc,
        };
        assert_eq!(events, vec![GridEvent::SortChanged(ascending)]);

        state.dispatch(&grid, GridCommand::RequestSort("name".to_owned()));
        assert_eq!(
            state.view.sort.as_ref().map(|sort| sort.direction),
            Some(SortDirection::Desc)
        );

        state.dispatch(&grid, GridCommand::RequestSort("name".to_owned()));
        assert_eq!(
            state.view.sort.as_ref().map(|sort| sort.direction),
            Some(SortDirection::Asc)
        );
    }

    #[test]
    fn unsortable_columns_report_status() {
        let grid = grid();
        let mut state = GridState::default();
        let events = state.dispatch(&grid, GridCommand::RequestSort("notes".to_owned()));
        assert_eq!(events[0], GridEvent::SortUnavailable("notes".to_owned()));
        assert!(state.view.sort.is_none());
        assert_eq!(state.status_line.as_deref(), Some("column notes is not sortable"));

        state.dispatch(&grid, GridCommand::ClearStatus);
        assert!(state.status_line.is_none());
    }

    #[test]
    fn page_size_change_resets_page() {
        let grid = grid();
        let mut state = GridState::default();
        state.dispatch(&grid, GridCommand::SetPage(3));

        let events = state.dispatch(&grid, GridCommand::SetPageSize(25));
        assert_eq!(state.view.page, 0);
        assert_eq!(state.view.page_size.get(), 25);
        assert_eq!(
            events,
            vec![
                GridEvent::PageSizeChanged(PageSize::new(25).expect("allowed size")),
                GridEvent::PageChanged(0),
            ]
        );

        let rejected = state.dispatch(&grid, GridCommand::SetPageSize(30));
        assert!(matches!(rejected[0], GridEvent::StatusUpdated(_)));
        assert_eq!(state.view.page_size.get(), 25);
    }

    #[test]
    fn reconcile_clamps_out_of_range_page() {
        let grid = grid();
        let mut state = GridState::default();
        state.dispatch(&grid, GridCommand::SetPage(2));

        assert!(state.dispatch(&grid, GridCommand::Reconcile { total: 25 }).is_empty());
        assert_eq!(state.view.page, 2);

        let events = state.dispatch(&grid, GridCommand::Reconcile { total: 3 });
        assert_eq!(events, vec![GridEvent::PageReset]);
        assert_eq!(state.view.page, 0);
    }

    #[test]
    fn filters_set_and_clear() {
        let grid = grid();
        let mut state = GridState::default();
        state.dispatch(
            &grid,
            GridCommand::SetColumnFilter {
                column: "name".to_owned(),
                value: "gold".to_owned(),
            },
        );
        assert_eq!(state.view.column_filters.len(), 1);

        state.dispatch(
            &grid,
            GridCommand::SetColumnFilter {
                column: "name".to_owned(),
                value: String::new(),
            },
        );
        assert!(state.view.column_filters.is_empty());

        state.dispatch(&grid, GridCommand::SetCategoryFilter(Some(String::new())));
        assert_eq!(state.view.category_filter, None);
        state.dispatch(&grid, GridCommand::SetCategoryFilter(Some("loan".to_owned())));
        assert_eq!(state.view.category_filter.as_deref(), Some("loan"));
    }
}
