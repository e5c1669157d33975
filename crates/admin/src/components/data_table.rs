//! Data table component types.
//!
//! These types define the configuration for the product selection table.

use serde::{Deserialize, Serialize};

use reverb_bridge_core::ProductStatus;

use crate::shopify::types::ProductSort;

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Sort value prefix (`title`, `vendor`, ...) when the column is sortable.
    pub sort_field: Option<String>,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str, sort_field: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sort_field: Some(sort_field.to_string()),
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sort_field: None,
        }
    }

    /// Sort value to request when the header is clicked.
    ///
    /// Toggles direction when the table is already sorted by this column.
    #[must_use]
    pub fn next_sort(&self, current: &str) -> Option<String> {
        let field = self.sort_field.as_deref()?;
        let asc = format!("{field}-asc");
        if current == asc {
            Some(format!("{field}-desc"))
        } else {
            Some(asc)
        }
    }
}

/// Filter type for data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Text input filter.
    Text,
    /// Single-select dropdown.
    Select,
}

/// Filter definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFilter {
    /// Filter parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Filter type.
    pub filter_type: FilterType,
    /// Placeholder text (for text inputs).
    pub placeholder: Option<String>,
    /// Available options (for selects).
    pub options: Vec<FilterOption>,
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a text filter.
    #[must_use]
    pub fn text(key: &str, label: &str, placeholder: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Text,
            placeholder: Some(placeholder.to_string()),
            options: vec![],
        }
    }

    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            placeholder: None,
            options,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.filter_type == FilterType::Text
    }
}

/// Bulk action definition for data tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAction {
    /// Form action the selected IDs are sent to.
    pub action: String,
    /// HTTP method of the form.
    pub method: String,
    /// Display label.
    pub label: String,
}

impl BulkAction {
    /// A bulk action submitted with GET (selection is passed as repeated `id`).
    #[must_use]
    pub fn get(action: &str, label: &str) -> Self {
        Self {
            action: action.to_string(),
            method: "get".to_string(),
            label: label.to_string(),
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Bulk action definitions.
    pub bulk_actions: Vec<BulkAction>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            bulk_actions: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a bulk action.
    #[must_use]
    pub fn bulk_action(mut self, action: BulkAction) -> Self {
        self.bulk_actions.push(action);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }
}

/// Build the product selection table configuration.
#[must_use]
pub fn products_table_config() -> DataTableConfig {
    let status_options = std::iter::once(FilterOption::new("", "All"))
        .chain(
            [
                ProductStatus::Active,
                ProductStatus::Draft,
                ProductStatus::Archived,
            ]
            .into_iter()
            .map(|s| FilterOption::new(s.search_value(), s.label())),
        )
        .collect();

    let sort_options = ProductSort::OPTIONS
        .iter()
        .map(|(value, label)| FilterOption::new(value, label))
        .collect();

    DataTableConfig::new("products")
        .column(TableColumn::new("image", ""))
        .column(TableColumn::sortable("name", "Name", "title"))
        .column(TableColumn::new("sku", "SKU"))
        .column(TableColumn::new("in_stock", "In Stock?"))
        .column(TableColumn::sortable("stock", "Stock", "inventory"))
        .column(TableColumn::new("price", "Price"))
        .column(TableColumn::new("status", "Status on Shopify"))
        .column(TableColumn::sortable("modified", "Last Modified", "updated"))
        .column(TableColumn::new("reverb", "Status on Reverb"))
        .filter(TableFilter::text("q", "Search", "Search by name"))
        .filter(TableFilter::select("status", "Status", status_options))
        .filter(TableFilter::text("type", "Product type", "e.g. Electric Guitars"))
        .filter(TableFilter::select("sort", "Sort", sort_options))
        .bulk_action(BulkAction::get("/listings/new", "Create Reverb listings"))
        .search_placeholder("Search by name")
        .empty_state(
            "No products found",
            Some("Try adjusting your search or filters"),
        )
}
