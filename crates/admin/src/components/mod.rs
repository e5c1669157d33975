//! Reusable page components.

pub mod data_table;

pub use data_table::{
    BulkAction, DataTableConfig, FilterOption, FilterType, TableColumn, TableFilter,
    products_table_config,
};
