pub mod aggregated;
pub mod row_set;
pub mod schema;

pub use aggregated::{AggregatedRow, AggregatedRowSet};
pub use row_set::RowSet;
pub use schema::ColumnKind;
