pub mod bbox;
pub mod evaluator;
pub mod predicate;
pub mod pruning;
pub mod scalar;

pub use bbox::BoundingBox;
pub use predicate::{CompareOp, Predicate};
pub use pruning::{ColumnRange, RowGroupStats, StatValue};
pub use scalar::Scalar;
