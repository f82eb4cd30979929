//! Record selection for update, read and remove

mod where_query;

pub use where_query::{Condition, LikePattern, WhereQuery};
