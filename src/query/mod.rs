pub mod filter;
pub mod criteria;
pub mod stream;

pub use filter::{Bound, DateBound, Filter};
pub use criteria::{FilterCriteria, create_filters};
pub use stream::{Query, limit};
