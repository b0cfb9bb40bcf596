pub mod aggregator;
pub mod error;
pub mod result;
pub mod window;

pub use aggregator::{Aggregator, aggregate};
pub use error::AnalyticsError;
pub use result::AnalyticsResult;
pub use window::{AnalyticsParams, AnalyticsQuery};
