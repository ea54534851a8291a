pub mod price;
pub mod trend;

pub use price::PriceSnapshot;
pub use trend::{Trend, TrendAnalysis};
