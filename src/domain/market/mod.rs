// Market sentiment domain
pub mod assessment;
pub mod market_regime;
pub mod palette;
pub mod signals;

pub use assessment::MarketAssessment;
pub use market_regime::MarketRegime;
pub use signals::{DataSource, SignalBundle, SourceHealth, SourceStatus};
