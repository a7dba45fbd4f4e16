pub mod ticker;

pub use ticker::BinanceTickerSource;
