pub mod sma;

pub use sma::{sma_series, trailing_sma, RollingSma};
