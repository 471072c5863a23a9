pub mod sma_cross;

pub use sma_cross::{confirm_buys, crossover, detect};
