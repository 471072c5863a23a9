pub mod random;
pub mod simulator;

pub use random::{RandomSource, SequenceRandom, StdRandom};
pub use simulator::{next_live_state, LiveTickSimulator, LIVE_SMA_PERIOD};
