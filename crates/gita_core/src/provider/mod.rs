pub mod deterministic;
pub mod live;

pub use deterministic::DeterministicProvider;
pub use live::LiveProvider;
