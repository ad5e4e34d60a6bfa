//! Per-environment tick execution: the three-phase tick, its pure Phase B
//! compute core, and the injectable PRNG.

mod engine;
mod environment;
mod rng;

pub use engine::{run_phase_b, PhaseBOutput};
pub use environment::Environment;
pub use rng::TickRng;
