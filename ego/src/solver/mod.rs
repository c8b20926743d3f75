mod bayesian_optimization;
mod bo_config;
mod bo_state;

pub use bayesian_optimization::*;
pub use bo_config::*;
pub use bo_state::*;
