mod lhs_optimizer;

pub(crate) use lhs_optimizer::*;

/// Default number of local searches
pub const ACQ_N_START: usize = 10;
/// Default number of LHS candidates per dimension
pub const ACQ_N_POINTS: usize = 100;
/// Default max number of cost evaluations of one local search
pub const ACQ_MAX_EVAL: usize = 200;
/// Default tolerance under which two cost values are considered equal
pub const ACQ_TIE_TOL: f64 = 1e-12;
