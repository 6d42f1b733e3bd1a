//! Library side of the learner record validator CLI.

pub mod logging;
pub mod pipeline;
