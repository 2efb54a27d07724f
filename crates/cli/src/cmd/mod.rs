mod plan;
mod rules;

pub use plan::cmd_plan;
pub use rules::cmd_rules;
