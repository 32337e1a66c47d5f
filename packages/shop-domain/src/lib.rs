pub mod category_name;
pub mod outcome;
pub mod plan;
pub mod prompt;
pub mod similarity;
pub mod vector;
pub mod verdict;

pub use outcome::SchemaOutcome;
pub use plan::{CategoryPlan, PlannedCategory};
pub use verdict::ProductVerdict;
