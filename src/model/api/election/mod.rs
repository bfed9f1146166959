mod desc;
mod results;
mod spec;

pub use desc::ElectionDetails;
pub use results::{AuditError, ElectionResults};
pub use spec::ElectionSpec;
