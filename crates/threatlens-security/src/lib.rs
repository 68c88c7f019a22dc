//! threatlens-security: Clearance roles and the fail-closed disclosure policy.

pub mod disclosure;
pub mod role;

pub use disclosure::{DisclosurePolicy, DisclosureView, RiskDetails, Visibility};
pub use role::Role;
