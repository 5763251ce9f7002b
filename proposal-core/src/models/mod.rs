mod derived;
mod lifecycle;
mod product;
mod proposal;
mod roof_type;
mod tier;

pub use derived::{DerivedRecord, LineItem};
pub use lifecycle::{LifecycleError, ProposalStatus, folder_name};
pub use product::Product;
pub use proposal::{JobSite, LineItemInput, PreviousInputs, ProposalInputs};
pub use roof_type::RoofType;
pub use tier::{Tier, TierValues};
