pub mod calculations;
pub mod models;

pub use calculations::{ProposalEngine, RateCard, RateCardError};
pub use models::*;
