use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::JobSite;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot move a proposal from {from} to {to}")]
    IllegalTransition {
        from: ProposalStatus,
        to: ProposalStatus,
    },

    #[error("unrecognised proposal status '{0}'")]
    UnknownStatus(String),
}

/// Where a proposal sits in the sales pipeline.
///
/// Proposals start `Open`; from there they either go under contract or are
/// filed as dead. Contracts close as `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Open,
    UnderContract,
    Completed,
    Dead,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::UnderContract => "under-contract",
            Self::Completed => "completed",
            Self::Dead => "dead",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LifecycleError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "under-contract" | "under" | "contract" => Ok(Self::UnderContract),
            "completed" => Ok(Self::Completed),
            "dead" => Ok(Self::Dead),
            _ => Err(LifecycleError::UnknownStatus(s.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Dead)
    }

    pub fn can_move_to(
        &self,
        to: ProposalStatus,
    ) -> bool {
        matches!(
            (self, to),
            (Self::Open, Self::UnderContract)
                | (Self::Open, Self::Dead)
                | (Self::UnderContract, Self::Completed)
        )
    }

    /// Returns the new status, or an error when the move is not allowed.
    pub fn move_to(
        self,
        to: ProposalStatus,
    ) -> Result<ProposalStatus, LifecycleError> {
        if self.can_move_to(to) {
            Ok(to)
        } else {
            Err(LifecycleError::IllegalTransition { from: self, to })
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Folder a proposal's artefacts are grouped under.
pub fn folder_name(site: &JobSite) -> String {
    format!("{} - {}", site.customer_name, site.street_address)
}
