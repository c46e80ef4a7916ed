//! Audience roles used to select explanation phrasing

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Consumer persona for recommendations and insights.
///
/// Roles only change wording. They are not an access-control boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    PlantManager,
    MaintenanceEngineer,
    MlEngineer,
}

impl Role {
    /// All roles, in display order
    pub const ALL: [Role; 3] = [Role::PlantManager, Role::MaintenanceEngineer, Role::MlEngineer];

    /// Wire token (`plant_manager`, `maintenance_engineer`, `ml_engineer`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PlantManager => "plant_manager",
            Role::MaintenanceEngineer => "maintenance_engineer",
            Role::MlEngineer => "ml_engineer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role token is outside the fixed vocabulary
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role '{0}' (expected plant_manager, maintenance_engineer or ml_engineer)")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "plant_manager" => Ok(Role::PlantManager),
            "maintenance_engineer" => Ok(Role::MaintenanceEngineer),
            "ml_engineer" => Ok(Role::MlEngineer),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}
