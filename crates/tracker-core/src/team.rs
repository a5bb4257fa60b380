//! Teams: the groups that visit locations.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub id:     i64,
  pub name:   String,
  pub leader: String,
}

/// Input to team creation and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInput {
  pub name:   String,
  pub leader: String,
}

impl TeamInput {
  /// Reject a team without a usable name.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::InvalidInput("team name must not be empty".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_name_is_invalid() {
    let input = TeamInput { name: "   ".into(), leader: "Kim".into() };
    assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
  }

  #[test]
  fn empty_leader_is_allowed() {
    let input = TeamInput { name: "North".into(), leader: String::new() };
    assert!(input.validate().is_ok());
  }
}
