use serde::{Deserialize, Serialize};

use crate::{Id, PipenetError, PipenetResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Engineer,
    Operator,
    Guest,
}

/// The already-authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Id,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Id::new(),
            name: name.into(),
            role,
        }
    }

    pub fn can_edit_network(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Engineer)
    }

    pub fn require_network_editor(&self, action: &str) -> PipenetResult<()> {
        if self.can_edit_network() {
            Ok(())
        } else {
            Err(PipenetError::unauthorized(format!(
                "{} is not authorized to {action}",
                self.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Actor, Role};

    #[test]
    fn only_admins_and_engineers_edit() {
        assert!(Actor::new("ada", Role::Admin).can_edit_network());
        assert!(Actor::new("eng", Role::Engineer).can_edit_network());
        assert!(!Actor::new("op", Role::Operator).can_edit_network());
        let err = Actor::new("guest", Role::Guest)
            .require_network_editor("create pipelines")
            .expect_err("guest");
        assert!(err.to_string().contains("guest is not authorized"));
    }
}
