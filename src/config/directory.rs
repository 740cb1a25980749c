//! Participant directory configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::participant::{HiddenParticipantPolicy, DEFAULT_HIDDEN_USERNAME};

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Username that is always hidden from rosters and notifications
    #[serde(default = "default_hidden_username")]
    pub hidden_username: String,
}

impl DirectoryConfig {
    pub fn hidden_policy(&self) -> HiddenParticipantPolicy {
        HiddenParticipantPolicy::new(self.hidden_username.trim_start_matches('@'))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hidden_username.trim_start_matches('@').trim().is_empty() {
            return Err(ValidationError::EmptyHiddenUsername);
        }
        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            hidden_username: default_hidden_username(),
        }
    }
}

fn default_hidden_username() -> String {
    DEFAULT_HIDDEN_USERNAME.to_string()
}
