use serde::{Deserialize, Serialize};

use super::{ValidationError, default_active_status, require_text};

pub type ClientId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub account_id: ClientId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub status: String,
}

/// Full client record as supplied on create and replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default = "default_active_status")]
    pub status: String,
}

impl ClientInput {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            status: default_active_status(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}
