use serde::{Deserialize, Serialize};

use super::{ValidationError, default_active_status, require_text};

pub type EmployeeId = i64;
pub type CrewId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub name: String,
    pub phone: Option<String>,
    pub status: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active_status")]
    pub status: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl EmployeeInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            status: default_active_status(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// A crew with its members resolved to employee records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCrew {
    pub crew_id: CrewId,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub members: Vec<Employee>,
}

impl WorkCrew {
    pub fn member_ids(&self) -> Vec<EmployeeId> {
        self.members.iter().map(|m| m.employee_id).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCrewInput {
    pub name: String,
    #[serde(default = "default_active_status")]
    pub status: String,
    #[serde(default)]
    pub member_ids: Vec<EmployeeId>,
}

impl WorkCrewInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: default_active_status(),
            member_ids: Vec::new(),
        }
    }

    pub fn with_members(mut self, member_ids: impl IntoIterator<Item = EmployeeId>) -> Self {
        self.member_ids = member_ids.into_iter().collect();
        self
    }

    /// Member ids in first-seen order with repeats dropped.
    pub fn distinct_member_ids(&self) -> Vec<EmployeeId> {
        let mut seen = Vec::with_capacity(self.member_ids.len());
        for id in &self.member_ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}
