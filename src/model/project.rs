use serde::{Deserialize, Serialize};

use super::ids::ProjectId;
use super::validation::{
    PROJECT_DESCRIPTION_MAX, PROJECT_NAME_MAX, ValidationError, limit_chars, optional_text,
    require_text,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
}

impl Project {
    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trims text fields and checks required fields and length limits.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        let description = optional_text(self.description);

        require_text("project name", &name)?;
        limit_chars("project name", &name, PROJECT_NAME_MAX)?;
        if let Some(description) = &description {
            limit_chars("project description", description, PROJECT_DESCRIPTION_MAX)?;
        }

        Ok(Self { name, description })
    }
}

/// Partial update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NothingToChange { record: "project" });
        }
        let name = match self.name {
            Some(name) => {
                let name = name.trim().to_string();
                require_text("project name", &name)?;
                limit_chars("project name", &name, PROJECT_NAME_MAX)?;
                Some(name)
            }
            None => None,
        };
        let description = match self.description {
            Some(description) => {
                let description = optional_text(description);
                if let Some(text) = &description {
                    limit_chars("project description", text, PROJECT_DESCRIPTION_MAX)?;
                }
                Some(description)
            }
            None => None,
        };
        Ok(Self { name, description })
    }
}
