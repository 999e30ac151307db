use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{JournalId, ProjectId};
use super::validation::{JOURNAL_CONTENT_MAX, ValidationError, limit_chars, require_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: JournalId,
    pub project_id: ProjectId,
    pub date: NaiveDate,
    pub content: String,
}

impl Journal {
    pub fn apply(&mut self, patch: &JournalPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDraft {
    pub project_id: ProjectId,
    pub date: NaiveDate,
    pub content: String,
}

impl JournalDraft {
    pub fn new(project_id: ProjectId, date: NaiveDate, content: impl Into<String>) -> Self {
        Self {
            project_id,
            date,
            content: content.into(),
        }
    }

    /// Content is stored as written; only blankness and length are checked.
    pub fn validated(self) -> Result<Self, ValidationError> {
        check_content(&self.content)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPatch {
    pub date: Option<NaiveDate>,
    pub content: Option<String>,
}

impl JournalPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.content.is_none()
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NothingToChange { record: "journal" });
        }
        if let Some(content) = &self.content {
            check_content(content)?;
        }
        Ok(self)
    }
}

fn check_content(content: &str) -> Result<(), ValidationError> {
    require_text("journal content", content)?;
    limit_chars("journal content", content, JOURNAL_CONTENT_MAX)
}
