//! User-facing acknowledgments for mutating actions.
//!
//! Every add/edit/complete/delete ends in exactly one `Notice`. Failure
//! notices are generic; the underlying error is logged, not shown.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn success(title: &str, description: &str) -> Self {
        Self { kind: NoticeKind::Success, title: title.into(), description: description.into() }
    }

    fn error(description: &str) -> Self {
        Self { kind: NoticeKind::Error, title: "Error".into(), description: description.into() }
    }

    pub fn added() -> Self {
        Self::success("Todo Added", "Your todo has been added successfully")
    }

    pub fn add_failed() -> Self {
        Self::error("An error occurred while adding the todo")
    }

    pub fn updated() -> Self {
        Self::success("Todo Updated", "Your todo has been updated successfully")
    }

    pub fn update_failed() -> Self {
        Self::error("An error occurred while updating the todo")
    }

    pub fn completed() -> Self {
        Self::success("Todo Done", "Your todo has been marked as done")
    }

    pub fn complete_failed() -> Self {
        Self::error("An error occurred while marking the todo as done")
    }

    pub fn deleted() -> Self {
        Self::success("Todo Deleted", "Your todo has been deleted successfully")
    }

    pub fn delete_failed() -> Self {
        Self::error("An error occurred while deleting the todo")
    }

    /// Validation failures name the problem, since nothing was sent.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, title: "Invalid Todo".into(), description: reason.into() }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}
