//! Field validation for new catalog entries.
//!
//! Every rule is checked independently so a caller sees all violations at
//! once. Validation never touches the store.

use crate::core::record::ToolDraft;
use crate::core::schemas::{CATEGORY_SENTINEL, DEFAULT_CATEGORIES, UPLOADER_SENTINEL};

pub const NAME_MIN_CHARS: usize = 2;
pub const UPLOADER_MIN_CHARS: usize = 2;
pub const PURPOSE_MIN_CHARS: usize = 5;

pub const MSG_NAME: &str = "Name: must be at least 2 characters long.";
pub const MSG_TOOL_LINK: &str = "Tool link: must be a valid URL (http:// or https://).";
pub const MSG_CATEGORY: &str = "Category: please select a valid category.";
pub const MSG_UPLOADER_FREE_TEXT: &str = "Uploaded by: must be at least 2 characters long.";
pub const MSG_UPLOADER_ROSTER: &str = "Uploaded by: please select a contributor from the roster.";
pub const MSG_PURPOSE: &str = "Purpose: must be at least 5 characters long.";

/// How contributors identify themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploaderMode {
    FreeText,
    Roster(Vec<String>),
}

/// Enumerated domains the caller agreed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub categories: Vec<String>,
    pub uploader: UploaderMode,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            uploader: UploaderMode::FreeText,
        }
    }
}

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

fn is_http_url(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Check a draft against the rules. An empty result means the draft is valid.
pub fn validate(draft: &ToolDraft, rules: &ValidationRules) -> Vec<String> {
    let mut errors = Vec::new();

    if trimmed_len(&draft.name) < NAME_MIN_CHARS {
        errors.push(MSG_NAME.to_string());
    }

    let link = draft.tool_link.trim();
    if !link.is_empty() && !is_http_url(link) {
        errors.push(MSG_TOOL_LINK.to_string());
    }

    if draft.category == CATEGORY_SENTINEL || !rules.categories.contains(&draft.category) {
        errors.push(MSG_CATEGORY.to_string());
    }

    match &rules.uploader {
        UploaderMode::FreeText => {
            if trimmed_len(&draft.uploaded_by) < UPLOADER_MIN_CHARS {
                errors.push(MSG_UPLOADER_FREE_TEXT.to_string());
            }
        }
        UploaderMode::Roster(roster) => {
            if draft.uploaded_by == UPLOADER_SENTINEL || !roster.contains(&draft.uploaded_by) {
                errors.push(MSG_UPLOADER_ROSTER.to_string());
            }
        }
    }

    if trimmed_len(&draft.purpose) < PURPOSE_MIN_CHARS {
        errors.push(MSG_PURPOSE.to_string());
    }

    errors
}
