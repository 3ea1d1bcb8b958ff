//! Catalog-wide consistency checks.
//!
//! Runs before any document is generated. All checks run; their failures are
//! collected into one [`ValidationError`] so a catalog author sees every
//! problem in a single pass.
//!
//! | Check | OGC API Styles requirement |
//! |-------|----------------------------|
//! | Style ids are unique | 3D |
//! | `default` names an existing style | 3G |
//! | Each style has a typed `stylesheet` link | 3E |

use crate::links::LinkRelation;
use crate::types::{StyleMetadata, StylesConfig};
use std::collections::HashSet;
use thiserror::Error;

/// Every failed check, in check order (uniqueness, default, per-style).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation errors found:{}", bullet_list(.messages))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

fn bullet_list(messages: &[String]) -> String {
    messages.iter().map(|m| format!("\n  - {m}")).collect()
}

pub fn validate(catalog: &StylesConfig) -> Result<(), ValidationError> {
    let mut messages = Vec::new();
    messages.extend(check_unique_ids(catalog));
    messages.extend(check_default_style(catalog));
    messages.extend(catalog.styles.iter().filter_map(check_style_encoding));

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { messages })
    }
}

/// Ids that occur more than once, each reported once in order of first repeat.
pub fn duplicate_ids(catalog: &StylesConfig) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for style in &catalog.styles {
        let id = style.id.as_str();
        if !seen.insert(id) && !duplicates.contains(&id) {
            duplicates.push(id);
        }
    }
    duplicates
}

fn check_unique_ids(catalog: &StylesConfig) -> Option<String> {
    let duplicates = duplicate_ids(catalog);
    if duplicates.is_empty() {
        return None;
    }
    Some(format!(
        "requirement 3D fails; found styles with duplicate ids: {}",
        duplicates.join(", ")
    ))
}

fn check_default_style(catalog: &StylesConfig) -> Option<String> {
    let default = catalog.default.as_deref()?;
    if catalog.styles.iter().any(|s| s.id == default) {
        None
    } else {
        Some(format!(
            "requirement 3G fails; default style `{default}` not found in styles"
        ))
    }
}

fn check_style_encoding(style: &StyleMetadata) -> Option<String> {
    let has_encoding = style
        .stylesheets
        .iter()
        .any(|s| s.link.rel == LinkRelation::Stylesheet && s.link.media_type.is_some());
    if has_encoding {
        None
    } else {
        Some(format!(
            "requirement 3E fails; style `{}` has no stylesheet link with a media type",
            style.id
        ))
    }
}
