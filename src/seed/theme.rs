//! Theming content. Unlike the reference datasets this path is destructive:
//! every run wipes the four theming tables and writes them again.

use crate::error::SeedError;
use crate::model::{ThemeData, ThemeReport};
use crate::store::ThemeStore;
use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::HashSet;
use std::path::Path;

const EMBEDDED_THEME_DATA: &str = include_str!("../../data/theme.json");

pub fn embedded_theme() -> Result<ThemeData> {
    ThemeData::from_json_str(EMBEDDED_THEME_DATA).context("Embedded theme data is invalid")
}

pub fn theme_from_file(path: impl AsRef<Path>) -> Result<ThemeData> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read theme data from {}", path.display()))?;
    ThemeData::from_json_str(&raw).with_context(|| format!("Invalid theme data in {}", path.display()))
}

impl ThemeData {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let theme: ThemeData = serde_json::from_str(raw).context("Failed to parse theme JSON")?;
        validate_theme(&theme)?;
        Ok(theme)
    }
}

pub fn validate_theme(theme: &ThemeData) -> Result<(), SeedError> {
    if let Some(code) = theme.languages.iter().map(|l| l.code.as_str()).duplicates().next() {
        return Err(SeedError::theme(format!("language '{}' declared twice", code)));
    }

    let defaults = theme.languages.iter().filter(|l| l.is_default).count();
    if !theme.languages.is_empty() && defaults != 1 {
        return Err(SeedError::theme(format!(
            "expected exactly one default language, found {}",
            defaults
        )));
    }

    let codes: HashSet<&str> = theme.languages.iter().map(|l| l.code.as_str()).collect();
    if let Some(setting) = theme
        .settings
        .iter()
        .find(|s| !codes.contains(s.language_code.as_str()))
    {
        return Err(SeedError::theme(format!(
            "setting {}.{} uses undeclared language '{}'",
            setting.category, setting.key, setting.language_code
        )));
    }

    if let Some((category, key, _)) = theme
        .settings
        .iter()
        .map(|s| (s.category.as_str(), s.key.as_str(), s.language_code.as_str()))
        .duplicates()
        .next()
    {
        return Err(SeedError::theme(format!(
            "setting {}.{} declared twice",
            category, key
        )));
    }

    if let Some(id) = theme.templates.iter().map(|t| t.id.as_str()).duplicates().next() {
        return Err(SeedError::theme(format!("template '{}' declared twice", id)));
    }
    if theme.templates.iter().filter(|t| t.is_default).count() > 1 {
        return Err(SeedError::theme("more than one default template"));
    }

    Ok(())
}

/// Replace all theming rows with `theme`.
///
/// Must not run while the application is serving theme reads.
pub async fn reset_theme<S: ThemeStore + ?Sized>(store: &S, theme: &ThemeData) -> Result<ThemeReport> {
    log::warn!(
        "Resetting theme data: existing languages, settings, links and templates will be deleted"
    );
    let report = store
        .replace_theme(theme)
        .await
        .context("Failed to replace theme data")?;
    log::info!(
        "theme: removed {} rows, wrote {} languages, {} settings, {} links, {} templates",
        report.removed,
        report.languages,
        report.settings,
        report.links,
        report.templates
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_theme_validates() {
        let theme = embedded_theme().unwrap();
        assert_eq!(theme.languages.len(), 2);
        assert_eq!(theme.templates.len(), 3);
        assert_eq!(theme.links.len(), 3);
        assert!(theme
            .settings
            .iter()
            .any(|s| s.category == "spacing" && s.key == "md" && s.value == serde_json::json!(16)));
    }

    #[test]
    fn setting_language_must_be_declared() {
        let raw = r#"{
            "languages": [{"code": "en", "name": "English", "native_name": "English", "direction": "ltr",
                "calendar": "gregorian", "font_primary": "Arial", "font_fallback": "sans-serif",
                "translation_file": "en.json", "date_format": "MM/DD/YYYY", "time_format": "HH:mm",
                "number_format": "en-US", "currency": "USD", "currency_symbol": "$", "is_default": true}],
            "settings": [{"category": "spacing", "key": "md", "value": 16, "language_code": "de"}]
        }"#;
        let err = ThemeData::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("undeclared language 'de'"));
    }

    #[test]
    fn two_default_templates_are_rejected() {
        let raw = r#"{"templates": [
            {"id": "a", "name": "A", "settings": {}, "is_default": true},
            {"id": "b", "name": "B", "settings": {}, "is_default": true}
        ]}"#;
        assert!(ThemeData::from_json_str(raw).is_err());
    }
}
