use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }
}

/// UI language with its locale formatting rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeLanguage {
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub direction: TextDirection,
    pub calendar: String,
    pub font_primary: String,
    pub font_fallback: String,
    pub translation_file: String,
    pub date_format: String,
    pub time_format: String,
    pub number_format: String,
    pub currency: String,
    pub currency_symbol: String,
    #[serde(default = "enabled")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

fn enabled() -> bool {
    true
}

/// One design token, e.g. `spacing.md = 16`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSetting {
    pub category: String,
    pub key: String,
    pub value: serde_json::Value,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeLink {
    pub link_type: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    pub url: String,
    pub sort_order: i32,
}

/// Named bundle of settings the front end can switch to wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub settings: serde_json::Value,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_system: bool,
}

/// Complete theming content, written in language → setting → link → template order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeData {
    #[serde(default)]
    pub languages: Vec<ThemeLanguage>,
    #[serde(default)]
    pub settings: Vec<ThemeSetting>,
    #[serde(default)]
    pub links: Vec<ThemeLink>,
    #[serde(default)]
    pub templates: Vec<ThemeTemplate>,
}
