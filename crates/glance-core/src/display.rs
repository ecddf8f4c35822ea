//! Display surface and visibility types shared by the formatter and scheduler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A place rendered text can be pushed to.
///
/// `Main` shares the display with other cards and has less room than
/// `Expanded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySurface {
    Main,
    Expanded,
}

impl DisplaySurface {
    pub fn all() -> &'static [DisplaySurface] {
        &[DisplaySurface::Main, DisplaySurface::Expanded]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplaySurface::Main => "main",
            DisplaySurface::Expanded => "expanded",
        }
    }
}

impl fmt::Display for DisplaySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplaySurface {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "main" => Ok(Self::Main),
            "expanded" => Ok(Self::Expanded),
            _ => Err(format!("Unknown display surface: {value}")),
        }
    }
}

/// Whether (and how) the user is currently looking at the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityMode {
    /// Nobody is looking; no refresh timer runs.
    #[default]
    #[serde(alias = "none")]
    Hidden,
    Main,
    Expanded,
}

impl VisibilityMode {
    /// The surface this mode shows, or `None` while hidden.
    pub fn surface(self) -> Option<DisplaySurface> {
        match self {
            VisibilityMode::Hidden => None,
            VisibilityMode::Main => Some(DisplaySurface::Main),
            VisibilityMode::Expanded => Some(DisplaySurface::Expanded),
        }
    }

    pub fn is_visible(self) -> bool {
        self.surface().is_some()
    }
}

impl fmt::Display for VisibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisibilityMode::Hidden => f.write_str("hidden"),
            VisibilityMode::Main => f.write_str("main"),
            VisibilityMode::Expanded => f.write_str("expanded"),
        }
    }
}

impl FromStr for VisibilityMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" | "hidden" => Ok(Self::Hidden),
            "main" => Ok(Self::Main),
            "expanded" => Ok(Self::Expanded),
            _ => Err(format!("Unknown visibility mode: {value}")),
        }
    }
}

/// The most recent phone notification.
///
/// Missing or `null` fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(default, alias = "source_app", deserialize_with = "null_as_empty")]
    pub app: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, alias = "body", deserialize_with = "null_as_empty")]
    pub content: String,
}

impl NotificationRecord {
    pub fn new(
        app: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            app: app.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_mode_parses_none_as_hidden() {
        assert_eq!("none".parse::<VisibilityMode>(), Ok(VisibilityMode::Hidden));
        assert_eq!(
            "hidden".parse::<VisibilityMode>(),
            Ok(VisibilityMode::Hidden)
        );
        assert_eq!(
            "expanded".parse::<VisibilityMode>(),
            Ok(VisibilityMode::Expanded)
        );
    }

    #[test]
    fn test_visibility_mode_rejects_unknown_names() {
        assert!("MAIN ".parse::<VisibilityMode>().is_err());
        assert!(serde_json::from_str::<VisibilityMode>("\"sideways\"").is_err());
    }

    #[test]
    fn test_visibility_mode_surface_mapping() {
        assert_eq!(VisibilityMode::Hidden.surface(), None);
        assert_eq!(VisibilityMode::Main.surface(), Some(DisplaySurface::Main));
        assert!(!VisibilityMode::default().is_visible());
    }

    #[test]
    fn test_notification_null_fields_default_to_empty() {
        let record: NotificationRecord =
            serde_json::from_str(r#"{"app": null, "title": "Hi"}"#).unwrap();
        assert_eq!(record, NotificationRecord::new("", "Hi", ""));
    }

    #[test]
    fn test_notification_accepts_source_app_and_body_aliases() {
        let record: NotificationRecord =
            serde_json::from_str(r#"{"source_app": "Msg", "title": "Hi", "body": "Hello"}"#)
                .unwrap();
        assert_eq!(record, NotificationRecord::new("Msg", "Hi", "Hello"));
    }
}
