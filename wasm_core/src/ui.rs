//! Page state that outlives a single operation: which panel is showing, the
//! colour theme, and the HTTP method picked in the API tester.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::HttpMethod;
use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Panel {
    Formatter,
    Diff,
    Merge,
    Schema,
    Encrypt,
    Convert,
    Api,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Self::Formatter,
        Self::Diff,
        Self::Merge,
        Self::Schema,
        Self::Encrypt,
        Self::Convert,
        Self::Api,
    ];

    /// DOM id of the panel section (also the `data-panel` of its nav button).
    pub fn id(self) -> &'static str {
        match self {
            Self::Formatter => "formatter",
            Self::Diff => "diff",
            Self::Merge => "merge",
            Self::Schema => "schema",
            Self::Encrypt => "encrypt",
            Self::Convert => "convert",
            Self::Api => "api",
        }
    }

    /// DOM id of the panel's status region.
    pub fn status_element(self) -> &'static str {
        match self {
            Self::Formatter => "errorMessage",
            Self::Diff => "diffStatus",
            Self::Merge => "mergeStatus",
            Self::Schema => "schemaStatus",
            Self::Encrypt => "encryptStatus",
            Self::Convert => "convertStatus",
            Self::Api => "apiStatus",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Panel {
    type Err = ToolError;

    fn from_str(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|panel| panel.id() == id.trim())
            .ok_or_else(|| ToolError::validation(format!("unknown panel: {id}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    active: Panel,
    theme: Theme,
    method: Option<HttpMethod>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active: Panel::Formatter,
            theme: Theme::Light,
            method: None,
        }
    }
}

impl UiState {
    /// Activates `panel`; every other panel becomes inactive.
    pub fn select_panel(&mut self, panel: Panel) {
        self.active = panel;
    }

    pub fn active_panel(&self) -> Panel {
        self.active
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active == panel
    }

    /// Flips the theme and returns the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Overwrites the method used by the next API call.
    pub fn select_method(&mut self, method: HttpMethod) {
        self.method = Some(method);
    }

    pub fn selected_method(&self) -> Option<HttpMethod> {
        self.method
    }
}
