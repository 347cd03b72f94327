use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application windows known to the desktop. The set is closed: every
/// window the shell can show has exactly one entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    About,
    Projects,
    Skills,
    Contact,
    Shorten,
    Terminal,
}

impl AppType {
    pub const COUNT: usize = 6;

    /// All app types in declaration order.
    pub const ALL: [AppType; AppType::COUNT] = [
        AppType::About,
        AppType::Projects,
        AppType::Skills,
        AppType::Contact,
        AppType::Shorten,
        AppType::Terminal,
    ];

    /// Order of the icons in the dock.
    pub const DOCK_ORDER: [AppType; AppType::COUNT] = [
        AppType::About,
        AppType::Projects,
        AppType::Skills,
        AppType::Contact,
        AppType::Terminal,
        AppType::Shorten,
    ];

    /// Icons kept in the dock on a compact (mobile) viewport.
    pub const COMPACT_DOCK: [AppType; 4] = [
        AppType::About,
        AppType::Projects,
        AppType::Skills,
        AppType::Contact,
    ];

    /// The app that zen mode keeps on screen.
    pub const ZEN: AppType = AppType::Terminal;

    pub fn as_str(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Contact => "contact",
            Self::Shorten => "shorten",
            Self::Terminal => "terminal",
        }
    }

    /// Window title shown in the title bar and the menu bar.
    pub fn title(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::Contact => "Contact / Socials",
            Self::Shorten => "Shorten Link",
            Self::Terminal => "Terminal",
        }
    }

    pub fn dock_label(self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            other => other.title(),
        }
    }

    /// Whether the window manager lets this window go fullscreen.
    pub fn allows_fullscreen(self) -> bool {
        !matches!(self, Self::Shorten)
    }

    /// Custom-sized windows have no resize handle.
    pub fn allows_resize(self) -> bool {
        !matches!(self, Self::Shorten)
    }

    /// Whether the window chrome offers a fullscreen button.
    pub fn shows_fullscreen_control(self) -> bool {
        !matches!(self, Self::Contact | Self::Shorten)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        AppType::ALL
            .into_iter()
            .find(|app| app.as_str() == lower)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown app type: {}", s)))
    }
}

/// One boolean per [`AppType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFlags([bool; AppType::COUNT]);

impl AppFlags {
    pub fn get(&self, app: AppType) -> bool {
        self.0[app.index()]
    }

    pub fn set(&mut self, app: AppType, value: bool) {
        self.0[app.index()] = value;
    }

    /// App types whose flag is set, in declaration order.
    pub fn iter_set(&self) -> impl Iterator<Item = AppType> + '_ {
        AppType::ALL.into_iter().filter(|app| self.get(*app))
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|v| *v)
    }
}
