//! Window-manager state machine.
//!
//! Tracks which application windows are open, minimized and fullscreen, the
//! z-order stack (bottom first, top last), the focused window, and zen mode.
//! Every operation is total: requests that make no sense for the current
//! state (minimizing a closed window, focusing a minimized one) are no-ops.

use crate::types::{AppFlags, AppType};
use serde::{Deserialize, Serialize};

/// Base stacking index for managed windows; a window renders at
/// `WINDOW_Z_BASE + position in the stack`.
pub const WINDOW_Z_BASE: u32 = 100;

/// Operations a dock icon or window chrome can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOp {
    Open,
    Close,
    Minimize,
    Restore,
    ToggleFullscreen,
    BringToFront,
    /// Dock icon click: restores a minimized window, otherwise opens it.
    DockClick,
}

/// What the zen app looked like before zen mode took over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ZenSnapshot {
    was_open: bool,
    was_minimized: bool,
    was_fullscreen: bool,
    stack_position: Option<usize>,
    focused: Option<AppType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowManager {
    open: AppFlags,
    minimized: AppFlags,
    fullscreen: AppFlags,
    stack: Vec<AppType>,
    focused: Option<AppType>,
    zen: Option<ZenSnapshot>,
}

/// A window as it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowView {
    pub app: AppType,
    pub title: &'static str,
    pub z_index: u32,
    pub fullscreen: bool,
    pub focused: bool,
    pub hide_title_bar: bool,
    pub can_minimize: bool,
    pub fullscreen_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockItem {
    pub app: AppType,
    pub label: &'static str,
    pub open: bool,
    pub minimized: bool,
}

/// Render plan derived from the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Visible windows, bottom first.
    pub windows: Vec<WindowView>,
    /// Dock icons; empty while zen mode hides the chrome.
    pub dock: Vec<DockItem>,
    /// Dock, menu bar and desktop widgets.
    pub chrome_visible: bool,
    pub menu_title: &'static str,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, app: AppType) -> bool {
        self.open.get(app)
    }

    pub fn is_minimized(&self, app: AppType) -> bool {
        self.minimized.get(app)
    }

    /// The stored fullscreen flag, ignoring zen mode.
    pub fn is_fullscreen(&self, app: AppType) -> bool {
        self.fullscreen.get(app)
    }

    /// Fullscreen as rendered: zen mode forces the zen app fullscreen.
    pub fn is_effectively_fullscreen(&self, app: AppType) -> bool {
        (self.is_zen() && app == AppType::ZEN) || self.fullscreen.get(app)
    }

    pub fn is_zen(&self) -> bool {
        self.zen.is_some()
    }

    pub fn focused(&self) -> Option<AppType> {
        self.focused
    }

    pub fn stack(&self) -> &[AppType] {
        &self.stack
    }

    pub fn open_set(&self) -> AppFlags {
        self.open
    }

    pub fn minimized_set(&self) -> AppFlags {
        self.minimized
    }

    pub fn fullscreen_set(&self) -> AppFlags {
        self.fullscreen
    }

    /// Position in the z-order stack, or 0 when the window is not stacked.
    pub fn stack_index(&self, app: AppType) -> usize {
        self.stack.iter().position(|a| *a == app).unwrap_or(0)
    }

    pub fn apply(&mut self, op: WindowOp, app: AppType) {
        match op {
            WindowOp::Open => self.open(app),
            WindowOp::Close => self.close(app),
            WindowOp::Minimize => self.minimize(app),
            WindowOp::Restore => self.restore(app),
            WindowOp::ToggleFullscreen => self.toggle_fullscreen(app),
            WindowOp::BringToFront => self.bring_to_front(app),
            WindowOp::DockClick => self.dock_click(app),
        }
    }

    /// Applies `op` to the app named `name`. Unknown names are ignored and
    /// reported as `false`.
    pub fn apply_named(&mut self, op: WindowOp, name: &str) -> bool {
        match name.parse::<AppType>() {
            Ok(app) => {
                self.apply(op, app);
                true
            }
            Err(_) => false,
        }
    }

    /// Opens (or re-raises) a window and focuses it.
    pub fn open(&mut self, app: AppType) {
        self.open.set(app, true);
        self.minimized.set(app, false);
        self.raise(app);
    }

    pub fn close(&mut self, app: AppType) {
        if app == AppType::ZEN && self.is_zen() {
            self.exit_zen();
        }
        self.open.set(app, false);
        self.minimized.set(app, false);
        self.stack.retain(|a| *a != app);
        if self.focused == Some(app) {
            self.focused = None;
        }
    }

    pub fn minimize(&mut self, app: AppType) {
        if !self.is_open(app) || (app == AppType::ZEN && self.is_zen()) {
            return;
        }
        self.minimized.set(app, true);
        if self.focused == Some(app) {
            self.focused = None;
        }
    }

    /// Un-minimizes a window and raises it. A closed window is opened.
    pub fn restore(&mut self, app: AppType) {
        self.minimized.set(app, false);
        self.open(app);
    }

    pub fn toggle_fullscreen(&mut self, app: AppType) {
        if !app.allows_fullscreen() {
            return;
        }
        let current = self.fullscreen.get(app);
        self.fullscreen.set(app, !current);
        self.bring_to_front(app);
    }

    /// Raises and focuses an open, visible window. Closed or minimized
    /// windows are left alone.
    pub fn bring_to_front(&mut self, app: AppType) {
        if self.is_open(app) && !self.is_minimized(app) {
            self.raise(app);
        }
    }

    pub fn dock_click(&mut self, app: AppType) {
        if self.is_minimized(app) {
            self.restore(app);
        } else {
            self.open(app);
        }
    }

    /// Click on the bare desktop. Zen mode keeps the zen app focused.
    pub fn clear_focus(&mut self) {
        if !self.is_zen() {
            self.focused = None;
        }
    }

    pub fn set_zen(&mut self, enabled: bool) {
        if enabled {
            self.enter_zen();
        } else {
            self.exit_zen();
        }
    }

    /// Shows only the zen app, fullscreen and focused. The zen app's prior
    /// state is remembered so that [`exit_zen`](Self::exit_zen) can put it back.
    pub fn enter_zen(&mut self) {
        if self.is_zen() {
            return;
        }
        let app = AppType::ZEN;
        self.zen = Some(ZenSnapshot {
            was_open: self.is_open(app),
            was_minimized: self.is_minimized(app),
            was_fullscreen: self.is_fullscreen(app),
            stack_position: self.stack.iter().position(|a| *a == app),
            focused: self.focused,
        });
        self.open(app);
        self.fullscreen.set(app, true);
    }

    pub fn exit_zen(&mut self) {
        let Some(snapshot) = self.zen.take() else {
            return;
        };
        let app = AppType::ZEN;
        self.open.set(app, snapshot.was_open);
        self.minimized.set(app, snapshot.was_minimized);
        self.fullscreen.set(app, snapshot.was_fullscreen);

        self.stack.retain(|a| *a != app);
        if snapshot.was_open {
            let position = snapshot.stack_position.unwrap_or(self.stack.len());
            self.stack.insert(position.min(self.stack.len()), app);
        }

        self.focused = snapshot
            .focused
            .filter(|f| self.is_open(*f) && !self.is_minimized(*f));
    }

    /// Title for the menu bar: the focused window, or the desktop itself.
    pub fn menu_title(&self) -> &'static str {
        if self.is_zen() {
            return AppType::ZEN.title();
        }
        self.focused.map(AppType::title).unwrap_or("Desktop")
    }

    pub fn layout(&self, compact: bool) -> Layout {
        let zen = self.is_zen();
        let windows = self
            .stack
            .iter()
            .enumerate()
            .filter(|(_, app)| self.is_open(**app) && !self.is_minimized(**app))
            .filter(|(_, app)| !zen || **app == AppType::ZEN)
            .map(|(position, app)| WindowView {
                app: *app,
                title: app.title(),
                z_index: WINDOW_Z_BASE + position as u32,
                fullscreen: self.is_effectively_fullscreen(*app),
                focused: self.focused == Some(*app),
                hide_title_bar: zen && *app == AppType::ZEN,
                can_minimize: !zen,
                fullscreen_control: app.shows_fullscreen_control(),
            })
            .collect();

        let dock = if zen {
            Vec::new()
        } else {
            let apps: &[AppType] = if compact {
                &AppType::COMPACT_DOCK
            } else {
                &AppType::DOCK_ORDER
            };
            apps.iter()
                .map(|app| DockItem {
                    app: *app,
                    label: app.dock_label(),
                    open: self.is_open(*app),
                    minimized: self.is_minimized(*app),
                })
                .collect()
        };

        Layout {
            windows,
            dock,
            chrome_visible: !zen,
            menu_title: self.menu_title(),
        }
    }

    /// Checks the structural invariants of the state.
    pub fn validate(&self) -> Result<(), String> {
        for (i, app) in self.stack.iter().enumerate() {
            if self.stack[..i].contains(app) {
                return Err(format!("{} appears twice in the stack", app));
            }
            if !self.is_open(*app) {
                return Err(format!("{} is stacked but not open", app));
            }
        }
        for app in self.open.iter_set() {
            if !self.stack.contains(&app) {
                return Err(format!("{} is open but not stacked", app));
            }
        }
        for app in self.minimized.iter_set() {
            if !self.is_open(app) {
                return Err(format!("{} is minimized but closed", app));
            }
        }
        if let Some(app) = self.focused {
            if self.is_minimized(app) {
                return Err(format!("{} is focused while minimized", app));
            }
            if !self.is_open(app) {
                return Err(format!("{} is focused while closed", app));
            }
        }
        Ok(())
    }

    fn raise(&mut self, app: AppType) {
        self.stack.retain(|a| *a != app);
        self.stack.push(app);
        // While zen is on, only the zen app is visible and it holds focus.
        self.focused = Some(if self.is_zen() { AppType::ZEN } else { app });
    }
}
