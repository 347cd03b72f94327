//! Desktop runtime: routes dock, chrome and pointer actions into the window
//! manager, keeps window frames in step with fullscreen state, and notifies
//! subscribers whenever something visible changed.

use crate::geometry::{DragSession, Point, ResizeSession, Viewport, WindowFrame};
use crate::types::AppType;
use crate::window::{Layout, WindowManager, WindowOp};
use tracing::debug;

/// Actions accepted by [`Desktop::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesktopAction {
    /// A window-manager operation on one app.
    Window(WindowOp, AppType),
    /// Pointer down on the bare desktop.
    ClearFocus,
    SetZen(bool),
    SetViewport(Viewport),
    BeginDrag { app: AppType, pointer: Point },
    UpdateDrag { pointer: Point },
    EndDrag,
    BeginResize { app: AppType, pointer: Point },
    UpdateResize { pointer: Point },
    EndResize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Desktop) + Send>;

#[derive(Debug, Default)]
struct Interaction {
    dragging: Option<DragSession>,
    resizing: Option<ResizeSession>,
}

pub struct Desktop {
    windows: WindowManager,
    frames: [WindowFrame; AppType::COUNT],
    viewport: Viewport,
    interaction: Interaction,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Desktop {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            windows: WindowManager::new(),
            frames: AppType::ALL.map(|app| WindowFrame::for_app(app, &viewport)),
            viewport,
            interaction: Interaction::default(),
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn frame(&self, app: AppType) -> &WindowFrame {
        &self.frames[app as usize]
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> Layout {
        self.windows.layout(self.viewport.is_compact())
    }

    /// Registers a listener called after every dispatch that changed state.
    pub fn subscribe(&mut self, listener: impl Fn(&Desktop) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Applies `action` and returns whether window or frame state changed.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        let windows_before = self.windows.clone();
        let frames_before = self.frames;

        match action {
            DesktopAction::Window(op, app) => self.windows.apply(op, app),
            DesktopAction::ClearFocus => self.windows.clear_focus(),
            DesktopAction::SetZen(enabled) => self.windows.set_zen(enabled),
            DesktopAction::SetViewport(viewport) => self.viewport = viewport,
            DesktopAction::BeginDrag { app, pointer } => {
                self.windows.bring_to_front(app);
                self.interaction.dragging = Some(DragSession {
                    app,
                    pointer_start: pointer,
                    offset_start: self.frame(app).offset(),
                });
            }
            DesktopAction::UpdateDrag { pointer } => {
                if let Some(session) = self.interaction.dragging {
                    let viewport = self.viewport;
                    self.frames[session.app as usize].drag_to(&session, pointer, &viewport);
                }
            }
            DesktopAction::EndDrag => self.interaction.dragging = None,
            DesktopAction::BeginResize { app, pointer } => {
                self.windows.bring_to_front(app);
                self.interaction.resizing = Some(ResizeSession {
                    app,
                    pointer_start: pointer,
                    size_start: self.frame(app).size(),
                });
            }
            DesktopAction::UpdateResize { pointer } => {
                if let Some(session) = self.interaction.resizing {
                    let viewport = self.viewport;
                    self.frames[session.app as usize].resize_to(&session, pointer, &viewport);
                }
            }
            DesktopAction::EndResize => self.interaction.resizing = None,
        }

        for app in AppType::ALL {
            let fullscreen = self.windows.is_effectively_fullscreen(app);
            self.frames[app as usize].sync_fullscreen(fullscreen);
        }

        let changed = self.windows != windows_before
            || self.frames != frames_before
            || matches!(action, DesktopAction::SetViewport(_));
        if changed {
            debug!(?action, focused = ?self.windows.focused(), "desktop state changed");
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(self);
        }
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
