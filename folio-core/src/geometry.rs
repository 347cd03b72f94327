//! Window frame geometry: default sizes, drag offsets, corner resizing and
//! the windowed size saved across fullscreen.

use crate::types::AppType;
use serde::{Deserialize, Serialize};

/// Viewports narrower than this use the compact (mobile) layout.
pub const COMPACT_BREAKPOINT: f64 = 768.0;
pub const MIN_WINDOW_WIDTH: f64 = 360.0;
pub const MIN_WINDOW_HEIGHT: f64 = 240.0;
/// Space kept free between a resized window and the viewport edge.
pub const VIEWPORT_MARGIN: f64 = 32.0;

const DEFAULT_MIN_WIDTH: f64 = 300.0;
const DEFAULT_MIN_HEIGHT: f64 = 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_compact(&self) -> bool {
        self.width < COMPACT_BREAKPOINT
    }

    /// Initial windowed size for `app` on this viewport.
    pub fn default_window_size(&self, app: AppType) -> Size {
        if app == AppType::Shorten {
            return Size::new(
                (self.width * 0.9).min(440.0),
                (self.height * 0.7).min(420.0),
            );
        }

        let (w, h) = if self.is_compact() {
            ((self.width - 32.0).min(600.0), (self.height - 100.0).min(800.0))
        } else {
            ((self.width * 0.7).min(900.0), (self.height * 0.7).min(600.0))
        };
        Size::new(w.max(DEFAULT_MIN_WIDTH), h.max(DEFAULT_MIN_HEIGHT))
    }

    fn max_window_size(&self) -> Size {
        Size::new(
            (self.width - VIEWPORT_MARGIN).max(MIN_WINDOW_WIDTH),
            (self.height - VIEWPORT_MARGIN).max(MIN_WINDOW_HEIGHT),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

/// An in-progress bottom-right corner resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub app: AppType,
    pub pointer_start: Point,
    pub size_start: Size,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub app: AppType,
    pub pointer_start: Point,
    pub offset_start: Point,
}

/// Geometry of one application window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    size: Size,
    offset: Point,
    saved_size: Option<Size>,
    fullscreen: bool,
}

impl WindowFrame {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            offset: Point::default(),
            saved_size: None,
            fullscreen: false,
        }
    }

    pub fn for_app(app: AppType, viewport: &Viewport) -> Self {
        Self::new(viewport.default_window_size(app))
    }

    /// Windowed size; unchanged while fullscreen.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Follows the window manager's fullscreen flag. Entering fullscreen
    /// saves the windowed size and leaving restores it.
    pub fn sync_fullscreen(&mut self, fullscreen: bool) {
        match (self.fullscreen, fullscreen) {
            (false, true) => self.saved_size = Some(self.size),
            (true, false) => {
                if let Some(saved) = self.saved_size.take() {
                    self.size = saved;
                }
            }
            _ => {}
        }
        self.fullscreen = fullscreen;
    }

    pub fn can_move(&self, viewport: &Viewport) -> bool {
        !self.fullscreen && !viewport.is_compact()
    }

    pub fn drag_to(&mut self, session: &DragSession, pointer: Point, viewport: &Viewport) {
        if !self.can_move(viewport) {
            return;
        }
        self.offset = Point {
            x: session.offset_start.x + pointer.x - session.pointer_start.x,
            y: session.offset_start.y + pointer.y - session.pointer_start.y,
        };
    }

    pub fn resize_to(&mut self, session: &ResizeSession, pointer: Point, viewport: &Viewport) {
        if !self.can_move(viewport) || !session.app.allows_resize() {
            return;
        }
        let max = viewport.max_window_size();
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        self.size = Size::new(
            (session.size_start.w + dx).max(MIN_WINDOW_WIDTH).min(max.w),
            (session.size_start.h + dy).max(MIN_WINDOW_HEIGHT).min(max.h),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sizes() {
        let desktop = Viewport::new(1440.0, 900.0);
        assert_eq!(desktop.default_window_size(AppType::About), Size::new(900.0, 600.0));
        assert_eq!(desktop.default_window_size(AppType::Shorten), Size::new(440.0, 420.0));

        let small = Viewport::new(1000.0, 500.0);
        assert_eq!(small.default_window_size(AppType::Skills), Size::new(700.0, 350.0));

        let phone = Viewport::new(390.0, 844.0);
        assert!(phone.is_compact());
        assert_eq!(phone.default_window_size(AppType::Projects), Size::new(358.0, 744.0));

        let tiny = Viewport::new(200.0, 200.0);
        assert_eq!(tiny.default_window_size(AppType::About), Size::new(300.0, 240.0));
    }

    #[test]
    fn fullscreen_saves_and_restores_windowed_size() {
        let viewport = Viewport::default();
        let mut frame = WindowFrame::new(Size::new(500.0, 400.0));
        frame.sync_fullscreen(true);
        assert!(frame.is_fullscreen());

        let session = ResizeSession {
            app: AppType::About,
            pointer_start: Point::default(),
            size_start: frame.size(),
        };
        frame.resize_to(&session, Point { x: 100.0, y: 100.0 }, &viewport);
        assert_eq!(frame.size(), Size::new(500.0, 400.0));

        frame.sync_fullscreen(false);
        assert_eq!(frame.size(), Size::new(500.0, 400.0));
    }

    #[test]
    fn resize_clamps_to_bounds() {
        let viewport = Viewport::new(1000.0, 700.0);
        let mut frame = WindowFrame::new(Size::new(500.0, 400.0));
        let session = ResizeSession {
            app: AppType::About,
            pointer_start: Point { x: 10.0, y: 10.0 },
            size_start: frame.size(),
        };

        frame.resize_to(&session, Point { x: -500.0, y: -500.0 }, &viewport);
        assert_eq!(frame.size(), Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT));

        frame.resize_to(&session, Point { x: 5000.0, y: 5000.0 }, &viewport);
        assert_eq!(frame.size(), Size::new(968.0, 668.0));
    }

    #[test]
    fn resize_is_disabled_on_compact_viewports() {
        let phone = Viewport::new(400.0, 800.0);
        let mut frame = WindowFrame::for_app(AppType::About, &phone);
        let start = frame.size();
        let session = ResizeSession {
            app: AppType::About,
            pointer_start: Point { x: 100.0, y: 100.0 },
            size_start: start,
        };

        frame.resize_to(&session, Point { x: 150.0, y: 140.0 }, &phone);
        assert_eq!(frame.size(), start);

        frame.resize_to(&session, Point { x: 150.0, y: 140.0 }, &Viewport::default());
        assert_eq!(frame.size(), Size::new(start.w + 50.0, start.h + 40.0));
    }

    #[test]
    fn shorten_window_is_not_resizable() {
        let viewport = Viewport::default();
        let mut frame = WindowFrame::for_app(AppType::Shorten, &viewport);
        let session = ResizeSession {
            app: AppType::Shorten,
            pointer_start: Point::default(),
            size_start: frame.size(),
        };

        frame.resize_to(&session, Point { x: 80.0, y: 80.0 }, &viewport);
        assert_eq!(frame.size(), Size::new(440.0, 420.0));
    }

    #[test]
    fn drag_is_disabled_on_compact_viewports() {
        let mut frame = WindowFrame::new(Size::new(500.0, 400.0));
        let session = DragSession {
            app: AppType::About,
            pointer_start: Point { x: 0.0, y: 0.0 },
            offset_start: Point::default(),
        };

        frame.drag_to(&session, Point { x: 30.0, y: -10.0 }, &Viewport::new(400.0, 800.0));
        assert_eq!(frame.offset(), Point::default());

        frame.drag_to(&session, Point { x: 30.0, y: -10.0 }, &Viewport::default());
        assert_eq!(frame.offset(), Point { x: 30.0, y: -10.0 });
    }
}
