/// End-to-end tests for the desktop runtime and terminal interpreter
///
/// Commands typed into the terminal flow through the desktop dispatcher,
/// reach subscribers, and keep window frames in sync.

use folio_core::geometry::{Point, Size, Viewport, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use folio_core::terminal::{Outcome, Terminal};
use folio_core::{AppType, Desktop, DesktopAction, WindowOp};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_terminal_zen_round_trip_restores_desktop() {
    let mut desktop = Desktop::default();
    let mut terminal = Terminal::new();
    for line in ["open about", "open projects", "fullscreen projects", "open terminal", "min about"] {
        terminal.execute(line, &mut desktop);
    }
    let windows_before = desktop.windows().clone();
    let terminal_frame = *desktop.frame(AppType::Terminal);

    terminal.execute("zen", &mut desktop);
    assert!(desktop.windows().is_zen());
    assert_eq!(desktop.layout().windows.len(), 1);

    terminal.execute("zen", &mut desktop);
    assert_eq!(desktop.windows(), &windows_before);
    assert_eq!(desktop.frame(AppType::Terminal), &terminal_frame);
}

#[test]
fn test_exit_in_zen_closes_terminal() {
    let mut desktop = Desktop::default();
    let mut terminal = Terminal::new();
    terminal.execute("about", &mut desktop);
    terminal.execute("zen", &mut desktop);

    let outcome = terminal.execute("exit", &mut desktop);
    assert!(matches!(outcome, Outcome::Closed(_)));
    assert!(!desktop.windows().is_zen());
    assert!(!desktop.windows().is_open(AppType::Terminal));
    assert_eq!(desktop.windows().focused(), Some(AppType::About));
    assert!(desktop.layout().chrome_visible);
}

#[test]
fn test_unknown_command_reports_not_found() {
    let mut desktop = Desktop::default();
    let mut terminal = Terminal::new();
    let outcome = terminal.execute("frobnicate now", &mut desktop);
    assert_eq!(outcome.lines()[0].text, "Command not found: frobnicate. Type help.");
    assert_eq!(desktop.windows(), &folio_core::WindowManager::new());
}

#[test]
fn test_subscribers_see_terminal_commands() {
    let mut desktop = Desktop::default();
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    desktop.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut terminal = Terminal::new();
    terminal.execute("open skills", &mut desktop);
    terminal.execute("help", &mut desktop);
    terminal.execute("close skills", &mut desktop);
    assert_eq!(notified.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fullscreen_round_trip_restores_frame_size() {
    let mut desktop = Desktop::default();
    desktop.dispatch(DesktopAction::Window(WindowOp::Open, AppType::Projects));
    desktop.dispatch(DesktopAction::BeginResize {
        app: AppType::Projects,
        pointer: Point { x: 0.0, y: 0.0 },
    });
    desktop.dispatch(DesktopAction::UpdateResize {
        pointer: Point { x: -100.0, y: -50.0 },
    });
    desktop.dispatch(DesktopAction::EndResize);
    let resized = desktop.frame(AppType::Projects).size();
    assert_eq!(resized, Size::new(800.0, 550.0));

    desktop.dispatch(DesktopAction::Window(WindowOp::ToggleFullscreen, AppType::Projects));
    assert!(desktop.frame(AppType::Projects).is_fullscreen());
    desktop.dispatch(DesktopAction::Window(WindowOp::ToggleFullscreen, AppType::Projects));
    assert_eq!(desktop.frame(AppType::Projects).size(), resized);
}

#[test]
fn test_resize_clamps_to_viewport() {
    let mut desktop = Desktop::new(Viewport::new(1200.0, 800.0));
    desktop.dispatch(DesktopAction::Window(WindowOp::Open, AppType::About));
    desktop.dispatch(DesktopAction::BeginResize {
        app: AppType::About,
        pointer: Point { x: 500.0, y: 500.0 },
    });

    desktop.dispatch(DesktopAction::UpdateResize {
        pointer: Point { x: 5000.0, y: 5000.0 },
    });
    assert_eq!(desktop.frame(AppType::About).size(), Size::new(1168.0, 768.0));

    desktop.dispatch(DesktopAction::UpdateResize {
        pointer: Point { x: -5000.0, y: -5000.0 },
    });
    assert_eq!(
        desktop.frame(AppType::About).size(),
        Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
    );
}

#[test]
fn test_compact_viewport_trims_dock() {
    let mut desktop = Desktop::default();
    desktop.dispatch(DesktopAction::SetViewport(Viewport::new(390.0, 844.0)));
    let dock: Vec<AppType> = desktop.layout().dock.iter().map(|d| d.app).collect();
    assert_eq!(
        dock,
        vec![AppType::About, AppType::Projects, AppType::Skills, AppType::Contact]
    );
}
