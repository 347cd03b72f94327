/// Table formatting for links and window state using comfy-table

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use folio_core::window::Layout;
use folio_core::{AppType, ShortLink, WindowManager};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format stored links as a table, oldest first
pub fn format_links_table(links: &[ShortLink]) -> String {
    if links.is_empty() {
        return "No links found".to_string();
    }

    let mut table = new_table();
    table.set_header(vec!["id", "url", "created"]);
    for link in links {
        table.add_row(vec![
            Cell::new(link.id.as_str()),
            Cell::new(&link.url),
            Cell::new(format_timestamp(link.created_at)),
        ]);
    }
    table.to_string()
}

/// Format a Unix timestamp as RFC 3339, or the raw number if out of range
pub fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "-"
    }
}

/// One row per app with its window-manager flags
pub fn format_windows_table(windows: &WindowManager) -> String {
    let mut table = new_table();
    table.set_header(vec!["app", "open", "minimized", "fullscreen", "focused", "z"]);
    for app in AppType::ALL {
        let z = if windows.is_open(app) {
            (folio_core::window::WINDOW_Z_BASE as usize + windows.stack_index(app)).to_string()
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            Cell::new(app.as_str()),
            Cell::new(flag(windows.is_open(app))),
            Cell::new(flag(windows.is_minimized(app))),
            Cell::new(flag(windows.is_effectively_fullscreen(app))),
            Cell::new(flag(windows.focused() == Some(app))),
            Cell::new(z),
        ]);
    }
    table.to_string()
}

/// Rendered windows and dock from a layout
pub fn format_layout_table(layout: &Layout) -> String {
    let mut out = format!(
        "Menu bar: {}\n",
        if layout.chrome_visible {
            layout.menu_title
        } else {
            "(hidden)"
        }
    );

    if layout.windows.is_empty() {
        out.push_str("No visible windows\n");
    } else {
        let mut table = new_table();
        table.set_header(vec!["window", "z-index", "fullscreen", "focused", "title bar"]);
        for view in &layout.windows {
            table.add_row(vec![
                Cell::new(view.title),
                Cell::new(view.z_index),
                Cell::new(flag(view.fullscreen)),
                Cell::new(flag(view.focused)),
                Cell::new(if view.hide_title_bar { "hidden" } else { "shown" }),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    if !layout.dock.is_empty() {
        let items: Vec<String> = layout
            .dock
            .iter()
            .map(|item| {
                let marker = match (item.open, item.minimized) {
                    (true, true) => " (min)",
                    (true, false) => " *",
                    _ => "",
                };
                format!("{}{}", item.label, marker)
            })
            .collect();
        out.push_str(&format!("Dock: {}\n", items.join(" | ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ShortId;

    #[test]
    fn test_empty_links() {
        assert_eq!(format_links_table(&[]), "No links found");
    }

    #[test]
    fn test_links_table_contains_rows() {
        let links = vec![ShortLink {
            id: ShortId::parse("abcd1234").unwrap(),
            url: "https://a.test".to_string(),
            created_at: 0,
        }];
        let out = format_links_table(&links);
        assert!(out.contains("abcd1234"));
        assert!(out.contains("https://a.test"));
        assert!(out.contains("1970-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_windows_table_marks_focus() {
        let mut windows = WindowManager::new();
        windows.open(AppType::Skills);
        let out = format_windows_table(&windows);
        assert!(out.contains("skills"));
        assert!(out.contains("100"));
    }

    #[test]
    fn test_layout_in_zen_hides_chrome() {
        let mut windows = WindowManager::new();
        windows.enter_zen();
        let out = format_layout_table(&windows.layout(false));
        assert!(out.starts_with("Menu bar: (hidden)"));
        assert!(out.contains("Terminal"));
        assert!(!out.contains("Dock:"));
    }
}
