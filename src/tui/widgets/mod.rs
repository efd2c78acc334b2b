//! TUI Widgets
//!
//! Custom widgets for the storefront terminal.

mod product;
mod results;
mod search_panel;

pub use product::render_product;
pub use results::render_results;
pub use search_panel::{render_search_input, render_search_panel};

/// Truncate a string to fit within a given width
pub(crate) fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Dark Magician", 20), "Dark Magician");
        assert_eq!(truncate_string("Blue-Eyes White Dragon", 10), "Blue-Ey...");
        assert_eq!(truncate_string("Kuriboh", 2), "Ku");
    }
}
