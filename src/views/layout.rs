//! Vertical navigation layout.

use crate::core::route::NavIcon;

/// CSS class marking the highlighted navigation icon
pub const ACTIVE_ICON_CLASS: &str = "active-icon";

fn icon(nav: NavIcon, active: Option<NavIcon>) -> String {
    let class = if active == Some(nav) {
        format!(" class=\"{ACTIVE_ICON_CLASS}\"")
    } else {
        String::new()
    };
    format!(
        "<div data-testid=\"{}\"{class} data-href=\"{}\"></div>",
        nav.test_id(),
        nav.target().path()
    )
}

/// Wraps `content` in the employee layout with `active` lit.
#[must_use]
pub fn page(active: Option<NavIcon>, content: &str) -> String {
    let icons: String = NavIcon::ALL.iter().map(|nav| icon(*nav, active)).collect();
    format!(
        "<div class=\"layout\">\
         <div class=\"vertical-navbar\">\
         <div class=\"layout-title\">Billed</div>{icons}\
         <div data-testid=\"layout-disconnect\" class=\"layout-disconnect\"></div>\
         </div>\
         <div class=\"content\">{content}</div>\
         </div>"
    )
}
