//! HTML views. The page layout is where full page loads receive their events.

use events::{initial::INITIAL_EVENTS_ID, Markup};

use crate::toast::Level;
use crate::Context;

/// Replays the initial-events block through the same DOM events HTMX dispatches for
/// `HX-Trigger` headers, so one set of client listeners serves both channels.
const INITIAL_EVENTS_BOOTSTRAP: &str = r#"document.addEventListener("DOMContentLoaded",function(){var el=document.getElementById("__ID__");if(!el){return;}JSON.parse(el.textContent).forEach(function(e){document.body.dispatchEvent(new CustomEvent(e.name,{detail:e.payload,bubbles:true}));});});"#;

/// A full HTML document around `content`.
///
/// On full page loads the layout embeds the initial-events data block and the
/// self-removing toast scripts; on HTMX requests both are empty and the events travel
/// in headers instead.
pub fn page(ctx: &Context, title: &str, content: Markup) -> Markup {
    Markup::raw(format!(
        concat!(
            "<!DOCTYPE html>",
            "<html lang=\"en\">",
            "<head><meta charset=\"utf-8\"><title>{title}</title>",
            "<script>{bootstrap}</script></head>",
            "<body>",
            "<main>{content}</main>",
            "{icons}",
            "<div id=\"toasts\">{toasts}</div>",
            "{events}",
            "</body>",
            "</html>"
        ),
        title = escape_html(title),
        bootstrap = INITIAL_EVENTS_BOOTSTRAP.replace("__ID__", INITIAL_EVENTS_ID),
        content = content,
        icons = toast_icon_templates(),
        toasts = ctx.initial_toasts(),
        events = ctx.initial_events(),
    ))
}

// `showToast` clones the icon for a toast's level from these templates.
fn toast_icon_templates() -> String {
    Level::ALL
        .into_iter()
        .map(|level| {
            format!(
                "<template id=\"toast-icon-{}\">{}</template>",
                level.as_str(),
                level.icon()
            )
        })
        .collect()
}

pub fn item_list(items: &[String]) -> Markup {
    let rows: String = items.iter().map(|item| item_row(item).into_string()).collect();
    Markup::raw(format!("<ul id=\"items\">{rows}</ul>"))
}

pub fn item_row(item: &str) -> Markup {
    Markup::raw(format!("<li>{}</li>", escape_html(item)))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
