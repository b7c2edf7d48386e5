//! HTML rendering of a [`CompetitionScreen`].

use storage::{
    dto::competition::{FieldError, SaveCompetitionRequest},
    models::Competition,
};

use super::screen::{CompetitionScreen, Dialog, FormKind, NoticeLevel};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem; }
.toolbar { display: flex; justify-content: flex-end; margin-bottom: 1rem; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: .5rem; border-bottom: 1px solid #ddd; }
tbody tr:nth-child(odd) { background: #f7f7f7; }
.button { padding: .4rem .8rem; border: 1px solid #888; border-radius: 4px; background: #fff; text-decoration: none; color: inherit; cursor: pointer; }
.primary { background: #1676f3; border-color: #1676f3; color: #fff; }
.danger { color: #c62828; border-color: #c62828; }
.danger.primary { background: #c62828; color: #fff; }
.notice { padding: .75rem; border-radius: 4px; margin-bottom: 1rem; }
.notice.success { background: #e6f4ea; color: #1e6b34; }
.notice.error { background: #fdecea; color: #a12622; }
.overlay { position: fixed; inset: 0; background: rgba(0,0,0,.35); display: flex; align-items: center; justify-content: center; }
dialog { position: static; width: 500px; border: none; border-radius: 8px; padding: 1.5rem; }
label { display: block; margin-top: .75rem; }
input { display: block; width: 100%; box-sizing: border-box; padding: .4rem; }
.field-error { color: #a12622; font-size: .85rem; }
.actions { display: flex; gap: .5rem; justify-content: flex-end; margin-top: 1rem; }
"#;

/// Full page for the current screen state
pub fn render(screen: &CompetitionScreen) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Competitions</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h2>Competitions</h2>\n");

    if let Some(notice) = &screen.notice {
        let class = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        };
        html.push_str(&format!(
            "<div class=\"notice {}\" role=\"status\">{}</div>\n",
            class,
            escape(&notice.message)
        ));
    }

    html.push_str(
        "<div class=\"toolbar\"><a class=\"button primary\" href=\"/competitions/new\">New Competition</a></div>\n",
    );
    html.push_str(&render_grid(&screen.competitions));

    if let Some(dialog) = &screen.dialog {
        html.push_str("<div class=\"overlay\">\n");
        html.push_str(&render_dialog(dialog));
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_grid(competitions: &[Competition]) -> String {
    let mut html = String::from(
        "<table>\n<thead><tr><th>Name</th><th>Date</th><th>Location</th><th>Actions</th></tr></thead>\n<tbody>\n",
    );

    for competition in competitions {
        let id = competition.competition_id;
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>\
             <a class=\"button\" href=\"/competitions/{id}/edit\">Edit</a> \
             <a class=\"button danger\" href=\"/competitions/{id}/delete\">Delete</a>\
             </td></tr>\n",
            escape(&competition.name),
            competition.competition_date.format("%Y-%m-%d"),
            escape(competition.location.as_deref().unwrap_or("")),
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_dialog(dialog: &Dialog) -> String {
    match dialog {
        Dialog::Form {
            kind,
            request,
            errors,
        } => render_form(*kind, request, errors),
        Dialog::ConfirmDelete(competition) => format!(
            "<dialog open>\n<h3>Delete Competition</h3>\n\
             <p>Are you sure you want to delete \"{}\"?</p>\n\
             <form method=\"post\" action=\"/competitions/{}/delete\" class=\"actions\">\
             <a class=\"button\" href=\"/competitions\">Cancel</a>\
             <button type=\"submit\" class=\"button danger primary\">Delete</button>\
             </form>\n</dialog>\n",
            escape(&competition.name),
            competition.competition_id,
        ),
        Dialog::DeleteBlocked(competition) => format!(
            "<dialog open>\n<h3>Delete Competition</h3>\n\
             <p>\"{}\" has registered athletes. You must remove all registrations before deleting.</p>\n\
             <div class=\"actions\"><a class=\"button primary\" href=\"/competitions\">OK</a></div>\n\
             </dialog>\n",
            escape(&competition.name),
        ),
    }
}

fn render_form(kind: FormKind, request: &SaveCompetitionRequest, errors: &[FieldError]) -> String {
    let mut html = format!(
        "<dialog open>\n<h3>{}</h3>\n<form method=\"post\" action=\"/competitions\">\n",
        kind.title()
    );

    if let Some(id) = request.competition_id {
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"competition_id\" value=\"{}\">\n",
            id
        ));
    }

    let date = request
        .competition_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    html.push_str(&render_field("name", "Name", "text", &request.name, true, errors));
    html.push_str(&render_field(
        "competition_date",
        "Date",
        "date",
        &date,
        true,
        errors,
    ));
    html.push_str(&render_field(
        "location",
        "Location",
        "text",
        request.location.as_deref().unwrap_or(""),
        false,
        errors,
    ));

    html.push_str(
        "<div class=\"actions\"><a class=\"button\" href=\"/competitions\">Cancel</a>\
         <button type=\"submit\" class=\"button primary\">Save</button></div>\n",
    );
    html.push_str("</form>\n</dialog>\n");
    html
}

fn render_field(
    name: &str,
    label: &str,
    input_type: &str,
    value: &str,
    required: bool,
    errors: &[FieldError],
) -> String {
    let mut html = format!(
        "<label for=\"{name}\">{label}</label>\n<input id=\"{name}\" name=\"{name}\" type=\"{input_type}\" value=\"{}\"{}>\n",
        escape(value),
        if required { " required" } else { "" },
    );

    for error in errors.iter().filter(|e| e.field == name) {
        html.push_str(&format!(
            "<div class=\"field-error\">{}</div>\n",
            escape(&error.message)
        ));
    }

    html
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::competitions::view::screen::{Notice, tests::competition};

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_idle_screen_renders_grid_rows() {
        let mut paris = competition("Paris <Open>", 2025, 6, 1);
        paris.location = Some("Paris".to_string());
        let screen = CompetitionScreen {
            competitions: vec![paris.clone()],
            ..Default::default()
        };

        let html = render(&screen);
        assert!(html.contains("<th>Name</th><th>Date</th><th>Location</th><th>Actions</th>"));
        assert!(html.contains("Paris &lt;Open&gt;"));
        assert!(html.contains("2025-06-01"));
        assert!(html.contains(&format!("/competitions/{}/edit", paris.competition_id)));
        assert!(!html.contains("<dialog"));
    }

    #[test]
    fn test_form_renders_values_and_field_errors() {
        let screen = CompetitionScreen {
            dialog: Some(Dialog::Form {
                kind: FormKind::New,
                request: SaveCompetitionRequest {
                    location: Some("Lyon".to_string()),
                    ..Default::default()
                },
                errors: vec![FieldError::new("name", "Name is required")],
            }),
            notice: Some(Notice::error("Please correct the errors in the form")),
            ..Default::default()
        };

        let html = render(&screen);
        assert!(html.contains("<h3>New Competition</h3>"));
        assert!(html.contains("value=\"Lyon\""));
        assert!(html.contains("<div class=\"field-error\">Name is required</div>"));
        assert!(html.contains("notice error"));
        assert!(!html.contains("name=\"competition_id\""));
    }

    #[test]
    fn test_edit_form_carries_identifier() {
        let existing = competition("Lyon Cup", 2024, 3, 1);
        let screen = CompetitionScreen {
            dialog: Some(Dialog::Form {
                kind: FormKind::Edit,
                request: SaveCompetitionRequest::from(&existing),
                errors: Vec::new(),
            }),
            ..Default::default()
        };

        let html = render(&screen);
        assert!(html.contains("<h3>Edit Competition</h3>"));
        assert!(html.contains(&format!(
            "name=\"competition_id\" value=\"{}\"",
            existing.competition_id
        )));
        assert!(html.contains("value=\"2024-03-01\""));
    }

    #[test]
    fn test_blocked_delete_offers_only_acknowledgment() {
        let existing = competition("Nantes Meet", 2025, 2, 1);
        let screen = CompetitionScreen {
            dialog: Some(Dialog::DeleteBlocked(existing)),
            ..Default::default()
        };

        let html = render(&screen);
        assert!(html.contains("You must remove all registrations before deleting."));
        assert!(html.contains(">OK</a>"));
        assert!(!html.contains("method=\"post\""));
    }

    #[test]
    fn test_confirm_delete_posts_to_delete_route() {
        let existing = competition("Lille Open", 2025, 4, 1);
        let screen = CompetitionScreen {
            dialog: Some(Dialog::ConfirmDelete(existing.clone())),
            ..Default::default()
        };

        let html = render(&screen);
        assert!(html.contains("Are you sure you want to delete \"Lille Open\"?"));
        assert!(html.contains(&format!(
            "action=\"/competitions/{}/delete\"",
            existing.competition_id
        )));
    }
}
