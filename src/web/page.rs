// src/web/page.rs
use crate::aggregate::AggregateOutcome;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// What the index page shows below the form.
pub enum PageView<'a> {
    Empty,
    Error(&'a str),
    Tables(&'a AggregateOutcome),
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Table Harvester</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body class="container py-4">
<h1>Table Harvester</h1>
<form method="post" action="/">
  <div class="mb-3">
    <label for="urls" class="form-label">Page URLs (one per line)</label>
    <textarea id="urls" name="urls" class="form-control" rows="5"></textarea>
  </div>
  <button type="submit" class="btn btn-primary">Extract tables</button>
</form>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Renders the whole index page.
pub fn render(view: PageView<'_>) -> String {
    let mut html = String::from(HEAD);

    match view {
        PageView::Empty => {}
        PageView::Error(message) => {
            html.push_str("<div class=\"alert alert-danger mt-4\" role=\"alert\">");
            html.push_str(&encode_text(message));
            html.push_str("</div>\n");
        }
        PageView::Tables(outcome) => render_tables(&mut html, outcome),
    }

    html.push_str(TAIL);
    html
}

fn render_tables(html: &mut String, outcome: &AggregateOutcome) {
    if outcome.tables.is_empty() {
        return;
    }

    html.push_str(&format!(
        "<p class=\"mt-4\"><a class=\"btn btn-success\" href=\"/download_all\">Download all tables ({} rows)</a></p>\n",
        outcome.combined.rows.len()
    ));

    for saved in &outcome.tables {
        let table = &saved.table;
        html.push_str("<section class=\"mt-4\">\n");
        html.push_str(&format!(
            "<h2>{} <small class=\"text-muted\">Table {}</small></h2>\n",
            encode_text(&table.title),
            table.index
        ));
        html.push_str(&format!(
            "<p class=\"text-muted\">From {}</p>\n",
            encode_text(&table.source_url)
        ));
        if !table.headers().is_empty() {
            let headers: Vec<String> = table
                .headers()
                .iter()
                .map(|h| encode_text(h).into_owned())
                .collect();
            html.push_str(&format!("<p>Headers: {}</p>\n", headers.join(", ")));
        }
        html.push_str(&table.html);
        html.push('\n');
        html.push_str(&format!(
            "<p><a href=\"/download_csv/{}\">Download CSV</a></p>\n",
            encode_double_quoted_attribute(&urlencoding::encode(&saved.file_name))
        ));
        html.push_str("</section>\n");
    }
}
