use std::borrow::Cow;
use std::fmt::Write;

use crate::StatusMap;

/// Identifier of the table body the status rows are rendered into.
pub const JOBS_BODY_ID: &str = "jobsBody";

/// Anything that can hold a table body of `(id, status)` rows.
pub trait RenderTarget {
    fn clear(&mut self);
    fn append_row(&mut self, id: &str, status: &str);
}

/// Replace the whole content of `target` with one row per entry of `statuses`.
pub fn render<T: RenderTarget + ?Sized>(target: &mut T, statuses: &StatusMap) {
    target.clear();
    for (id, status) in statuses.iter() {
        target.append_row(id, status);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: String,
    pub status: String,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 2] {
        [&self.id, &self.status]
    }
}

/// In-memory table body. Rows are plain text; markup is only produced by
/// [`TableBody::to_html`], which escapes every cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableBody {
    rows: Vec<TableRow>,
}

impl TableBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<tbody id=\"{JOBS_BODY_ID}\">");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row.cells() {
                let _ = write!(out, "<td>{}</td>", escape_text(cell));
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody>");
        out
    }
}

impl RenderTarget for TableBody {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, id: &str, status: &str) {
        self.rows.push(TableRow {
            id: id.to_string(),
            status: status.to_string(),
        });
    }
}

/// Escape text for use as HTML element content or a quoted attribute value.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
