use std::borrow::Cow;
use std::fmt::Write;

use chrono::{DateTime, Local};
use jobwatch_core::{escape_text, AppState, AppViewModel, TableBody};
use jobwatch_engine::{redact_endpoint, AtomicFileWriter};
use jobwatch_logging::{watch_debug, watch_error};

use crate::config::WatchConfig;

/// Where a rendered table goes once the state reports it dirty.
pub struct Publisher {
    print_table: bool,
    html: Option<AtomicFileWriter>,
    title: String,
}

impl Publisher {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            print_table: config.print_table,
            html: config.html_output.clone().map(AtomicFileWriter::new),
            title: format!("Jobs at {}", redact_endpoint(&config.endpoint)),
        }
    }

    pub fn publish(&self, state: &AppState, now: DateTime<Local>) {
        if self.print_table {
            println!("{}", format_terminal_table(&state.view(), now));
        }
        if let Some(writer) = &self.html {
            let page = render_page(&self.title, state.table(), now);
            match writer.write(&page) {
                Ok(()) => watch_debug!("Wrote {:?}", writer.target()),
                Err(err) => watch_error!("Failed to write {:?}: {}", writer.target(), err),
            }
        }
    }
}

/// One line per job. Control characters in ids and statuses are printed
/// escaped, so every entry stays on a single row.
pub fn format_terminal_table(view: &AppViewModel, now: DateTime<Local>) -> String {
    let mut out = format!("Jobs: {}", view.rows.len());
    if let Some(seq) = view.shown_seq {
        let _ = write!(out, " | poll #{seq}");
    }
    let _ = write!(
        out,
        " | in flight {} | stale {} | {}",
        view.in_flight,
        view.stale_discarded,
        now.format("%H:%M:%S")
    );

    let cells: Vec<_> = view
        .rows
        .iter()
        .map(|row| (display_cell(&row.id), display_cell(&row.status)))
        .collect();
    let id_width = cells
        .iter()
        .map(|(id, _)| id.chars().count())
        .chain(std::iter::once("ID".len()))
        .max()
        .unwrap_or(0);

    let _ = write!(out, "\n{:<id_width$}  STATUS", "ID");
    for (id, status) in &cells {
        let pad = id_width - id.chars().count();
        let _ = write!(out, "\n{}{}  {}", id, " ".repeat(pad), status);
    }
    out
}

fn display_cell(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_debug());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

pub fn render_page(title: &str, table: &TableBody, now: DateTime<Local>) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
         <body>\n<h1>{title}</h1>\n\
         <table>\n<thead><tr><th>ID</th><th>Status</th></tr></thead>\n{body}\n</table>\n\
         <p>Updated {updated}</p>\n\
         </body>\n</html>\n",
        title = escape_text(title),
        body = table.to_html(),
        updated = now.to_rfc3339(),
    )
}
