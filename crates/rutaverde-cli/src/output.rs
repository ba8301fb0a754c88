//! Printing command results
//!
//! Every command builds one result value. With `--json` it is printed as a
//! single `{"status": "success", "data": ...}` document; otherwise the value
//! renders itself as styled text through [`Human`].

use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// A command result that can be shown to a person or printed as JSON
pub trait Report: Serialize {
    fn render(&self, out: &mut Human);
}

/// Styled terminal text, collected before it is printed
#[derive(Debug, Default)]
pub struct Human {
    text: String,
}

impl Human {
    pub fn heading(&mut self, title: impl Display) -> &mut Self {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.line(style(title).bold().underlined())
    }

    pub fn field(&mut self, label: impl Display, value: impl Display) -> &mut Self {
        self.line(format!("{}: {}", style(label).bold(), value))
    }

    pub fn note(&mut self, message: impl Display) -> &mut Self {
        self.line(format!("{} {}", style("ℹ").blue().bold(), message))
    }

    pub fn warning(&mut self, message: impl Display) -> &mut Self {
        self.line(format!("{} {}", style("⚠").yellow().bold(), message))
    }

    pub fn table<T: Tabled>(&mut self, rows: impl IntoIterator<Item = T>) -> &mut Self {
        let rows: Vec<T> = rows.into_iter().collect();
        if rows.is_empty() {
            return self.line(style("(none)").dim());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        self.line(table)
    }

    pub fn into_text(self) -> String {
        self.text
    }

    fn line(&mut self, content: impl Display) -> &mut Self {
        self.text.push_str(&content.to_string());
        self.text.push('\n');
        self
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    status: &'static str,
    data: &'a T,
}

/// Prints command results in the mode chosen on the command line
pub struct OutputWriter {
    json: bool,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn emit<R: Report>(&self, report: &R) -> anyhow::Result<()> {
        if self.json {
            let envelope = Envelope { status: "success", data: report };
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        } else {
            let mut out = Human::default();
            report.render(&mut out);
            print!("{}", out.into_text());
        }
        Ok(())
    }
}
