use std::{fmt::Display, fs, path::Path};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::{
    analysis::Recommendation,
    session::{Session, Snapshot},
    utils::time::report_timestamp,
};

use super::{
    ReportFormat,
    dashboard::{Palette, comparison_lines, table_lines},
};

/// Everything that ends up in an exported report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: String,
    /// `None` only if nothing was predicted yet.
    pub recommendation: Option<&'a Recommendation>,
    pub public: &'a Snapshot,
    pub user: &'a Snapshot,
}

impl<'a> Report<'a> {
    pub fn from_session(session: &'a Session, generated_at: String) -> Self {
        Self {
            generated_at,
            recommendation: session.last_recommendation(),
            public: session.public(),
            user: session.user(),
        }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (slot, rationale) = match self.recommendation {
            Some(v) => (v.slot.as_str(), v.rationale.as_str()),
            None => ("-", "-"),
        };
        writeln!(f, "Focus Recommender report")?;
        writeln!(f, "Generated: {}", self.generated_at)?;
        writeln!(f)?;
        writeln!(f, "Recommended focus time: {slot}")?;
        writeln!(f)?;
        writeln!(f, "Reasons:")?;
        for line in rationale.lines() {
            writeln!(f, "  {line}")?;
        }
        writeln!(f)?;
        writeln!(f, "Public average: {:.1} min", self.public.statistics.mean)?;
        writeln!(f, "Your average: {:.1} min", self.user.statistics.mean)?;
        writeln!(f)?;
        write_section(
            f,
            "Total per category",
            comparison_lines(&self.public.table, &self.user.table, Palette::plain()),
        )?;
        writeln!(f)?;
        write_section(f, "Your shares", table_lines(&self.user.table, Palette::plain()))?;
        writeln!(f)?;
        write_section(
            f,
            "Public shares",
            table_lines(&self.public.table, Palette::plain()),
        )
    }
}

fn write_section(
    f: &mut std::fmt::Formatter<'_>,
    title: &str,
    lines: Vec<String>,
) -> std::fmt::Result {
    writeln!(f, "{title}")?;
    for line in lines {
        writeln!(f, "  {line}")?;
    }
    Ok(())
}

/// Writes the report for the session's current state into `path`.
pub fn export(session: &Session, path: &Path, format: ReportFormat) -> Result<()> {
    let report = Report::from_session(session, report_timestamp(Local::now()));
    let content = match format {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    fs::write(path, content).with_context(|| format!("write report: {}", path.display()))?;
    Ok(())
}
