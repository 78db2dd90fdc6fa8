use ansi_term::{Colour, Style};

use crate::{
    analysis::{AggregatedTable, Recommendation},
    session::{Session, Snapshot},
    utils::time::format_minutes,
};

const BAR_WIDTH: usize = 30;

/// Styles of the bars. [Palette::plain] is for output that ends up in a file.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub share: Style,
    pub public: Style,
    pub user: Style,
}

impl Palette {
    pub fn colored() -> Self {
        Self {
            share: Colour::Green.normal(),
            public: Colour::Blue.normal(),
            user: Colour::Yellow.normal(),
        }
    }

    pub fn plain() -> Self {
        Self {
            share: Style::new(),
            public: Style::new(),
            user: Style::new(),
        }
    }
}

pub fn print_snapshot(title: &str, snapshot: &Snapshot) {
    println!("{}", Style::new().bold().paint(title));
    for line in table_lines(&snapshot.table, Palette::colored()) {
        println!("{line}");
    }
    println!(
        "Average per row: {:.1} min (std. dev. {:.1})",
        snapshot.statistics.mean, snapshot.statistics.std_dev
    );
}

/// Terminal version of the comparison view: averages, totals per category as paired bars, the
/// user's category shares and the recommendation.
pub fn print_dashboard(session: &Session) {
    let heading = Style::new().bold().fg(Colour::Blue);
    println!("{}", heading.paint("Focus Recommender"));
    if let Some(recommendation) = session.last_recommendation() {
        println!(
            "Today's recommendation: {}",
            Style::new().bold().paint(&recommendation.slot)
        );
    }
    println!();
    println!(
        "Public average: {:.1} min    Your average: {:.1} min",
        session.public().statistics.mean,
        session.user().statistics.mean
    );
    println!();

    println!("{}", heading.paint("Total per category"));
    for line in comparison_lines(
        &session.public().table,
        &session.user().table,
        Palette::colored(),
    ) {
        println!("{line}");
    }
    println!();

    println!("{}", heading.paint("Your shares"));
    for line in table_lines(&session.user().table, Palette::colored()) {
        println!("{line}");
    }

    if let Some(recommendation) = session.last_recommendation() {
        println!();
        print_recommendation(recommendation);
    }
}

fn print_recommendation(recommendation: &Recommendation) {
    println!(
        "{}",
        Style::new().bold().fg(Colour::Blue).paint("Why this slot")
    );
    for line in recommendation.rationale.lines() {
        println!("  {line}");
    }
    if !recommendation.alternatives.is_empty() {
        println!(
            "  {}",
            Colour::Fixed(244).paint(format!(
                "Other candidates: {}",
                recommendation.alternatives.join(", ")
            ))
        );
    }
}

fn label_width(table: &AggregatedTable) -> usize {
    table
        .rows()
        .iter()
        .map(|v| v.category.chars().count())
        .max()
        .unwrap_or(0)
}

fn pad(label: &str, width: usize) -> String {
    let padding = width.saturating_sub(label.chars().count());
    format!("{label}{}", " ".repeat(padding))
}

/// Number of bar cells for `value` when `max` fills the whole bar.
fn bar_length(value: f64, max: f64) -> usize {
    if max <= 0. || value <= 0. {
        return 0;
    }
    ((value / max) * BAR_WIDTH as f64).round() as usize
}

fn bar(value: f64, max: f64) -> String {
    "█".repeat(bar_length(value, max).min(BAR_WIDTH))
}

/// One line per category: label, total, share and a bar of the share.
pub fn table_lines(table: &AggregatedTable, palette: Palette) -> Vec<String> {
    let width = label_width(table);
    table
        .rows()
        .iter()
        .map(|row| {
            format!(
                "{}  {:>7}  {:>6}  {}",
                pad(&row.category, width),
                format_minutes(row.total_minutes),
                row.percentage.to_string(),
                palette.share.paint(bar(*row.percentage, 100.)),
            )
        })
        .collect()
}

/// Two lines per category with bars scaled to the largest total of both tables.
pub fn comparison_lines(
    public: &AggregatedTable,
    user: &AggregatedTable,
    palette: Palette,
) -> Vec<String> {
    let width = label_width(public).max(label_width(user));
    let max = public
        .rows()
        .iter()
        .chain(user.rows())
        .map(|v| v.total_minutes)
        .max()
        .unwrap_or(0) as f64;

    let mut lines = Vec::new();
    for row in public.rows() {
        let user_minutes = user
            .get(&row.category)
            .map(|v| v.total_minutes)
            .unwrap_or(0);
        lines.push(format!(
            "{}  public {:>7} {}",
            pad(&row.category, width),
            format_minutes(row.total_minutes),
            palette.public.paint(bar(row.total_minutes as f64, max)),
        ));
        lines.push(format!(
            "{}  you    {:>7} {}",
            pad("", width),
            format_minutes(user_minutes),
            palette.user.paint(bar(user_minutes as f64, max)),
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{CategoryAggregator, vocabulary::Vocabulary},
        input::RawTable,
    };

    #[test]
    fn test_bar_length() {
        assert_eq!(bar_length(0., 100.), 0);
        assert_eq!(bar_length(50., 100.), BAR_WIDTH / 2);
        assert_eq!(bar_length(100., 100.), BAR_WIDTH);
        assert_eq!(bar_length(10., 0.), 0);
        assert_eq!(bar_length(-5., 100.), 0);
    }

    #[test]
    fn test_pad_counts_characters() {
        assert_eq!(pad("학습", 4), "학습  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_lines_cover_every_category() {
        let table = AggregatedTable::empty(&Vocabulary::default());
        let lines = table_lines(&table, Palette::colored());
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("학습"));
        assert!(lines[0].contains("0.0%"));
        assert_eq!(comparison_lines(&table, &table, Palette::colored()).len(), 10);
    }

    #[test]
    fn test_plain_palette_has_no_escape_codes() {
        let table = CategoryAggregator::default()
            .aggregate(&RawTable::from_strings(
                ["id", "행동분류별", "a"],
                [["x", "학습", "90"], ["y", "이동", "30"]],
            ))
            .unwrap()
            .table;

        let lines = table_lines(&table, Palette::plain());
        assert!(lines.iter().all(|v| !v.contains('\x1b')));
        assert!(lines[0].ends_with(&"█".repeat(23)));

        let lines = comparison_lines(&table, &table, Palette::plain());
        assert!(lines[0].ends_with(&"█".repeat(BAR_WIDTH)));
        assert!(lines[2].ends_with(&"█".repeat(10)));
    }

    #[test]
    fn test_lines_survive_extreme_totals() {
        let table = CategoryAggregator::default()
            .aggregate(&RawTable::from_strings(
                ["id", "행동분류별", "a", "b"],
                [["x", "학습", "-1e30", "-1e30"], ["y", "이동", "-1e18", "0"]],
            ))
            .unwrap()
            .table;

        let lines = table_lines(&table, Palette::plain());
        assert!(lines[0].contains("-153722867280912930h8m"));
        assert!(!lines[0].contains('█'));
        assert_eq!(comparison_lines(&table, &table, Palette::plain()).len(), 10);
    }
}
