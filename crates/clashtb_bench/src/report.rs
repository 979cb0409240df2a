//! Rendering of comparison results.
//!
//! ```text
//! PASS state
//! FAIL out (mismatch at step 1)
//! expected = 0 0 1 1
//! actual   = 0 1 1 1
//! ```

use crossterm::style::Stylize;

use crate::compare::Comparison;

/// How results are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Show traces for passing signals too.
    pub verbose: bool,
    /// Emit ANSI styling.
    pub color: bool,
}

/// Renders one comparison.
///
/// Traces are shown when the signal failed or `verbose` is set; columns are
/// right-aligned so each step lines up between the two rows.
pub fn render_comparison(comparison: &Comparison, options: ReportOptions) -> String {
    let mut out = String::new();
    let name = comparison.name();

    let header = if comparison.passed() {
        let line = format!("PASS {name}");
        paint(&line, options.color, |s| s.green().bold().to_string())
    } else {
        let mismatches = comparison.mismatches();
        let steps = mismatches
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let plural = if mismatches.len() == 1 { "" } else { "s" };
        let line = format!("FAIL {name} (mismatch at step{plural} {steps})");
        paint(&line, options.color, |s| s.red().bold().to_string())
    };
    out.push_str(&header);
    out.push('\n');

    if !comparison.passed() || options.verbose {
        let expected = comparison.expected().display_values();
        let actual = comparison.actual().display_values();
        let widths: Vec<usize> = expected
            .iter()
            .zip(&actual)
            .map(|(e, a)| e.chars().count().max(a.chars().count()))
            .collect();

        let row = |label: &str, values: &[String]| {
            let cells: Vec<String> = values
                .iter()
                .zip(&widths)
                .map(|(v, &w)| format!("{v:>w$}"))
                .collect();
            format!("{label:<8} = {}", cells.join(" "))
        };

        let expected_row = row("expected", &expected);
        let actual_row = row("actual", &actual);
        out.push_str(&paint(&expected_row, options.color, |s| s.cyan().to_string()));
        out.push('\n');
        out.push_str(&paint(&actual_row, options.color, |s| s.dark_yellow().to_string()));
        out.push('\n');
    }
    out
}

/// Renders every comparison followed by a summary line.
pub fn render_report(comparisons: &[Comparison], options: ReportOptions) -> String {
    let mut out: String = comparisons
        .iter()
        .map(|c| render_comparison(c, options))
        .collect();
    let passed = comparisons.iter().filter(|c| c.passed()).count();
    out.push_str(&format!(
        "Result: {passed} passed, {} failed out of {} signal(s)\n",
        comparisons.len() - passed,
        comparisons.len()
    ));
    out
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}
