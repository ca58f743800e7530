//! Human-readable rendering of a [`Report`].

use crate::report::{Report, StatusTier};
use colored::{ColoredString, Colorize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colors.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

impl RenderOptions {
    pub const fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Render the summary, category rollup, failures and recommendation.
pub fn render_text(report: &Report, base_url: &str, options: RenderOptions) -> String {
    TextReport {
        report,
        base_url,
        options,
    }
    .to_string()
}

/// [`Report`] formatted for a terminal.
struct TextReport<'a> {
    report: &'a Report,
    base_url: &'a str,
    options: RenderOptions,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            report,
            base_url,
            options,
        } = self;
        let rule = "=".repeat(60);

        writeln!(f, "{rule}")?;
        writeln!(f, "{}", options.paint("API compatibility report", |s| s.bold()))?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Target:       {base_url}")?;
        writeln!(f, "Total checks: {}", report.total)?;
        writeln!(
            f,
            "Passed:       {}",
            options.paint(&report.success.to_string(), |s| s.green())
        )?;
        writeln!(
            f,
            "Failed:       {}",
            options.paint(&report.failure.to_string(), |s| s.red())
        )?;
        writeln!(f, "Success rate: {:.1}%", report.success_rate)?;

        if !report.categories.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", options.paint("By category", |s| s.bold()))?;
            for category in &report.categories {
                let marker = if category.failure == 0 {
                    options.paint("ok  ", |s| s.green())
                } else {
                    options.paint("FAIL", |s| s.red())
                };
                writeln!(
                    f,
                    "  {marker} {:<28} {}/{} passed",
                    category.name, category.success, category.total
                )?;
            }
        }

        if !report.failures.is_empty() {
            self.fmt_failures(f)?;
        }

        writeln!(f)?;
        let tier = report.tier.to_string();
        let painted = match report.tier {
            StatusTier::Ready => options.paint(&tier, |s| s.green().bold()),
            StatusTier::Caution => options.paint(&tier, |s| s.yellow().bold()),
            StatusTier::Blocked => options.paint(&tier, |s| s.red().bold()),
        };
        writeln!(f, "Status: {painted}: {}", report.tier.recommendation())
    }
}

impl TextReport<'_> {
    fn fmt_failures(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.options.paint("Failures", |s| s.bold()))?;
        let mut current: Option<&str> = None;
        for failure in &self.report.failures {
            if current != Some(failure.category.as_str()) {
                writeln!(f, "  [{}]", failure.category)?;
                current = Some(failure.category.as_str());
            }
            let code = failure
                .kind
                .map(|kind| format!("{} ", kind.code_string()))
                .unwrap_or_default();
            writeln!(f, "    - {code}{}", failure.message)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.options.paint("Remediation", |s| s.bold()))?;
        for kind in self.report.failure_kinds() {
            writeln!(f, "  {}", kind.entry().format_brief())?;
            for hint in kind.remediation() {
                writeln!(f, "    * {hint}")?;
            }
        }
        Ok(())
    }
}
