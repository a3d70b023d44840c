//! Output formatters for analyses and evaluation results.
//!
//! JSON output is the plain serialized value. Markdown and text are report
//! layouts: for an evaluation the score comes first, then metrics, verdicts
//! and files; for an analysis the totals come first, then files and the
//! snippets around each changed line.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::analysis::BugFixAnalysis;
use crate::config::OutputFormat;
use crate::core::Result;
use crate::patterns::PatternTag;
use crate::score::{EvaluationResult, FileChangeSummary};

/// Output format enum.
#[derive(Clone, Copy, Debug, Default)]
pub enum Format {
    #[default]
    Json,
    Markdown,
    Text,
}

impl Format {
    /// Render an evaluation as a report. JSON output is the plain result.
    pub fn write_evaluation<W: Write>(
        &self,
        result: &EvaluationResult,
        writer: &mut W,
    ) -> Result<()> {
        match self {
            Format::Json => write_json(result, writer),
            Format::Markdown => write_evaluation_markdown(result, writer),
            Format::Text => write_evaluation_text(result, writer),
        }
    }

    /// Render a single fix analysis.
    pub fn write_analysis<W: Write>(
        &self,
        analysis: &BugFixAnalysis,
        writer: &mut W,
    ) -> Result<()> {
        match self {
            Format::Json => write_json(analysis, writer),
            Format::Markdown => write_analysis_markdown(analysis, writer),
            Format::Text => write_analysis_text(analysis, writer),
        }
    }
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}

fn write_json<T: Serialize, W: Write>(data: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, data)?;
    writeln!(writer)?;
    Ok(())
}

fn write_evaluation_markdown<W: Write>(result: &EvaluationResult, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Fix Evaluation\n")?;
    writeln!(
        writer,
        "**Overall Score**: {:.1} / 100 ({})\n",
        result.overall_score, result.grade
    )?;

    writeln!(writer, "## Metrics\n")?;
    writeln!(writer, "| Metric | Score | Weight |")?;
    writeln!(writer, "| --- | --- | --- |")?;
    for (kind, metric) in &result.metrics {
        writeln!(
            writer,
            "| {} | {:.2} | {:.2} |",
            title_case(kind.as_str()),
            metric.score,
            metric.weight
        )?;
    }
    writeln!(writer)?;

    for (title, items) in [
        ("Strengths", &result.strengths),
        ("Weaknesses", &result.weaknesses),
    ] {
        writeln!(writer, "## {title}\n")?;
        if items.is_empty() {
            writeln!(writer, "_None_\n")?;
        } else {
            for item in items {
                writeln!(writer, "- {item}")?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer, "## Files\n")?;
    if result.comparison.files.is_empty() {
        writeln!(writer, "_No items_\n")?;
        return Ok(());
    }
    writeln!(writer, "| Path | Category | Reference | Candidate |")?;
    writeln!(writer, "| --- | --- | --- | --- |")?;
    for (path, file) in &result.comparison.files {
        writeln!(
            writer,
            "| {} | {} | {} | {} |",
            path,
            file.category.as_str(),
            describe_side(file.reference.as_ref()),
            describe_side(file.candidate.as_ref())
        )?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_evaluation_text<W: Write>(result: &EvaluationResult, writer: &mut W) -> Result<()> {
    let headline = format!("{:.1}/100 ({})", result.overall_score, result.grade);
    let headline = match result.grade.as_str() {
        "A" | "B" => headline.green().bold(),
        "C" | "D" => headline.yellow().bold(),
        _ => headline.red().bold(),
    };
    writeln!(writer, "Overall score: {headline}")?;

    writeln!(writer, "Metrics:")?;
    for (kind, metric) in &result.metrics {
        writeln!(
            writer,
            "  {:<14} {:.2} (weight {:.2})",
            kind.as_str(),
            metric.score,
            metric.weight
        )?;
    }

    for (title, items) in [
        ("Strengths", &result.strengths),
        ("Weaknesses", &result.weaknesses),
    ] {
        writeln!(writer, "{title}:")?;
        if items.is_empty() {
            writeln!(writer, "  -")?;
        }
        for item in items {
            writeln!(writer, "  - {item}")?;
        }
    }

    let summary = &result.comparison.summary;
    writeln!(
        writer,
        "Files: {} total, {} common, {} reference-only, {} candidate-only",
        summary.total_files, summary.common_files, summary.reference_only, summary.candidate_only
    )?;
    for (path, file) in &result.comparison.files {
        writeln!(writer, "  {} [{}]", path, file.category.as_str())?;
    }
    Ok(())
}

fn write_analysis_markdown<W: Write>(analysis: &BugFixAnalysis, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Fix Analysis\n")?;
    writeln!(writer, "**Files Changed**: {}\n", analysis.changed_files.len())?;
    writeln!(
        writer,
        "**Complexity**: {}{}\n",
        analysis.complexity.score,
        join_factors(&analysis.complexity.factors)
    )?;
    writeln!(writer, "**Patterns**: {}\n", join_patterns(&analysis.patterns))?;
    if !analysis.context.summary.is_empty() {
        writeln!(writer, "**Summary**: {}\n", analysis.context.summary)?;
    }

    writeln!(writer, "## Files\n")?;
    if analysis.is_empty() {
        writeln!(writer, "_None_\n")?;
        return Ok(());
    }
    writeln!(writer, "| Path | Language | Added | Modified | Removed | Complexity | Patterns |")?;
    writeln!(writer, "| --- | --- | --- | --- | --- | --- | --- |")?;
    for file in &analysis.changed_files {
        let counts = file.counts();
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {} | {} |",
            file.path,
            file.language.as_str(),
            counts.added,
            counts.modified,
            counts.removed,
            file.complexity.score,
            join_patterns(&file.patterns)
        )?;
    }
    writeln!(writer)?;

    for (path, ctx) in &analysis.context.file_contexts {
        if ctx.context_lines.is_empty() {
            continue;
        }
        writeln!(writer, "### {path}\n")?;
        for line in ctx.context_lines.values() {
            writeln!(writer, "Line {}:\n", line.line)?;
            writeln!(writer, "```")?;
            for text in &line.before {
                writeln!(writer, "  {text}")?;
            }
            writeln!(writer, "> {}", line.content)?;
            for text in &line.after {
                writeln!(writer, "  {text}")?;
            }
            writeln!(writer, "```\n")?;
        }
    }
    Ok(())
}

fn write_analysis_text<W: Write>(analysis: &BugFixAnalysis, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "Fix analysis: {} files changed, complexity {}{}",
        analysis.changed_files.len(),
        analysis.complexity.score,
        join_factors(&analysis.complexity.factors)
    )?;
    writeln!(writer, "Patterns: {}", join_patterns(&analysis.patterns))?;
    if !analysis.context.summary.is_empty() {
        writeln!(writer, "Summary: {}", analysis.context.summary)?;
    }
    for file in &analysis.changed_files {
        let counts = file.counts();
        writeln!(
            writer,
            "  {} ({}): +{} ~{} -{}, complexity {} [{}]",
            file.path,
            file.language.as_str(),
            counts.added,
            counts.modified,
            counts.removed,
            file.complexity.score,
            join_patterns(&file.patterns)
        )?;
    }
    Ok(())
}

fn describe_side(side: Option<&FileChangeSummary>) -> String {
    match side {
        None => "-".to_string(),
        Some(s) if s.patterns.is_empty() => format!("{} changes", s.change_count),
        Some(s) => format!("{} changes ({})", s.change_count, join_patterns(&s.patterns)),
    }
}

fn join_patterns<'a>(patterns: impl IntoIterator<Item = &'a PatternTag>) -> String {
    let names: Vec<_> = patterns.into_iter().map(|p| p.as_str()).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn join_factors<'a>(factors: impl IntoIterator<Item = &'a String>) -> String {
    let factors: Vec<_> = factors.into_iter().map(String::as_str).collect();
    if factors.is_empty() {
        String::new()
    } else {
        format!(" ({})", factors.join(", "))
    }
}

/// `pattern_match` -> `Pattern Match`.
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
