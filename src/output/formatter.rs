use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::insights::Summary;
use crate::scoring::{RankedUseCase, ScoreBreakdown};
use crate::usecase::Factor;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with two decimals ("1.33", "-0.50")
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked use cases as a table with columns: Index, Priority, Readiness, Name, Owner
/// No headers
/// Index column: 3 chars (fits "99."), right-aligned
/// Score columns are right-aligned, 7 chars wide (fits "-12.50")
pub fn format_ranked_table(rows: &[RankedUseCase], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No use cases found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 7;
    let separator = "  ";

    rows.iter()
        .map(|row| {
            let use_case = &row.scored.use_case;
            let index_str = format!("{:>2}.", row.rank);
            let priority = format!("{:>width$}", format_score(row.scored.priority_score), width = score_width);
            let readiness = format!("{:>width$}", format_score(row.scored.readiness_score), width = score_width);

            let owner_len = use_case.owner.chars().count();
            let fixed_width = index_width + 1 + score_width * 2 + separator.len() * 3 + owner_len;

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&use_case.name, width - fixed_width)
                } else {
                    truncate_name(&use_case.name, 20)
                }
            } else {
                use_case.name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    priority.bold(),
                    separator,
                    readiness.cyan(),
                    separator,
                    name,
                    separator,
                    use_case.owner.yellow()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str,
                    priority,
                    separator,
                    readiness,
                    separator,
                    name,
                    separator,
                    use_case.owner
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked use cases as tab-separated values for scripting
/// Columns: rank, priority, readiness, name, owner (no headers, no colors)
pub fn format_tsv(rows: &[RankedUseCase]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.rank,
                format_score(row.scored.priority_score),
                format_score(row.scored.readiness_score),
                row.scored.use_case.name,
                row.scored.use_case.owner
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked use cases as a pretty JSON array
pub fn format_json(rows: &[RankedUseCase]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Format a single use case with its ratings and score breakdown
pub fn format_use_case_detail(row: &RankedUseCase, breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let use_case = &row.scored.use_case;
    let mut lines = Vec::new();

    if use_colors {
        lines.push(format!("{}. {}", row.rank, use_case.name.bold()));
        lines.push(format!("  Owner: {}", use_case.owner.yellow()));
    } else {
        lines.push(format!("{}. {}", row.rank, use_case.name));
        lines.push(format!("  Owner: {}", use_case.owner));
    }
    if !use_case.notes.is_empty() {
        lines.push(format!("  Notes: {}", use_case.notes));
    }

    lines.push(String::new());
    lines.push("  Priority Score breakdown:".to_string());
    for f in &breakdown.factors {
        let raw = use_case.rating(f.factor).display();
        // Show the raw cell when it was coerced
        let rating = if raw.trim().parse::<f64>().ok() == Some(f.rating) {
            raw
        } else {
            format!("{} (from '{}')", f.rating, raw)
        };
        let sign = if f.factor.is_penalty() { "-" } else { "+" };
        lines.push(format!(
            "    {} {:<22} {} x {:<4} = {:+.2}",
            sign,
            f.factor.label(),
            rating,
            f.weight,
            f.contribution
        ));
    }
    lines.push(format!(
        "    / weight sum {}{}",
        breakdown.weight_sum,
        if breakdown.weight_sum == 0.0 { " (using 1)" } else { "" }
    ));
    let priority = format_score(breakdown.priority_score);
    if use_colors {
        lines.push(format!("    = Priority Score {}", priority.bold()));
    } else {
        lines.push(format!("    = Priority Score {}", priority));
    }

    let [feas, data, change, risk] = breakdown.readiness_components;
    lines.push(String::new());
    lines.push(format!(
        "  Readiness Score: ({} + {} + {} + {}) / 4 = {}",
        feas,
        data,
        change,
        risk,
        format_score(breakdown.readiness_score)
    ));

    let out_of_range = use_case.out_of_range_factors();
    if !out_of_range.is_empty() {
        let labels: Vec<&str> = out_of_range.iter().map(|f| f.label()).collect();
        let warning = format!("  Outside 1-5 scale: {}", labels.join(", "));
        if use_colors {
            lines.push(format!("{}", warning.red()));
        } else {
            lines.push(warning);
        }
    }

    lines.join("\n")
}

/// Format the top-N table and narrative
pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let mut out = Vec::new();

    if !summary.is_empty() {
        let heading = "Top Opportunities";
        if use_colors {
            out.push(format!("{}", heading.bold()));
        } else {
            out.push(heading.to_string());
        }
        out.push(format!(
            "{:>3} {:>7} {:>7} {:>5} {:>5} {:>5} {:>5} {:>5}  {}",
            "#",
            "Prio",
            "Ready",
            Factor::BusinessValue.short(),
            Factor::TechnicalFeasibility.short(),
            Factor::DataReadiness.short(),
            Factor::ChangeImpact.short(),
            Factor::Risk.short(),
            "Use Case (Owner)"
        ));
        for row in summary.top {
            let uc = &row.scored.use_case;
            let ratings: Vec<String> = Factor::ALL
                .iter()
                .map(|f| format!("{:>5}", uc.rating(*f).display()))
                .collect();
            out.push(format!(
                "{:>2}. {:>7} {:>7} {}  {} ({})",
                row.rank,
                format_score(row.scored.priority_score),
                format_score(row.scored.readiness_score),
                ratings.join(" "),
                uc.name,
                uc.owner
            ));
        }
        out.push(String::new());
    }

    let heading = "Narrative";
    if use_colors {
        out.push(format!("{}", heading.bold()));
    } else {
        out.push(heading.to_string());
    }
    for line in &summary.narrative {
        out.push(format!("- {}", line));
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{breakdown, rank, score, WeightSet};
    use crate::seed::default_use_cases;
    use crate::usecase::{Field, UseCase};

    fn ranked() -> Vec<RankedUseCase> {
        rank(score(&default_use_cases(), &WeightSet::default()))
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(16.0 / 12.0), "1.33");
        assert_eq!(format_score(-0.5), "-0.50");
        assert_eq!(format_score(0.0), "0.00");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Short name", 20), "Short name");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("This is a very long name", 15), "This is a ve...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(format_ranked_table(&[], false), "No use cases found.");
    }

    #[test]
    fn test_format_ranked_table_rows() {
        let rows = ranked();
        let result = format_ranked_table(&rows, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("1.96"));
        assert!(lines[0].contains("3.75"));
        assert!(lines[0].contains("Enterprise"));
        assert!(lines[3].starts_with(" 4."));
    }

    #[test]
    fn test_format_tsv() {
        let rows = ranked();
        let result = format_tsv(&rows);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "1\t1.96\t3.75\tInternal knowledge retrieval assistant\tEnterprise"
        );
        assert_eq!(lines[0].split('\t').count(), 5);
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_json() {
        let rows = ranked();
        let json = format_json(&rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["rank"], 1);
        assert_eq!(parsed[0]["name"], "Internal knowledge retrieval assistant");
        assert_eq!(parsed[0]["readiness_score"], 3.75);
        assert_eq!(parsed[0]["business_value"], 3.0);
    }

    #[test]
    fn test_format_use_case_detail() {
        let rows = ranked();
        let triage = rows
            .iter()
            .find(|r| r.scored.use_case.name.starts_with("Intelligent"))
            .unwrap();
        let b = breakdown(&triage.scored.use_case, &WeightSet::default());
        let result = format_use_case_detail(triage, &b, false);
        assert!(result.contains("Owner: Operations"));
        assert!(result.contains("Notes: High cost savings"));
        assert!(result.contains("+15.00"));
        assert!(result.contains("-8.00"));
        assert!(result.contains("weight sum 12"));
        assert!(result.contains("Priority Score 1.33"));
        assert!(result.contains("Readiness Score: (3 + 3 + 1 + 2) / 4 = 2.25"));
        assert!(!result.contains("Outside 1-5 scale"));
    }

    #[test]
    fn test_format_use_case_detail_coerced_and_out_of_range() {
        let mut uc = UseCase::new("Odd", [7.0, 3.0, 3.0, 3.0, 3.0]);
        Field::Rating(Factor::Risk).set(&mut uc, "tbd");
        let rows = rank(score(&[uc.clone()], &WeightSet::zero()));
        let b = breakdown(&uc, &WeightSet::zero());
        let result = format_use_case_detail(&rows[0], &b, false);
        assert!(result.contains("0 (from 'tbd')"));
        assert!(result.contains("(using 1)"));
        assert!(result.contains("Outside 1-5 scale: Business Value, Risk"));
    }

    #[test]
    fn test_format_summary() {
        let rows = ranked();
        let summary = Summary::from_ranked(&rows, 2);
        let result = format_summary(&summary, false);
        assert!(result.starts_with("Top Opportunities"));
        assert!(result.contains(" 1.    1.96"));
        assert!(result.contains("Narrative"));
        assert!(result.contains("- Highest priority: Internal knowledge retrieval assistant"));
        // Only two rows in the table
        assert!(!result.contains(" 3. "));
    }

    #[test]
    fn test_format_summary_empty() {
        let rows: Vec<RankedUseCase> = Vec::new();
        let summary = Summary::from_ranked(&rows, 5);
        let result = format_summary(&summary, false);
        assert!(!result.contains("Top Opportunities"));
        assert!(result.contains("No use cases available"));
    }
}
