use crate::domain::{FlagKind, ScoreBand, ScoreResult};
use crate::scoring::weight_for;

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Render a deterministic Markdown citation-quality report.
///
/// Flag rows keep the order of `result.flags`, so outputs are snapshot-testable.
pub fn render_score_markdown(result: &ScoreResult) -> String {
    let mut out = String::new();
    out.push_str("## Citation quality report\n\n");
    out.push_str(&format!(
        "- Hallucination score: **{}/100** ({})\n",
        result.score, result.band
    ));
    out.push_str(&format!(
        "- Citations: {} total, {} clean, {} flagged\n",
        result.prose.citation_count, result.clean_citations, result.flagged_citations
    ));
    out.push_str(&format!(
        "- Unverifiable citations: {} ({})\n",
        result.prose.unverifiable_citations,
        percent(result.prose.unverifiable_ratio)
    ));
    out.push_str(&format!(
        "- Unsupported research claims: {}\n",
        result.prose.unsupported_claims
    ));
    out.push_str(&format!(
        "- Weight table: v{}\n\n",
        result.weight_table_version
    ));

    out.push_str("### Flags\n\n");
    if result.flags.is_empty() {
        out.push_str("- None.\n\n");
    } else {
        out.push_str("| # | Citation | Kind | Check | Weight | Reason |\n");
        out.push_str("|---:|---|---|---|---:|---|\n");
        for f in &result.flags {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                f.citation_index,
                f.citation.replace('|', "\\|").replace('\n', " "),
                f.kind,
                f.check,
                f.weight,
                f.reason.replace('|', "\\|")
            ));
        }
        out.push('\n');
    }

    if !result.recommendations.is_empty() {
        out.push_str("### Recommendations\n\n");
        for r in &result.recommendations {
            out.push_str(&format!("- {r}\n"));
        }
        out.push('\n');
    }

    out.push_str("### Weights\n\n");
    for kind in FlagKind::ALL {
        out.push_str(&format!("- {kind}: {}\n", weight_for(kind)));
    }
    out
}

/// Append a citation-quality warning to text that did not pass. Passing text is returned as-is.
pub fn annotate_text(text: &str, result: &ScoreResult) -> String {
    if result.band == ScoreBand::Pass {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 512);
    out.push_str(text.trim_end());
    out.push_str("\n\n---\n\n");
    let heading = match result.band {
        ScoreBand::Fail => "CITATION QUALITY FAILURE",
        _ => "CITATION QUALITY WARNING",
    };
    out.push_str(&format!("**{heading}**\n\n"));
    out.push_str(&format!(
        "Hallucination score: {}/100 ({}). Valid citations: {}/{}.\n",
        result.score, result.band, result.clean_citations, result.prose.citation_count
    ));
    if !result.issues.is_empty() {
        out.push_str("\nIssues:\n");
        for issue in &result.issues {
            out.push_str(&format!("- {issue}\n"));
        }
    }
    if !result.recommendations.is_empty() {
        out.push_str("\nRecommendations:\n");
        for r in &result.recommendations {
            out.push_str(&format!("- {r}\n"));
        }
    }
    out
}
