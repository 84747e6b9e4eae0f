use super::EvaluationReport;

pub fn to_markdown(report: &EvaluationReport) -> String {
    let mut output = String::new();
    output.push_str("# Match Score\n\n");
    output.push_str(&format!(
        "Profile: {} (v{}, sha256 {})\n\n",
        report.profile_path, report.profile_version, report.profile_digest
    ));

    let score = match &report.outcome {
        Ok(score) => score,
        Err(failure) => {
            output.push_str(&format!("Status: not scored ({})\n\n", failure.message()));
            output.push_str("## Errors\n\n");
            for error in &failure.errors {
                output.push_str(&format!("- {}\n", error.describe()));
            }
            return output;
        }
    };

    output.push_str(&format!("Score: {}\n\n", score.score));
    output.push_str("## Parts\n\n");
    for part in &score.breakdown.parts {
        match part.bonus_scope {
            Some(scope) => output.push_str(&format!(
                "- {} ({}): {} + {} bonus ({:?})\n",
                part.label, part.id, part.points, part.bonus, scope
            )),
            None => output.push_str(&format!(
                "- {} ({}): {}\n",
                part.label, part.id, part.points
            )),
        }
    }

    output.push_str("\n## Penalties\n\n");
    if score.breakdown.penalties.is_empty() {
        output.push_str("- none\n");
    } else {
        for line in &score.breakdown.penalties {
            output.push_str(&format!(
                "- {} x{} -> {:?}: {}\n",
                line.id, line.count, line.target, line.contribution
            ));
        }
    }
    let totals = score.breakdown.penalty_totals;
    output.push_str(&format!(
        "\n- TOTAL_PENALTIES_SELF: {}\n- TOTAL_PENALTIES_OPPONENT: {}\n- NET_PENALTIES: {}\n",
        totals.self_total, totals.opponent_total, totals.net
    ));
    output.push_str(&format!(
        "\nFormula value: {}\n",
        score.breakdown.formula_value
    ));

    output
}
