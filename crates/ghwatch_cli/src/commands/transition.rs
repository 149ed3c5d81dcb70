use ghwatch::{Action, BatchPolicy, BatchReport, Executor, Target, TransitionReport};

use crate::commands::shared::Session;

fn batch_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .items
        .iter()
        .map(|item| match &item.result {
            Ok(outcome) => format!("{}: {}", item.target, outcome),
            Err(err) => format!("{}: failed: {}", item.target, err),
        })
        .collect();
    lines.push(report.summary());
    if report.has_failures() {
        lines.push(format!("{} failed", report.failed()));
    }
    lines
}

fn report_lines(report: &TransitionReport) -> Vec<String> {
    match report {
        TransitionReport::Single { target, outcome } => vec![format!("{}: {}", target, outcome)],
        TransitionReport::Batch(batch) => batch_lines(batch),
    }
}

/// Apply `action` to `target` and print what happened.
///
/// Returns `true` when a best-effort batch recorded failures.
pub(crate) async fn handle_transition(
    session: &Session,
    action: Action,
    target: &Target,
    policy: BatchPolicy,
) -> Result<bool, Box<dyn std::error::Error>> {
    let executor = Executor::new(&session.client)
        .with_capabilities(session.capabilities)
        .with_policy(policy)
        .with_page_size(session.page_size)
        .with_progress(session.on_progress());

    let report = executor.apply(action, target).await;
    session.finish();
    let report = report?;

    for line in report_lines(&report) {
        println!("{}", line);
    }
    Ok(report.has_failures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghwatch::{GitHubError, ItemResult, Outcome};

    #[test]
    fn single_report_is_one_line() {
        let report = TransitionReport::Single {
            target: "a/x".into(),
            outcome: Outcome::AlreadySubscribed,
        };
        assert_eq!(report_lines(&report), vec!["a/x: already subscribed"]);
    }

    #[test]
    fn batch_report_lists_items_then_summary() {
        let report = BatchReport {
            action: Action::Block,
            owner: "a".into(),
            items: vec![
                ItemResult {
                    target: "a/x".into(),
                    result: Ok(Outcome::Applied(Action::Block)),
                },
                ItemResult {
                    target: "a/y".into(),
                    result: Err(GitHubError::api(500, "boom")),
                },
            ],
        };

        let lines = batch_lines(&report);
        assert_eq!(lines[0], "a/x: Blocked");
        assert!(lines[1].starts_with("a/y: failed:"));
        assert_eq!(lines[2], "Blocked 1 repositories owned by a");
        assert_eq!(lines[3], "1 failed");
    }
}
