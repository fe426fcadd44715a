use super::github_issue::GitHubIssue;

pub const NO_DESCRIPTION: &str = "No description provided";

pub const PROCEED_WITH_IMPLEMENTATION: &str =
    "Please proceed with implementing the solution based on the action plan you provided.";

fn description(issue: &GitHubIssue) -> &str {
    issue.body.as_deref().unwrap_or(NO_DESCRIPTION)
}

/// Asks for a feasibility score and plan in the `CONFIDENCE:` /
/// `ACTION PLAN:` format the status endpoint parses.
pub fn scope_prompt(issue: &GitHubIssue, repo: &str) -> String {
    format!(
        "Please analyze this GitHub issue and provide:
1. A confidence score (0-100) indicating how feasible this issue is to complete
2. A detailed action plan for implementing the solution

Issue: {}
Description: {}
Repository: {}

Format your response as:
CONFIDENCE: [score]
ACTION PLAN:
[detailed plan]",
        issue.title,
        description(issue),
        repo
    )
}

pub fn implementation_prompt(issue: &GitHubIssue, repo: &str) -> String {
    format!(
        "Please complete this GitHub issue by implementing the solution and creating a PR.

Issue: {}
Description: {}
Repository: {}

Please:
1. Analyze the issue
2. Implement the solution
3. Test your changes
4. Create a PR with your implementation",
        issue.title,
        description(issue),
        repo
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issue(body: Option<&str>) -> GitHubIssue {
        GitHubIssue {
            number: 5,
            title: "Add dark mode".to_string(),
            body: body.map(str::to_string),
            state: "open".to_string(),
            html_url: "https://github.com/owner/repo/issues/5".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            labels: Vec::new(),
        }
    }

    #[test]
    fn scope_prompt_embeds_issue_and_format() {
        let prompt = scope_prompt(&issue(Some("Toggle in settings")), "owner/repo");

        assert!(prompt.contains("Issue: Add dark mode"));
        assert!(prompt.contains("Description: Toggle in settings"));
        assert!(prompt.contains("Repository: owner/repo"));
        assert!(prompt.contains("CONFIDENCE: [score]"));
        assert!(prompt.contains("ACTION PLAN:"));
    }

    #[test]
    fn missing_body_uses_placeholder() {
        let prompt = implementation_prompt(&issue(None), "owner/repo");

        assert!(prompt.contains("Description: No description provided"));
        assert!(prompt.contains("4. Create a PR with your implementation"));
    }
}
