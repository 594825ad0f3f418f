//! Built-in prompts.

use std::collections::HashMap;

use crate::prompt::{required_arg, Prompt, PromptArgument, PromptDefinition, PromptError};

/// `analyze_post(post_id)`
pub struct AnalyzePostPrompt;

impl Prompt for AnalyzePostPrompt {
    fn definition(&self) -> PromptDefinition {
        PromptDefinition::new("analyze_post", "Analyze a specific post")
            .argument(PromptArgument::required("post_id", "ID of the post to analyze"))
    }

    fn render(&self, args: &HashMap<String, String>) -> Result<String, PromptError> {
        let post_id = required_arg(args, "post_id")?;
        Ok(format!(
            "Analyze post {post_id} from JSONPlaceholder.

First, use the get_post_by_id tool to fetch the post.
Then provide a detailed analysis including:
1. Summary of the content
2. Overall sentiment
3. Main themes
4. Writing quality
5. Suggestions for improvement

Please be thorough and constructive in the analysis.
"
        ))
    }
}

/// `user_profile_analysis(user_id)`
pub struct UserProfileAnalysisPrompt;

impl Prompt for UserProfileAnalysisPrompt {
    fn definition(&self) -> PromptDefinition {
        PromptDefinition::new("user_profile_analysis", "Analyze a user's profile and todos")
            .argument(PromptArgument::required("user_id", "ID of the user to analyze"))
    }

    fn render(&self, args: &HashMap<String, String>) -> Result<String, PromptError> {
        let user_id = required_arg(args, "user_id")?;
        Ok(format!(
            "Analyze the profile of user {user_id} from JSONPlaceholder.

Use these tools in order:
1. get_user_by_id to fetch the user's details
2. get_todos to fetch the user's todos (user_id={user_id})

Based on the results, provide:
1. A summary of the personal profile
2. An analysis of the todos (completed vs. pending)
3. Insights into productivity
4. Suggestions for better organization

Keep the analysis professional and constructive.
"
        ))
    }
}

/// `daily_inspiration()`
pub struct DailyInspirationPrompt;

impl Prompt for DailyInspirationPrompt {
    fn definition(&self) -> PromptDefinition {
        PromptDefinition::new("daily_inspiration", "Compose a daily inspiration message")
    }

    fn render(&self, _args: &HashMap<String, String>) -> Result<String, PromptError> {
        Ok("Create a daily inspiration message using our resources.

Follow these steps:
1. Use get_cat_fact to add an interesting fact about cats
2. Use get_random_joke to add a touch of humor

Combine everything into a motivational message that includes:
- A curious cat fact to spark interest
- A joke to brighten the day
- A positive, energetic message

Keep the tone positive and energetic!
"
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_analyze_post_interpolates_id() {
        let text = AnalyzePostPrompt.render(&args(&[("post_id", "12")])).unwrap();
        assert!(text.starts_with("Analyze post 12 from JSONPlaceholder."));
        assert!(text.contains("get_post_by_id"));
    }

    #[test]
    fn test_user_profile_mentions_both_tools() {
        let text = UserProfileAnalysisPrompt
            .render(&args(&[("user_id", "3")]))
            .unwrap();
        assert!(text.contains("get_user_by_id"));
        assert!(text.contains("(user_id=3)"));
    }

    #[test]
    fn test_daily_inspiration_takes_no_arguments() {
        assert!(DailyInspirationPrompt.definition().arguments.is_empty());
        let text = DailyInspirationPrompt.render(&HashMap::new()).unwrap();
        assert!(text.contains("get_cat_fact"));
        assert!(text.contains("get_random_joke"));
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            AnalyzePostPrompt.render(&HashMap::new()),
            Err(PromptError::MissingArgument("post_id".to_string()))
        );
    }
}
