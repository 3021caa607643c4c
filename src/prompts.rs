use crate::models::{Category, ChatMessage, Length, PromptForm, Role};

pub fn system_prompt(category: Category) -> &'static str {
    match category {
        Category::All => {
            "You are an expert prompt engineer skilled in creating clear, detailed, and effective prompts for any purpose."
        }
        Category::Text => {
            "You are an expert writer and prompt engineer specializing in creating detailed text prompts that generate high-quality written content."
        }
        Category::Image => {
            "You are an expert visual artist and prompt engineer specializing in creating detailed image prompts that generate stunning visuals."
        }
        Category::Video => {
            "You are an expert videographer and prompt engineer specializing in creating detailed video prompts that generate engaging content."
        }
        Category::Code => {
            "You are an expert software developer and prompt engineer specializing in creating detailed coding prompts that follow best practices."
        }
    }
}

fn length_guide(length: Length) -> &'static str {
    match length {
        Length::Short => "concise and focused (50-100 words)",
        Length::Medium => "detailed and comprehensive (100-200 words)",
        Length::Long => "extensive and thorough (200-300 words)",
    }
}

fn category_instructions(category: Category) -> &'static str {
    match category {
        Category::All => "",
        Category::Text => "Include tone, style, and structural elements.",
        Category::Image => {
            "Include composition, lighting, style, color palette, and technical details."
        }
        Category::Video => "Include shot types, transitions, pacing, and technical specifications.",
        Category::Code => "Include architecture considerations, patterns, and potential pitfalls.",
    }
}

const FORMAT_RULES: &str = "Format the prompt professionally, ensuring it is:
1. Clear and unambiguous
2. Properly structured with logical flow
3. Specific and actionable
4. Includes all necessary technical details
5. Maintains consistent tone and style

Response should be direct and ready to use, without meta-commentary or explanations.";

pub fn user_prompt(form: &PromptForm) -> String {
    let mut sections = vec![format!(
        "Generate a {} prompt about: {}",
        length_guide(form.length),
        form.description.trim()
    )];

    if let Some(details) = form.details() {
        sections.push(format!("Additional context and requirements: {details}"));
    }

    let extra = category_instructions(form.category);
    if !extra.is_empty() {
        sections.push(extra.to_string());
    }

    sections.push(FORMAT_RULES.to_string());
    sections.join("\n\n")
}

// System + user message pair sent to the model
pub fn build_messages(form: &PromptForm) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: Role::System,
            content: system_prompt(form.category).to_string(),
        },
        ChatMessage {
            role: Role::User,
            content: user_prompt(form),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(category: Category, details: Option<&str>) -> PromptForm {
        PromptForm {
            category,
            description: "outline for quarterly presentation".into(),
            details: details.map(str::to_string),
            length: Length::Medium,
        }
    }

    #[test]
    fn user_prompt_includes_details_and_category_hint() {
        let prompt = user_prompt(&form(Category::Image, Some("watercolor, 4k")));
        assert!(prompt.starts_with(
            "Generate a detailed and comprehensive (100-200 words) prompt about: outline for quarterly presentation"
        ));
        assert!(prompt.contains("Additional context and requirements: watercolor, 4k"));
        assert!(prompt.contains("color palette"));
        assert!(prompt.ends_with("without meta-commentary or explanations."));
    }

    #[test]
    fn blank_sections_are_skipped() {
        let prompt = user_prompt(&form(Category::All, Some("   ")));
        assert!(!prompt.contains("Additional context"));
        assert!(!prompt.contains("\n\n\n"));
    }

    #[test]
    fn messages_are_system_then_user() {
        let messages = build_messages(&form(Category::Code, None));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("software developer"));
        assert_eq!(messages[1].role, Role::User);
    }
}
