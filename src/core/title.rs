use crate::core::chapters::enforce_openai_opt_in;
use crate::error::{Error, Result};
use async_openai::{
    self,
    types::responses::{
        CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam, OutputItem,
        OutputMessageContent, ReasoningArgs, ReasoningEffort, Role,
    },
};
use std::env;

const TITLE_MODEL_ENV: &str = "CHAPTLY_TITLE_MODEL";
const DEFAULT_TITLE_MODEL: &str = "gpt-5.2";

const SYSTEM_PROMPT: &str = "You are a title generator bot specialized in crafting catchy \
titles for YouTube videos, podcasts, and similar content.";

#[derive(Clone)]
pub struct TitleService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl TitleService {
    pub fn new() -> Self {
        Self {
            client: async_openai::Client::new(),
        }
    }

    pub async fn generate_title(&self, transcript: &str) -> Result<String> {
        enforce_openai_opt_in()?;

        let model = env::var(TITLE_MODEL_ENV).unwrap_or_else(|_| DEFAULT_TITLE_MODEL.to_string());

        let request = CreateResponseArgs::default()
            .max_output_tokens(4096_u32)
            .model(model)
            .reasoning(ReasoningArgs::default().effort(ReasoningEffort::Low).build()?)
            .input(InputParam::Items(vec![
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::System)
                        .content(SYSTEM_PROMPT)
                        .build()?,
                ),
                InputItem::EasyMessage(
                    EasyInputMessageArgs::default()
                        .role(Role::User)
                        .content(format!(
                            "Analyze the transcript below and generate ONE title that accurately \
reflects the content while being captivating enough to grab attention. The title should be \
concise, impactful, and create a sense of curiosity or excitement. Consider strong verbs, \
numbers, and questions to make it more engaging, and keep the length suited to search engines \
and social platforms. Reply with the title alone, no alternatives and no commentary.

<TRANSCRIPT>
{transcript}
</TRANSCRIPT>"
                        ))
                        .build()?,
                ),
            ]))
            .build()?;

        let response = self.client.responses().create(request).await?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(out) = output {
                for c in out.content {
                    if let OutputMessageContent::OutputText(text) = c {
                        content.push_str(&text.text);
                    }
                }
            }
        }

        let title = clean_title(&content);
        if title.is_empty() {
            return Err(Error::custom("Model returned an empty title"));
        }

        Ok(title)
    }
}

/// Models like to wrap titles in quotes; strip one balanced pair.
fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::clean_title;

    #[test]
    fn trims_whitespace() {
        assert_eq!(clean_title("  My Title \n"), "My Title");
    }

    #[test]
    fn strips_balanced_quotes() {
        assert_eq!(clean_title("\"The 5 Secrets of Rust\""), "The 5 Secrets of Rust");
    }

    #[test]
    fn keeps_unbalanced_quote() {
        assert_eq!(clean_title("\"Quote in front"), "\"Quote in front");
    }
}
