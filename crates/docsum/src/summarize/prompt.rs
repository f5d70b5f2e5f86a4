//! Prompt templates for map-reduce summarization

/// Prompt builder for summarization passes
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the map-phase prompt for one chunk
    pub fn map_prompt(text: &str) -> String {
        format!(
            r#"Write a concise summary of the following:

{text}

CONCISE SUMMARY:"#,
            text = text
        )
    }

    /// Build the reduce-phase prompt combining partial summaries
    pub fn reduce_prompt(partials: &[String]) -> String {
        format!(
            r#"The following is a set of summaries:

{summaries}

Take these and distill them into a final, consolidated summary:"#,
            summaries = partials.join("\n\n---\n\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_prompt_embeds_the_chunk() {
        let prompt = PromptBuilder::map_prompt("Chunk body here.");
        assert!(prompt.contains("Chunk body here."));
        assert!(prompt.ends_with("CONCISE SUMMARY:"));
    }

    #[test]
    fn reduce_prompt_keeps_partial_order() {
        let partials = vec!["first".to_string(), "second".to_string()];
        let prompt = PromptBuilder::reduce_prompt(&partials);
        let first = prompt.find("first").unwrap();
        let second = prompt.find("second").unwrap();
        assert!(first < second);
    }
}
