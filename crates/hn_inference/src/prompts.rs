//! Prompt templates. The interpreter does not rely on the model following
//! the requested format.

pub fn summary_prompt(content: &str) -> String {
    format!(
        r#"You are a health news summarizer.
Summarize this article into:
1. A 2-line TL;DR (max 30 words)
2. 3 key takeaways in bullet points
Maintain medical accuracy. Keep it readable and neutral.

Article:
{content}

Format exactly as:
TLDR: <2 lines within 30 words>
TAKEAWAYS:
- <bullet 1>
- <bullet 2>
- <bullet 3>"#
    )
}

pub fn rewrite_prompt(content: &str) -> String {
    format!(
        r#"Rewrite the following article in a simple, friendly, beginner-level tone.
Avoid medical jargon unless necessary.
Keep it 20–30% shorter.

Text:
{content}

Format:
REWRITE:
<text>"#
    )
}
