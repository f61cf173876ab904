//! Provider instructions and response normalisation.

/// Builds the messages sent to remote providers.
pub struct PromptBuilder;

impl PromptBuilder {
    /// System instruction fixing the output to raw code in `language`.
    pub fn system_prompt(language: &str) -> String {
        format!(
            "You are an expert coding assistant. Generate clean, production-ready {language} \
code based on the user's request. Provide ONLY the code, no explanations. \
Comment the code helpfully."
        )
    }
}

/// Strip a well-formed leading and trailing code fence.
///
/// The opening fence is three backticks, an optional language tag with no
/// whitespace in it, then a newline. The closing fence is three backticks at
/// the very end, optionally preceded by a newline; trailing whitespace after
/// it is ignored. Each end is handled independently. Anything else, fences in
/// the middle of the text included, is left as is.
pub fn strip_code_fence(response: &str) -> String {
    let mut text = response;

    if let Some(rest) = text.strip_prefix("```") {
        if let Some(newline) = rest.find('\n') {
            let tag = rest[..newline].trim_end_matches('\r');
            let well_formed = !tag.contains(|c: char| c.is_whitespace() || c == '`');
            if well_formed {
                text = &rest[newline + 1..];
            }
        }
    }

    let trimmed = text.trim_end();
    if let Some(body) = trimmed.strip_suffix("```") {
        if !body.ends_with('`') {
            text = body
                .strip_suffix('\n')
                .map(|b| b.strip_suffix('\r').unwrap_or(b))
                .unwrap_or(body);
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_language() {
        let prompt = PromptBuilder::system_prompt("python");
        assert!(prompt.contains("production-ready python code"));
        assert!(prompt.contains("ONLY the code"));
    }

    #[test]
    fn test_strips_tagged_fence() {
        assert_eq!(
            strip_code_fence("```javascript\nconsole.log(1)\n```"),
            "console.log(1)"
        );
    }

    #[test]
    fn test_strips_untagged_fence_and_trailing_whitespace() {
        assert_eq!(strip_code_fence("```\nfn main() {}\n```\n\n"), "fn main() {}");
    }

    #[test]
    fn test_tag_with_symbols() {
        assert_eq!(strip_code_fence("```c++\nint x;\n```"), "int x;");
        assert_eq!(strip_code_fence("```c#\r\nvar x = 1;\r\n```"), "var x = 1;");
    }

    #[test]
    fn test_unfenced_text_is_unchanged() {
        let code = "def add(a, b):\n    return a + b";
        assert_eq!(strip_code_fence(code), code);
    }

    #[test]
    fn test_embedded_fences_are_kept() {
        let text = "Here you go:\n```python\nprint(1)\n```\nEnjoy!";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_multiple_blocks_only_outer_ends_stripped() {
        let text = "```js\na()\n```\n\n```js\nb()\n```";
        assert_eq!(strip_code_fence(text), "a()\n```\n\n```js\nb()");
    }

    #[test]
    fn test_malformed_opening_fence_is_kept() {
        // a tag containing spaces is prose, not a language
        let text = "```this is not a tag\ncode\n```";
        assert_eq!(strip_code_fence(text), "```this is not a tag\ncode");

        // single-line fence without newline
        assert_eq!(strip_code_fence("```x = 1"), "```x = 1");
    }

    #[test]
    fn test_only_closing_fence() {
        assert_eq!(strip_code_fence("x = 1\n```"), "x = 1");
    }
}
