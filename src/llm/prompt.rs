//! Final prompt construction.

/// Build the explanation prompt. The conversational directive comes from the
/// selected mode's policy; memory is injected only when present.
pub fn build_prompt(
    query: &str,
    context: &str,
    conversational_directive: &str,
    memory: Option<&str>,
) -> String {
    let mut parts: Vec<&str> = Vec::new();

    parts.push("You are a senior engineer helping a teammate understand a codebase.");
    parts.push(conversational_directive);

    if let Some(memory) = memory {
        parts.push("\n=== Conversation Memory ===\n");
        parts.push(memory);
    }

    parts.push("\n=== Code Context ===\n");
    parts.push(context);

    parts.push("\n=== Question ===\n");
    parts.push(query);

    parts.push("\nAnswer clearly and directly, as in a code review discussion.");

    parts.join("\n").trim().to_string()
}
