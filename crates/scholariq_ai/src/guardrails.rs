use scholariq_core::error::AppError;

/// Reject blank generator output and unwrap a whole-document code fence.
///
/// Models sometimes wrap the answer in ```` ```markdown ... ``` ````; the fence would otherwise
/// end up in the scored text.
pub fn ensure_generated_text(output: &str) -> Result<String, AppError> {
    let trimmed = output.trim();
    let unfenced = strip_code_fence(trimmed).unwrap_or(trimmed).trim();
    if unfenced.is_empty() {
        return Err(AppError::generation_unavailable(
            "Generation returned no text",
        ));
    }
    Ok(unfenced.to_string())
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix("```")?.strip_suffix("```")?;
    let (lang, rest) = body.split_once('\n')?;
    if lang.trim().contains(char::is_whitespace) {
        return None;
    }
    Some(rest)
}
