//! Text cleanup ahead of conversion.

/// Prepare raw text for conversion.
///
/// This function:
/// - Removes control characters (except newlines and tabs)
/// - Collapses runs of spaces and tabs into one space
/// - Collapses runs of blank lines into a single blank line
/// - Trims leading and trailing whitespace
///
/// Paragraph breaks survive, so the output chunks the same as the input,
/// just without stray whitespace inflating character counts.
pub fn prepare_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;
    let mut newline_count = 0;

    for c in text.chars() {
        if c == '\n' {
            newline_count += 1;
            prev_was_space = false;

            // Keep at most one blank line
            if newline_count <= 2 {
                result.push('\n');
            }
        } else if c == ' ' || c == '\t' {
            newline_count = 0;
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else if c == '\r' || c.is_control() {
            // Dropped; \r would otherwise break paragraph detection on
            // Windows line endings
        } else {
            newline_count = 0;
            prev_was_space = false;
            result.push(c);
        }
    }

    result.trim().to_string()
}
