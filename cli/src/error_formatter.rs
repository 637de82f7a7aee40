use ariadne::{Color, Label, Report, ReportKind, Source};
use bayan::error::ErrorDetails;
use bayan::BayanError;

/// Format a BayanError with fancy terminal output using Ariadne
pub fn format_error(error: &BayanError) -> String {
    if let Some(details) = error.details() {
        return format_with_source(error, details);
    }

    match error {
        BayanError::Engine(msg) => format!("Engine error: {}", msg),
        BayanError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        BayanError::MultipleErrors(errors) => {
            let mut result = String::from("Multiple errors occurred:\n\n");
            for error in errors {
                result.push_str(&format_error(error));
                result.push_str("\n\n");
            }
            result
        }
        BayanError::Parse(_) | BayanError::Semantic(_) => error.to_string(),
    }
}

fn format_with_source(error: &BayanError, details: &ErrorDetails) -> String {
    let mut output = Vec::new();

    let error_type = match error {
        BayanError::Parse(_) => "Parse error",
        _ => "Semantic error",
    };

    let message = format!(
        "{}: {} (file {}:{}:{})",
        error_type, details.message, details.source_id, details.span.line, details.span.col
    );

    // Ariadne counts characters; spans count bytes
    let text = details.source_text.as_ref();
    let start = char_offset(text, details.span.start);
    let end = char_offset(text, details.span.end).max(start);

    let mut report = Report::build(ReportKind::Error, &details.source_id, start)
        .with_message(message)
        .with_label(
            Label::new((&details.source_id, start..end))
                .with_message("")
                .with_color(Color::Red),
        );

    if let Some(suggestion) = &details.suggestion {
        report = report.with_help(suggestion);
    }

    match report
        .finish()
        .write((&details.source_id, Source::from(text)), &mut output)
    {
        Ok(_) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => format!("{}", error),
    }
}

fn char_offset(text: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(text.len());
    text.char_indices()
        .take_while(|(index, _)| *index < clamped)
        .count()
}
