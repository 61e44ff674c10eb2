use modeldex::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

pub fn github_actions_annotation(
    level: AnnotationLevel,
    message: &str,
    file: Option<&str>,
    title: Option<&str>,
) -> String {
    let level_str = match level {
        AnnotationLevel::Warning => "warning",
        AnnotationLevel::Error => "error",
    };

    let mut props = Vec::new();
    if let Some(file) = file {
        props.push(format!("file={}", escape_property(file)));
    }
    if let Some(title) = title {
        props.push(format!("title={}", escape_property(title)));
    }

    let prop_str = if props.is_empty() {
        String::new()
    } else {
        format!(" {}", props.join(","))
    };

    format!("::{}{}::{}", level_str, prop_str, escape_data(message))
}

/// Annotation for one diagnostic; reference-level errors become warnings.
pub fn diagnostic_annotation(diagnostic: &Diagnostic) -> String {
    let level = if diagnostic.is_fatal() {
        AnnotationLevel::Error
    } else {
        AnnotationLevel::Warning
    };
    let file = diagnostic.file.as_ref().map(|f| f.as_str());
    github_actions_annotation(level, &diagnostic.message, file, Some(&diagnostic.kind))
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
