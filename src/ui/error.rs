use modeldex::config::ConfigError;
use modeldex::domain::ports::IndexStoreError;
use modeldex::ModeldexError;

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Suggested next step for errors a user can fix directly.
fn hint(err: &ModeldexError) -> Option<String> {
    match err {
        ModeldexError::Config(ConfigError::NotFound { .. }) => Some(
            "create a solution.toml at the model root, or pass --solution <path>".to_string(),
        ),
        ModeldexError::Store(IndexStoreError::Missing { .. }) => {
            Some("run `modeldex validate-index` to build the index".to_string())
        }
        ModeldexError::Store(IndexStoreError::VersionMismatch { .. }) => {
            Some("run `modeldex validate-index --full` to rebuild the index".to_string())
        }
        ModeldexError::LayerRootNotFound { layer, .. } => Some(format!(
            "create the directory or fix [layers] {} in solution.toml",
            layer.token().to_lowercase()
        )),
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error, color: bool, unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(color, unicode),
        ColoredText::error(err.to_string()).render(color)
    );
    if let Some(hint) = err.downcast_ref::<ModeldexError>().and_then(hint) {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(color, unicode),
            ColoredText::dim(hint).render(color)
        ));
    }
    out
}

pub fn print_error(err: &anyhow::Error, ui: &UiContext) {
    if ui.json {
        let output = serde_json::json!({ "error": err.to_string() });
        let _ = crate::ui::json::emit("error", false, &output);
        return;
    }

    if ui.annotate() {
        println!(
            "{}",
            crate::ui::ci::github_actions_annotation(
                crate::ui::ci::AnnotationLevel::Error,
                &err.to_string(),
                None,
                Some("modeldex"),
            )
        );
    }

    eprint!("{}", format_error(err, ui.color, ui.unicode));
}
