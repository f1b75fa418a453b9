//! JSON dump of a compiled configuration.

use crate::render::{RenderError, Renderer};
use crate::routing::RenderableConfig;

/// Pretty-printed JSON renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, config: &RenderableConfig) -> Result<String, RenderError> {
        let mut text = serde_json::to_string_pretty(config)?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{compile, HttpMethod, Route};
    use serde_json::Value;

    #[test]
    fn test_json_shape() {
        let config = compile(&[
            Route::new("/messages", "A").with_methods([HttpMethod::Get]),
            Route::new("/messages", "B").with_methods([HttpMethod::Post]),
        ])
        .unwrap();

        let text = JsonRenderer.render(&config).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["locations"][0]["path"], "/messages");
        assert_eq!(value["locations"][0]["target"], "$messages_target");
        assert_eq!(
            value["locations"][0]["unallowed_methods"],
            serde_json::json!(["PUT", "DELETE", "PATCH"])
        );
        assert_eq!(value["method_maps"][0]["var_name"], "messages_target");
        assert_eq!(value["method_maps"][0]["method_to_target"]["GET"], "A");
        assert_eq!(value["method_maps"][0]["method_to_target"]["POST"], "B");
    }
}
