// File: src/patch.rs
// Purpose: Datastar-style element patch events for live responses

use std::convert::Infallible;

use axum::response::{
    sse::{Event, Sse},
    IntoResponse, Response,
};
use futures::stream;
use maud::Markup;

pub const PATCH_ELEMENTS_EVENT: &str = "datastar-patch-elements";

/// How the client applies the patched elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchMode {
    #[default]
    Outer,
    Inner,
    Replace,
    Prepend,
    Append,
    Before,
    After,
    Remove,
}

impl PatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchMode::Outer => "outer",
            PatchMode::Inner => "inner",
            PatchMode::Replace => "replace",
            PatchMode::Prepend => "prepend",
            PatchMode::Append => "append",
            PatchMode::Before => "before",
            PatchMode::After => "after",
            PatchMode::Remove => "remove",
        }
    }
}

/// A single `datastar-patch-elements` event
///
/// ```text
/// event: datastar-patch-elements
/// data: selector #notes-content
/// data: mode outer
/// data: elements <div id="notes-content">…</div>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchElements {
    selector: String,
    mode: PatchMode,
    elements: String,
}

impl PatchElements {
    /// Targets the element with id `selector_id` (a leading `#` is optional)
    pub fn new(selector_id: &str, fragment: Markup) -> Self {
        let selector = if selector_id.starts_with('#') {
            selector_id.to_string()
        } else {
            format!("#{}", selector_id)
        };

        Self {
            selector,
            mode: PatchMode::default(),
            elements: fragment.into_string(),
        }
    }

    pub fn with_mode(mut self, mode: PatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Event data lines, without the `data: ` prefix
    pub fn data_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("selector {}", self.selector),
            format!("mode {}", self.mode.as_str()),
        ];
        let elements = self.elements.replace("\r\n", "\n").replace('\r', "\n");
        lines.extend(
            elements
                .lines()
                .filter(|line| !line.is_empty())
                .map(|line| format!("elements {}", line)),
        );
        lines
    }

    pub fn to_event(&self) -> Event {
        Event::default()
            .event(PATCH_ELEMENTS_EVENT)
            .data(self.data_lines().join("\n"))
    }
}

impl IntoResponse for PatchElements {
    fn into_response(self) -> Response {
        let event = self.to_event();
        Sse::new(stream::once(async move { Ok::<_, Infallible>(event) })).into_response()
    }
}
