//! Post body authoring: formatting commands over a markup document, and the
//! rich/markup mode switch that shares one markup string.

use std::ops::Range;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("selection {start}..{end} is outside the document or splits a character")]
    InvalidSelection { start: usize, end: usize },
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("heading level must be 1-6, got '{0}'")]
    InvalidHeading(String),
    #[error("formatting is only available on the rich surface")]
    NotRichMode,
}

/// A markup buffer with a selection, the surface formatting commands act on.
pub trait MarkupDocument {
    fn markup(&self) -> &str;
    fn selection(&self) -> Range<usize>;
    fn select(&mut self, range: Range<usize>) -> Result<(), EditorError>;
    /// Replaces `range` and selects `selected` afterwards (byte offsets into
    /// the new markup).
    fn splice(&mut self, range: Range<usize>, replacement: &str, selected: Range<usize>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupBuffer {
    markup: String,
    selection: Range<usize>,
}

impl MarkupBuffer {
    /// Caret placed at the end, as when focusing an editable region.
    pub fn new(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let end = markup.len();
        Self {
            markup,
            selection: end..end,
        }
    }

    pub fn selected_text(&self) -> &str {
        &self.markup[self.selection.clone()]
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl MarkupDocument for MarkupBuffer {
    fn markup(&self) -> &str {
        &self.markup
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn select(&mut self, range: Range<usize>) -> Result<(), EditorError> {
        let valid = range.start <= range.end
            && range.end <= self.markup.len()
            && self.markup.is_char_boundary(range.start)
            && self.markup.is_char_boundary(range.end);
        if !valid {
            return Err(EditorError::InvalidSelection {
                start: range.start,
                end: range.end,
            });
        }
        self.selection = range;
        Ok(())
    }

    fn splice(&mut self, range: Range<usize>, replacement: &str, selected: Range<usize>) {
        self.markup.replace_range(range, replacement);
        self.selection = selected;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Heading,
    BulletList,
    NumberedList,
    Link,
    Image,
}

impl FormatCommand {
    pub fn name(self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Heading => "heading",
            FormatCommand::BulletList => "bullet list",
            FormatCommand::NumberedList => "numbered list",
            FormatCommand::Link => "link",
            FormatCommand::Image => "image",
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn heading_level(value: Option<&str>) -> Result<u8, EditorError> {
    let Some(raw) = value else {
        return Ok(2);
    };
    let digits = raw.trim().trim_start_matches(['h', 'H']);
    match digits.parse::<u8>() {
        Ok(level @ 1..=6) => Ok(level),
        _ => Err(EditorError::InvalidHeading(raw.to_string())),
    }
}

fn required<'a>(command: FormatCommand, value: Option<&'a str>) -> Result<&'a str, EditorError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(EditorError::MissingValue(command.name()))
}

fn wrap<D: MarkupDocument>(doc: &mut D, open: &str, close: &str, inner: Option<&str>) {
    let selection = doc.selection();
    let text = match inner {
        Some(text) if selection.is_empty() => text.to_string(),
        _ => doc.markup()[selection.clone()].to_string(),
    };
    let replacement = format!("{open}{text}{close}");
    let inner_start = selection.start + open.len();
    doc.splice(
        selection,
        &replacement,
        inner_start..inner_start + text.len(),
    );
}

/// Applies one toolbar command to the document's current selection.
///
/// Wrapping commands keep the wrapped text selected; an image replaces the
/// selection and leaves the caret after it. `Link` and `Image` take a URL,
/// `Heading` an optional level (`"3"` or `"h3"`, default 2).
pub fn apply_format<D: MarkupDocument>(
    doc: &mut D,
    command: FormatCommand,
    value: Option<&str>,
) -> Result<(), EditorError> {
    match command {
        FormatCommand::Bold => wrap(doc, "<b>", "</b>", None),
        FormatCommand::Italic => wrap(doc, "<i>", "</i>", None),
        FormatCommand::Heading => {
            let level = heading_level(value)?;
            wrap(doc, &format!("<h{level}>"), &format!("</h{level}>"), None);
        }
        FormatCommand::BulletList => wrap(doc, "<ul><li>", "</li></ul>", None),
        FormatCommand::NumberedList => wrap(doc, "<ol><li>", "</li></ol>", None),
        FormatCommand::Link => {
            let url = required(command, value)?;
            let open = format!("<a href=\"{}\">", escape_attribute(url));
            wrap(doc, &open, "</a>", Some(url));
        }
        FormatCommand::Image => {
            let url = required(command, value)?;
            let tag = format!("<img src=\"{}\" alt=\"\">", escape_attribute(url));
            let selection = doc.selection();
            let caret = selection.start + tag.len();
            doc.splice(selection, &tag, caret..caret);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Rich,
    Markup,
}

/// Editor for a post body. In rich mode edits land on the mounted surface;
/// leaving rich mode snapshots the surface into the shared markup before it
/// is dropped, and entering it mounts a fresh surface from that markup.
#[derive(Debug, Clone)]
pub struct ContentEditor {
    mode: EditorMode,
    markup: String,
    surface: Option<MarkupBuffer>,
}

impl ContentEditor {
    pub fn new(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        Self {
            mode: EditorMode::Rich,
            surface: Some(MarkupBuffer::new(markup.clone())),
            markup,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            EditorMode::Markup => {
                if let Some(surface) = self.surface.take() {
                    self.markup = surface.into_markup();
                }
            }
            EditorMode::Rich => {
                self.surface = Some(MarkupBuffer::new(self.markup.clone()));
            }
        }
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> EditorMode {
        let next = match self.mode {
            EditorMode::Rich => EditorMode::Markup,
            EditorMode::Markup => EditorMode::Rich,
        };
        self.set_mode(next);
        next
    }

    /// The mounted rich surface, if in rich mode.
    pub fn surface_mut(&mut self) -> Option<&mut MarkupBuffer> {
        self.surface.as_mut()
    }

    pub fn apply_format(
        &mut self,
        command: FormatCommand,
        value: Option<&str>,
    ) -> Result<(), EditorError> {
        let surface = self.surface.as_mut().ok_or(EditorError::NotRichMode)?;
        apply_format(surface, command, value)
    }

    /// Types over the current selection of the rich surface.
    pub fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        let surface = self.surface.as_mut().ok_or(EditorError::NotRichMode)?;
        let selection = surface.selection();
        let caret = selection.start + text.len();
        surface.splice(selection, text, caret..caret);
        Ok(())
    }

    /// Replaces the raw markup; only meaningful in markup mode, where the
    /// text field is bound directly to the shared string.
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if let Some(surface) = self.surface.as_mut() {
            *surface = MarkupBuffer::new(markup.clone());
        }
        self.markup = markup;
    }

    /// Current body, reading through the mounted surface when present.
    pub fn content(&self) -> &str {
        match &self.surface {
            Some(surface) => surface.markup(),
            None => &self.markup,
        }
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
