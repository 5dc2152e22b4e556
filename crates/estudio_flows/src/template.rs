//! Prompt template engine.
//!
//! Templates are static strings with three kinds of tags:
//!
//! - `{{field}}` / `{{a.b}}` substitutes a value from the prompt context.
//! - `{{#if field}} ... {{/if}}` keeps its body only when the field is
//!   present: not null, not blank, not `false` and not an empty array.
//!   Sections nest.
//! - `{{media field}}` splices inline media (a data URI or an http(s) URL)
//!   into the prompt at this position.
//!
//! Rendering is pure: the same template and context always produce the same
//! parts.
//!
//! # Examples
//!
//! ```
//! use estudio_core::Input;
//! use estudio_flows::PromptTemplate;
//! use serde_json::json;
//!
//! let template = PromptTemplate::parse(
//!     "Crie um personagem de {{niche}}.{{#if nameHint}} Nome: {{nameHint}}.{{/if}}",
//! ).unwrap();
//!
//! let parts = template.render(&json!({"niche": "Moda"})).unwrap();
//! assert_eq!(parts, vec![Input::Text("Crie um personagem de Moda.".to_string())]);
//!
//! let parts = template.render(&json!({"niche": "Moda", "nameHint": "Luna"})).unwrap();
//! assert_eq!(parts[0].as_text(), Some("Crie um personagem de Moda. Nome: Luna."));
//! ```

use estudio_core::{DataUri, Input, MediaSource};
use estudio_error::{TemplateError, TemplateErrorKind};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TAG: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(#if\s+[A-Za-z_][\w.]*|/if|media\s+[A-Za-z_][\w.]*|[A-Za-z_][\w.]*)\s*\}\}")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
    Media(String),
    Section { field: String, body: Vec<Segment> },
}

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: &'static str,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Fails on unbalanced sections or on `{{` that does not open a valid tag.
    #[track_caller]
    pub fn parse(source: &'static str) -> Result<Self, TemplateError> {
        let tag = TAG
            .as_ref()
            .map_err(|e| TemplateError::new(TemplateErrorKind::Malformed(e.to_string())))?;

        // Stack of open sections; the bottom entry is the template root.
        let mut stack: Vec<(Option<String>, Vec<Segment>)> = vec![(None, Vec::new())];
        let mut cursor = 0;

        for captures in tag.captures_iter(source) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            push_text(&mut stack, &source[cursor..whole.start()])?;
            cursor = whole.end();

            let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let mut words = body.split_whitespace();
            match (words.next(), words.next()) {
                (Some("#if"), Some(field)) => stack.push((Some(field.to_string()), Vec::new())),
                (Some("/if"), None) => {
                    let (field, segments) = match stack.pop() {
                        Some((Some(field), segments)) => (field, segments),
                        _ => {
                            return Err(TemplateError::new(TemplateErrorKind::UnbalancedSection(
                                "{{/if}} without a matching {{#if}}".to_string(),
                            )));
                        }
                    };
                    current(&mut stack)?.push(Segment::Section {
                        field,
                        body: segments,
                    });
                }
                (Some("media"), Some(field)) => {
                    current(&mut stack)?.push(Segment::Media(field.to_string()));
                }
                (Some(field), None) => current(&mut stack)?.push(Segment::Field(field.to_string())),
                _ => {
                    return Err(TemplateError::new(TemplateErrorKind::Malformed(format!(
                        "unrecognized tag '{}'",
                        whole.as_str()
                    ))));
                }
            }
        }
        push_text(&mut stack, &source[cursor..])?;

        if stack.len() != 1 {
            let open = stack
                .last()
                .and_then(|(field, _)| field.clone())
                .unwrap_or_default();
            return Err(TemplateError::new(TemplateErrorKind::UnbalancedSection(format!(
                "{{{{#if {}}}}} is never closed",
                open
            ))));
        }
        let segments = stack.pop().map(|(_, segments)| segments).unwrap_or_default();

        Ok(Self { source, segments })
    }

    /// Original template text.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Every field path the template refers to, in order of appearance.
    pub fn placeholders(&self) -> Vec<String> {
        fn collect(segments: &[Segment], out: &mut Vec<String>) {
            for segment in segments {
                match segment {
                    Segment::Text(_) => {}
                    Segment::Field(field) | Segment::Media(field) => out.push(field.clone()),
                    Segment::Section { field, body } => {
                        out.push(field.clone());
                        collect(body, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.segments, &mut out);
        out
    }

    /// Render against a prompt context, producing ordered prompt parts.
    ///
    /// Consecutive text is merged into one part; media splits text parts.
    ///
    /// # Errors
    ///
    /// Fails when a substituted field is absent or a media slot does not hold
    /// a media reference.
    pub fn render(&self, context: &Value) -> Result<Vec<Input>, TemplateError> {
        let mut parts = Vec::new();
        let mut text = String::new();
        render_segments(&self.segments, context, &mut text, &mut parts)?;
        if !text.trim().is_empty() {
            parts.push(Input::Text(text.trim().to_string()));
        }
        Ok(parts)
    }
}

fn current(
    stack: &mut [(Option<String>, Vec<Segment>)],
) -> Result<&mut Vec<Segment>, TemplateError> {
    stack
        .last_mut()
        .map(|(_, segments)| segments)
        .ok_or_else(|| TemplateError::new(TemplateErrorKind::Malformed("empty section stack".to_string())))
}

fn push_text(
    stack: &mut [(Option<String>, Vec<Segment>)],
    text: &str,
) -> Result<(), TemplateError> {
    if text.is_empty() {
        return Ok(());
    }
    if text.contains("{{") || text.contains("}}") {
        return Err(TemplateError::new(TemplateErrorKind::Malformed(format!(
            "unrecognized tag near '{}'",
            text.chars().take(40).collect::<String>()
        ))));
    }
    current(stack)?.push(Segment::Text(text.to_string()));
    Ok(())
}

/// Look up a dotted path.
fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(context, |value, key| value.get(key))
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn media_input(field: &str, value: &Value) -> Result<Input, TemplateError> {
    let reference = value
        .as_str()
        .ok_or_else(|| TemplateError::new(TemplateErrorKind::NotMedia(field.to_string())))?;

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(url_input(reference));
    }
    reference
        .parse::<DataUri>()
        .map(DataUri::into_input)
        .map_err(|_| TemplateError::new(TemplateErrorKind::NotMedia(field.to_string())))
}

fn url_input(url: &str) -> Input {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let extension = path
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let source = MediaSource::Url(url.to_string());
    match extension.as_str() {
        "mp3" | "wav" | "ogg" | "m4a" | "aac" | "flac" => Input::Audio {
            mime: Some(format!("audio/{}", if extension == "mp3" { "mpeg" } else { extension.as_str() })),
            source,
        },
        "mp4" | "webm" | "mov" => Input::Video {
            mime: Some(format!("video/{}", if extension == "mov" { "quicktime" } else { extension.as_str() })),
            source,
        },
        "jpg" | "jpeg" => Input::Image {
            mime: Some("image/jpeg".to_string()),
            source,
        },
        "png" | "webp" | "gif" => Input::Image {
            mime: Some(format!("image/{}", extension)),
            source,
        },
        _ => Input::Image { mime: None, source },
    }
}

fn render_segments(
    segments: &[Segment],
    context: &Value,
    text: &mut String,
    parts: &mut Vec<Input>,
) -> Result<(), TemplateError> {
    for segment in segments {
        match segment {
            Segment::Text(literal) => text.push_str(literal),
            Segment::Field(field) => match lookup(context, field) {
                Some(value) if !value.is_null() => text.push_str(&format_value(value)),
                _ => {
                    return Err(TemplateError::new(TemplateErrorKind::MissingField(
                        field.clone(),
                    )));
                }
            },
            Segment::Media(field) => {
                let value = lookup(context, field)
                    .filter(|value| !value.is_null())
                    .ok_or_else(|| {
                        TemplateError::new(TemplateErrorKind::MissingField(field.clone()))
                    })?;
                let media = media_input(field, value)?;
                if !text.trim().is_empty() {
                    parts.push(Input::Text(text.trim().to_string()));
                }
                text.clear();
                parts.push(media);
            }
            Segment::Section { field, body } => {
                if is_present(lookup(context, field)) {
                    render_segments(body, context, text, parts)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_sections_render_only_when_present() {
        let template = PromptTemplate::parse(
            "A{{#if a}} [a={{a}}{{#if b}} b={{b}}{{/if}}]{{/if}} Z",
        )
        .unwrap();
        let render = |ctx: Value| template.render(&ctx).unwrap()[0].as_text().map(str::to_string);

        assert_eq!(render(json!({})), Some("A Z".to_string()));
        assert_eq!(render(json!({"a": "1"})), Some("A [a=1] Z".to_string()));
        assert_eq!(render(json!({"a": "1", "b": 2})), Some("A [a=1 b=2] Z".to_string()));
        assert_eq!(render(json!({"b": 2})), Some("A Z".to_string()));
    }

    #[test]
    fn blank_and_false_values_are_absent() {
        let template = PromptTemplate::parse("x{{#if f}}!{{/if}}").unwrap();
        for ctx in [json!({"f": ""}), json!({"f": false}), json!({"f": []}), json!({"f": null})] {
            assert_eq!(template.render(&ctx).unwrap()[0].as_text(), Some("x"));
        }
    }

    #[test]
    fn media_splits_text_parts() {
        let template = PromptTemplate::parse("Foto: {{media photo}} Descreva.").unwrap();
        let parts = template
            .render(&json!({"photo": "data:image/jpeg;base64,/9j/4AAQ"}))
            .unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].as_text(), Some("Foto:"));
        assert!(matches!(&parts[1], Input::Image { mime: Some(m), .. } if m == "image/jpeg"));
        assert_eq!(parts[2].as_text(), Some("Descreva."));
    }

    #[test]
    fn url_media_is_accepted() {
        let template = PromptTemplate::parse("{{media clip}}").unwrap();
        let parts = template.render(&json!({"clip": "https://cdn.example.com/a.mp3"})).unwrap();
        assert!(matches!(&parts[0], Input::Audio { .. }));
    }

    #[test]
    fn missing_field_is_an_error() {
        let template = PromptTemplate::parse("Olá {{name}}").unwrap();
        let err = template.render(&json!({})).unwrap_err();
        assert_eq!(err.kind, TemplateErrorKind::MissingField("name".to_string()));
    }

    #[test]
    fn non_media_value_is_an_error() {
        let template = PromptTemplate::parse("{{media photo}}").unwrap();
        let err = template.render(&json!({"photo": "not a uri"})).unwrap_err();
        assert_eq!(err.kind, TemplateErrorKind::NotMedia("photo".to_string()));
    }

    #[test]
    fn arrays_and_nested_paths_format() {
        let template = PromptTemplate::parse("{{c.name}}: {{tags}}").unwrap();
        let parts = template
            .render(&json!({"c": {"name": "Luna"}, "tags": ["moda", "estilo"]}))
            .unwrap();
        assert_eq!(parts[0].as_text(), Some("Luna: moda, estilo"));
    }

    #[test]
    fn unbalanced_sections_are_rejected() {
        assert!(matches!(
            PromptTemplate::parse("{{#if a}} x").unwrap_err().kind,
            TemplateErrorKind::UnbalancedSection(_)
        ));
        assert!(matches!(
            PromptTemplate::parse("x {{/if}}").unwrap_err().kind,
            TemplateErrorKind::UnbalancedSection(_)
        ));
        assert!(matches!(
            PromptTemplate::parse("x {{ bad tag }}").unwrap_err().kind,
            TemplateErrorKind::Malformed(_)
        ));
    }

    #[test]
    fn placeholders_are_listed_in_order() {
        let template = PromptTemplate::parse("{{a}}{{#if b}}{{media c}}{{/if}}").unwrap();
        assert_eq!(template.placeholders(), vec!["a", "b", "c"]);
    }
}
