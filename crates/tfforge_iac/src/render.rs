//! Substitution engine.

use tracing::debug;

use crate::error::{IacError, IacResult};
use crate::params::{FieldValue, ParameterRecord};
use crate::provider::{CloudProvider, Topology};
use crate::registry::TemplateVariant;
use crate::template::{Fragment, Node, Position};

/// A fully substituted configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub provider: CloudProvider,
    pub topology: Topology,
    pub text: String,
}

impl GeneratedDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A conditional fragment after its flag has been evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentState {
    Present(String),
    Absent,
}

/// Bind a parameter record into a template variant.
///
/// Fails if a placeholder has no value in the record. Output is a pure
/// function of the inputs.
pub fn render(variant: &TemplateVariant, params: &ParameterRecord) -> IacResult<GeneratedDocument> {
    let template = variant.template();
    let mut text = String::new();
    render_nodes(template.nodes(), params, template.name(), &mut text)?;

    debug!("Rendered {} ({} bytes)", template.name(), text.len());

    Ok(GeneratedDocument {
        provider: variant.provider(),
        topology: variant.topology(),
        text,
    })
}

fn render_nodes(
    nodes: &[Node],
    params: &ParameterRecord,
    template: &str,
    out: &mut String,
) -> IacResult<()> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Placeholder { field, position } => {
                let value = params
                    .value(*field)
                    .ok_or_else(|| IacError::UnresolvedPlaceholder {
                        template: template.to_string(),
                        placeholder: field.name().to_string(),
                    })?;
                push_value(out, value, *position);
            }
            Node::Fragment(fragment) => {
                if let FragmentState::Present(text) = resolve_fragment(fragment, params, template)? {
                    out.push_str(&text);
                }
            }
        }
    }
    Ok(())
}

/// Evaluate a fragment's flag and render its body when set.
pub fn resolve_fragment(
    fragment: &Fragment,
    params: &ParameterRecord,
    template: &str,
) -> IacResult<FragmentState> {
    if !params.flag(fragment.flag) {
        return Ok(FragmentState::Absent);
    }
    let mut text = String::new();
    render_nodes(&fragment.body, params, template, &mut text)?;
    Ok(FragmentState::Present(text))
}

fn push_value(out: &mut String, value: FieldValue<'_>, position: Position) {
    match (value, position) {
        (FieldValue::Text(text), Position::Quoted) => out.push_str(&escape_hcl_string(text)),
        // The parser only admits numbers in bare positions.
        (FieldValue::Number(n), _) => out.push_str(&n.to_string()),
        (FieldValue::Text(text), Position::Bare) => out.push_str(text),
    }
}

/// Escape a value for the inside of an HCL double-quoted string.
pub fn escape_hcl_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(c);
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
