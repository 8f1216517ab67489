//! Template parsing.
//!
//! Template sources are HCL with two kinds of tokens:
//!
//! - `{{Field}}` placeholders bound from a [`ParameterRecord`](crate::ParameterRecord)
//! - `{{if Flag}}` ... `{{end}}` conditional fragments
//!
//! Sources are parsed once into a [`Template`] tree. While parsing, the HCL
//! lexical context at every placeholder is recorded, so text fields can only
//! appear inside string literals and numeric fields only as bare literals.
//! Directive tokens that stand alone on a line swallow the whole line.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{IacError, IacResult};
use crate::params::{Field, FieldKind, Flag};

/// Where a placeholder sits in the surrounding HCL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Inside a double-quoted string literal.
    Quoted,
    /// In expression position, outside any literal.
    Bare,
}

/// A parsed template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Placeholder { field: Field, position: Position },
    Fragment(Fragment),
}

/// A region rendered only when its flag is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub flag: Flag,
    pub body: Vec<Node>,
}

/// An immutable parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse a template source.
    pub fn parse(name: impl Into<String>, source: &str) -> IacResult<Self> {
        let name = name.into();
        let nodes = Parser::new(&name, source).run()?;
        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All placeholders, including those inside fragments.
    pub fn placeholders(&self) -> Vec<(Field, Position)> {
        fn walk(nodes: &[Node], out: &mut Vec<(Field, Position)>) {
            for node in nodes {
                match node {
                    Node::Text(_) => {}
                    Node::Placeholder { field, position } => out.push((*field, *position)),
                    Node::Fragment(fragment) => walk(&fragment.body, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Number of conditional fragments, nested ones included.
    pub fn fragment_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Fragment(fragment) => 1 + count(&fragment.body),
                    _ => 0,
                })
                .sum()
        }

        count(&self.nodes)
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Match {{name}}, {{if name}} and {{end}}
        Regex::new(r"\{\{\s*(?:(if)\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
            .expect("token pattern is valid")
    })
}

/// HCL lexical context at a point in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Code,
    String,
    Comment,
    Heredoc,
}

/// Minimal HCL scanner: tracks string literals, line comments and heredocs.
#[derive(Debug, Default)]
struct Lexer {
    in_string: bool,
    escaped: bool,
    in_comment: bool,
    heredoc: Option<String>,
    prev: Option<char>,
    line: String,
}

impl Lexer {
    fn context(&self) -> Context {
        if self.heredoc.is_some() {
            Context::Heredoc
        } else if self.in_comment {
            Context::Comment
        } else if self.in_string {
            Context::String
        } else {
            Context::Code
        }
    }

    fn feed(&mut self, text: &str) {
        for c in text.chars() {
            self.step(c);
        }
    }

    fn step(&mut self, c: char) {
        if c == '\n' {
            self.end_line();
            self.prev = Some(c);
            return;
        }
        self.line.push(c);

        match self.context() {
            Context::Heredoc | Context::Comment => {}
            Context::String => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == '"' {
                    self.in_string = false;
                }
            }
            Context::Code => match c {
                '"' => self.in_string = true,
                '#' => self.in_comment = true,
                '/' if self.prev == Some('/') => self.in_comment = true,
                _ => {}
            },
        }
        self.prev = Some(c);
    }

    fn end_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        match &self.heredoc {
            Some(marker) => {
                if line.trim() == marker.as_str() {
                    self.heredoc = None;
                }
            }
            None => {
                let was_comment = std::mem::take(&mut self.in_comment);
                if !self.in_string && !was_comment {
                    self.heredoc = heredoc_marker(&line);
                }
            }
        }
    }
}

/// Extract the delimiter of a heredoc opened at the end of `line`.
fn heredoc_marker(line: &str) -> Option<String> {
    let line = line.trim_end();
    let start = line.rfind("<<")?;
    let marker = line[start + 2..].trim_start_matches('-');
    let valid = !marker.is_empty()
        && marker.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !marker.starts_with(|c: char| c.is_ascii_digit());
    valid.then(|| marker.to_string())
}

struct Parser<'a> {
    name: &'a str,
    source: &'a str,
    lexer: Lexer,
}

struct OpenFragment {
    flag: Flag,
    parent: Vec<Node>,
    context: Context,
}

impl<'a> Parser<'a> {
    fn new(name: &'a str, source: &'a str) -> Self {
        Self {
            name,
            source,
            lexer: Lexer::default(),
        }
    }

    fn run(mut self) -> IacResult<Vec<Node>> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut open: Vec<OpenFragment> = Vec::new();
        let source = self.source;
        let mut cursor = 0;

        for caps in token_pattern().captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            let is_if = caps.get(1).is_some();
            let ident = &caps[2];
            let is_directive = is_if || ident == "end";

            let (text_end, resume) = if is_directive {
                self.standalone_span(cursor, whole.start(), whole.end())
            } else {
                (whole.start(), whole.end())
            };

            self.push_text(&mut nodes, &source[cursor..text_end]);
            cursor = resume;

            if is_if {
                let flag = Flag::from_name(ident)
                    .ok_or_else(|| self.error(format!("unknown flag '{}'", ident)))?;
                open.push(OpenFragment {
                    flag,
                    parent: std::mem::take(&mut nodes),
                    context: self.lexer.context(),
                });
            } else if ident == "end" {
                let frame = open
                    .pop()
                    .ok_or_else(|| self.error("{{end}} without matching {{if}}"))?;
                if frame.context != self.lexer.context() {
                    return Err(self.error(format!(
                        "fragment '{}' does not close in the context it opened in",
                        frame.flag.name()
                    )));
                }
                let body = std::mem::replace(&mut nodes, frame.parent);
                nodes.push(Node::Fragment(Fragment {
                    flag: frame.flag,
                    body,
                }));
            } else {
                let field = Field::from_name(ident)
                    .ok_or_else(|| self.error(format!("unknown placeholder '{}'", ident)))?;
                let position = self.position_for(field)?;
                nodes.push(Node::Placeholder { field, position });
            }
        }

        self.push_text(&mut nodes, &source[cursor..]);

        if let Some(frame) = open.last() {
            return Err(self.error(format!("unclosed fragment '{}'", frame.flag.name())));
        }
        if self.lexer.context() == Context::String {
            return Err(self.error("unterminated string literal"));
        }
        Ok(nodes)
    }

    /// Text end and resume offset for a directive token. A directive alone on
    /// its line takes the indentation before it and the newline after it.
    fn standalone_span(&self, cursor: usize, start: usize, end: usize) -> (usize, usize) {
        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.source[end..]
            .find('\n')
            .map_or(self.source.len(), |i| end + i + 1);

        let alone = line_start >= cursor
            && self.source[line_start..start].trim().is_empty()
            && self.source[end..line_end].trim().is_empty();

        if alone {
            (line_start, line_end)
        } else {
            (start, end)
        }
    }

    fn push_text(&mut self, nodes: &mut Vec<Node>, text: &str) {
        if text.is_empty() {
            return;
        }
        self.lexer.feed(text);
        match nodes.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => nodes.push(Node::Text(text.to_string())),
        }
    }

    fn position_for(&self, field: Field) -> IacResult<Position> {
        let position = match self.lexer.context() {
            Context::String => Position::Quoted,
            Context::Code => Position::Bare,
            Context::Comment => {
                return Err(self.error(format!("placeholder '{}' inside a comment", field.name())))
            }
            Context::Heredoc => {
                return Err(self.error(format!("placeholder '{}' inside a heredoc", field.name())))
            }
        };

        match (field.kind(), position) {
            (FieldKind::Text, Position::Bare) => Err(self.error(format!(
                "text placeholder '{}' must sit inside a string literal",
                field.name()
            ))),
            (FieldKind::Number, Position::Quoted) => Err(self.error(format!(
                "numeric placeholder '{}' must not be quoted",
                field.name()
            ))),
            _ => Ok(position),
        }
    }

    fn error(&self, message: impl Into<String>) -> IacError {
        IacError::template(self.name, message)
    }
}
