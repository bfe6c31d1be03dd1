//! Template-driven writer for Rust source.
//!
//! Templates name their holes `#{name}` and bind them through a slice of
//! `(name, TemplateArg)` pairs; `##` produces a literal `#`. Templates are
//! dedented before use, and a multi-line substitution inherits the
//! indentation of the line it lands on. Every [`RuntimeType`] substituted
//! into a template has its dependency recorded on the writer.

use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use super::{RuntimeType, RustDependency};
use crate::error::{CodegenError, CodegenResult};

const INDENT: &str = "    ";

/// A deferred piece of generated code.
///
/// A writable is either empty or wraps a closure that writes into a
/// [`RustWriter`]. Section composition skips empty writables.
pub struct Writable<'a> {
    render: Option<Box<dyn Fn(&mut RustWriter) + 'a>>,
}

impl<'a> Writable<'a> {
    /// A writable that produces nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { render: None }
    }

    /// Wraps a rendering closure.
    #[must_use]
    pub fn new(render: impl Fn(&mut RustWriter) + 'a) -> Self {
        Self {
            render: Some(Box::new(render)),
        }
    }

    /// Whether the writable was created empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.render.is_none()
    }

    /// Writes the fragment into `writer`.
    pub fn render(&self, writer: &mut RustWriter) {
        if let Some(render) = &self.render {
            render(writer);
        }
    }

    /// Renders the fragment on its own and returns the text.
    ///
    /// # Errors
    ///
    /// Returns the first template error raised while rendering.
    pub fn to_text(&self) -> CodegenResult<String> {
        let mut writer = RustWriter::new();
        self.render(&mut writer);
        Ok(writer.finish()?.contents)
    }
}

impl Default for Writable<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Writable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("empty", &self.is_empty())
            .finish()
    }
}

/// Shorthand for [`Writable::new`].
#[must_use]
pub fn writable<'a>(render: impl Fn(&mut RustWriter) + 'a) -> Writable<'a> {
    Writable::new(render)
}

/// A value bound to a template placeholder.
#[derive(Debug)]
pub enum TemplateArg<'a> {
    /// Literal text.
    Text(Cow<'a, str>),
    /// A type path whose dependency is recorded when rendered.
    Type(RuntimeType),
    /// Nested code.
    Writable(Writable<'a>),
}

impl<'a> From<&'a str> for TemplateArg<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for TemplateArg<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<RuntimeType> for TemplateArg<'_> {
    fn from(ty: RuntimeType) -> Self {
        Self::Type(ty)
    }
}

impl From<&RuntimeType> for TemplateArg<'_> {
    fn from(ty: &RuntimeType) -> Self {
        Self::Type(ty.clone())
    }
}

impl<'a> From<Writable<'a>> for TemplateArg<'a> {
    fn from(writable: Writable<'a>) -> Self {
        Self::Writable(writable)
    }
}

/// Text and dependencies produced by a finished [`RustWriter`].
#[derive(Clone, Debug, Default)]
pub struct WriterOutput {
    /// Rendered source.
    pub contents: String,
    /// Dependencies referenced while rendering, in first-use order.
    pub dependencies: Vec<RustDependency>,
}

/// Accumulates Rust source and the dependencies it references.
///
/// Template errors do not interrupt writing; the first one is kept and
/// reported by [`RustWriter::finish`].
#[derive(Debug, Default)]
pub struct RustWriter {
    contents: String,
    indent: usize,
    dependencies: Vec<RustDependency>,
    error: Option<CodegenError>,
}

impl RustWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes dedented text without placeholder expansion.
    pub fn rust(&mut self, text: &str) -> &mut Self {
        for line in dedent(text) {
            self.line(line);
        }
        self
    }

    /// Writes text line by line exactly as given, only adding the current
    /// indentation.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.line(line);
        }
        self
    }

    /// Expands `template` with `args` and writes the result.
    ///
    /// Lines whose placeholders all expand to nothing are dropped.
    pub fn rust_template(&mut self, template: &str, args: &[(&str, TemplateArg<'_>)]) -> &mut Self {
        for line in dedent(template) {
            let leading = leading_whitespace(line);
            let (expanded, substituted) = self.expand(line, leading, args);
            if substituted && expanded.trim().is_empty() {
                continue;
            }
            for piece in expanded.split('\n') {
                self.line(piece);
            }
        }
        self
    }

    /// Writes an empty line.
    pub fn blank_line(&mut self) -> &mut Self {
        self.line("");
        self
    }

    /// Writes `header {`, the indented body, then `}`.
    pub fn rust_block(&mut self, header: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(&format!("{} {{", header.trim()));
        self.indented(body);
        self.line("}");
        self
    }

    /// Writes `///` documentation, one comment line per input line.
    pub fn docs(&mut self, text: &str) -> &mut Self {
        for line in dedent(text) {
            if line.trim().is_empty() {
                self.line("///");
            } else {
                self.line(&format!("/// {line}"));
            }
        }
        self
    }

    /// Writes `#[attribute]`.
    pub fn attribute(&mut self, attribute: &str) -> &mut Self {
        self.line(&format!("#[{attribute}]"));
        self
    }

    /// Renders a writable at the current indentation.
    pub fn write(&mut self, writable: &Writable<'_>) -> &mut Self {
        writable.render(self);
        self
    }

    /// Records a dependency without rendering anything.
    pub fn add_dependency(&mut self, dependency: impl Into<RustDependency>) -> &mut Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Records an error raised by a writable. Only the first error is kept.
    pub fn fail(&mut self, error: CodegenError) {
        trace!(%error, "writer error recorded");
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Text written so far.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Dependencies recorded so far.
    #[must_use]
    pub fn dependencies(&self) -> &[RustDependency] {
        &self.dependencies
    }

    /// Finishes writing.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded during writing, typically
    /// [`CodegenError::Template`].
    pub fn finish(self) -> CodegenResult<WriterOutput> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(WriterOutput {
                contents: self.contents,
                dependencies: self.dependencies,
            }),
        }
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent += 1;
        body(self);
        self.indent = self.indent.saturating_sub(1);
    }

    fn line(&mut self, text: &str) {
        let trimmed = text.trim_end();
        if !trimmed.is_empty() {
            for _ in 0..self.indent {
                self.contents.push_str(INDENT);
            }
            self.contents.push_str(trimmed);
        }
        self.contents.push('\n');
    }

    fn expand(&mut self, line: &str, leading: &str, args: &[(&str, TemplateArg<'_>)]) -> (String, bool) {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;
        let mut substituted = false;
        while let Some(position) = rest.find('#') {
            let (before, tail) = rest.split_at(position);
            out.push_str(before);
            if let Some(after) = tail.strip_prefix("##") {
                out.push('#');
                rest = after;
                continue;
            }
            if let Some((name, remaining)) = tail.strip_prefix("#{").and_then(|after| after.split_once('}')) {
                substituted = true;
                self.substitute(name, leading, args, &mut out);
                rest = remaining;
                continue;
            }
            out.push('#');
            rest = tail.get(1..).unwrap_or_default();
        }
        out.push_str(rest);
        (out, substituted)
    }

    fn substitute(&mut self, name: &str, leading: &str, args: &[(&str, TemplateArg<'_>)], out: &mut String) {
        match args.iter().find(|(key, _)| *key == name) {
            None => self.fail(CodegenError::Template {
                placeholder: name.to_owned(),
            }),
            Some((_, TemplateArg::Text(text))) => push_indented(out, text, leading),
            Some((_, TemplateArg::Type(ty))) => {
                out.push_str(ty.path());
                if let Some(dependency) = ty.dependency() {
                    self.dependencies.push(dependency.clone());
                }
            }
            Some((_, TemplateArg::Writable(writable))) => {
                let mut nested = Self::new();
                writable.render(&mut nested);
                self.dependencies.append(&mut nested.dependencies);
                if let Some(error) = nested.error.take() {
                    self.fail(error);
                }
                push_indented(out, nested.contents.trim_end_matches('\n'), leading);
            }
        }
    }
}

fn push_indented(out: &mut String, text: &str, leading: &str) {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(leading);
            }
        }
        out.push_str(line);
    }
}

fn leading_whitespace(line: &str) -> &str {
    let width = line.len() - line.trim_start().len();
    line.get(..width).unwrap_or_default()
}

/// Strips surrounding blank lines and the common indentation margin.
fn dedent(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return Vec::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);
    let body = lines.get(start..=end).unwrap_or_default();
    let margin = body
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    body.iter()
        .map(|line| line.get(margin..).unwrap_or_default())
        .collect()
}
