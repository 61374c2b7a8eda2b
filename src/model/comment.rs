use serde::Serialize;

/// Byte range of a comment in its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CommentKind {
    Line,
    #[default]
    Block,
    Doc,
}

/// A comment attached to a class or method during the build pass
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommentEntity {
    text: String,
    kind: CommentKind,
    span: Option<TextSpan>,
}

impl CommentEntity {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommentKind::default(),
            span: None,
        }
    }

    pub fn with_kind(mut self, kind: CommentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> CommentKind {
        self.kind
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.span
    }
}
