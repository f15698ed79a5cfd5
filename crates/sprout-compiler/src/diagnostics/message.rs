use sprout_core::Span;

/// Diagnostic kinds, roughly in the order the reader discovers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Grammar text could not be parsed
    SyntaxError,

    // Declarations
    DuplicateRule,
    DuplicateForeign,
    UnknownForeignGrammar,
    UnusedForeign,

    // Terminals and quantifiers
    InvalidRegex,
    InvalidCharRange,
    InvalidRepeatBounds,

    // References
    UndefinedReference,
    ArityMismatch,

    // Input rejected by a grammar
    UnexpectedInput,
}

impl DiagnosticKind {
    /// Default severity for this kind. Only errors stop a grammar from being read.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedForeign => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message used when the reporter supplies no detail.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::SyntaxError => "syntax error",
            Self::DuplicateRule => "duplicate rule",
            Self::DuplicateForeign => "duplicate foreign grammar",
            Self::UnknownForeignGrammar => "unknown foreign grammar",
            Self::UnusedForeign => "foreign grammar is never used",
            Self::InvalidRegex => "invalid regex",
            Self::InvalidCharRange => "invalid character range",
            Self::InvalidRepeatBounds => "invalid repeat bounds",
            Self::UndefinedReference => "undefined reference",
            Self::ArityMismatch => "wrong number of arguments",
            Self::UnexpectedInput => "unexpected input",
        }
    }

    /// Message template; `{}` stands for the reporter's detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateRule => "`{}` is already defined".to_string(),
            Self::DuplicateForeign => "foreign grammar `{}` is already declared".to_string(),
            Self::UnknownForeignGrammar => "unknown foreign grammar `{}`".to_string(),
            Self::UnusedForeign => "foreign grammar `{}` is never used".to_string(),
            Self::UndefinedReference => "`{}` is not defined".to_string(),

            // Detail is the whole message
            Self::SyntaxError | Self::ArityMismatch | Self::UnexpectedInput => "{}".to_string(),

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Final text: the fallback without detail, the filled template with it.
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Byte range underlined in rendered output.
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self::new(kind, span, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub(crate) fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            self.span.start,
            self.span.end,
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.span.start, related.span.end
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
