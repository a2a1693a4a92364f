//! Error types for parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let span = clamp_span(span, source.len());
                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        // End-of-input errors come back with start past end
        let span = err.span();
        ParseError::Syntax {
            span: span.start.min(span.end)..span.start.max(span.end),
            message,
            expected,
        }
    }
}

/// Order the bounds of `span` and keep both inside `0..=len`
pub(crate) fn clamp_span(span: &Span, len: usize) -> Span {
    let start = span.start.min(span.end).min(len);
    let end = span.start.max(span.end).min(len);
    start..end
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::View => "keyword 'view'".to_string(),
        Token::In => "keyword 'in'".to_string(),
        Token::Guide => "keyword 'guide'".to_string(),
        Token::Constrain => "keyword 'constrain'".to_string(),
        Token::Anchor => "keyword 'anchor'".to_string(),
        Token::Fill => "keyword 'fill'".to_string(),
        Token::Migrate => "keyword 'migrate'".to_string(),
        Token::Dump => "keyword 'dump'".to_string(),
        Token::Solve => "keyword 'solve'".to_string(),
        Token::Arrow => "'->'".to_string(),
        Token::GreaterOrEqual => "'>='".to_string(),
        Token::LessOrEqual => "'<='".to_string(),
        Token::EqualEqual => "'=='".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Dot => "'.'".to_string(),
        _ => format!("{:?}", tok),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_includes_message() {
        let err = ParseError::Syntax {
            span: 8..9,
            message: "Unexpected identifier 'b'".to_string(),
            expected: vec!["'->'".to_string()],
        };
        let report = err.format("migrate a b", "scene.rea");
        assert!(report.contains("Unexpected identifier 'b'"));
        assert!(report.contains("scene.rea"));
    }

    #[test]
    fn test_unterminated_block_reports_end_of_input() {
        let source = "view a {\n  view b\n";
        let errs = crate::parse(source).unwrap_err();
        let err = &errs[0];
        let span = err.span();
        assert!(span.start <= span.end);
        assert!(span.end <= source.len());

        let report = err.format(source, "card.scene");
        assert!(report.contains("card.scene"));
        assert!(report.contains("end of input"));
    }

    #[test]
    fn test_format_clamps_reversed_span() {
        let err = ParseError::Syntax {
            span: 30..4,
            message: "Unexpected end of input".to_string(),
            expected: Vec::new(),
        };
        let report = err.format("view a {", "scene.rea");
        assert!(report.contains("Unexpected end of input"));
        assert_eq!(clamp_span(&(30..4), 8), 4..8);
        assert_eq!(clamp_span(&(30..12), 8), 8..8);
    }
}
