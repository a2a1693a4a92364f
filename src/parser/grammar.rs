//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::graph::{Attribute, Relation};
use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse scene source into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

const ATTRIBUTE_NAMES: &str =
    "top, bottom, leading, trailing, left, right, width, height, center_x, center_y";

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let number = select! {
        Token::Number(n) => n,
    };

    let signed_number = just(Token::Minus)
        .or_not()
        .then(number.clone())
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    // Modifier block: [key: value, ...]
    let modifier_value = choice((
        signed_number.clone().map(ModifierValue::Number),
        select! {
            Token::Ident(s) => ModifierValue::Word(s),
            Token::String(s) => ModifierValue::Word(s),
        },
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let modifier = identifier
        .clone()
        .then_ignore(just(Token::Colon))
        .then(modifier_value)
        .map_with(|(key, value), e| Spanned::new(Modifier { key, value }, span_range(&e.span())));

    let modifier_block = modifier
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // Attribute reference: node.attribute or node.guide.attribute
    let attribute_ref = identifier
        .clone()
        .separated_by(just(Token::Dot))
        .at_least(2)
        .collect::<Vec<_>>()
        .try_map(|segments: Vec<Spanned<Identifier>>, span: SimpleSpan| {
            let Some((last, path)) = segments.split_last() else {
                return Err(Rich::custom(span, "expected 'node.attribute'"));
            };
            let attribute = Attribute::from_name(last.node.as_str()).ok_or_else(|| {
                Rich::custom(
                    span,
                    format!(
                        "'{}' is not a valid attribute. Expected one of: {}",
                        last.node, ATTRIBUTE_NAMES
                    ),
                )
            })?;
            let item = match path {
                [node] => ItemPath {
                    node: node.clone(),
                    guide: None,
                },
                [node, guide] => ItemPath {
                    node: node.clone(),
                    guide: Some(guide.clone()),
                },
                _ => {
                    return Err(Rich::custom(
                        span,
                        "expected 'node.attribute' or 'node.guide.attribute'",
                    ))
                }
            };
            Ok(AttributeRef {
                item,
                attribute: Spanned::new(attribute, last.span.clone()),
            })
        });

    let relation = choice((
        just(Token::EqualEqual).to(Relation::Equal),
        just(Token::Equals).to(Relation::Equal),
        just(Token::GreaterOrEqual).to(Relation::GreaterOrEqual),
        just(Token::LessOrEqual).to(Relation::LessOrEqual),
    ));

    // Parse offset: + number or - number
    let offset = choice((
        just(Token::Plus).ignore_then(number.clone()),
        just(Token::Minus).ignore_then(number.clone()).map(|n| -n),
    ));

    // Right-hand side: attribute [* multiplier] [+/- constant], or a bare constant
    let rhs = attribute_ref
        .clone()
        .then(just(Token::Star).ignore_then(number.clone()).or_not())
        .then(offset.or_not())
        .map(|((target, multiplier), constant)| ConstraintRhs::Attribute {
            target,
            multiplier: multiplier.unwrap_or(1.0),
            constant: constant.unwrap_or(0.0),
        })
        .or(signed_number.map(ConstraintRhs::Constant));

    let constrain_decl = just(Token::Constrain)
        .ignore_then(attribute_ref)
        .then(relation)
        .then(rhs)
        .then(modifier_block.clone().or_not())
        .map(|(((left, relation), right), modifiers)| {
            Statement::Constrain(ConstrainDecl {
                left,
                relation,
                right,
                modifiers: modifiers.unwrap_or_default(),
            })
        });

    let guide_decl = just(Token::Guide)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::Dot))
        .then(identifier.clone())
        .then(modifier_block.clone().or_not())
        .map(|((owner, name), modifiers)| {
            Statement::Guide(GuideDecl {
                owner,
                name,
                modifiers: modifiers.unwrap_or_default(),
            })
        });

    let anchor_decl = just(Token::Anchor)
        .ignore_then(identifier.clone())
        .then(modifier_block.clone().or_not())
        .map(|(node, modifiers)| {
            Statement::Anchor(AnchorDecl {
                node,
                modifiers: modifiers.unwrap_or_default(),
            })
        });

    let fill_decl = just(Token::Fill)
        .ignore_then(identifier.clone())
        .map(Statement::Fill);

    let migrate_decl = just(Token::Migrate)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::Arrow))
        .then(identifier.clone())
        .map(|(source, target)| Statement::Migrate(MigrateDecl { source, target }));

    let dump_decl = just(Token::Dump)
        .ignore_then(identifier.clone())
        .map(Statement::Dump);

    let solve_decl = just(Token::Solve)
        .ignore_then(identifier.clone())
        .map(Statement::Solve);

    // Recursive statement parser (views nest)
    let statement = recursive(|stmt| {
        let view_decl = just(Token::View)
            .ignore_then(identifier.clone())
            .then(just(Token::In).ignore_then(identifier.clone()).or_not())
            .then(
                stmt.clone()
                    .repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
                    .or_not(),
            )
            .map(|((name, parent), children)| {
                Statement::View(ViewDecl {
                    name,
                    parent,
                    children: children.unwrap_or_default(),
                })
            });

        choice((
            view_decl,
            guide_decl,
            constrain_decl,
            anchor_decl,
            fill_decl,
            migrate_decl,
            dump_decl,
            solve_decl,
        ))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
        .boxed()
    });

    // Document is a list of statements
    statement
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|statements| Document { statements })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(source: &str) -> Statement {
        let doc = parse(source).expect("Should parse");
        assert_eq!(doc.statements.len(), 1);
        doc.statements.into_iter().next().unwrap().node
    }

    #[test]
    fn test_parse_nested_views() {
        match single("view cell { view content { view title view body } }") {
            Statement::View(cell) => {
                assert_eq!(cell.name.node.as_str(), "cell");
                assert!(cell.parent.is_none());
                assert_eq!(cell.children.len(), 1);
                match &cell.children[0].node {
                    Statement::View(content) => assert_eq!(content.children.len(), 2),
                    _ => panic!("Expected view"),
                }
            }
            _ => panic!("Expected view"),
        }
    }

    #[test]
    fn test_parse_view_in_parent() {
        match single("view container in content") {
            Statement::View(v) => {
                assert_eq!(v.parent.unwrap().node.as_str(), "content");
                assert!(v.children.is_empty());
            }
            _ => panic!("Expected view"),
        }
    }

    #[test]
    fn test_parse_constraint_full() {
        match single("constrain body.top >= title.bottom * 2 - 4 [priority: 750, active: false]") {
            Statement::Constrain(c) => {
                assert_eq!(c.left.item.node.node.as_str(), "body");
                assert_eq!(c.left.attribute.node, Attribute::Top);
                assert_eq!(c.relation, Relation::GreaterOrEqual);
                match c.right {
                    ConstraintRhs::Attribute {
                        target,
                        multiplier,
                        constant,
                    } => {
                        assert_eq!(target.item.node.node.as_str(), "title");
                        assert_eq!(target.attribute.node, Attribute::Bottom);
                        assert_eq!(multiplier, 2.0);
                        assert_eq!(constant, -4.0);
                    }
                    other => panic!("Expected attribute rhs, got {:?}", other),
                }
                assert_eq!(c.modifiers.len(), 2);
                assert_eq!(
                    c.modifiers[1].node.value.node,
                    ModifierValue::Word("false".to_string())
                );
            }
            _ => panic!("Expected constraint"),
        }
    }

    #[test]
    fn test_parse_constraint_to_guide() {
        match single("constrain title.leading == content.margins.leading") {
            Statement::Constrain(c) => match c.right {
                ConstraintRhs::Attribute { target, multiplier, constant } => {
                    assert_eq!(target.item.node.node.as_str(), "content");
                    assert_eq!(target.item.guide.unwrap().node.as_str(), "margins");
                    assert_eq!(multiplier, 1.0);
                    assert_eq!(constant, 0.0);
                }
                other => panic!("Expected attribute rhs, got {:?}", other),
            },
            _ => panic!("Expected constraint"),
        }
    }

    #[test]
    fn test_parse_constant_constraint() {
        match single("constrain body.height = -44") {
            Statement::Constrain(c) => assert_eq!(c.right, ConstraintRhs::Constant(-44.0)),
            _ => panic!("Expected constraint"),
        }
    }

    #[test]
    fn test_parse_invalid_attribute() {
        let errs = parse("constrain body.middle = 4").unwrap_err();
        assert!(errs
            .iter()
            .any(|e| e.to_string().contains("'middle' is not a valid attribute")));
    }

    #[test]
    fn test_parse_operations() {
        let doc = parse(
            r#"
            guide content.margins [top: 8, left: 8]
            anchor container [top: 5, right: 5]
            fill clipping
            migrate content -> clipping
            dump cell
            solve cell
        "#,
        )
        .expect("Should parse");
        assert_eq!(doc.statements.len(), 6);
        assert!(matches!(doc.statements[0].node, Statement::Guide(_)));
        assert!(matches!(doc.statements[1].node, Statement::Anchor(_)));
        assert!(matches!(doc.statements[2].node, Statement::Fill(_)));
        match &doc.statements[3].node {
            Statement::Migrate(m) => {
                assert_eq!(m.source.node.as_str(), "content");
                assert_eq!(m.target.node.as_str(), "clipping");
            }
            _ => panic!("Expected migrate"),
        }
        assert!(matches!(doc.statements[4].node, Statement::Dump(_)));
        assert!(matches!(doc.statements[5].node, Statement::Solve(_)));
    }

    #[test]
    fn test_parse_error_on_missing_arrow() {
        assert!(parse("migrate content clipping").is_err());
    }
}
