//! Markup fragment parser.
//!
//! Parses a (possibly multi-rooted) markup fragment into the node arena,
//! under one fresh synthetic container node. Uses the logos tokenizers from
//! [`crate::markup::tokenizer`], morphing between content mode and tag mode.

use logos::{Lexer, Logos};

use crate::dom::node::{NodeData, TEMPLATE_TAG};
use crate::dom::tree::Dom;
use crate::dom::NodeId;

use super::tokenizer::{TagToken, TextToken};

/// Errors from markup parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at byte {offset}: {message}")]
    UnexpectedToken { offset: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("mismatched closing tag at byte {offset}: expected </{expected}>, found </{found}>")]
    MismatchedCloseTag {
        offset: usize,
        expected: String,
        found: String,
    },
}

/// What one `<...>` tag contributed: its name, attributes, and whether it
/// self-closed.
struct OpenTag {
    tag: String,
    attributes: Vec<(String, String)>,
    self_closed: bool,
}

/// Parse `input` into `dom` under a fresh container node (tag `#template`)
/// and return the container's id.
///
/// Text runs that are pure whitespace (indentation between elements) are
/// dropped; any other text becomes a text-node child, verbatim. On error the
/// partially built subtree is removed from the arena before returning.
pub fn parse_fragment(dom: &mut Dom, input: &str) -> Result<NodeId, ParseError> {
    let container = dom.insert(NodeData::element(TEMPLATE_TAG));
    match parse_into(dom, container, input) {
        Ok(()) => Ok(container),
        Err(err) => {
            dom.remove(container);
            Err(err)
        }
    }
}

fn parse_into(dom: &mut Dom, container: NodeId, input: &str) -> Result<(), ParseError> {
    // Open-element stack; the container is the permanent bottom entry.
    let mut stack: Vec<(NodeId, String)> = vec![(container, TEMPLATE_TAG.to_owned())];

    let mut lexer = TextToken::lexer(input);
    while let Some(result) = lexer.next() {
        let token = result.map_err(|_| ParseError::UnexpectedToken {
            offset: lexer.span().start,
            message: "unrecognized input".to_owned(),
        })?;

        match token {
            TextToken::Text => {
                let slice = lexer.slice();
                if !slice.trim().is_empty() {
                    let parent = stack.last().expect("stack never empty").0;
                    dom.insert_child(parent, NodeData::text(slice));
                }
            }
            TextToken::TagStart => {
                let mut tag_lexer = lexer.morph::<TagToken>();
                let open = parse_open_tag(&mut tag_lexer)?;
                let parent = stack.last().expect("stack never empty").0;

                let mut data = NodeData::element(&open.tag);
                for (name, value) in &open.attributes {
                    data.set_attribute(name, value);
                }
                let id = dom.insert_child(parent, data);
                if !open.self_closed {
                    stack.push((id, open.tag));
                }

                lexer = tag_lexer.morph();
            }
            TextToken::CloseTagStart => {
                let mut tag_lexer = lexer.morph::<TagToken>();
                let offset = tag_lexer.span().start;
                let found = expect_ident(&mut tag_lexer)?;
                match next_tag_token(&mut tag_lexer)? {
                    TagToken::Close => {}
                    _ => {
                        return Err(ParseError::UnexpectedToken {
                            offset: tag_lexer.span().start,
                            message: format!("expected '>' after closing tag '{found}'"),
                        })
                    }
                }

                if stack.len() == 1 {
                    return Err(ParseError::UnexpectedToken {
                        offset,
                        message: format!("closing tag '{found}' with no open element"),
                    });
                }
                let (_, expected) = stack.last().expect("stack never empty").clone();
                if expected != found {
                    return Err(ParseError::MismatchedCloseTag {
                        offset,
                        expected,
                        found,
                    });
                }
                stack.pop();

                lexer = tag_lexer.morph();
            }
        }
    }

    if stack.len() > 1 {
        let (_, tag) = stack.last().expect("stack never empty");
        return Err(ParseError::UnexpectedEof(format!("unclosed element '{tag}'")));
    }

    Ok(())
}

/// Parse the inside of an opening tag: name, attributes, then `>` or `/>`.
fn parse_open_tag(lexer: &mut Lexer<'_, TagToken>) -> Result<OpenTag, ParseError> {
    let tag = expect_ident(lexer)?;
    let mut attributes = Vec::new();

    loop {
        match next_tag_token(lexer)? {
            TagToken::Close => {
                return Ok(OpenTag {
                    tag,
                    attributes,
                    self_closed: false,
                })
            }
            TagToken::SelfClose => {
                return Ok(OpenTag {
                    tag,
                    attributes,
                    self_closed: true,
                })
            }
            TagToken::Ident => {
                let name = lexer.slice().to_owned();
                // Peek for `=`; a bare attribute gets an empty value.
                let mut probe = lexer.clone();
                if let Some(Ok(TagToken::Equals)) = probe.next() {
                    *lexer = probe;
                    let value = expect_value(lexer)?;
                    attributes.push((name, value));
                } else {
                    attributes.push((name, String::new()));
                }
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    offset: lexer.span().start,
                    message: format!("unexpected {other:?} in tag '{tag}'"),
                })
            }
        }
    }
}

fn next_tag_token(lexer: &mut Lexer<'_, TagToken>) -> Result<TagToken, ParseError> {
    match lexer.next() {
        Some(Ok(token)) => Ok(token),
        Some(Err(())) => Err(ParseError::UnexpectedToken {
            offset: lexer.span().start,
            message: format!("unrecognized input '{}'", lexer.slice()),
        }),
        None => Err(ParseError::UnexpectedEof("inside a tag".to_owned())),
    }
}

fn expect_ident(lexer: &mut Lexer<'_, TagToken>) -> Result<String, ParseError> {
    match next_tag_token(lexer)? {
        TagToken::Ident => Ok(lexer.slice().to_owned()),
        other => Err(ParseError::UnexpectedToken {
            offset: lexer.span().start,
            message: format!("expected a name, got {other:?}"),
        }),
    }
}

fn expect_value(lexer: &mut Lexer<'_, TagToken>) -> Result<String, ParseError> {
    match next_tag_token(lexer)? {
        TagToken::QuotedValue | TagToken::QuotedValueSingle => {
            let slice = lexer.slice();
            Ok(slice[1..slice.len() - 1].to_owned())
        }
        TagToken::Ident => Ok(lexer.slice().to_owned()),
        other => Err(ParseError::UnexpectedToken {
            offset: lexer.span().start,
            message: format!("expected an attribute value, got {other:?}"),
        }),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let container = parse_fragment(&mut dom, input).expect("fragment should parse");
        (dom, container)
    }

    #[test]
    fn single_root() {
        let (dom, container) = parse("<div></div>");
        let roots = dom.children(container);
        assert_eq!(roots.len(), 1);
        assert_eq!(dom.get(roots[0]).unwrap().tag, "div");
    }

    #[test]
    fn container_is_synthetic() {
        let (dom, container) = parse("<div></div>");
        assert_eq!(dom.get(container).unwrap().tag, TEMPLATE_TAG);
        assert_eq!(dom.parent(container), None);
    }

    #[test]
    fn multiple_roots() {
        let (dom, container) = parse("<header></header><main></main><footer></footer>");
        let tags: Vec<String> = dom
            .children(container)
            .iter()
            .map(|&id| dom.get(id).unwrap().tag.clone())
            .collect();
        assert_eq!(tags, vec!["header", "main", "footer"]);
    }

    #[test]
    fn attributes_double_and_single_quoted() {
        let (dom, container) = parse(r#"<div handle="a" widget='Menu'></div>"#);
        let div = dom.children(container)[0];
        let data = dom.get(div).unwrap();
        assert_eq!(data.attribute("handle"), Some("a"));
        assert_eq!(data.attribute("widget"), Some("Menu"));
    }

    #[test]
    fn bare_and_unquoted_attributes() {
        let (dom, container) = parse("<input disabled type=text/>");
        let input = dom.children(container)[0];
        let data = dom.get(input).unwrap();
        assert_eq!(data.attribute("disabled"), Some(""));
        assert_eq!(data.attribute("type"), Some("text"));
    }

    #[test]
    fn nesting() {
        let (dom, container) = parse("<div><span><b></b></span></div>");
        let div = dom.children(container)[0];
        let span = dom.children(div)[0];
        let b = dom.children(span)[0];
        assert_eq!(dom.get(span).unwrap().tag, "span");
        assert_eq!(dom.get(b).unwrap().tag, "b");
    }

    #[test]
    fn text_content_preserved() {
        let (dom, container) = parse("<div>Hi World</div>");
        let div = dom.children(container)[0];
        assert_eq!(dom.text_content(div), "Hi World");
    }

    #[test]
    fn text_mixed_with_elements() {
        let (dom, container) = parse("<div>Hi <span>World</span></div>");
        let div = dom.children(container)[0];
        assert_eq!(dom.text_content(div), "Hi World");
        assert_eq!(dom.children(div).len(), 2);
    }

    #[test]
    fn whitespace_only_text_dropped() {
        let (dom, container) = parse("<div>\n    <span></span>\n</div>");
        let div = dom.children(container)[0];
        assert_eq!(dom.children(div).len(), 1);
        assert_eq!(dom.text_content(div), "");
    }

    #[test]
    fn self_closing_has_no_children() {
        let (dom, container) = parse("<div><img/><span></span></div>");
        let div = dom.children(container)[0];
        let kids = dom.children(div);
        assert_eq!(kids.len(), 2);
        assert_eq!(dom.get(kids[0]).unwrap().tag, "img");
        assert!(dom.children(kids[0]).is_empty());
    }

    #[test]
    fn top_level_text_is_a_root() {
        let (dom, container) = parse("hello<div></div>");
        let roots = dom.children(container);
        assert_eq!(roots.len(), 2);
        assert!(dom.get(roots[0]).unwrap().is_text());
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn mismatched_close_tag() {
        let mut dom = Dom::new();
        let err = parse_fragment(&mut dom, "<div></span>").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedCloseTag { ref expected, ref found, .. }
            if expected == "div" && found == "span"));
    }

    #[test]
    fn unclosed_element() {
        let mut dom = Dom::new();
        let err = parse_fragment(&mut dom, "<div><span></span>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn stray_close_tag() {
        let mut dom = Dom::new();
        let err = parse_fragment(&mut dom, "</div>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn eof_inside_tag() {
        let mut dom = Dom::new();
        let err = parse_fragment(&mut dom, "<div handle=").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn failed_parse_leaves_no_nodes_behind() {
        let mut dom = Dom::new();
        let keeper = dom.insert(NodeData::element("main"));

        // Both the container and the already-inserted <div> are rolled back.
        assert!(parse_fragment(&mut dom, "<div><span></div>").is_err());
        assert_eq!(dom.len(), 1);
        assert!(dom.contains(keeper));
    }

    #[test]
    fn empty_input_gives_empty_container() {
        let (dom, container) = parse("");
        assert!(dom.children(container).is_empty());
    }
}
