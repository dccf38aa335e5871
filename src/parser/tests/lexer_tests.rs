use crate::parser::lexer::token::TokenKind;
use crate::parser::lexer::{Lexer, decode_string_literal};

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source.as_bytes());
    let mut out = Vec::new();
    while let Some(token) = lexer.next() {
        out.push(token.kind);
    }
    out
}

#[test]
fn lexes_open_tag_and_keywords() {
    assert_eq!(
        kinds("<?php class Foo {}"),
        vec![
            TokenKind::OpenTag,
            TokenKind::Class,
            TokenKind::Identifier,
            TokenKind::OpenBrace,
            TokenKind::CloseBrace,
        ]
    );
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        kinds("<?php CLASS Foo {}")[1..2],
        [TokenKind::Class],
    );
    assert_eq!(kinds("<?php FUNCTION x() {}")[1], TokenKind::Function);
}

#[test]
fn lexes_inline_html_around_tags() {
    let toks = kinds("before<?php echo 1; ?>after");
    assert_eq!(toks[0], TokenKind::InlineHtml);
    assert_eq!(toks[1], TokenKind::OpenTag);
    assert_eq!(*toks.last().unwrap(), TokenKind::InlineHtml);
    assert!(toks.contains(&TokenKind::CloseTag));
}

#[test]
fn lexes_variables_and_operators() {
    assert_eq!(
        kinds("<?php $a ??= $b <=> $c;"),
        vec![
            TokenKind::OpenTag,
            TokenKind::Variable,
            TokenKind::CoalesceEq,
            TokenKind::Variable,
            TokenKind::Spaceship,
            TokenKind::Variable,
            TokenKind::SemiColon,
        ]
    );
}

#[test]
fn lexes_casts_and_parens() {
    assert_eq!(
        kinds("<?php (int) $x; (foo) $y;")[1],
        TokenKind::IntCast
    );
    // `(foo)` is not a cast keyword, so it stays a parenthesized name.
    assert_eq!(kinds("<?php (foo);")[1], TokenKind::OpenParen);
}

#[test]
fn lexes_numbers() {
    let toks = kinds("<?php 123 1_000 0xFF 0b11 1.5 1e3;");
    assert_eq!(
        toks[1..7],
        [
            TokenKind::LNumber,
            TokenKind::LNumber,
            TokenKind::LNumber,
            TokenKind::LNumber,
            TokenKind::DNumber,
            TokenKind::DNumber,
        ]
    );
}

#[test]
fn lexes_attribute_marker() {
    assert_eq!(
        kinds("<?php #[Attr] class C {}")[1],
        TokenKind::Attribute
    );
    // A plain `#` comment runs to end of line instead.
    assert_eq!(kinds("<?php # comment\n$a;")[1], TokenKind::Comment);
}

#[test]
fn doc_comments_are_distinct_from_comments() {
    let toks = kinds("<?php /** doc */ /* plain */ $a;");
    assert_eq!(toks[1], TokenKind::DocComment);
    assert_eq!(toks[2], TokenKind::Comment);
}

#[test]
fn lexes_single_and_double_quoted_strings() {
    let toks = kinds(r#"<?php 'a\'b' "c\"d";"#);
    assert_eq!(toks[1], TokenKind::StringLiteral);
    assert_eq!(toks[2], TokenKind::StringLiteral);
}

#[test]
fn decodes_string_escapes() {
    assert_eq!(decode_string_literal(br"'a\'b'"), "a'b");
    assert_eq!(decode_string_literal(br"'a\nb'"), "a\\nb");
    assert_eq!(decode_string_literal(br#""a\nb""#), "a\nb");
    assert_eq!(decode_string_literal(br#""\x41\101""#), "AA");
}

#[test]
fn lexes_heredoc_as_one_string() {
    let source = "<?php $x = <<<EOT\nhello\nworld\nEOT;\n";
    let toks = kinds(source);
    assert_eq!(
        toks[1..5],
        [
            TokenKind::Variable,
            TokenKind::Eq,
            TokenKind::StringLiteral,
            TokenKind::SemiColon,
        ]
    );
}

#[test]
fn decodes_heredoc_with_indentation() {
    let raw = b"<<<EOT\n    hello\n    world\n    EOT";
    assert_eq!(decode_string_literal(raw), "hello\nworld");
}

#[test]
fn decodes_nowdoc_verbatim() {
    let raw = b"<<<'EOT'\na\\nb\nEOT";
    assert_eq!(decode_string_literal(raw), "a\\nb");
}
