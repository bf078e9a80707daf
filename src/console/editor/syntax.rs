//! Lexer and word tables for console snippets
//!
//! The token set targets C-family snippet syntax. Identifiers are
//! classified against the keyword and type tables after lexing.

use logos::Logos;
use std::ops::Range;

/// Keywords offered for completion and styled as [`StyleTag::Keyword`]
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "base", "break", "case", "catch", "checked", "class",
    "const", "continue", "default", "delegate", "do", "else", "enum", "event", "explicit",
    "extern", "false", "finally", "fixed", "for", "foreach", "get", "goto", "if", "implicit",
    "in", "interface", "internal", "is", "lock", "nameof", "namespace", "new", "null",
    "operator", "out", "override", "params", "private", "protected", "public", "readonly",
    "ref", "return", "sealed", "set", "sizeof", "static", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "unchecked", "unsafe", "using", "var", "virtual", "void",
    "volatile", "when", "where", "while", "yield",
];

/// Built-in and well-known type names, styled as [`StyleTag::Type`]
pub const TYPE_NAMES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "dynamic", "float", "int", "long", "object",
    "sbyte", "short", "string", "uint", "ulong", "ushort", "Action", "Array", "Console",
    "DateTime", "Dictionary", "Enumerable", "Exception", "Func", "HashSet", "IEnumerable",
    "IEnumerator", "List", "Math", "Object", "String", "StringBuilder", "Task", "TimeSpan",
    "Type",
];

/// Display style attached to a span of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Plain,
    Keyword,
    Type,
    Identifier,
    Number,
    String,
    Comment,
    Operator,
    Punctuation,
    Directive,
}

impl StyleTag {
    /// RGB color for this style
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            StyleTag::Plain => (220, 220, 220),
            StyleTag::Keyword => (86, 156, 214),
            StyleTag::Type => (78, 201, 176),
            StyleTag::Identifier => (220, 220, 220),
            StyleTag::Number => (181, 206, 168),
            StyleTag::String => (214, 157, 133),
            StyleTag::Comment => (87, 166, 74),
            StyleTag::Operator => (180, 180, 180),
            StyleTag::Punctuation => (160, 160, 160),
            StyleTag::Directive => (155, 155, 155),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StyleTag::Plain => "plain",
            StyleTag::Keyword => "keyword",
            StyleTag::Type => "type",
            StyleTag::Identifier => "identifier",
            StyleTag::Number => "number",
            StyleTag::String => "string",
            StyleTag::Comment => "comment",
            StyleTag::Operator => "operator",
            StyleTag::Punctuation => "punctuation",
            StyleTag::Directive => "directive",
        }
    }
}

/// Raw lexer tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"\$"([^"\\\n]|\\.)*""#)]
    #[regex(r#"@"([^"]|"")*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\[^'\n]*)'")]
    Char,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?[fFdDmMuUlL]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+[uUlL]*")]
    Number,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"#[a-zA-Z]+")]
    Directive,

    #[regex(r"[+\-*/%=<>!&|\^~?:]")]
    Operator,

    #[regex(r"[(){}\[\];,.]")]
    Punctuation,
}

/// Style for a lexed token; identifiers need their text
pub fn style_for(token: Token, text: &str) -> StyleTag {
    match token {
        Token::Whitespace => StyleTag::Plain,
        Token::LineComment | Token::BlockComment => StyleTag::Comment,
        Token::String | Token::Char => StyleTag::String,
        Token::Number => StyleTag::Number,
        Token::Directive => StyleTag::Directive,
        Token::Operator => StyleTag::Operator,
        Token::Punctuation => StyleTag::Punctuation,
        Token::Ident if is_keyword(text) => StyleTag::Keyword,
        Token::Ident if is_type_name(text) => StyleTag::Type,
        Token::Ident => StyleTag::Identifier,
    }
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_type_name(word: &str) -> bool {
    TYPE_NAMES.contains(&word)
}

/// Characters that may appear inside an identifier
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Identifiers in `text` with their character ranges
///
/// Unlexable input is skipped rather than ending the scan.
pub fn identifiers(text: &str) -> Vec<(Range<usize>, &str)> {
    let mut lexer = Token::lexer(text);
    let mut offset = 0;
    let mut found = Vec::new();

    while let Some(token) = lexer.next() {
        let slice = lexer.slice();
        let len = slice.chars().count();
        if token == Ok(Token::Ident) && !is_keyword(slice) {
            found.push((offset..offset + len, slice));
        }
        offset += len;
    }

    found
}
