use logos::{internal::LexerInternal, Lexer, Logos};

#[derive(Clone)]
pub struct Extras<'a> {
    pub arena: &'a bumpalo::Bump,
}

/// Tokens of the client-side GraphQL query language.
///
/// Whitespace, commas, and comments are insignificant and skipped outright.
/// String literals resolve their escape sequences while lexing, so the token
/// always carries the final value.
#[derive(Logos, Debug, PartialEq)]
#[logos(extras = Extras<'s>)]
pub enum Token<'a> {
    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,

    #[token("!")]
    Bang,

    #[token("...")]
    Spread,

    #[regex(r"\$[_A-Za-z][_0-9A-Za-z]*", |lex| &lex.slice()[1..])]
    VariableName(&'a str),

    #[regex(r"@[_A-Za-z][_0-9A-Za-z]*", |lex| &lex.slice()[1..])]
    DirectiveName(&'a str),

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*", |lex| lex.slice())]
    Name(&'a str),

    #[regex(r"-?(0|[1-9][0-9]*)", |lex| lex.slice())]
    IntLiteral(&'a str),

    #[regex(r"-?(0|[1-9][0-9]*)\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"-?(0|[1-9][0-9]*)[eE][+-]?[0-9]+", |lex| lex.slice())]
    FloatLiteral(&'a str),

    #[token("\"\"\"", read_block_string)]
    #[token("\"", read_string)]
    StringLiteral(&'a str),

    #[error]
    #[regex(r"[ \t\r\n\f,]+", logos::skip)]
    #[regex(r"#[^\r\n]*", logos::skip)]
    Error,

    /// Virtual token the parser substitutes once the lexer is exhausted.
    End,
}

/// Reads the rest of a single-quoted string once its opening quote has matched.
///
/// Strings without escape sequences borrow their value straight from the source;
/// only escaped strings are built up in the arena.
fn read_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<&'a str> {
    let remainder = lex.remainder();
    for (index, c) in remainder.char_indices() {
        match c {
            '"' => {
                lex.bump_unchecked(index + 1);
                return Some(&remainder[..index]);
            }
            '\\' => return read_escaped_string(lex, index),
            '\n' | '\r' => return None,
            _ => {}
        }
    }
    None
}

/// Slow path of [read_string], entered at the first backslash: the value up to
/// there is copied and every escape sequence is resolved to its character.
fn read_escaped_string<'a>(lex: &mut Lexer<'a, Token<'a>>, first_escape: usize) -> Option<&'a str> {
    let remainder = lex.remainder();
    let mut output = String::from(&remainder[..first_escape]);
    let mut cursor = first_escape;
    loop {
        let rest = &remainder[cursor..];
        let c = rest.chars().next()?;
        match c {
            '"' => {
                lex.bump_unchecked(cursor + 1);
                return Some(lex.extras.arena.alloc(output));
            }
            '\n' | '\r' => return None,
            '\\' => {
                let escaped = rest[1..].chars().next()?;
                cursor += 2;
                match escaped {
                    '"' => output.push('"'),
                    '\\' => output.push('\\'),
                    '/' => output.push('/'),
                    'b' => output.push('\u{0008}'),
                    'f' => output.push('\u{000C}'),
                    'n' => output.push('\n'),
                    'r' => output.push('\r'),
                    't' => output.push('\t'),
                    'u' => {
                        let digits = remainder.get(cursor..cursor + 4)?;
                        output.push(parse_codepoint(digits)?);
                        cursor += 4;
                    }
                    _ => return None,
                }
            }
            other => {
                output.push(other);
                cursor += other.len_utf8();
            }
        }
    }
}

/// The four hex digits of a `\uXXXX` escape, as the character they name.
fn parse_codepoint(digits: &str) -> Option<char> {
    use lexical_core::{parse_with_options, NumberFormatBuilder, ParseIntegerOptions};
    const HEX: u128 = NumberFormatBuilder::hexadecimal();
    let options = ParseIntegerOptions::new();
    let code = parse_with_options::<u32, HEX>(digits.as_bytes(), &options).ok()?;
    char::from_u32(code)
}

/// Reads the rest of a block string once its opening `"""` has matched.
///
/// The only escape sequence a block string knows is `\"""`; everything else is
/// kept as written and the shared indentation is stripped afterwards.
fn read_block_string<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Option<&'a str> {
    let remainder = lex.remainder();
    let mut terminator = None;
    let mut cursor = 0;
    while let Some(found) = remainder[cursor..].find("\"\"\"") {
        let index = cursor + found;
        if index > 0 && remainder.as_bytes()[index - 1] == b'\\' {
            cursor = index + 1;
        } else {
            terminator = Some(index);
            break;
        }
    }
    let end = terminator?;
    lex.bump_unchecked(end + 3);
    let raw = remainder[..end].replace("\\\"\"\"", "\"\"\"");
    Some(lex.extras.arena.alloc(trim_block_string(&raw)))
}

/// Normalises a raw block string: the indentation common to all lines after the
/// first is removed, as are leading and trailing blank lines.
fn trim_block_string(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut common_indent: Option<usize> = None;
    for line in lines.iter().skip(1) {
        let indent = line.len() - line.trim_start_matches(|c| c == ' ' || c == '\t').len();
        if indent < line.len() {
            common_indent = Some(common_indent.map_or(indent, |known| known.min(indent)));
        }
    }
    let indent = common_indent.unwrap_or(0);

    let mut trimmed: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(number, line)| {
            if number == 0 {
                *line
            } else {
                line.get(indent.min(line.len())..).unwrap_or("")
            }
        })
        .collect();
    while trimmed.first().map_or(false, |line| line.trim().is_empty()) {
        trimmed.remove(0);
    }
    while trimmed.last().map_or(false, |line| line.trim().is_empty()) {
        trimmed.pop();
    }
    trimmed.join("\n")
}
