//! Lexing and parsing of template bodies into a node tree.

use super::TemplateError;

/// Helper operations callable from an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    File,
    Include,
    Reference,
    Mcp,
}

impl Helper {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "file" => Some(Helper::File),
            "include" => Some(Helper::Include),
            "reference" => Some(Helper::Reference),
            "mcp" => Some(Helper::Mcp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Helper::File => "file",
            Helper::Include => "include",
            Helper::Reference => "reference",
            Helper::Mcp => "mcp",
        }
    }

    /// (minimum, maximum) argument count.
    fn arity(self) -> (usize, Option<usize>) {
        match self {
            Helper::File | Helper::Include | Helper::Reference => (1, Some(1)),
            Helper::Mcp => (2, None),
        }
    }
}

/// An action argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A quoted or raw string literal.
    Str(String),
    /// A field lookup; an empty path is the data root (`.`).
    Field(Vec<String>),
}

/// Line/column of an action, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Print {
        arg: Arg,
        pos: Pos,
    },
    Call {
        helper: Helper,
        args: Vec<Arg>,
        pos: Pos,
    },
    If {
        cond: Arg,
        then: Vec<Node>,
        otherwise: Vec<Node>,
        pos: Pos,
    },
}

/// Raw lexical segment before actions are interpreted.
#[derive(Debug)]
enum Segment {
    Text(String),
    Action { tokens: Vec<Token>, offset: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Field(Vec<String>),
    Str(String),
}

/// Parse `source` into a node tree. `name` identifies the template in errors.
pub fn parse(name: &str, source: &str) -> Result<Vec<Node>, TemplateError> {
    let segments = lex(name, source)?;
    Parser {
        name,
        source,
        segments: segments.into_iter(),
    }
    .parse_all()
}

fn position(source: &str, offset: usize) -> Pos {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let col = before
        .rfind('\n')
        .map(|i| before[i + 1..].chars().count() + 1)
        .unwrap_or_else(|| before.chars().count() + 1);
    Pos { line, col }
}

fn error_at(name: &str, source: &str, offset: usize, cause: impl Into<String>) -> TemplateError {
    let pos = position(source, offset);
    TemplateError::new(format!("{}:{}:{}", name, pos.line, pos.col), cause)
}

fn lex(name: &str, source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest_start = 0;
    let mut trim_next_text = false;

    while let Some(found) = source[rest_start..].find("{{") {
        let open = rest_start + found;
        let mut text = &source[rest_start..open];
        if trim_next_text {
            text = text.trim_start();
        }

        let mut cursor = open + 2;
        let trim_left = source[cursor..].starts_with("- ")
            || source[cursor..].starts_with("-\n")
            || source[cursor..].starts_with("-\t");
        if trim_left {
            text = text.trim_end();
            cursor += 1;
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }

        let (tokens, close_end, trim_right) = lex_action(name, source, open, cursor)?;
        if let Some(tokens) = tokens {
            segments.push(Segment::Action {
                tokens,
                offset: open,
            });
        }
        trim_next_text = trim_right;
        rest_start = close_end;
    }

    let mut tail = &source[rest_start..];
    if trim_next_text {
        tail = tail.trim_start();
    }
    if !tail.is_empty() {
        segments.push(Segment::Text(tail.to_string()));
    }

    Ok(segments)
}

/// Lex one action starting at `cursor` (just past `{{` and any trim marker).
///
/// Returns the tokens (`None` for a comment), the offset after `}}`, and
/// whether the action ends with a right trim marker.
fn lex_action(
    name: &str,
    source: &str,
    open: usize,
    cursor: usize,
) -> Result<(Option<Vec<Token>>, usize, bool), TemplateError> {
    let body = &source[cursor..];
    let leading_ws = body.len() - body.trim_start().len();

    if body[leading_ws..].starts_with("/*") {
        let comment_start = cursor + leading_ws + 2;
        let Some(end) = source[comment_start..].find("*/") else {
            return Err(error_at(name, source, open, "unclosed comment"));
        };
        let after = comment_start + end + 2;
        let tail = &source[after..];
        let (trim_right, skip) = if tail.starts_with(" -}}") {
            (true, 4)
        } else if tail.starts_with("}}") {
            (false, 2)
        } else {
            return Err(error_at(name, source, open, "comment ends before closing delimiter"));
        };
        return Ok((None, after + skip, trim_right));
    }

    let mut tokens = Vec::new();
    let mut chars = body.char_indices().peekable();

    while let Some(&(idx, ch)) = chars.peek() {
        let at = cursor + idx;
        match ch {
            c if c.is_whitespace() => {
                if source[at..].starts_with(" -}}")
                    || source[at..].starts_with("\n-}}")
                    || source[at..].starts_with("\t-}}")
                {
                    return Ok((Some(tokens), at + 4, true));
                }
                chars.next();
            }
            '}' if source[at..].starts_with("}}") => {
                return Ok((Some(tokens), at + 2, false));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, '\\')) => value.push('\\'),
                            Some((_, '"')) => value.push('"'),
                            Some((_, other)) => {
                                return Err(error_at(
                                    name,
                                    source,
                                    at,
                                    format!("invalid escape sequence '\\{}' in string", other),
                                ));
                            }
                            None => {
                                return Err(error_at(name, source, at, "unterminated string"));
                            }
                        },
                        Some((_, '\n')) | None => {
                            return Err(error_at(name, source, at, "unterminated string"));
                        }
                        Some((_, c)) => value.push(c),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '`')) => break,
                        Some((_, c)) => value.push(c),
                        None => {
                            return Err(error_at(name, source, at, "unterminated raw string"));
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            '.' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c == '.' || is_ident_char(c) {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Field(parse_field(name, source, at, &word)?));
            }
            c if is_ident_char(c) => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if is_ident_char(c) {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(word));
            }
            other => {
                return Err(error_at(
                    name,
                    source,
                    at,
                    format!("unexpected character '{}' in action", other),
                ));
            }
        }
    }

    Err(error_at(name, source, open, "unclosed action"))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn parse_field(
    name: &str,
    source: &str,
    at: usize,
    word: &str,
) -> Result<Vec<String>, TemplateError> {
    if word == "." {
        return Ok(Vec::new());
    }
    let parts: Vec<String> = word[1..].split('.').map(str::to_string).collect();
    if parts.iter().any(String::is_empty) {
        return Err(error_at(
            name,
            source,
            at,
            format!("bad field reference '{}'", word),
        ));
    }
    Ok(parts)
}

struct Parser<'a, I: Iterator<Item = Segment>> {
    name: &'a str,
    source: &'a str,
    segments: I,
}

/// What closed a node list.
enum Terminator {
    Eof,
    Else(usize),
    End(usize),
}

impl<I: Iterator<Item = Segment>> Parser<'_, I> {
    fn parse_all(mut self) -> Result<Vec<Node>, TemplateError> {
        let (nodes, terminator) = self.parse_list()?;
        match terminator {
            Terminator::Eof => Ok(nodes),
            Terminator::Else(offset) => Err(self.error(offset, "unexpected {{else}}")),
            Terminator::End(offset) => Err(self.error(offset, "unexpected {{end}}")),
        }
    }

    fn error(&self, offset: usize, cause: impl Into<String>) -> TemplateError {
        error_at(self.name, self.source, offset, cause)
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(segment) = self.segments.next() {
            let (tokens, offset) = match segment {
                Segment::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Segment::Action { tokens, offset } => (tokens, offset),
            };
            let pos = position(self.source, offset);

            let mut tokens = tokens.into_iter();
            let Some(first) = tokens.next() else {
                return Err(self.error(offset, "missing value for command"));
            };
            let rest: Vec<Token> = tokens.collect();

            match first {
                Token::Ident(word) if word == "else" || word == "end" => {
                    if !rest.is_empty() {
                        return Err(self.error(offset, format!("unexpected arguments after {}", word)));
                    }
                    let terminator = if word == "else" {
                        Terminator::Else(offset)
                    } else {
                        Terminator::End(offset)
                    };
                    return Ok((nodes, terminator));
                }
                Token::Ident(word) if word == "if" => {
                    let cond = match rest.as_slice() {
                        [single] => self.to_arg(single.clone(), offset)?,
                        [] => return Err(self.error(offset, "missing condition in {{if}}")),
                        _ => return Err(self.error(offset, "{{if}} takes a single argument")),
                    };
                    nodes.push(self.parse_if(cond, offset, pos)?);
                }
                Token::Ident(word) => {
                    let Some(helper) = Helper::lookup(&word) else {
                        return Err(self.error(offset, format!("function \"{}\" not defined", word)));
                    };
                    let (min, max) = helper.arity();
                    if rest.len() < min || max.is_some_and(|m| rest.len() > m) {
                        return Err(self.error(
                            offset,
                            format!(
                                "wrong number of args for {}: got {}",
                                helper.name(),
                                rest.len()
                            ),
                        ));
                    }
                    let args = rest
                        .into_iter()
                        .map(|t| self.to_arg(t, offset))
                        .collect::<Result<Vec<_>, _>>()?;
                    nodes.push(Node::Call { helper, args, pos });
                }
                other => {
                    if !rest.is_empty() {
                        return Err(self.error(offset, "can't give arguments to a non-function"));
                    }
                    let arg = self.to_arg(other, offset)?;
                    nodes.push(Node::Print { arg, pos });
                }
            }
        }

        Ok((nodes, Terminator::Eof))
    }

    fn parse_if(&mut self, cond: Arg, offset: usize, pos: Pos) -> Result<Node, TemplateError> {
        let (then, terminator) = self.parse_list()?;
        let otherwise = match terminator {
            Terminator::End(_) => Vec::new(),
            Terminator::Else(_) => {
                let (otherwise, terminator) = self.parse_list()?;
                match terminator {
                    Terminator::End(_) => otherwise,
                    Terminator::Else(o) => return Err(self.error(o, "unexpected {{else}}")),
                    Terminator::Eof => return Err(self.error(offset, "unclosed {{if}}")),
                }
            }
            Terminator::Eof => return Err(self.error(offset, "unclosed {{if}}")),
        };
        Ok(Node::If {
            cond,
            then,
            otherwise,
            pos,
        })
    }

    fn to_arg(&self, token: Token, offset: usize) -> Result<Arg, TemplateError> {
        match token {
            Token::Str(s) => Ok(Arg::Str(s)),
            Token::Field(path) => Ok(Arg::Field(path)),
            Token::Ident(word) => Err(self.error(
                offset,
                format!("unexpected identifier \"{}\" as argument", word),
            )),
        }
    }
}
