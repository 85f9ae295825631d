use crate::core::token::{SymbolKind, Token};
use crate::error::{CompileError, Position};

const SYMBOLS: &[&str] = &["<", "</", ">", "/>", "="];

fn is_symbol_first_char(c: char) -> bool {
    matches!(c, '<' | '>' | '/' | '=')
}

fn is_prefix_of_symbol(s: &str) -> bool {
    SYMBOLS.iter().any(|sym| sym.starts_with(s))
}

fn symbol_kind(s: &str) -> SymbolKind {
    match s {
        "<" => SymbolKind::LAngle,
        "</" => SymbolKind::LAngleSlash,
        ">" => SymbolKind::RAngle,
        "/>" => SymbolKind::SlashRAngle,
        "=" => SymbolKind::Equals,
        _ => unreachable!("not a recognized symbol: {s:?}"),
    }
}

#[derive(Debug, Clone, Copy)]
enum Input {
    Char(char),
    Eof,
}

#[derive(Debug)]
enum State {
    Start,
    InText(String, usize),
    InSymbol(String, usize),
    InString(String, usize),
    AfterString(String, usize),
}

/// Character-driven lexical state machine. Each call to `next()` drives the
/// machine until it emits a token, hits the synthetic end-of-input, or finds
/// an invalid transition.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    pending: Option<(usize, Input)>,
    state: State,
    exhausted: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            chars: source.char_indices(),
            pending: None,
            state: State::Start,
            exhausted: false,
        }
    }

    /// Scans the whole source up front, returning tokens in order.
    pub fn scan_all(source: &'a str) -> Result<Vec<Token>, CompileError> {
        Scanner::new(source).collect()
    }

    fn advance(&mut self) -> (usize, Input) {
        if let Some(pc) = self.pending.take() {
            return pc;
        }
        match self.chars.next() {
            Some((offset, ch)) => (offset, Input::Char(ch)),
            None => (self.source.len(), Input::Eof),
        }
    }

    fn push_back(&mut self, offset: usize, input: Input) {
        self.pending = Some((offset, input));
    }

    fn pos(&self, offset: usize) -> Position {
        Position::from_offset(self.source, offset)
    }

    /// Closes out an `InSymbol` accumulator into a token. A bare `/` that
    /// never extended into `/>` isn't one of the known symbols on its own.
    fn finish_symbol(&self, accum: &str, start: usize) -> Result<Token, CompileError> {
        if accum == "/" {
            Err(CompileError::UnexpectedSlash(self.pos(start)))
        } else {
            Ok(Token::Symbol(symbol_kind(accum), start))
        }
    }

    fn next_token(&mut self) -> Option<Result<Token, CompileError>> {
        if self.exhausted {
            return None;
        }
        loop {
            let (offset, input) = self.advance();
            let state = std::mem::replace(&mut self.state, State::Start);
            match (state, input) {
                (State::Start, Input::Char(c)) if c.is_whitespace() => {}
                (State::Start, Input::Char(c)) if c.is_alphabetic() || c == '_' => {
                    self.state = State::InText(c.to_string(), offset);
                }
                (State::Start, Input::Char(c)) if is_symbol_first_char(c) => {
                    self.state = State::InSymbol(c.to_string(), offset);
                }
                (State::Start, Input::Char('"')) => {
                    self.state = State::InString(String::new(), offset);
                }
                (State::Start, Input::Char(c)) if c.is_ascii_digit() => {
                    self.exhausted = true;
                    return Some(Err(CompileError::UnexpectedNumeric(self.pos(offset))));
                }
                (State::Start, Input::Eof) => {
                    self.exhausted = true;
                    return None;
                }
                (State::Start, Input::Char(c)) => {
                    self.exhausted = true;
                    return Some(Err(CompileError::InvalidTransition {
                        state: "Start".to_string(),
                        input: c,
                        at: self.pos(offset),
                    }));
                }

                (State::InText(mut accum, start), Input::Char(c))
                    if c.is_alphanumeric() || c == '_' =>
                {
                    accum.push(c);
                    self.state = State::InText(accum, start);
                }
                (State::InText(accum, start), Input::Char(c)) if c.is_whitespace() => {
                    return Some(Ok(Token::Text(accum, start)));
                }
                (State::InText(accum, start), Input::Char(c)) if is_symbol_first_char(c) => {
                    self.state = State::InSymbol(c.to_string(), offset);
                    return Some(Ok(Token::Text(accum, start)));
                }
                (State::InText(accum, start), Input::Eof) => {
                    self.exhausted = true;
                    return Some(Ok(Token::Text(accum, start)));
                }
                (State::InText(_, _), Input::Char(_)) => {
                    self.exhausted = true;
                    return Some(Err(CompileError::UnexpectedSlash(self.pos(offset))));
                }

                (State::InSymbol(accum, start), Input::Char(c)) if is_symbol_first_char(c) => {
                    let mut extended = accum.clone();
                    extended.push(c);
                    if is_prefix_of_symbol(&extended) {
                        self.state = State::InSymbol(extended, start);
                    } else {
                        self.push_back(offset, input);
                        return Some(self.finish_symbol(&accum, start));
                    }
                }
                (State::InSymbol(accum, start), Input::Char(c))
                    if c.is_alphabetic() || c == '_' =>
                {
                    self.push_back(offset, input);
                    return Some(self.finish_symbol(&accum, start));
                }
                (State::InSymbol(accum, start), Input::Char('"')) => {
                    self.push_back(offset, Input::Char('"'));
                    return Some(self.finish_symbol(&accum, start));
                }
                (State::InSymbol(accum, start), Input::Char(c)) if c.is_whitespace() => {
                    return Some(self.finish_symbol(&accum, start));
                }
                (State::InSymbol(accum, start), Input::Eof) => {
                    self.exhausted = true;
                    return Some(self.finish_symbol(&accum, start));
                }
                (State::InSymbol(accum, start), Input::Char(c)) => {
                    self.exhausted = true;
                    return Some(Err(CompileError::InvalidTransition {
                        state: format!("InSymbol({accum})"),
                        input: c,
                        at: self.pos(offset),
                    }));
                }

                (State::InString(accum, start), Input::Char('"')) => {
                    self.state = State::AfterString(accum, start);
                }
                (State::InString(_, start), Input::Char('\n')) => {
                    self.exhausted = true;
                    return Some(Err(CompileError::UnterminatedString(self.pos(start))));
                }
                (State::InString(_, start), Input::Eof) => {
                    self.exhausted = true;
                    return Some(Err(CompileError::UnterminatedString(self.pos(start))));
                }
                (State::InString(mut accum, start), Input::Char(c)) => {
                    accum.push(c);
                    self.state = State::InString(accum, start);
                }

                (State::AfterString(accum, start), Input::Char(c)) if c.is_whitespace() => {
                    return Some(Ok(Token::StringLit(accum, start)));
                }
                (State::AfterString(accum, start), Input::Char(c)) if is_symbol_first_char(c) => {
                    self.state = State::InSymbol(c.to_string(), offset);
                    return Some(Ok(Token::StringLit(accum, start)));
                }
                (State::AfterString(accum, start), Input::Eof) => {
                    self.exhausted = true;
                    return Some(Ok(Token::StringLit(accum, start)));
                }
                (State::AfterString(_, _), Input::Char(_)) => {
                    self.exhausted = true;
                    return Some(Err(CompileError::QuoteFollowedByNonWhitespace(
                        self.pos(offset),
                    )));
                }
            }
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
