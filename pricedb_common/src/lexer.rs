//! Scanner for the price ledger grammar.
//!
//! The scanner walks a record one grammar field at a time:
//!
//! ```text
//! P 2022-02-20 "WP" $25.0000\r\n
//! ^ ^    ^  ^  ^    ^^
//! | year |  |  |    |quantity
//! |      |  |  |    unit
//! |      |  |  quoted symbol
//! |      |  day of month
//! |      month
//! sentinel
//! ```
//!
//! Fixed-width fields (year, month, day) are taken by width, not by character class, so a
//! non-numeric year still comes out as a `Year` token and is rejected later by the parser.
//! Tokens are produced on demand: every call to [`Scanner::next_token`] runs the state
//! machine until exactly one token is available. After an `EndOfInput` or `Error` token
//! the scanner is finished and never resynchronises.
use std::borrow::Cow;

use strum::Display;

use crate::price::SENTINEL;

const QUOTE: char = '"';
const DIGITS: &str = "0123456789";
const LINE_TERMINATORS: &str = "\r\n";
/// Characters that end a unit marker.
const UNIT_STOP: &str = "-0123456789;\" \t\r\n";

/// Kind of a scanned token.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    #[strum(to_string = "sentinel")]
    Sentinel,
    #[strum(to_string = "year")]
    Year,
    #[strum(to_string = "month")]
    Month,
    #[strum(to_string = "day of month")]
    DayOfMonth,
    #[strum(to_string = "quoted symbol")]
    QuotedSymbol,
    #[strum(to_string = "unit")]
    Unit,
    #[strum(to_string = "quantity")]
    Quantity,
    #[strum(to_string = "end of input")]
    EndOfInput,
    #[strum(to_string = "error")]
    Error,
}

/// A token and the input slice it covers.
///
/// For `Error` tokens `value` holds the diagnostic message instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// What was scanned.
    pub kind: TokenKind,
    /// Scanned text, or the diagnostic of an `Error` token.
    pub value: Cow<'a, str>,
    /// Byte offset of the token start.
    pub offset: usize,
}

impl Token<'_> {
    /// `true` for `Error` tokens.
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            TokenKind::Error => write!(f, "{}", self.value),
            kind => write!(f, "{} {:?}", kind, self.value),
        }
    }
}

/// Pending grammar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    Sentinel,
    Year,
    Month,
    DayOfMonth,
    QuotedSymbol,
    Unit,
    Quantity,
    AfterRecord,
    /// Skip one separator character, then continue with the wrapped state.
    Separator(Field),
    Done,
}

/// Field that follows a separator. Kept apart from `State` so `Separator` stays `Copy`
/// without recursive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    DayOfMonth,
    QuotedSymbol,
    Unit,
}

impl From<Field> for State {
    fn from(field: Field) -> Self {
        match field {
            Field::Year => State::Year,
            Field::Month => State::Month,
            Field::DayOfMonth => State::DayOfMonth,
            Field::QuotedSymbol => State::QuotedSymbol,
            Field::Unit => State::Unit,
        }
    }
}

/// Pull-based scanner over a ledger buffer.
pub struct Scanner<'a> {
    input: &'a str,
    state: State,
    /// Start of the pending token.
    start: usize,
    /// Current read position.
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Scanner {
            input,
            state: State::Begin,
            start: 0,
            pos: 0,
        }
    }

    /// Returns the next token, or `None` once `EndOfInput` or an `Error` has been returned.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        while self.state != State::Done {
            if let Some(token) = self.step() {
                return Some(token);
            }
        }
        None
    }

    /// Runs one state transition, returning the token it emitted, if any.
    fn step(&mut self) -> Option<Token<'a>> {
        match self.state {
            State::Begin => self.lex_begin(),
            State::Sentinel => self.lex_sentinel(),
            State::Year => self.lex_fixed(TokenKind::Year, 4, State::Separator(Field::Month)),
            State::Month => {
                self.lex_fixed(TokenKind::Month, 2, State::Separator(Field::DayOfMonth))
            }
            State::DayOfMonth => self.lex_fixed(
                TokenKind::DayOfMonth,
                2,
                State::Separator(Field::QuotedSymbol),
            ),
            State::QuotedSymbol => self.lex_quoted_symbol(),
            State::Unit => self.lex_unit(),
            State::Quantity => self.lex_quantity(),
            State::AfterRecord => self.lex_after_record(),
            State::Separator(next) => self.lex_separator(next.into()),
            State::Done => None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes the next char if it is one of `valid`.
    fn accept(&mut self, valid: &str) -> bool {
        match self.peek() {
            Some(c) if valid.contains(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Consumes a run of chars from `valid`, returning how many were taken.
    fn accept_run(&mut self, valid: &str) -> usize {
        let mut count = 0;
        while self.accept(valid) {
            count += 1;
        }
        count
    }

    /// Consumes chars while `pred` holds.
    fn accept_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn emit(&mut self, kind: TokenKind, next: State) -> Option<Token<'a>> {
        let token = Token {
            kind,
            value: Cow::Borrowed(&self.input[self.start..self.pos]),
            offset: self.start,
        };
        self.start = self.pos;
        self.state = next;
        Some(token)
    }

    /// Emits an error token and halts the scanner.
    fn error(&mut self, message: String) -> Option<Token<'a>> {
        self.state = State::Done;
        Some(Token {
            kind: TokenKind::Error,
            value: Cow::Owned(message),
            offset: self.pos,
        })
    }

    fn end_of_input(&mut self) -> Option<Token<'a>> {
        self.emit(TokenKind::EndOfInput, State::Done)
    }

    fn lex_begin(&mut self) -> Option<Token<'a>> {
        if self.peek().is_none() {
            return self.end_of_input();
        }
        self.state = State::Sentinel;
        None
    }

    fn lex_sentinel(&mut self) -> Option<Token<'a>> {
        match self.bump() {
            Some(SENTINEL) => self.emit(TokenKind::Sentinel, State::Separator(Field::Year)),
            Some(c) => {
                self.pos -= c.len_utf8();
                self.error(format!("expected '{SENTINEL}' to start a record, found {c:?}"))
            }
            None => self.error(format!("expected '{SENTINEL}' to start a record")),
        }
    }

    fn lex_separator(&mut self, next: State) -> Option<Token<'a>> {
        match self.peek() {
            None => self.error("unexpected end of input inside a record".to_string()),
            Some(c) if LINE_TERMINATORS.contains(c) => {
                self.error("unexpected end of line inside a record".to_string())
            }
            Some(_) => {
                self.bump();
                self.ignore();
                self.state = next;
                None
            }
        }
    }

    /// Takes exactly `width` characters as one token.
    fn lex_fixed(&mut self, kind: TokenKind, width: usize, next: State) -> Option<Token<'a>> {
        for _ in 0..width {
            match self.bump() {
                Some(c) if LINE_TERMINATORS.contains(c) => {
                    return self.error(format!("unexpected end of line in {kind} field"));
                }
                Some(_) => {}
                None => return self.error(format!("unexpected end of input in {kind} field")),
            }
        }
        self.emit(kind, next)
    }

    fn lex_quoted_symbol(&mut self) -> Option<Token<'a>> {
        if !self.accept("\"") {
            return self.error("expected '\"' to open the symbol".to_string());
        }
        self.ignore();
        self.accept_while(|c| c != QUOTE && !LINE_TERMINATORS.contains(c));
        if self.peek() != Some(QUOTE) {
            return self.error("unterminated quoted symbol".to_string());
        }
        let token = self.emit(TokenKind::QuotedSymbol, State::Separator(Field::Unit));
        self.bump();
        self.ignore();
        token
    }

    fn lex_unit(&mut self) -> Option<Token<'a>> {
        self.accept_while(|c| !UNIT_STOP.contains(c));
        self.emit(TokenKind::Unit, State::Quantity)
    }

    fn lex_quantity(&mut self) -> Option<Token<'a>> {
        self.accept("-");
        let mut digits = self.accept_run(DIGITS);
        if self.accept(".") {
            digits += self.accept_run(DIGITS);
        }
        if digits == 0 {
            return self.error("expected a quantity after the unit".to_string());
        }
        self.emit(TokenKind::Quantity, State::AfterRecord)
    }

    fn lex_after_record(&mut self) -> Option<Token<'a>> {
        self.accept_run(LINE_TERMINATORS);
        self.ignore();
        if self.peek().is_none() {
            return self.end_of_input();
        }
        self.state = State::Sentinel;
        None
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
