/*
 * Created on Sun Sep 13 2026
 *
 * This file is a part of cql-bench
 * cql-bench is a free and open-source, configuration-driven load generator
 * for CQL (Cassandra-compatible) database clusters such as ScyllaDB,
 * Apache Cassandra, AstraDB and CosmosDB.
 *
 * Copyright (c) 2026, the cql-bench developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! A parser for the small literal language used by list-valued settings
//!
//! Values such as `[[200, 10], [1_000, 4]]` or `[(1, 1, '1x threads')]` are accepted: nested
//! lists and tuples, signed integers (with `_` separators) and single or double quoted strings.
//! Trailing commas and arbitrary whitespace are allowed.

use {
    super::{CfgResult, ConfigError},
    libstress::{Bulk, ExecutorSpec},
    std::fmt,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(String),
    /// a list or a tuple
    List(Vec<Literal>),
}

impl Literal {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralErrorKind {
    UnexpectedEnd,
    UnexpectedChar(char),
    UnterminatedString,
    BadInteger,
    TrailingInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralError {
    /// byte offset into the source
    pub pos: usize,
    pub kind: LiteralErrorKind,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            LiteralErrorKind::UnexpectedChar(c) => write!(f, "unexpected `{c}`"),
            LiteralErrorKind::UnterminatedString => write!(f, "unterminated string"),
            LiteralErrorKind::BadInteger => write!(f, "bad integer"),
            LiteralErrorKind::TrailingInput => write!(f, "trailing input"),
        }?;
        write!(f, " at position {}", self.pos)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }
    fn err<T>(&self, pos: usize, kind: LiteralErrorKind) -> Result<T, LiteralError> {
        Err(LiteralError { pos, kind })
    }
    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => self.err(self.pos, LiteralErrorKind::UnexpectedEnd),
            Some('[') => self.sequence(']'),
            Some('(') => self.sequence(')'),
            Some(q @ ('\'' | '"')) => self.string(q),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.int(),
            Some(c) => self.err(self.pos, LiteralErrorKind::UnexpectedChar(c)),
        }
    }
    fn sequence(&mut self, close: char) -> Result<Literal, LiteralError> {
        // opening bracket
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return self.err(self.pos, LiteralErrorKind::UnexpectedEnd),
                Some(c) if c == close => {
                    self.bump();
                    return Ok(Literal::List(items));
                }
                Some(_) => items.push(self.value()?),
            }
            self.skip_ws();
            match self.peek() {
                None => return self.err(self.pos, LiteralErrorKind::UnexpectedEnd),
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                Some(c) => return self.err(self.pos, LiteralErrorKind::UnexpectedChar(c)),
            }
        }
    }
    fn string(&mut self, quote: char) -> Result<Literal, LiteralError> {
        let start = self.pos;
        self.bump();
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return self.err(start, LiteralErrorKind::UnterminatedString),
                Some(c) if c == quote => return Ok(Literal::Str(s)),
                Some('\\') => match self.bump() {
                    None => return self.err(start, LiteralErrorKind::UnterminatedString),
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('0') => s.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => s.push(c),
                    Some(c) => {
                        s.push('\\');
                        s.push(c);
                    }
                },
                Some(c) => s.push(c),
            }
        }
    }
    fn int(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut digits = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek() {
            self.bump();
            digits.push(sign);
        }
        let mut last = None;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => digits.push(c),
                // separators only between digits
                '_' if matches!(last, Some(d) if d != '_') => {}
                _ => break,
            }
            last = Some(c);
            self.bump();
        }
        if last == Some('_') {
            return self.err(start, LiteralErrorKind::BadInteger);
        }
        match digits.parse() {
            Ok(i) => Ok(Literal::Int(i)),
            Err(_) => self.err(start, LiteralErrorKind::BadInteger),
        }
    }
}

/// Parse a complete literal. Anything but whitespace after the value is an error
pub fn parse(src: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(src);
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != src.len() {
        return parser.err(parser.pos, LiteralErrorKind::TrailingInput);
    }
    Ok(value)
}

/*
    conversions
*/

fn bad_value(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::BadValue {
        key: key.to_owned(),
        value: value.to_owned(),
        expected,
    }
}

fn parse_list<'a>(
    key: &str,
    src: &str,
    lit: &'a Literal,
    expected: &'static str,
) -> CfgResult<&'a [Literal]> {
    match lit.as_list() {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(bad_value(key, src, expected)),
    }
}

fn positive(lit: Option<&Literal>) -> Option<usize> {
    lit.and_then(Literal::as_int)
        .filter(|i| *i > 0)
        .and_then(|i| usize::try_from(i).ok())
}

const EXPECTED_BULKS: &str = "a non-empty list of [rows, columns] with rows >= 1 and columns >= 2";
const EXPECTED_EXECUTORS: &str =
    "a non-empty list of [threads, processes, label] with threads and processes >= 1";

/// Parse a bulk list such as `[[200, 10]]`
pub fn parse_bulks(key: &str, src: &str) -> CfgResult<Vec<Bulk>> {
    let lit = parse(src).map_err(|e| ConfigError::Literal(key.to_owned(), e))?;
    parse_list(key, src, &lit, EXPECTED_BULKS)?
        .iter()
        .map(|item| match item.as_list() {
            Some([rows, columns]) => match (positive(Some(rows)), positive(Some(columns))) {
                (Some(rows), Some(columns)) if columns >= 2 => Ok(Bulk::new(rows, columns)),
                _ => Err(bad_value(key, src, EXPECTED_BULKS)),
            },
            _ => Err(bad_value(key, src, EXPECTED_BULKS)),
        })
        .collect()
}

/// Parse an executor list such as `[[1, 1, '1x threads'], [2, 1]]`
pub fn parse_executors(key: &str, src: &str) -> CfgResult<Vec<ExecutorSpec>> {
    let lit = parse(src).map_err(|e| ConfigError::Literal(key.to_owned(), e))?;
    parse_list(key, src, &lit, EXPECTED_EXECUTORS)?
        .iter()
        .map(|item| {
            let spec = item.as_list().and_then(|fields| {
                let threads = positive(fields.first())?;
                let processes = positive(fields.get(1))?;
                let label = match fields.get(2) {
                    None => "",
                    Some(label) => label.as_str()?,
                };
                (fields.len() <= 3).then(|| ExecutorSpec::new(threads, processes, label))
            });
            spec.ok_or_else(|| bad_value(key, src, EXPECTED_EXECUTORS))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(src: &str) -> LiteralError {
        parse(src).unwrap_err()
    }

    #[test]
    fn scalars() {
        assert_eq!(parse("42").unwrap(), Literal::Int(42));
        assert_eq!(parse(" -7 ").unwrap(), Literal::Int(-7));
        assert_eq!(parse("1_000_000").unwrap(), Literal::Int(1_000_000));
        assert_eq!(parse("'a b'").unwrap(), Literal::Str("a b".into()));
        assert_eq!(parse(r#""it's""#).unwrap(), Literal::Str("it's".into()));
        assert_eq!(parse(r"'don\'t'").unwrap(), Literal::Str("don't".into()));
    }

    #[test]
    fn nested() {
        assert_eq!(
            parse("[(1, 2), [3,],]").unwrap(),
            Literal::List(vec![
                Literal::List(vec![Literal::Int(1), Literal::Int(2)]),
                Literal::List(vec![Literal::Int(3)]),
            ])
        );
        assert_eq!(parse("[]").unwrap(), Literal::List(vec![]));
    }

    #[test]
    fn errors() {
        assert_eq!(
            err("[[200, 10]"),
            LiteralError {
                pos: 10,
                kind: LiteralErrorKind::UnexpectedEnd
            }
        );
        assert_eq!(err("[1 2]").kind, LiteralErrorKind::UnexpectedChar('2'));
        assert_eq!(err("[1,,]").kind, LiteralErrorKind::UnexpectedChar(','));
        assert_eq!(err("'abc").kind, LiteralErrorKind::UnterminatedString);
        assert_eq!(err("1__0").kind, LiteralErrorKind::BadInteger);
        assert_eq!(err("10_").kind, LiteralErrorKind::BadInteger);
        assert_eq!(err("-").kind, LiteralErrorKind::BadInteger);
        assert_eq!(err("99999999999999999999").kind, LiteralErrorKind::BadInteger);
        assert_eq!(err("[1] x").kind, LiteralErrorKind::TrailingInput);
        assert_eq!(err("True").kind, LiteralErrorKind::UnexpectedChar('T'));
        assert_eq!(err("").kind, LiteralErrorKind::UnexpectedEnd);
    }

    #[test]
    fn bulks() {
        assert_eq!(
            parse_bulks("BULK_LIST", "[[200, 10]]").unwrap(),
            vec![Bulk::new(200, 10)]
        );
        assert_eq!(
            parse_bulks("BULK_LIST", "[[1,2], (5_000, 3)]").unwrap(),
            vec![Bulk::new(1, 2), Bulk::new(5000, 3)]
        );
        for bad in ["[]", "[[1]]", "[[1, 1]]", "[[0, 10]]", "[[1, 2, 3]]", "[1, 2]", "5"] {
            assert!(
                matches!(
                    parse_bulks("BULK_LIST", bad),
                    Err(ConfigError::BadValue { ref key, .. }) if key == "BULK_LIST"
                ),
                "{bad}"
            );
        }
        assert!(matches!(
            parse_bulks("BULK_LIST_R", "[[1, 2]"),
            Err(ConfigError::Literal(ref key, _)) if key == "BULK_LIST_R"
        ));
    }

    #[test]
    fn executors() {
        assert_eq!(
            parse_executors("EXECUTORS", "[[1,1,'1x threads'],[2,1,'1x threads']]").unwrap(),
            vec![
                ExecutorSpec::new(1, 1, "1x threads"),
                ExecutorSpec::new(2, 1, "1x threads")
            ]
        );
        assert_eq!(
            parse_executors("EXECUTORS", "[(4, 2)]").unwrap(),
            vec![ExecutorSpec::new(4, 2, "")]
        );
        for bad in ["[[1]]", "[[0, 1]]", "[[1, 1, 2]]", "[[1, 1, 'a', 'b']]", "[]"] {
            assert!(parse_executors("EXECUTORS", bad).is_err(), "{bad}");
        }
    }
}
