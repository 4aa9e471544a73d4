//! Minimal reader for list/tuple literals written in Python syntax.
//!
//! Spreadsheet exports often carry cells such as `['Cafe', 'Bakery']` or
//! `("a", "b")`. Only literal syntax is accepted: strings, numbers,
//! `True`/`False`/`None`, and nested lists/tuples. Anything else (names,
//! calls, sets, dicts) is rejected.

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Int(String),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
}

/// Parse `input` and, if it is a list or tuple literal, return the string form
/// of each element.
pub(crate) fn sequence_items(input: &str) -> Option<Vec<String>> {
    let mut parser = LiteralParser::new(input);
    let value = parser.parse_top()?;
    match value {
        Literal::List(items) | Literal::Tuple(items) => {
            Some(items.iter().map(Literal::to_str).collect())
        }
        _ => None,
    }
}

impl Literal {
    /// Python `str()` rendering.
    fn to_str(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            other => other.repr(),
        }
    }

    /// Python `repr()` rendering.
    fn repr(&self) -> String {
        match self {
            Literal::Str(s) => repr_str(s),
            Literal::Int(digits) => digits.clone(),
            Literal::Float(f) => repr_float(*f),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::None => "None".to_string(),
            Literal::List(items) => {
                let inner: Vec<String> = items.iter().map(Literal::repr).collect();
                format!("[{}]", inner.join(", "))
            }
            Literal::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Literal::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(Literal::repr).collect();
                format!("({})", inner.join(", "))
            }
        }
    }
}

fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn repr_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let abs = f.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        // Rust prints 1e16 / 1e-5; Python prints 1e+16 / 1e-05.
        let raw = format!("{:e}", f);
        let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(d) => ('-', d),
            None => ('+', exponent),
        };
        return format!("{}e{}{:0>2}", mantissa, sign, digits);
    }
    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

/// Nesting limit for lists and tuples; deeper input is rejected.
const MAX_DEPTH: usize = 200;

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl LiteralParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    /// Top level allows a bare comma-separated tuple: `1, 2`.
    fn parse_top(&mut self) -> Option<Literal> {
        let first = self.parse_value()?;
        self.skip_ws();
        if self.peek().is_none() {
            return Some(first);
        }

        let mut items = vec![first];
        while self.eat(',') {
            self.skip_ws();
            if self.peek().is_none() {
                break;
            }
            items.push(self.parse_value()?);
            self.skip_ws();
        }
        if self.peek().is_some() {
            return None;
        }
        Some(Literal::Tuple(items))
    }

    fn parse_value(&mut self) -> Option<Literal> {
        self.skip_ws();
        match self.peek()? {
            '[' => {
                self.pos += 1;
                let (items, _) = self.nested(']')?;
                Some(Literal::List(items))
            }
            '(' => {
                self.pos += 1;
                let (mut items, saw_comma) = self.nested(')')?;
                if items.len() == 1 && !saw_comma {
                    items.pop()
                } else {
                    Some(Literal::Tuple(items))
                }
            }
            '\'' | '"' => self.parse_strings(),
            c if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' => self.parse_number(),
            c if c.is_alphabetic() || c == '_' => self.parse_keyword(),
            _ => None,
        }
    }

    /// Parse a bracketed body one level deeper, failing past [`MAX_DEPTH`].
    fn nested(&mut self, close: char) -> Option<(Vec<Literal>, bool)> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let items = self.parse_items(close);
        self.depth -= 1;
        items
    }

    /// Parse comma-separated items up to `close`. Returns whether a comma was seen.
    fn parse_items(&mut self, close: char) -> Option<(Vec<Literal>, bool)> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some((items, saw_comma));
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            if self.eat(',') {
                saw_comma = true;
                continue;
            }
            self.skip_ws();
            if self.eat(close) {
                return Some((items, saw_comma));
            }
            return None;
        }
    }

    /// Adjacent string literals concatenate.
    fn parse_strings(&mut self) -> Option<Literal> {
        let mut out = self.parse_string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            match self.peek() {
                Some('\'') | Some('"') => out.push_str(&self.parse_string()?),
                _ => {
                    self.pos = save;
                    break;
                }
            }
        }
        Some(Literal::Str(out))
    }

    fn parse_string(&mut self) -> Option<String> {
        let quote = self.next()?;
        let mut out = String::new();
        loop {
            match self.next()? {
                c if c == quote => return Some(out),
                '\n' => return None,
                '\\' => match self.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    '\n' => {}
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                c => out.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Option<Literal> {
        let mut negative = false;
        while let Some(sign @ ('-' | '+')) = self.peek() {
            if sign == '-' {
                negative = !negative;
            }
            self.pos += 1;
            self.skip_ws();
        }

        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
        {
            // exponent sign
            if matches!(self.peek(), Some('e' | 'E'))
                && matches!(self.chars.get(self.pos + 1), Some('-' | '+'))
            {
                self.pos += 1;
            }
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        if raw.is_empty() || raw.starts_with('_') || raw.ends_with('_') || raw.contains("__") {
            return None;
        }
        let text = raw.replace('_', "");

        let is_float = text.contains(['.', 'e', 'E']);
        if is_float {
            let value: f64 = text.parse().ok()?;
            return Some(Literal::Float(if negative { -value } else { value }));
        }

        // Python rejects leading zeros on non-zero integers.
        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return None;
        }
        let digits = text.trim_start_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        let rendered = if negative && digits != "0" {
            format!("-{}", digits)
        } else {
            digits.to_string()
        };
        Some(Literal::Int(rendered))
    }

    fn parse_keyword(&mut self) -> Option<Literal> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Some(Literal::Bool(true)),
            "False" => Some(Literal::Bool(false)),
            "None" => Some(Literal::None),
            _ => None,
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}
