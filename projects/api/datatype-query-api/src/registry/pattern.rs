//! AmigaDOS style file name patterns.
//!
//! Supported syntax:
//!
//! | Token    | Matches                                       |
//! |----------|-----------------------------------------------|
//! | `?`      | any single character                          |
//! | `#?`,`*` | any run of characters, including none         |
//! | `#x`     | zero or more repetitions of token `x`         |
//! | `(a\|b)` | either alternative; alternatives may be empty |
//! | `[a-z]`  | one character from the class                  |
//! | `'x`     | the character `x` literally                   |
//!
//! Matching ignores case.

use thiserror::Error;

/// Errors in a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// `(` without `)`, or `)` without `(`
    #[error("Unbalanced parentheses in pattern")]
    UnbalancedGroup,

    /// `#` or `'` at the end of the pattern
    #[error("Pattern ends after '{0}'")]
    DanglingOperator(char),

    /// `[` without `]`
    #[error("Unterminated character class in pattern")]
    UnterminatedClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
    Class(Vec<(char, char)>),
    Repeat(Box<Token>),
    Group(Vec<Vec<Token>>),
}

/// A compiled pattern.
///
/// Matching runs the pattern as an automaton over all live states at once, so its
/// cost grows with the name length times the pattern size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    nodes: Vec<Node>,
    start: usize,
}

impl Pattern {
    /// Compile `source`.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser {
            chars: &chars,
            position: 0,
        };
        let tokens = parser.sequence()?;
        if parser.position < chars.len() {
            // Only a stray `)` or `|` stops the top level sequence early.
            return Err(PatternError::UnbalancedGroup);
        }

        let mut compiler = Compiler {
            nodes: vec![Node::Match],
        };
        let start = compiler.sequence(&tokens, MATCH_NODE);
        Ok(Self {
            nodes: compiler.nodes,
            start,
        })
    }

    /// Whether `name` matches the whole pattern.
    pub fn matches(&self, name: &str) -> bool {
        let mut stack = Vec::new();
        let mut current = StateSet::new(self.nodes.len());
        let mut next = StateSet::new(self.nodes.len());
        current.add(&self.nodes, self.start, &mut stack);

        for c in name.chars() {
            next.clear();
            for &state in &current.states {
                if let Node::Char { test, next: following } = &self.nodes[state] {
                    if test.accepts(c) {
                        next.add(&self.nodes, *following, &mut stack);
                    }
                }
            }
            if next.states.is_empty() {
                return false;
            }
            core::mem::swap(&mut current, &mut next);
        }
        current.seen[MATCH_NODE]
    }
}

struct Parser<'a> {
    chars: &'a [char],
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Tokens up to the end of input, `|` or `)`.
    fn sequence(&mut self) -> Result<Vec<Token>, PatternError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            tokens.push(self.token()?);
        }
        Ok(tokens)
    }

    fn token(&mut self) -> Result<Token, PatternError> {
        let Some(c) = self.next() else {
            return Err(PatternError::DanglingOperator('#'));
        };
        Ok(match c {
            '?' => Token::AnyChar,
            '*' => Token::AnyRun,
            '#' => match self.peek() {
                None => return Err(PatternError::DanglingOperator('#')),
                Some('?') => {
                    self.position += 1;
                    Token::AnyRun
                }
                Some(_) => Token::Repeat(Box::new(self.token()?)),
            },
            '\'' => Token::Literal(self.next().ok_or(PatternError::DanglingOperator('\''))?),
            '(' => self.group()?,
            '[' => self.class()?,
            other => Token::Literal(other),
        })
    }

    fn group(&mut self) -> Result<Token, PatternError> {
        let mut alternatives = vec![self.sequence()?];
        loop {
            match self.next() {
                Some('|') => alternatives.push(self.sequence()?),
                Some(')') => return Ok(Token::Group(alternatives)),
                _ => return Err(PatternError::UnbalancedGroup),
            }
        }
    }

    fn class(&mut self) -> Result<Token, PatternError> {
        let mut ranges = Vec::new();
        loop {
            let start = self.next().ok_or(PatternError::UnterminatedClass)?;
            if start == ']' {
                return Ok(Token::Class(ranges));
            }
            let range_end = self.chars.get(self.position + 1).is_some_and(|&c| c != ']');
            if self.peek() == Some('-') && range_end {
                self.position += 1;
                let end = self.next().ok_or(PatternError::UnterminatedClass)?;
                ranges.push((start, end));
            } else {
                ranges.push((start, start));
            }
        }
    }
}

/// One state of the compiled automaton. Indices refer to `Pattern::nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// Accepts the whole name.
    Match,
    /// Consumes one character passing the test, then continues at `next`.
    Char { test: CharTest, next: usize },
    /// Continues at both states without consuming input.
    Split(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CharTest {
    Literal(char),
    Any,
    Class(Vec<(char, char)>),
}

impl CharTest {
    fn accepts(&self, c: char) -> bool {
        match self {
            Self::Literal(expected) => chars_equal(c, *expected),
            Self::Any => true,
            Self::Class(ranges) => class_contains(ranges, c),
        }
    }
}

const MATCH_NODE: usize = 0;

/// Builds the automaton back to front, so every state's successor already exists.
struct Compiler {
    nodes: Vec<Node>,
}

impl Compiler {
    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn sequence(&mut self, tokens: &[Token], next: usize) -> usize {
        tokens
            .iter()
            .rev()
            .fold(next, |next, token| self.token(token, next))
    }

    fn token(&mut self, token: &Token, next: usize) -> usize {
        match token {
            Token::Literal(c) => self.push(Node::Char {
                test: CharTest::Literal(*c),
                next,
            }),
            Token::AnyChar => self.push(Node::Char {
                test: CharTest::Any,
                next,
            }),
            Token::Class(ranges) => self.push(Node::Char {
                test: CharTest::Class(ranges.clone()),
                next,
            }),
            Token::AnyRun => self.repeat(&Token::AnyChar, next),
            Token::Repeat(inner) => self.repeat(inner, next),
            Token::Group(alternatives) => {
                let mut entries: Vec<usize> = alternatives
                    .iter()
                    .map(|alternative| self.sequence(alternative, next))
                    .collect();
                let mut entry = entries.pop().unwrap_or(next);
                while let Some(previous) = entries.pop() {
                    entry = self.push(Node::Split(previous, entry));
                }
                entry
            }
        }
    }

    fn repeat(&mut self, inner: &Token, next: usize) -> usize {
        // The loop state is patched once the body, which jumps back to it, exists.
        let loop_state = self.push(Node::Split(next, next));
        let body = self.token(inner, loop_state);
        self.nodes[loop_state] = Node::Split(body, next);
        loop_state
    }
}

/// States reached after the same number of characters.
struct StateSet {
    seen: Vec<bool>,
    states: Vec<usize>,
}

impl StateSet {
    fn new(len: usize) -> Self {
        Self {
            seen: vec![false; len],
            states: Vec::new(),
        }
    }

    fn clear(&mut self) {
        // Split states are marked seen without being listed.
        self.seen.fill(false);
        self.states.clear();
    }

    /// Add `state` and everything reachable from it without consuming input.
    fn add(&mut self, nodes: &[Node], state: usize, stack: &mut Vec<usize>) {
        stack.push(state);
        while let Some(state) = stack.pop() {
            if core::mem::replace(&mut self.seen[state], true) {
                continue;
            }
            match nodes[state] {
                Node::Split(first, second) => {
                    stack.push(second);
                    stack.push(first);
                }
                Node::Match | Node::Char { .. } => self.states.push(state),
            }
        }
    }
}

fn chars_equal(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn class_contains(ranges: &[(char, char)], c: char) -> bool {
    let lower = c.to_lowercase().next().unwrap_or(c);
    let upper = c.to_uppercase().next().unwrap_or(c);
    ranges.iter().any(|&(start, end)| {
        let range = start..=end;
        range.contains(&c) || range.contains(&lower) || range.contains(&upper)
    })
}
