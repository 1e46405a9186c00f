//! Structural checks for generated Python source.
//!
//! This is not a parser. It tracks string literals, brackets, line
//! continuations and the indentation stack the same way Python's tokenizer
//! does, which is enough to catch the mistakes a template can make: a block
//! opener without a body, a body at the wrong depth, a dedent to a level that
//! was never opened, unbalanced brackets or an unterminated string.

use std::fmt::Display;

/// A structural problem found in Python source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl Display for SyntaxIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StringState {
    None,
    Single(char),
    Triple(char),
}

struct Checker {
    indents: Vec<usize>,
    brackets: Vec<(char, usize)>,
    string: StringState,
    string_start: usize,
    /// The current logical line continues on the next physical line.
    continuation: bool,
    /// The last completed logical line ended with a block-opening colon.
    expect_indent: Option<usize>,
    /// Last significant character of the current logical line.
    last_significant: Option<char>,
}

/// Checks that `source` is structurally valid Python.
///
/// ```
/// use modelctx::syntax::check_python;
///
/// assert!(check_python("def f():\n    return 1\n").is_ok());
/// assert!(check_python("def f():\nreturn 1\n").is_err());
/// ```
pub fn check_python(source: &str) -> Result<(), SyntaxIssue> {
    let mut checker = Checker {
        indents: vec![0],
        brackets: Vec::new(),
        string: StringState::None,
        string_start: 0,
        continuation: false,
        expect_indent: None,
        last_significant: None,
    };

    let mut last_line = 0;
    for (index, line) in source.lines().enumerate() {
        last_line = index + 1;
        checker.line(last_line, line)?;
    }
    checker.finish(last_line)
}

impl Checker {
    fn in_logical_line(&self) -> bool {
        self.continuation || !self.brackets.is_empty() || self.string != StringState::None
    }

    fn line(&mut self, number: usize, line: &str) -> Result<(), SyntaxIssue> {
        if !self.in_logical_line() {
            let content = line.trim_start_matches([' ', '\t']);
            if content.is_empty() || content.starts_with('#') {
                return Ok(());
            }
            let leading = &line[..line.len() - content.len()];
            if leading.contains('\t') {
                return Err(issue(number, "tabs are not allowed in indentation"));
            }
            self.indentation(number, leading.len())?;
            self.last_significant = None;
        }
        self.continuation = false;
        self.scan(number, line)?;

        if !self.in_logical_line() {
            self.expect_indent = (self.last_significant == Some(':')).then_some(number);
        }
        Ok(())
    }

    fn indentation(&mut self, number: usize, width: usize) -> Result<(), SyntaxIssue> {
        let current = self.indents.last().copied().unwrap_or(0);

        if let Some(opened_at) = self.expect_indent.take() {
            if width <= current {
                return Err(issue(
                    number,
                    format!("expected an indented block after line {opened_at}"),
                ));
            }
            self.indents.push(width);
            return Ok(());
        }

        if width > current {
            return Err(issue(number, "unexpected indent"));
        }
        while self.indents.last().is_some_and(|&level| level > width) {
            self.indents.pop();
        }
        if self.indents.last() != Some(&width) {
            return Err(issue(
                number,
                "unindent does not match any outer indentation level",
            ));
        }
        Ok(())
    }

    fn scan(&mut self, number: usize, line: &str) -> Result<(), SyntaxIssue> {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match self.string {
                StringState::Triple(quote) => {
                    if c == '\\' {
                        i += 2;
                        continue;
                    }
                    if c == quote
                        && chars.get(i + 1) == Some(&quote)
                        && chars.get(i + 2) == Some(&quote)
                    {
                        self.string = StringState::None;
                        self.last_significant = Some(quote);
                        i += 3;
                        continue;
                    }
                }
                StringState::Single(quote) => {
                    if c == '\\' {
                        if i + 1 == chars.len() {
                            // An escaped newline keeps the string open.
                            return Ok(());
                        }
                        i += 2;
                        continue;
                    }
                    if c == quote {
                        self.string = StringState::None;
                        self.last_significant = Some(quote);
                    }
                }
                StringState::None => match c {
                    '#' => break,
                    '\'' | '"' => {
                        self.string_start = number;
                        if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                            self.string = StringState::Triple(c);
                            i += 3;
                            continue;
                        }
                        self.string = StringState::Single(c);
                    }
                    '(' | '[' | '{' => {
                        self.brackets.push((c, number));
                        self.last_significant = Some(c);
                    }
                    ')' | ']' | '}' => {
                        let expected = match c {
                            ')' => '(',
                            ']' => '[',
                            _ => '{',
                        };
                        match self.brackets.pop() {
                            Some((open, _)) if open == expected => {}
                            Some((open, opened_at)) => {
                                return Err(issue(
                                    number,
                                    format!(
                                        "closing '{c}' does not match '{open}' opened on line {opened_at}"
                                    ),
                                ));
                            }
                            None => return Err(issue(number, format!("unmatched '{c}'"))),
                        }
                        self.last_significant = Some(c);
                    }
                    '\\' if i + 1 == chars.len() => {
                        self.continuation = true;
                        return Ok(());
                    }
                    c if c.is_whitespace() => {}
                    c => self.last_significant = Some(c),
                },
            }
            i += 1;
        }

        if let StringState::Single(_) = self.string {
            return Err(issue(number, "unterminated string literal"));
        }
        Ok(())
    }

    fn finish(&self, last_line: usize) -> Result<(), SyntaxIssue> {
        if self.string != StringState::None {
            return Err(issue(self.string_start, "unterminated string literal"));
        }
        if let Some((open, opened_at)) = self.brackets.last() {
            return Err(issue(*opened_at, format!("'{open}' was never closed")));
        }
        if self.continuation {
            return Err(issue(last_line, "unexpected end of file after line continuation"));
        }
        if let Some(opened_at) = self.expect_indent {
            return Err(issue(
                last_line,
                format!("expected an indented block after line {opened_at}"),
            ));
        }
        Ok(())
    }
}

fn issue(line: usize, message: impl Into<String>) -> SyntaxIssue {
    SyntaxIssue { line, message: message.into() }
}
