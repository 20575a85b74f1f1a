//! Converts a raw command string into an ordered token stream.
//!
//! The tokenizer is the first phase of the analyzer: it respects POSIX-ish
//! quoting and operators without ever executing anything. Command
//! substitution (`$(...)`, backticks) and process-substitution bodies
//! (`<(...)`, `>(...)`) are captured as opaque text rather than recursively
//! tokenized — later rules (`RawThreat`'s raw-string regexes, `CoreAst`'s
//! literal checks) inspect that text directly.
//!
//! Variable references (`$NAME`, `${NAME}`) are *not* resolved here; they
//! are preserved verbatim inside `Word` text. Resolution is `CoreAst`'s job,
//! using a `VarMap` that does not exist until the token walk begins.

use crate::patterns::MAX_INPUT_LENGTH;
use std::fmt;

/// A single lexical element of a tokenized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bareword, quoted string, or opaque substitution body.
    Word(String),
    /// A shell operator (pipe, list separator, redirection, process sub).
    Operator(OperatorKind),
}

/// The closed set of operator kinds the tokenizer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Pipe,
    PipeAmp,
    AndAnd,
    OrOr,
    Semi,
    Amp,
    Great,
    DGreat,
    Less,
    DLess,
    TLess,
    LessGreat,
    OneGreat,
    OneDGreat,
    TwoGreat,
    TwoDGreat,
    AmpGreat,
    GreatAmp,
    LessAmp,
    ProcessIn,
    ProcessOut,
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperatorKind::Pipe => "|",
            OperatorKind::PipeAmp => "|&",
            OperatorKind::AndAnd => "&&",
            OperatorKind::OrOr => "||",
            OperatorKind::Semi => ";",
            OperatorKind::Amp => "&",
            OperatorKind::Great => ">",
            OperatorKind::DGreat => ">>",
            OperatorKind::Less => "<",
            OperatorKind::DLess => "<<",
            OperatorKind::TLess => "<<<",
            OperatorKind::LessGreat => "<>",
            OperatorKind::OneGreat => "1>",
            OperatorKind::OneDGreat => "1>>",
            OperatorKind::TwoGreat => "2>",
            OperatorKind::TwoDGreat => "2>>",
            OperatorKind::AmpGreat => "&>",
            OperatorKind::GreatAmp => ">&",
            OperatorKind::LessAmp => "<&",
            OperatorKind::ProcessIn => "<(",
            OperatorKind::ProcessOut => ">(",
        };
        write!(f, "{s}")
    }
}

impl OperatorKind {
    /// Boundary operators that separate independent command segments and
    /// therefore reset `CoreAst`'s `next_must_be_command` flag.
    pub fn is_boundary(self) -> bool {
        matches!(
            self,
            OperatorKind::AndAnd
                | OperatorKind::OrOr
                | OperatorKind::Semi
                | OperatorKind::Amp
                | OperatorKind::Pipe
                | OperatorKind::PipeAmp
        )
    }

    /// `true` for operators that redirect to/from a filename (the following
    /// word is a path target, not the start of a new command).
    pub fn is_redirection(self) -> bool {
        matches!(
            self,
            OperatorKind::Great
                | OperatorKind::DGreat
                | OperatorKind::Less
                | OperatorKind::DLess
                | OperatorKind::TLess
                | OperatorKind::LessGreat
                | OperatorKind::OneGreat
                | OperatorKind::OneDGreat
                | OperatorKind::TwoGreat
                | OperatorKind::TwoDGreat
                | OperatorKind::AmpGreat
                | OperatorKind::GreatAmp
                | OperatorKind::LessAmp
        )
    }
}

/// Why tokenization failed. The analyzer maps any variant to the
/// `MALFORMED COMMAND SYNTAX` decision — callers never see this type
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    UnterminatedQuote,
    UnterminatedSubstitution,
    TooLong,
}

/// Tokenizes `command` into an ordered stream of [`Token`]s.
///
/// Total function: every input produces either `Ok(tokens)` or a
/// [`TokenizeError`] — it never panics.
pub fn tokenize(command: &str) -> Result<Vec<Token>, TokenizeError> {
    if command.len() > MAX_INPUT_LENGTH {
        return Err(TokenizeError::TooLong);
    }

    let chars: Vec<char> = command.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    let mut current = String::new();
    let mut in_word = false;

    macro_rules! flush_word {
        () => {
            if in_word {
                tokens.push(Token::Word(std::mem::take(&mut current)));
                in_word = false;
            }
        };
    }

    while i < chars.len() {
        let c = chars[i];

        match c {
            ' ' | '\t' | '\n' | '\r' => {
                flush_word!();
                i += 1;
            }
            '\'' => {
                in_word = true;
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '\'' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(TokenizeError::UnterminatedQuote);
                }
                current.extend(&chars[start..i]);
                i += 1; // consume closing quote
            }
            '"' => {
                in_word = true;
                i += 1;
                let mut closed = false;
                while i < chars.len() {
                    match chars[i] {
                        '"' => {
                            closed = true;
                            i += 1;
                            break;
                        }
                        '\\' if i + 1 < chars.len()
                            && matches!(chars[i + 1], '"' | '\\' | '$' | '`') =>
                        {
                            current.push(chars[i + 1]);
                            i += 2;
                        }
                        other => {
                            current.push(other);
                            i += 1;
                        }
                    }
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedQuote);
                }
            }
            '\\' if i + 1 < chars.len() => {
                in_word = true;
                current.push(chars[i + 1]);
                i += 2;
            }
            '`' => {
                in_word = true;
                let start = i;
                i += 1;
                while i < chars.len() && chars[i] != '`' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(TokenizeError::UnterminatedSubstitution);
                }
                i += 1; // consume closing backtick
                current.extend(&chars[start..i]);
            }
            '$' if i + 1 < chars.len() && chars[i + 1] == '(' => {
                in_word = true;
                let start = i;
                i += 2;
                let mut depth = 1i32;
                while i < chars.len() && depth > 0 {
                    match chars[i] {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
                if depth != 0 {
                    return Err(TokenizeError::UnterminatedSubstitution);
                }
                current.extend(&chars[start..i]);
            }
            '<' if i + 1 < chars.len() && chars[i + 1] == '(' => {
                flush_word!();
                tokens.push(Token::Operator(OperatorKind::ProcessIn));
                i += 2;
                let inner = scan_balanced_parens(&chars, &mut i)?;
                tokens.push(Token::Word(inner));
            }
            '>' if i + 1 < chars.len() && chars[i + 1] == '(' => {
                flush_word!();
                tokens.push(Token::Operator(OperatorKind::ProcessOut));
                i += 2;
                let inner = scan_balanced_parens(&chars, &mut i)?;
                tokens.push(Token::Word(inner));
            }
            '|' | '&' | ';' | '<' | '>' => {
                // A digit run immediately preceding `<`/`>` with no
                // intervening whitespace is an fd number that folds into the
                // operator (e.g. `2>`, `1>>`), not a separate word.
                let fd_prefix = if matches!(c, '<' | '>') && in_word && is_all_digits(&current) {
                    let fd = current.clone();
                    current.clear();
                    in_word = false;
                    Some(fd)
                } else {
                    None
                };
                flush_word!();

                let (kind, consumed) = scan_operator(&chars, i, fd_prefix.as_deref());
                tokens.push(Token::Operator(kind));
                i += consumed;
            }
            other => {
                in_word = true;
                current.push(other);
                i += 1;
            }
        }
    }

    flush_word!();
    Ok(tokens)
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Scans the balanced-parenthesis body of a `<(...)`/`>(...)` process
/// substitution, starting right after the opening `(`. Advances `i` past
/// the closing `)`.
fn scan_balanced_parens(chars: &[char], i: &mut usize) -> Result<String, TokenizeError> {
    let start = *i;
    let mut depth = 1i32;
    while *i < chars.len() && depth > 0 {
        match chars[*i] {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        *i += 1;
    }
    if depth != 0 {
        return Err(TokenizeError::UnterminatedSubstitution);
    }
    // Exclude the closing paren from the captured body.
    Ok(chars[start..*i - 1].iter().collect())
}

/// Resolves the operator starting at `chars[i]` (`i` points at the first
/// character of `|`, `&`, `;`, `<`, or `>`). Returns the kind and how many
/// characters it consumed, folding an optional preceding fd-number prefix
/// into the 1>/2> family.
fn scan_operator(chars: &[char], i: usize, fd_prefix: Option<&str>) -> (OperatorKind, usize) {
    let c = chars[i];
    let next = chars.get(i + 1).copied();
    let next2 = chars.get(i + 2).copied();

    match c {
        '|' => match next {
            Some('&') => (OperatorKind::PipeAmp, 2),
            _ => (OperatorKind::Pipe, 1),
        },
        ';' => (OperatorKind::Semi, 1),
        '&' => match next {
            Some('&') => (OperatorKind::AndAnd, 2),
            Some('>') => (OperatorKind::AmpGreat, 2),
            _ => (OperatorKind::Amp, 1),
        },
        '<' => match fd_prefix {
            _ => match next {
                Some('<') if next2 == Some('<') => (OperatorKind::TLess, 3),
                Some('<') => (OperatorKind::DLess, 2),
                Some('&') => (OperatorKind::LessAmp, 2),
                Some('>') => (OperatorKind::LessGreat, 2),
                _ => (OperatorKind::Less, 1),
            },
        },
        '>' => {
            let (base, len) = match next {
                Some('>') => (OperatorKind::DGreat, 2),
                Some('&') => (OperatorKind::GreatAmp, 2),
                _ => (OperatorKind::Great, 1),
            };
            match fd_prefix {
                Some("1") => (
                    if base == OperatorKind::DGreat {
                        OperatorKind::OneDGreat
                    } else {
                        OperatorKind::OneGreat
                    },
                    len,
                ),
                Some("2") => (
                    if base == OperatorKind::DGreat {
                        OperatorKind::TwoDGreat
                    } else {
                        OperatorKind::TwoGreat
                    },
                    len,
                ),
                _ => (base, len),
            }
        }
        _ => unreachable!("scan_operator called on non-operator char"),
    }
}
