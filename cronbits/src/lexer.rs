use crate::error::{ScheduleError, Span};

/// Token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Zone name from a leading `CRON_TZ=` or `TZ=` prefix.
    Timezone(String),
    /// `@daily` and friends, lowercased without the `@`.
    Descriptor(String),
    /// One whitespace-separated field, verbatim.
    Field(String),
}

const TZ_PREFIXES: [&str; 2] = ["CRON_TZ=", "TZ="];

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ScheduleError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }

            // The zone prefix is only recognized in front of everything else
            if tokens.is_empty() {
                if let Some(prefix) = TZ_PREFIXES
                    .iter()
                    .find(|p| self.input[self.pos..].starts_with(*p))
                {
                    let tok = self.lex_timezone(prefix)?;
                    tokens.push(tok);
                    continue;
                }
            }

            let tok = if self.bytes[self.pos] == b'@' {
                self.lex_descriptor()
            } else {
                self.lex_field()?
            };
            tokens.push(tok);
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn word_end(&self) -> usize {
        let mut end = self.pos;
        while end < self.bytes.len() && !self.bytes[end].is_ascii_whitespace() {
            end += 1;
        }
        end
    }

    fn lex_timezone(&mut self, prefix: &str) -> Result<Token, ScheduleError> {
        let start = self.pos + prefix.len();
        self.pos = start;
        let end = self.word_end();
        let tz = &self.input[start..end];
        if tz.is_empty() {
            return Err(ScheduleError::lex(
                format!("expected timezone after '{prefix}'"),
                Span::new(start - prefix.len(), start),
                self.input,
            ));
        }
        self.pos = end;
        Ok(Token {
            kind: TokenKind::Timezone(tz.to_string()),
            span: Span::new(start, end),
        })
    }

    fn lex_descriptor(&mut self) -> Token {
        let start = self.pos;
        let end = self.word_end();
        self.pos = end;
        Token {
            kind: TokenKind::Descriptor(self.input[start + 1..end].to_ascii_lowercase()),
            span: Span::new(start, end),
        }
    }

    fn lex_field(&mut self) -> Result<Token, ScheduleError> {
        let start = self.pos;
        let end = self.word_end();
        let text = &self.input[start..end];
        if let Some((i, ch)) = text
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '*' | '?' | ',' | '-' | '/')))
        {
            return Err(ScheduleError::lex(
                format!("unexpected character '{ch}'"),
                Span::new(start + i, start + i + ch.len_utf8()),
                self.input,
            ));
        }
        self.pos = end;
        Ok(Token {
            kind: TokenKind::Field(text.to_string()),
            span: Span::new(start, end),
        })
    }
}
