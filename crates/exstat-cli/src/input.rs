use std::{
    fs,
    io::{self, Read as _},
    path::PathBuf,
};

use anyhow::Context;
use exstat::{Number, ParseNumberError};

/// Dataset source shared by every subcommand.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InputArg {
    /// Input file with whitespace-separated values (defaults to stdin)
    input: Option<PathBuf>,
    /// Parse fractional literals as exact decimals instead of floats
    #[arg(long, default_value_t = false)]
    decimal: bool,
}

/// One whitespace-separated word of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    /// 1-based position among all tokens.
    pub position: usize,
    /// 1-based line number.
    pub line: usize,
    pub text: &'a str,
}

pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.lines()
        .enumerate()
        .flat_map(|(line, words)| {
            words
                .split_whitespace()
                .map(move |text| (line + 1, text))
        })
        .enumerate()
        .map(|(index, (line, text))| Token {
            position: index + 1,
            line,
            text,
        })
}

impl InputArg {
    /// Parses one literal with the grammar selected by `--decimal`.
    pub fn parse_literal(&self, literal: &str) -> Result<Number, ParseNumberError> {
        if self.decimal {
            Number::parse_decimal(literal)
        } else {
            literal.parse()
        }
    }

    pub fn read_text(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display())),
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read standard input")?;
                Ok(text)
            }
        }
    }

    pub fn read_numbers(&self) -> anyhow::Result<Vec<Number>> {
        self.parse_numbers(&self.read_text()?)
    }

    pub fn read_words(&self) -> anyhow::Result<Vec<String>> {
        let text = self.read_text()?;
        Ok(tokenize(&text).map(|token| token.text.to_owned()).collect())
    }

    fn parse_numbers(&self, text: &str) -> anyhow::Result<Vec<Number>> {
        tokenize(text)
            .map(|token| {
                self.parse_literal(token.text).with_context(|| {
                    format!(
                        "Failed to parse token #{} on line {}",
                        token.position, token.line
                    )
                })
            })
            .collect()
    }

    /// Parses the value of a numeric flag such as `--interval`.
    pub fn parse_flag(&self, name: &str, literal: &str) -> anyhow::Result<Number> {
        self.parse_literal(literal)
            .with_context(|| format!("Failed to parse --{name}"))
    }

    pub fn parse_option(&self, name: &str, value: Option<&str>) -> anyhow::Result<Option<Number>> {
        value
            .map(|literal| self.parse_flag(name, literal))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use exstat::NumericKind;

    use super::*;

    fn arg(decimal: bool) -> InputArg {
        InputArg {
            input: None,
            decimal,
        }
    }

    #[test]
    fn test_tokenize_tracks_lines_and_positions() {
        let tokens = tokenize("1 2\n\n  3/4\t5.5\n").collect::<Vec<_>>();
        assert_eq!(
            tokens,
            [
                Token { position: 1, line: 1, text: "1" },
                Token { position: 2, line: 1, text: "2" },
                Token { position: 3, line: 3, text: "3/4" },
                Token { position: 4, line: 3, text: "5.5" },
            ]
        );
    }

    #[test]
    fn test_parse_numbers_with_default_grammar() {
        let numbers = arg(false).parse_numbers("1 3/4 2.5").unwrap();
        let kinds = numbers.iter().map(Number::kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [NumericKind::Integer, NumericKind::Rational, NumericKind::Float]
        );
    }

    #[test]
    fn test_parse_numbers_as_decimals() {
        let numbers = arg(true).parse_numbers("1 2.5 0.1375").unwrap();
        let kinds = numbers.iter().map(Number::kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [NumericKind::Integer, NumericKind::Decimal, NumericKind::Decimal]
        );
    }

    #[test]
    fn test_parse_error_names_token_and_line() {
        let err = arg(false).parse_numbers("1 2\n3 oops").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("token #4 on line 2"), "{message}");
        assert!(message.contains("'oops'"), "{message}");
    }

    #[test]
    fn test_parse_option() {
        let input = arg(true);
        assert_eq!(input.parse_option("mu", None).unwrap(), None);
        let mu = input.parse_option("mu", Some("1.5")).unwrap().unwrap();
        assert_eq!(mu.kind(), NumericKind::Decimal);
        assert!(input.parse_option("mu", Some("x")).is_err());
    }
}
