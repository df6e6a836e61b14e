//! Option parsing for free-form request text.
//!
//! Requests such as `add buy -t Buy milk -dl 25/12/2030` carry their values as
//! runs of plain tokens following a flag. The [`OptionParser`] picks those
//! runs out and rejects input that names the same flag twice.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Ambiguous {0} option")]
    Ambiguous(String),
}

/// Splits request text into values keyed by a fixed set of recognised flags.
#[derive(Debug, Clone)]
pub struct OptionParser {
    options: HashSet<String>,
}

impl OptionParser {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionParser {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Map every recognised flag in `text` to the tokens that follow it.
    ///
    /// Tokens are separated by single spaces, so repeated spaces survive as
    /// empty tokens and come back out as repeated spaces in the joined value.
    /// Anything before the first recognised flag is ignored.
    pub fn parse(&self, text: &str) -> Result<HashMap<String, String>, ParseError> {
        let mut values = HashMap::new();
        let tokens: Vec<&str> = text.split(' ').collect();

        let mut i = 0;
        while i < tokens.len() {
            let opt = tokens[i];
            i += 1;
            if !self.options.contains(opt) {
                continue;
            }
            if values.contains_key(opt) {
                return Err(ParseError::Ambiguous(opt.to_string()));
            }
            let start = i;
            while i < tokens.len() && !self.options.contains(tokens[i]) {
                i += 1;
            }
            values.insert(opt.to_string(), tokens[start..i].join(" "));
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_parser() -> OptionParser {
        OptionParser::new(["-t", "-dt", "-dl"])
    }

    #[test]
    fn collects_values_up_to_next_flag() {
        let parsed = add_parser()
            .parse(" junk -t Buy milk -dt from the corner shop -dl 25/12/2030")
            .unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["-t"], "Buy milk");
        assert_eq!(parsed["-dt"], "from the corner shop");
        assert_eq!(parsed["-dl"], "25/12/2030");
    }

    #[test]
    fn leading_tokens_are_ignored() {
        let parsed = add_parser().parse("x y z").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn flag_without_tokens_has_empty_value() {
        let parsed = add_parser().parse("-t -dt").unwrap();
        assert_eq!(parsed["-t"], "");
        assert_eq!(parsed["-dt"], "");
    }

    #[test]
    fn repeated_spaces_are_preserved() {
        let parsed = add_parser().parse("-t a  b").unwrap();
        assert_eq!(parsed["-t"], "a  b");
    }

    #[test]
    fn repeated_flag_is_ambiguous() {
        let err = add_parser().parse("-t one -dt x -t two").unwrap_err();
        assert_eq!(err, ParseError::Ambiguous("-t".into()));
        assert_eq!(err.to_string(), "Ambiguous -t option");
    }

    #[test]
    fn unknown_dash_tokens_are_plain_text() {
        let parsed = add_parser().parse("-t well -known title").unwrap();
        assert_eq!(parsed["-t"], "well -known title");
    }
}
