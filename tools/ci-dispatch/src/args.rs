//! Classification of the dispatcher's command line tokens.
//!
//! Every token handed to the dispatcher is either one of the recognized mode flags, or the
//! identifier of a test case. Flags may appear anywhere in the token list, so classification is a
//! single scan over the whole list rather than stripping a leading flag.

use serde::Serialize;

/// A mode flag recognized by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// `-u`: upload the compiler artifact before running any tests.
    Upload,
    /// `-p`: forwarded to the remote test script.
    P,
    /// `-O`: forwarded to the remote test script.
    Optimize,
}

impl Flag {
    /// Match a token against the recognized flag names.
    ///
    /// Matching is exact and case-sensitive, so `-o` or `-up` are test identifiers.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "-u" => Some(Self::Upload),
            "-p" => Some(Self::P),
            "-O" => Some(Self::Optimize),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload => "-u",
            Self::P => "-p",
            Self::Optimize => "-O",
        }
    }
}

/// The state of the recognized mode flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeFlags {
    pub upload: bool,
    pub p: bool,
    pub optimize: bool,
}

impl ModeFlags {
    pub fn set(&mut self, flag: Flag) {
        match flag {
            Flag::Upload => self.upload = true,
            Flag::P => self.p = true,
            Flag::Optimize => self.optimize = true,
        }
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::Upload => self.upload,
            Flag::P => self.p,
            Flag::Optimize => self.optimize,
        }
    }
}

/// The ordered list of test identifiers to dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationRequest {
    identifiers: Vec<String>,
}

impl InvocationRequest {
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }
}

/// The result of classifying the dispatcher's tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub flags: ModeFlags,
    pub request: InvocationRequest,
}

impl Classification {
    /// Classify the tokens in a single left-to-right pass.
    ///
    /// Recognized flags set their state and are consumed. All other tokens become test identifiers,
    /// in the order they were given.
    pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut flags = ModeFlags::default();
        let mut identifiers = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            match Flag::from_token(token) {
                Some(flag) => flags.set(flag),
                None => identifiers.push(token.to_owned()),
            }
        }
        Self {
            flags,
            request: InvocationRequest { identifiers },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::args::{Classification, Flag, ModeFlags};

    #[test]
    fn test_flags_are_consumed_anywhere() {
        let classification = Classification::classify(&["t1", "-u", "t2", "-O"]);
        assert_eq!(
            classification.flags,
            ModeFlags {
                upload: true,
                p: false,
                optimize: true,
            }
        );
        assert_eq!(classification.request.identifiers(), ["t1", "t2"]);
    }

    #[test]
    fn test_unrecognized_hyphen_tokens_are_identifiers() {
        let classification = Classification::classify(&["-o", "-up", "--u", "-P", "-"]);
        assert_eq!(classification.flags, ModeFlags::default());
        assert_eq!(
            classification.request.identifiers(),
            ["-o", "-up", "--u", "-P", "-"]
        );
    }

    #[test]
    fn test_every_token_is_classified_exactly_once() {
        let tokens = ["-p", "a", "-u", "b", "-p", "c", "-O", "a"];
        let classification = Classification::classify(&tokens);
        let flag_count = tokens
            .iter()
            .filter(|t| Flag::from_token(t).is_some())
            .count();
        assert_eq!(flag_count + classification.request.len(), tokens.len());
        // Identifiers are exactly the non-flag subsequence, duplicates included.
        let expected = tokens
            .iter()
            .filter(|t| Flag::from_token(t).is_none())
            .collect::<Vec<_>>();
        assert_eq!(
            classification.request.identifiers().iter().collect::<Vec<_>>(),
            expected
        );
        for flag in [Flag::Upload, Flag::P, Flag::Optimize] {
            assert!(classification.flags.is_set(flag), "{} not set", flag.name());
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let tokens = vec!["x".to_owned(), "-p".to_owned(), "y".to_owned()];
        assert_eq!(
            Classification::classify(&tokens),
            Classification::classify(&tokens)
        );
    }

    #[test]
    fn test_empty_input() {
        let classification = Classification::classify::<&str>(&[]);
        assert!(classification.request.is_empty());
        assert_eq!(classification.flags, ModeFlags::default());
    }
}
