use miette::Diagnostic;
use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::{all_consuming, rest, verify};
use nom::sequence::separated_pair;
use nom::IResult;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TargetError {
    #[error("malformed remote target `{0}`")]
    #[diagnostic(help("remote targets are written as `<container>:<path>`, e.g. `ci:/test/data/compiler`"))]
    Malformed(String),
}

/// The destination of the artifact upload, addressed the way the container runtime's `cp`
/// subcommand expects it.
///
/// ```text
/// target ::= alias COLON path
/// alias  ::= any character except COLON, at least one
/// path   ::= any, at least one
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub alias: String,
    pub path: String,
}

impl RemoteTarget {
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let (_, (alias, path)) = all_consuming(Self::parse_target)(input)
            .map_err(|_| TargetError::Malformed(input.to_owned()))?;
        Ok(Self {
            alias: alias.to_owned(),
            path: path.to_owned(),
        })
    }

    fn parse_target(input: &str) -> IResult<&str, (&str, &str)> {
        separated_pair(
            take_while1(|c: char| c != ':'),
            char(':'),
            verify(rest, |path: &str| !path.is_empty()),
        )(input)
    }
}

impl Display for RemoteTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.alias, self.path)
    }
}
