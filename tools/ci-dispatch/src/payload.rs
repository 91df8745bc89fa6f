use crate::args::ModeFlags;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The separator between the encoded flags and the test identifier.
pub const PAYLOAD_DELIMITER: char = '#';

/// How a [`Payload`] is written on the remote script's command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadFormat {
    /// `<u><p><O>#<identifier>`, with one `0`/`1` digit per flag.
    #[default]
    Flagged,
    /// The identifier on its own. The flags are not forwarded.
    Bare,
}

/// The single argument handed to the remote test script for one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload<'a> {
    pub flags: ModeFlags,
    pub identifier: &'a str,
    #[serde(skip)]
    pub format: PayloadFormat,
}

impl<'a> Payload<'a> {
    pub fn new(flags: ModeFlags, identifier: &'a str, format: PayloadFormat) -> Self {
        Self {
            flags,
            identifier,
            format,
        }
    }

    /// The three flag digits in `-u`, `-p`, `-O` order.
    pub fn flag_prefix(&self) -> String {
        [self.flags.upload, self.flags.p, self.flags.optimize]
            .iter()
            .map(|set| if *set { '1' } else { '0' })
            .collect()
    }
}

impl Display for Payload<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.format {
            PayloadFormat::Flagged => write!(
                f,
                "{}{}{}",
                self.flag_prefix(),
                PAYLOAD_DELIMITER,
                self.identifier
            ),
            PayloadFormat::Bare => f.write_str(self.identifier),
        }
    }
}
