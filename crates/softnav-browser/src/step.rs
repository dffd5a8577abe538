//! Replay steps

use std::fmt;
use std::str::FromStr;

/// One user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Click the first anchor whose raw `href` is this value
    Click(String),
    Back,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepParseError {
    #[error("empty step")]
    Empty,
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(StepParseError::Empty),
            "back" => Ok(Step::Back),
            "forward" => Ok(Step::Forward),
            href => Ok(Step::Click(href.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click(href) => write!(f, "click {href}"),
            Step::Back => f.write_str("back"),
            Step::Forward => f.write_str("forward"),
        }
    }
}
