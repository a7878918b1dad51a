// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Scripts of page events, one per line.

use std::{num::ParseFloatError, str::FromStr};
use thiserror::Error;

/// Something that happens to the page.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The user presses the toggle button.
    Toggle,
    Request,
    Release(Option<String>),
    Hide,
    Show,
    Scroll(f64),
    /// The platform drops the native lock.
    AutoRelease,
    /// Native requests are rejected with the given message, or accepted again if none.
    Reject(Option<String>),
    /// Fallback playback is rejected with the given message, or accepted again if none.
    FailPlayback(Option<String>),
    /// Native requests stay pending until `grant`.
    Hold,
    Grant,
    Unload,
    /// The page comes back from the back/forward cache.
    Restore,
}

impl FromStr for Event {
    type Err = ParseEventError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, Some(argument.trim().to_owned())),
            None => (line, None),
        };
        Ok(match name {
            "toggle" => Self::Toggle,
            "request" => Self::Request,
            "release" => Self::Release(argument),
            "hide" => Self::Hide,
            "show" => Self::Show,
            "scroll" => Self::Scroll(
                argument
                    .ok_or(ParseEventError::MissingArgument("scroll"))?
                    .parse()?,
            ),
            "auto-release" => Self::AutoRelease,
            "reject" => Self::Reject(argument),
            "fail-playback" => Self::FailPlayback(argument),
            "hold" => Self::Hold,
            "grant" => Self::Grant,
            "unload" => Self::Unload,
            "restore" => Self::Restore,
            _ => return Err(ParseEventError::Unknown(name.to_owned())),
        })
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseEventError {
    #[error("Unknown event \"{0}\"")]
    Unknown(String),
    #[error("Event \"{0}\" needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid scroll offset: {0}")]
    ParseFloat(#[from] ParseFloatError),
}

/// Parses a script, skipping blank lines and `#` comments.
///
/// Returns the line number along with each event.
pub fn parse_script(script: &str) -> Result<Vec<(usize, Event)>, (usize, ParseEventError)> {
    script
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| {
            line.parse()
                .map(|event| (line_number, event))
                .map_err(|e| (line_number, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_events() {
        assert_eq!("toggle".parse(), Ok(Event::Toggle));
        assert_eq!("  scroll 5 ".parse(), Ok(Event::Scroll(5.0)));
        assert_eq!("release".parse(), Ok(Event::Release(None)));
        assert_eq!(
            "release Time for bed.".parse(),
            Ok(Event::Release(Some("Time for bed.".to_string())))
        );
        assert_eq!(
            "reject NotAllowedError".parse(),
            Ok(Event::Reject(Some("NotAllowedError".to_string())))
        );
        assert_eq!("reject".parse(), Ok(Event::Reject(None)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "dance".parse::<Event>(),
            Err(ParseEventError::Unknown("dance".to_string()))
        );
        assert_eq!(
            "scroll".parse::<Event>(),
            Err(ParseEventError::MissingArgument("scroll"))
        );
        assert!(matches!(
            "scroll down".parse::<Event>(),
            Err(ParseEventError::ParseFloat(_))
        ));
    }

    #[test]
    fn parse_script_skips_comments() {
        assert_eq!(
            parse_script("# Start.\ntoggle\n\n  hide\n"),
            Ok(vec![(2, Event::Toggle), (4, Event::Hide)])
        );
        assert_eq!(
            parse_script("toggle\njump\n").unwrap_err().0,
            2
        );
    }
}
