//! Runtime-selectable diagnostic topics.
//!
//! A [`Trace`] is handed to the engine (inside a [`Locator`](crate::Locator));
//! engine code only logs a topic when that topic is enabled. Output goes
//! through the `log` facade with target `marginalia::<topic>`, so the host's
//! logger decides where it ends up.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Walk,
    Words,
    Path,
    XPath,
    ShrinkWrap,
    Partition,
    Anchor,
    Parse,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Walk,
        Topic::Words,
        Topic::Path,
        Topic::XPath,
        Topic::ShrinkWrap,
        Topic::Partition,
        Topic::Anchor,
        Topic::Parse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Topic::Walk => "walk",
            Topic::Words => "words",
            Topic::Path => "path",
            Topic::XPath => "xpath",
            Topic::ShrinkWrap => "shrinkwrap",
            Topic::Partition => "partition",
            Topic::Anchor => "anchor",
            Topic::Parse => "parse",
        }
    }

    /// Log target used for this topic.
    pub fn target(self) -> &'static str {
        match self {
            Topic::Walk => "marginalia::walk",
            Topic::Words => "marginalia::words",
            Topic::Path => "marginalia::path",
            Topic::XPath => "marginalia::xpath",
            Topic::ShrinkWrap => "marginalia::shrinkwrap",
            Topic::Partition => "marginalia::partition",
            Topic::Anchor => "marginalia::anchor",
            Topic::Parse => "marginalia::parse",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::TraceTopic(s.to_string()))
    }
}

/// The set of enabled diagnostic topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    enabled: HashSet<Topic>,
}

impl Trace {
    /// No topics enabled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            enabled: Topic::ALL.into_iter().collect(),
        }
    }

    /// Builds a trace from topic names such as `["words", "anchor"]`.
    pub fn from_names<I>(names: I) -> Result<Self, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let enabled = names
            .into_iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<_, _>>()?;
        Ok(Self { enabled })
    }

    pub fn enable(&mut self, topic: Topic) {
        self.enabled.insert(topic);
    }

    pub fn is_enabled(&self, topic: Topic) -> bool {
        self.enabled.contains(&topic)
    }
}

/// Logs at debug level under `topic` when the topic is enabled.
macro_rules! trace_event {
    ($trace:expr, $topic:expr, $($arg:tt)+) => {
        if $trace.is_enabled($topic) {
            log::debug!(target: $topic.target(), $($arg)+);
        }
    };
}

pub(crate) use trace_event;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        let trace = Trace::from_names(["Words", " anchor "]).unwrap();
        assert!(trace.is_enabled(Topic::Words));
        assert!(trace.is_enabled(Topic::Anchor));
        assert!(!trace.is_enabled(Topic::Walk));
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let err = Trace::from_names(["words", "colour"]).unwrap_err();
        assert_eq!(err, ParseError::TraceTopic("colour".into()));
    }

    #[test]
    fn every_topic_round_trips_through_its_name() {
        for topic in Topic::ALL {
            assert_eq!(topic.name().parse::<Topic>(), Ok(topic));
            assert!(topic.target().ends_with(topic.name()));
        }
    }
}
