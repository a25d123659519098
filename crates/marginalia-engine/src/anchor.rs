//! # Annotation Anchoring
//!
//! Creating annotations from raw selections, and re-anchoring stored ones
//! against a freshly loaded document.
//!
//! A stored annotation carries a sequence range (tried first) and an XPath
//! range (the fallback), plus the quote it was created with. Anchoring a
//! batch never fails as a whole: every annotation gets its own
//! [`Outcome`], so one corrupt or lost entry does not hide the others.

use std::cmp::Ordering;
use std::iter;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ParseError, SelectionError};
use crate::locator::Locator;
use crate::partition::{Partition, collapse_whitespace, partition, partition_text_range};
use crate::ranges::{SequenceRange, TextRange, WordRange, XPathRange};
use crate::shrinkwrap::shrink_wrap;
use crate::trace::{Topic, trace_event};

/// An annotation as persisted (JSON on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnnotation {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath_range: Option<String>,
    pub quote: String,
    #[serde(default)]
    pub note: String,
}

/// Builds a new annotation from a raw selection.
///
/// Nothing is produced unless every step succeeds.
pub fn create(
    loc: &Locator<'_>,
    selection: &TextRange,
    note: &str,
) -> Result<StoredAnnotation, SelectionError> {
    let wrapped = shrink_wrap(loc, selection)?;
    let words = WordRange::from_text_range(loc, &wrapped)?;
    let Partition { quote, .. } = partition_text_range(loc, &wrapped);
    if quote.is_empty() {
        return Err(SelectionError::EmptyQuote);
    }
    // Points computed from raw positions are addressed from their nearest
    // breaking ancestor already.
    let sequence = words.sequence_range_with(loc, true)?;
    let xpath = words.to_xpath_range(loc)?;

    let annotation = StoredAnnotation {
        id: Uuid::new_v4(),
        sequence_range: Some(sequence.to_string()),
        xpath_range: Some(xpath.to_string()),
        quote,
        note: note.to_string(),
    };
    trace_event!(
        loc.trace(),
        Topic::Anchor,
        "created {} at {sequence} ({xpath})",
        annotation.id
    );
    Ok(annotation)
}

/// What happened to one stored annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Anchored {
        range: WordRange,
        /// Normalized, so anchored outcomes can be ordered.
        sequence: SequenceRange,
        partition: Partition,
        /// Whether the document text under the range still reads as the
        /// stored quote.
        quote_matches: bool,
    },
    /// Neither address resolves any more. The quote can still be shown.
    Lost { quote: String },
    /// A stored address string does not parse.
    Corrupt(ParseError),
}

impl Outcome {
    pub fn is_anchored(&self) -> bool {
        matches!(self, Outcome::Anchored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorReport {
    pub id: Uuid,
    pub outcome: Outcome,
}

/// Re-anchors every annotation in `annotations`.
///
/// Anchored annotations come first, in document order; lost and corrupt ones
/// follow in input order.
pub fn anchor_batch(loc: &Locator<'_>, annotations: &[StoredAnnotation]) -> Vec<AnchorReport> {
    let mut reports: Vec<AnchorReport> = annotations
        .iter()
        .map(|annotation| AnchorReport {
            id: annotation.id,
            outcome: anchor_one(loc, annotation),
        })
        .collect();

    reports.sort_by(|a, b| match (&a.outcome, &b.outcome) {
        (Outcome::Anchored { sequence: x, .. }, Outcome::Anchored { sequence: y, .. }) => x.cmp(y),
        (Outcome::Anchored { .. }, _) => Ordering::Less,
        (_, Outcome::Anchored { .. }) => Ordering::Greater,
        _ => Ordering::Equal,
    });
    reports
}

/// Re-anchors a single annotation.
pub fn anchor_one(loc: &Locator<'_>, annotation: &StoredAnnotation) -> Outcome {
    let parsed = annotation
        .sequence_range
        .as_deref()
        .map(str::parse::<SequenceRange>)
        .transpose()
        .and_then(|sequence| {
            let xpath = annotation
                .xpath_range
                .as_deref()
                .map(str::parse::<XPathRange>)
                .transpose()?;
            Ok((sequence, xpath))
        });
    let (sequence, xpath) = match parsed {
        Ok(ranges) => {
            trace_event!(loc.trace(), Topic::Parse, "{}: parsed {ranges:?}", annotation.id);
            ranges
        }
        Err(err) => {
            log::warn!("annotation {} is corrupt: {err}", annotation.id);
            return Outcome::Corrupt(err);
        }
    };

    let by_sequence = sequence.and_then(|range| {
        WordRange::from_sequence_range(loc, &range)
            .inspect_err(|err| {
                trace_event!(loc.trace(), Topic::Anchor, "{}: {range} failed: {err}", annotation.id)
            })
            .ok()
    });
    let by_xpath = || {
        xpath.as_ref().and_then(|range| {
            WordRange::from_xpath_range(loc, range)
                .inspect_err(|err| {
                    trace_event!(loc.trace(), Topic::Anchor, "{}: {range} failed: {err}", annotation.id)
                })
                .ok()
        })
    };

    for candidate in by_sequence.into_iter().chain(iter::once_with(by_xpath).flatten()) {
        let resolved = partition(loc, &candidate).and_then(|parts| {
            let sequence = candidate.normalized(loc)?.sequence_range_with(loc, true)?;
            Ok((parts, sequence))
        });
        match resolved {
            Ok((parts, sequence)) => {
                let quote_matches = parts.quote == collapse_whitespace(&annotation.quote);
                trace_event!(
                    loc.trace(),
                    Topic::Anchor,
                    "{} anchored at {sequence} (quote matches: {quote_matches})",
                    annotation.id
                );
                return Outcome::Anchored {
                    range: candidate,
                    sequence,
                    partition: parts,
                    quote_matches,
                };
            }
            Err(err) => {
                trace_event!(loc.trace(), Topic::Anchor, "{}: {err}", annotation.id);
            }
        }
    }

    trace_event!(loc.trace(), Topic::Anchor, "{} lost", annotation.id);
    Outcome::Lost {
        quote: annotation.quote.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::ranges::Position;
    use crate::skip::NoSkip;
    use crate::tests::{find_text, xml};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DOC: &str = "<article><h1>Title</h1><p>one two three</p><p>four five</p></article>";

    fn select(doc: &Document, text: &str, from: usize, to: usize) -> TextRange {
        let node = find_text(doc, text);
        TextRange::new(Position::new(node, from), Position::new(node, to))
    }

    #[test]
    fn create_records_both_addresses_and_the_quote() {
        let doc = xml(DOC);
        let loc = Locator::new(&doc, doc.root(), &NoSkip);
        let annotation = create(&loc, &select(&doc, "one two three", 3, 13), "note").unwrap();
        assert_eq!(annotation.sequence_range.as_deref(), Some("/2/2.0;/2/3.5"));
        assert_eq!(
            annotation.xpath_range.as_deref(),
            Some("p[1]/word(2)/char(0);p[1]/word(3)/char(5)")
        );
        assert_eq!(annotation.quote, "two three");
        assert_eq!(annotation.note, "note");
    }

    #[test]
    fn create_rejects_whitespace_selections() {
        let doc = xml("<article><p>one</p><p>   </p></article>");
        let loc = Locator::new(&doc, doc.root(), &NoSkip);
        assert_eq!(
            create(&loc, &select(&doc, "   ", 0, 3), ""),
            Err(SelectionError::WhitespaceOnly)
        );
    }

    #[test]
    fn created_annotations_anchor_again() {
        let doc = xml(DOC);
        let loc = Locator::new(&doc, doc.root(), &NoSkip);
        let annotation = create(&loc, &select(&doc, "four five", 0, 4), "").unwrap();

        let reloaded = xml(DOC);
        let loc = Locator::new(&reloaded, reloaded.root(), &NoSkip);
        let report = anchor_batch(&loc, &[annotation.clone()]);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].id, annotation.id);
        match &report[0].outcome {
            Outcome::Anchored {
                sequence,
                partition,
                quote_matches,
                ..
            } => {
                assert_eq!(sequence.to_string(), "/3/1.0;/3/1.4");
                assert_eq!(partition.quote, "four");
                assert!(quote_matches);
            }
            other => panic!("expected anchored, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_xpath_and_reports_lost_or_corrupt() {
        let doc = xml(DOC);
        let loc = Locator::new(&doc, doc.root(), &NoSkip);
        let stored = |sequence: Option<&str>, xpath: Option<&str>| StoredAnnotation {
            id: Uuid::new_v4(),
            sequence_range: sequence.map(str::to_string),
            xpath_range: xpath.map(str::to_string),
            quote: "one".into(),
            note: String::new(),
        };
        let batch = vec![
            stored(Some("/9/1.0;/9/1.3"), Some("p[1]/word(1)/char(0);p[1]/word(1)/char(3)")),
            stored(Some("/9/1.0;/9/1.3"), None),
            stored(Some("not a range"), None),
        ];

        let reports = anchor_batch(&loc, &batch);
        assert!(reports[0].outcome.is_anchored());
        assert_eq!(reports[0].id, batch[0].id);
        assert_eq!(
            reports[1].outcome,
            Outcome::Lost {
                quote: "one".into()
            }
        );
        assert!(matches!(reports[2].outcome, Outcome::Corrupt(ParseError::SequenceRange(_))));
    }

    #[test]
    fn batches_come_back_in_document_order() {
        let doc = xml(DOC);
        let loc = Locator::new(&doc, doc.root(), &NoSkip);
        let later = create(&loc, &select(&doc, "four five", 5, 9), "").unwrap();
        let lost = StoredAnnotation {
            id: Uuid::new_v4(),
            sequence_range: Some("/7/1.0;/7/1.1".into()),
            xpath_range: None,
            ..later.clone()
        };
        let earlier = create(&loc, &select(&doc, "one two three", 0, 3), "").unwrap();
        // Legacy root-relative form of "Title".
        let legacy = StoredAnnotation {
            id: Uuid::new_v4(),
            sequence_range: Some("/ 1.0 1.5".into()),
            xpath_range: None,
            quote: "Title".into(),
            note: String::new(),
        };

        let reports = anchor_batch(&loc, &[lost.clone(), later.clone(), earlier.clone(), legacy]);
        let sequences: Vec<String> = reports
            .iter()
            .map(|r| match &r.outcome {
                Outcome::Anchored { sequence, .. } => sequence.to_string(),
                _ => "-".to_string(),
            })
            .collect();
        assert_eq!(sequences, vec!["/1/1.0;/1/1.5", "/2/1.0;/2/1.3", "/3/2.0;/3/2.4", "-"]);
    }

    #[test]
    fn changed_text_is_flagged() {
        let doc = xml(DOC);
        let loc = Locator::new(&doc, doc.root(), &NoSkip);
        let annotation = create(&loc, &select(&doc, "one two three", 0, 7), "").unwrap();

        let edited = xml("<article><h1>Title</h1><p>uno dos three</p><p>four five</p></article>");
        let loc = Locator::new(&edited, edited.root(), &NoSkip);
        match anchor_one(&loc, &annotation) {
            Outcome::Anchored {
                partition,
                quote_matches,
                ..
            } => {
                assert_eq!(partition.quote, "uno dos");
                assert!(!quote_matches);
            }
            other => panic!("expected anchored, got {other:?}"),
        }
    }

    #[test]
    fn serializes_without_missing_addresses() {
        let annotation = StoredAnnotation {
            id: Uuid::nil(),
            sequence_range: Some("/1/1.0;/1/2.3".into()),
            xpath_range: None,
            quote: "one two".into(),
            note: "n".into(),
        };
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "sequence_range": "/1/1.0;/1/2.3",
                "quote": "one two",
                "note": "n"
            })
        );
        let back: StoredAnnotation = serde_json::from_value(value).unwrap();
        assert_eq!(back, annotation);
    }
}
