use marginalia_engine::{
    Document, Locator, NoSkip, Outcome, Position, SkipRules, TextRange, anchor_batch, create,
    load_markdown, load_xml, read_annotations, read_document, write_annotations,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixture_path(name: &str) -> std::path::PathBuf {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")).into()
}

fn fixture_source(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

fn text_node(loc: &Locator<'_>, text: &str) -> marginalia_engine::NodeId {
    loc.text_nodes(loc.root())
        .into_iter()
        .find(|&n| loc.doc().text(n) == Some(text))
        .unwrap()
}

/// Selects "margins of books." in the intro paragraph, with a trailing
/// space thrown in for shrink-wrapping to remove.
fn select_margins(loc: &Locator<'_>) -> TextRange {
    let start = text_node(loc, "margins");
    let end = text_node(loc, " of books.");
    TextRange::new(Position::new(start, 0), Position::new(end, 10))
}

#[test]
fn annotations_survive_a_store_round_trip() {
    let doc = read_document(&fixture_path("essay.xhtml")).unwrap();
    let rules = SkipRules::default().with_class("marker");
    let loc = Locator::new(&doc, doc.root(), &rules).with_id_anchors(true);

    let annotation = create(&loc, &select_margins(&loc), "marginal pun").unwrap();
    assert_eq!(annotation.sequence_range.as_deref(), Some("/2/7.0;/2/9.6"));
    assert_eq!(
        annotation.xpath_range.as_deref(),
        Some("//*[@id='intro']/word(7)/char(0);//*[@id='intro']/word(9)/char(6)")
    );
    assert_eq!(annotation.quote, "margins of books.");

    let dir = TempDir::new().unwrap();
    let store = dir.path().join("annotations.json");
    write_annotations(&store, std::slice::from_ref(&annotation)).unwrap();
    let stored = read_annotations(&store).unwrap();
    assert_eq!(stored, vec![annotation.clone()]);

    let reports = anchor_batch(&loc, &stored);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, annotation.id);
    match &reports[0].outcome {
        Outcome::Anchored {
            partition,
            quote_matches,
            ..
        } => {
            assert!(quote_matches);
            assert_eq!(partition.ranges.len(), 2);
        }
        other => panic!("expected anchored, got {other:?}"),
    }
}

#[test]
fn xpath_with_id_rescues_annotation_after_insertion() {
    let original = load_xml(&fixture_source("essay.xhtml")).unwrap();
    let loc = Locator::new(&original, original.root(), &NoSkip).with_id_anchors(true);
    let annotation = create(&loc, &select_margins(&loc), "").unwrap();

    // A new paragraph ahead of the intro shifts every block path by one.
    let edited_source =
        fixture_source("essay.xhtml").replace("<p id=\"intro\">", "<p>Preface.</p><p id=\"intro\">");
    let edited = load_xml(&edited_source).unwrap();
    let loc = Locator::new(&edited, edited.root(), &NoSkip).with_id_anchors(true);

    let reports = anchor_batch(&loc, &[annotation]);
    match &reports[0].outcome {
        Outcome::Anchored {
            sequence,
            partition,
            quote_matches,
            ..
        } => {
            assert_eq!(sequence.to_string(), "/3/7.0;/3/9.6");
            assert_eq!(partition.quote, "margins of books.");
            assert!(quote_matches);
        }
        other => panic!("expected anchored, got {other:?}"),
    }
}

#[test]
fn markdown_and_xhtml_renditions_quote_alike() {
    let xhtml = load_xml(&fixture_source("essay.xhtml")).unwrap();
    let markdown = load_markdown(&fixture_source("essay.md"));
    let rules = SkipRules::default().with_class("marker");

    let quote_of = |doc: &Document, from: &str, to: &str, to_offset: usize| {
        let loc = Locator::new(doc, doc.root(), &rules);
        let start = text_node(&loc, from);
        let end = text_node(&loc, to);
        let range = TextRange::new(Position::new(start, 0), Position::new(end, to_offset));
        create(&loc, &range, "").unwrap().quote
    };

    for (from, to, offset) in [
        ("margins", " of books.", 10),
        ("pencil ", "nail", 4),
        ("ink", "pencil ", 6),
    ] {
        assert_eq!(
            quote_of(&xhtml, from, to, offset),
            quote_of(&markdown, from, to, offset)
        );
    }
    assert_eq!(quote_of(&markdown, "ink", "pencil ", 6), "ink pencil");
}

#[test]
fn mixed_batch_reports_every_annotation() {
    let doc = load_markdown(&fixture_source("essay.md"));
    let loc = Locator::new(&doc, doc.root(), &NoSkip);

    let later = create(&loc, &TextRange::select_contents(&doc, text_node(&loc, "ink")), "").unwrap();
    let earlier = create(
        &loc,
        &TextRange::select_contents(&doc, text_node(&loc, "History")),
        "",
    )
    .unwrap();
    let mut corrupt = earlier.clone();
    corrupt.id = uuid::Uuid::new_v4();
    corrupt.sequence_range = Some("/x/1.0".into());

    let reports = anchor_batch(&loc, &[later.clone(), corrupt.clone(), earlier.clone()]);
    let ids: Vec<_> = reports.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id, corrupt.id]);
    assert!(matches!(reports[2].outcome, Outcome::Corrupt(_)));
}

#[test]
fn blocks_inside_inline_wrappers_anchor_by_sequence() {
    let doc = load_xml(r#"<div><p>x</p><span><p id="t">y z</p></span></div>"#).unwrap();
    let loc = Locator::new(&doc, doc.root(), &NoSkip);
    let text = text_node(&loc, "y z");

    let mut annotation = create(&loc, &TextRange::select_contents(&doc, text), "").unwrap();
    assert_eq!(annotation.sequence_range.as_deref(), Some("/2/1.0;/2/2.1"));
    annotation.xpath_range = None;

    let reports = anchor_batch(&loc, &[annotation]);
    match &reports[0].outcome {
        Outcome::Anchored { partition, .. } => assert_eq!(partition.quote, "y z"),
        other => panic!("expected anchored, got {other:?}"),
    }
}
