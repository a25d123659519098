use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use marginalia_config::Config;
use marginalia_engine::{
    BlockPath, Document, Locator, NodeId, Outcome, SkipRules, TextRange, Trace, WordRange,
    anchor_batch, create, partition_text_range, path_from_node, read_annotations, read_document,
    resolve_path, shrink_wrap, to_markup, write_annotations,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/marginalia/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra diagnostic topics to log, comma separated (walk, words, anchor, ...)
    #[arg(long, global = true, value_delimiter = ',')]
    trace: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the document as markup, followed by every block and its path
    Dump { doc: PathBuf },
    /// Show the addresses and quote a selection would be stored with
    Locate {
        doc: PathBuf,
        #[command(flatten)]
        selection: Selection,
    },
    /// Re-anchor every stored annotation against the document
    Anchor {
        doc: PathBuf,
        /// Annotation store; defaults to `annotations_path` from the config
        annotations: Option<PathBuf>,
    },
    /// Create an annotation from a selection and append it to the store
    Create {
        doc: PathBuf,
        annotations: PathBuf,
        #[command(flatten)]
        selection: Selection,
        note: String,
    },
}

/// Selection endpoints, each a block path plus a character offset into that
/// block's visible text.
#[derive(Args, Debug, Clone)]
struct Selection {
    start_path: String,
    start_offset: usize,
    end_path: String,
    end_offset: usize,
}

/// Engine settings derived from the config file and command line.
struct Settings {
    skip: SkipRules,
    trace: Trace,
    id_anchors: bool,
    annotations_path: Option<PathBuf>,
}

impl Settings {
    fn new(config: Config, extra_topics: &[String]) -> Result<Self> {
        let topics = config.trace.topics.iter().chain(extra_topics);
        let trace = Trace::from_names(topics).context("Invalid trace topic")?;
        Ok(Self {
            skip: SkipRules::new(&config.skip.tags, &config.skip.classes),
            trace,
            id_anchors: config.id_anchors,
            annotations_path: config.annotations_path,
        })
    }

    fn locator<'a>(&'a self, doc: &'a Document) -> Locator<'a> {
        Locator::new(doc, doc.root(), &self.skip)
            .with_trace(self.trace.clone())
            .with_id_anchors(self.id_anchors)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_path, config) = load_config(cli.config.as_deref())?;
    let settings = Settings::new(config, &cli.trace)?;

    let mut logger = env_logger::Builder::from_default_env();
    logger.filter_level(log::LevelFilter::Info);
    if settings.trace != Trace::none() {
        logger.filter_module("marginalia", log::LevelFilter::Debug);
    }
    logger.init();
    log::debug!("Config path: {}", config_path.display());

    match cli.command {
        Command::Dump { doc } => dump(&settings, &doc),
        Command::Locate { doc, selection } => locate(&settings, &doc, &selection),
        Command::Anchor { doc, annotations } => {
            let store = annotations
                .or_else(|| settings.annotations_path.clone())
                .ok_or_else(|| {
                    anyhow!(
                        "No annotation store given and no annotations_path in {}",
                        config_path.display()
                    )
                })?;
            anchor(&settings, &doc, &store)
        }
        Command::Create {
            doc,
            annotations,
            selection,
            note,
        } => create_annotation(&settings, &doc, &annotations, &selection, &note),
    }
}

/// Loads the config from `explicit`, or from the default location. A missing
/// file gives the defaults.
fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, Config)> {
    let (config_path, config) = match explicit {
        Some(path) => (path.to_path_buf(), Config::load_from_path(path)?),
        None => (Config::config_path(), Config::load()?),
    };
    Ok((config_path, config.unwrap_or_default()))
}

fn dump(settings: &Settings, path: &Path) -> Result<()> {
    let doc = read_document(path)?;
    let loc = settings.locator(&doc);
    println!("{}", to_markup(&doc, doc.root()));
    println!();
    for (block, path) in blocks(&loc) {
        let tag = doc.tag(block).unwrap_or_default();
        let text = doc.text_content(block);
        println!("{path:<12} {tag:<10} {}", text.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    Ok(())
}

/// Every visible breaking element under the root, with its block path.
fn blocks(loc: &Locator<'_>) -> Vec<(NodeId, BlockPath)> {
    let doc = loc.doc();
    let mut out = Vec::new();
    let mut stack = vec![loc.root()];
    while let Some(node) = stack.pop() {
        if loc.is_skipped(node) {
            continue;
        }
        if node != loc.root()
            && loc.is_breaking(node)
            && let Some(path) = path_from_node(loc, node)
        {
            out.push((node, path));
        }
        let children: Vec<_> = doc.children(node).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

fn locate(settings: &Settings, path: &Path, selection: &Selection) -> Result<()> {
    let doc = read_document(path)?;
    let loc = settings.locator(&doc);
    let range = shrink_wrap(&loc, &text_range(&loc, selection)?)?;
    let words = WordRange::from_text_range(&loc, &range)?;
    println!("sequence: {}", words.to_sequence_range(&loc)?);
    println!("xpath:    {}", words.to_xpath_range(&loc)?);
    println!("quote:    {}", partition_text_range(&loc, &range).quote);
    Ok(())
}

fn anchor(settings: &Settings, path: &Path, store: &Path) -> Result<()> {
    let doc = read_document(path)?;
    let loc = settings.locator(&doc);
    let annotations = read_annotations(store)
        .with_context(|| format!("Failed to read annotations from {}", store.display()))?;

    for report in anchor_batch(&loc, &annotations) {
        match report.outcome {
            Outcome::Anchored {
                sequence,
                partition,
                quote_matches,
                ..
            } => {
                let changed = if quote_matches { "" } else { " (text changed)" };
                println!("{}  {sequence}  {}{changed}", report.id, partition.quote);
            }
            Outcome::Lost { quote } => println!("{}  lost  {quote}", report.id),
            Outcome::Corrupt(err) => println!("{}  corrupt  {err}", report.id),
        }
    }
    Ok(())
}

fn create_annotation(
    settings: &Settings,
    path: &Path,
    store: &Path,
    selection: &Selection,
    note: &str,
) -> Result<()> {
    let doc = read_document(path)?;
    let loc = settings.locator(&doc);
    let annotation = create(&loc, &text_range(&loc, selection)?, note)?;

    let mut annotations = read_annotations(store)?;
    println!("{}", annotation.id);
    annotations.push(annotation);
    write_annotations(store, &annotations)?;
    Ok(())
}

fn text_range(loc: &Locator<'_>, selection: &Selection) -> Result<TextRange> {
    let start = endpoint(loc, &selection.start_path, selection.start_offset)?;
    let end = endpoint(loc, &selection.end_path, selection.end_offset)?;
    Ok(TextRange::new(start, end))
}

fn endpoint(
    loc: &Locator<'_>,
    path: &str,
    offset: usize,
) -> Result<marginalia_engine::Position> {
    let block_path: BlockPath = path.parse()?;
    let Some(block) = resolve_path(loc, &block_path) else {
        bail!("No block at {path}");
    };
    loc.text_position(block, offset)
        .ok_or_else(|| anyhow!("Offset {offset} is past the text of block {path}"))
}
