//! Command-line interface for folio.
//!
//! Provides commands for listing and looking up content, tag queries,
//! fuzzy search, an interactive search palette, content checks and a watch
//! mode that rebuilds on file changes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::core::{ContentStore, ContentWatcher, WatchConfig};
use crate::domain::{ContentItem, ContentKind};
use crate::library::{Severity, SourceKind};
use crate::search::{SearchHit, SearchService};

pub mod palette;

/// folio - content repository and fuzzy search
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Content root (overrides configuration)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    /// Content source (overrides configuration)
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List content, newest first
    List {
        /// Only this kind (loader order)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Only published items
        #[arg(short, long)]
        published: bool,
    },

    /// Show one item
    Show {
        /// Content kind
        #[arg(value_enum)]
        kind: KindArg,

        /// Item slug
        slug: String,

        /// Print the raw body
        #[arg(short, long)]
        full: bool,
    },

    /// Most recent published items
    Recent {
        /// Maximum number of items to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List every tag in use
    Tags,

    /// Published items with a tag
    Tag {
        /// Tag (exact match)
        tag: String,
    },

    /// Fuzzy search across published content
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (defaults to configuration)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Interactive search: one query per input line
    Palette,

    /// Load all content and report skipped files
    Check,

    /// Watch the content root and rebuild on change
    Watch,

    /// Show resolved configuration (debug)
    Config,
}

/// Content kind for CLI (maps to ContentKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Thoughts,
    Blog,
    Projects,
    Talks,
    Now,
}

impl From<KindArg> for ContentKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Thoughts => ContentKind::Thoughts,
            KindArg::Blog => ContentKind::Blog,
            KindArg::Projects => ContentKind::Projects,
            KindArg::Talks => ContentKind::Talks,
            KindArg::Now => ContentKind::Now,
        }
    }
}

/// Content source for CLI (maps to SourceKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// Markdown files under the content root
    Files,

    /// Built-in sample dataset
    Static,
}

impl From<SourceArg> for SourceKind {
    fn from(s: SourceArg) -> Self {
        match s {
            SourceArg::Files => SourceKind::Files,
            SourceArg::Static => SourceKind::Static,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = self.resolved_config()?;
        let json = self.json;
        let open = || Arc::new(ContentStore::from_config(&config));

        match self.command {
            Commands::List { kind, published } => list_content(&open(), kind.map(Into::into), published, json),
            Commands::Show { kind, slug, full } => show_item(&open(), kind.into(), &slug, full, json),
            Commands::Recent { limit } => {
                let snapshot = open().snapshot();
                let items = snapshot.repository.get_recent(limit);
                print_items(&items, json)
            }
            Commands::Tags => list_tags(&open(), json),
            Commands::Tag { tag } => {
                let snapshot = open().snapshot();
                let items = snapshot.repository.get_by_tag(&tag);
                print_items(&items, json)
            }
            Commands::Search { query, limit } => search_content(open(), &query, limit, json),
            Commands::Palette => palette::run(open(), json).await,
            Commands::Check => check_content(&open(), json),
            Commands::Watch => watch_content(open(), &config).await,
            Commands::Config => show_config(&config),
        }
    }

    /// Global configuration with command-line overrides applied
    fn resolved_config(&self) -> Result<ResolvedConfig> {
        let mut config = crate::config::config()?.clone();
        if let Some(ref root) = self.content {
            config.content_root = root.clone();
        }
        if let Some(source) = self.source {
            config.source = source.into();
        }
        Ok(config)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to encode JSON output")?;
    println!("{}", out);
    Ok(())
}

/// Print items as a table (or JSON)
fn print_items(items: &[&Arc<ContentItem>], json: bool) -> Result<()> {
    if json {
        return print_json(items);
    }

    if items.is_empty() {
        println!("No content found");
        return Ok(());
    }

    println!("{:<10} {:<36} {:<12} {}", "KIND", "SLUG", "DATE", "TITLE");
    println!("{}", "-".repeat(90));

    for item in items {
        let draft = if item.published { "" } else { " (draft)" };
        println!(
            "{:<10} {:<36} {:<12} {}{}",
            item.kind, item.slug, item.date, item.title, draft
        );
    }

    Ok(())
}

/// List all items or one kind
fn list_content(store: &ContentStore, kind: Option<ContentKind>, published: bool, json: bool) -> Result<()> {
    let snapshot = store.snapshot();
    let repo = &snapshot.repository;

    let items: Vec<&Arc<ContentItem>> = match (kind, published) {
        (Some(kind), true) => repo.get_published(kind),
        (Some(kind), false) => repo.get_by_kind(kind).iter().collect(),
        (None, true) => repo.get_featured(None),
        (None, false) => repo.get_all().iter().collect(),
    };

    print_items(&items, json)
}

/// Show a single item
fn show_item(store: &ContentStore, kind: ContentKind, slug: &str, full: bool, json: bool) -> Result<()> {
    let snapshot = store.snapshot();
    let Some(item) = snapshot.repository.get_by_slug(kind, slug) else {
        anyhow::bail!("Not found: {}/{}", kind, slug);
    };

    if json {
        return print_json(item);
    }

    println!("Title: {}", item.title);
    println!("Kind: {}", item.kind);
    println!("Slug: {}", item.slug);
    println!("Date: {}", item.date);
    println!("Published: {}", item.published);
    println!("Reading time: {}", item.reading_time);
    if let Some(ref description) = item.description {
        println!("Description: {}", description);
    }
    if let Some(ref category) = item.category {
        println!("Category: {}", category);
    }
    if !item.tags.is_empty() {
        println!("Tags: {}", item.tags.join(", "));
    }
    if !item.tech_stack.is_empty() {
        println!("Tech stack: {}", item.tech_stack.join(", "));
    }
    let links = [
        ("Live", &item.live_url),
        ("GitHub", &item.github_url),
        ("Slides", &item.slides_url),
        ("Video", &item.video_url),
    ];
    for (label, url) in links {
        if let Some(url) = url {
            println!("{}: {}", label, url);
        }
    }
    if let Some(ref event) = item.event {
        match item.location {
            Some(ref location) => println!("Event: {} ({})", event, location),
            None => println!("Event: {}", event),
        }
    }
    if let Some(ref path) = item.source_path {
        println!("Source: {}", path.display());
    }

    if full {
        // Body goes to the renderer untouched
        println!("\n{}", item.content);
    }

    Ok(())
}

/// List all tags
fn list_tags(store: &ContentStore, json: bool) -> Result<()> {
    let tags = store.snapshot().repository.get_all_tags();

    if json {
        return print_json(&tags);
    }

    if tags.is_empty() {
        println!("No tags found");
    }
    for tag in tags {
        println!("{}", tag);
    }
    Ok(())
}

/// Run one search query
fn search_content(store: Arc<ContentStore>, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let mut service = SearchService::new(store);
    if let Some(limit) = limit {
        service = service.with_limit(limit);
    }

    let response = service.query(query);

    if json {
        return print_json(&response);
    }

    if response.is_idle() {
        println!("Empty query");
        return Ok(());
    }

    let hits = response.hits();
    if hits.is_empty() {
        println!("No results found for \"{}\"", query);
        return Ok(());
    }

    for hit in hits {
        print_hit(hit);
    }

    Ok(())
}

/// Render one search hit
pub(crate) fn print_hit(hit: &SearchHit) {
    let item = &hit.item;
    println!("[{}] {}  {}", item.kind, item.date, item.title);
    if let Some(ref description) = item.description {
        println!("    {}", description);
    }
    if !item.tags.is_empty() {
        let shown: Vec<&str> = item.tags.iter().take(3).map(String::as_str).collect();
        println!("    #{}", shown.join(" #"));
    }
    println!("    /{}/{}  (score {:.4})", item.kind, item.slug, hit.score);
}

#[derive(Serialize)]
struct Diagnostic {
    severity: &'static str,
    message: String,
}

/// Load everything and report problems
fn check_content(store: &ContentStore, json: bool) -> Result<()> {
    let snapshot = store.snapshot();

    let diagnostics: Vec<Diagnostic> = snapshot
        .diagnostics
        .iter()
        .map(|d| Diagnostic {
            severity: match d.severity() {
                Severity::Notice => "notice",
                Severity::Error => "error",
            },
            message: d.to_string(),
        })
        .collect();

    if json {
        print_json(&diagnostics)?;
    } else {
        for d in &diagnostics {
            println!("{:<7} {}", d.severity, d.message);
        }
        println!(
            "{} items loaded from {} source, {} indexed for search",
            snapshot.repository.len(),
            store.source_name(),
            snapshot.index.len()
        );
    }

    let errors = snapshot.errors().count();
    if errors > 0 {
        anyhow::bail!("{} content file(s) were skipped", errors);
    }
    Ok(())
}

/// Rebuild on change until Ctrl-C
async fn watch_content(store: Arc<ContentStore>, config: &ResolvedConfig) -> Result<()> {
    if config.source != SourceKind::Files {
        anyhow::bail!("Watch mode needs the file-backed source (current: {})", config.source);
    }

    let watcher = ContentWatcher::with_config(WatchConfig {
        root: config.content_root.clone(),
        debounce: config.watch_debounce,
        extensions: config.loader.extensions.clone(),
    });

    let (mut events, handle) = watcher.watch(Arc::clone(&store)).await?;
    eprintln!(
        "[Watching {} at generation {}; Ctrl-C to stop]",
        config.content_root.display(),
        store.snapshot().generation
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                let status = if event.changed { "changed" } else { "unchanged" };
                println!(
                    "generation {}: {} items, {} skipped ({})",
                    event.generation, event.items, event.errors, status
                );
            }
        }
    }

    handle.stop().await
}

/// Show resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("Config file: {}", match config.config_file {
        Some(ref p) => p.display().to_string(),
        None => "(none)".to_string(),
    });
    let files = config.file_source();
    println!("Content root: {}", files.root().display());
    println!("Source: {}", config.source);
    println!("Extensions: {}", files.options().extensions.join(", "));
    println!("Ignore: {}", files.options().ignore.join(", "));
    for kind in ContentKind::ALL {
        println!("  {:<9} {}", kind.as_str(), files.kind_dir(kind).display());
    }
    println!(
        "Search: threshold {}, limit {}, min token length {}",
        config.search.threshold, config.search.limit, config.search.min_token_len
    );
    println!("Watch debounce: {}ms", config.watch_debounce.as_millis());
    Ok(())
}
