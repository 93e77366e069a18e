//! Engram CLI
//!
//! Command-line interface for a Cortex knowledge base: files under
//! `neuronas/` are the source of truth, `.activations/` holds derived
//! indices, `sync` keeps the two coherent.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use engram_core::error::{EngramError, Result, UserError};
use engram_core::model::{
    ArtifactContext, Connection, ConnectionType, Context, Cortex, CortexType, Neurona, NeuronaType,
};
use engram_core::{query, search, store, sync, uri, validate};

/// Engram - local knowledge engine CLI
#[derive(Parser)]
#[command(name = "engram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage a Cortex: a typed, weighted knowledge graph of Markdown notes")]
struct Cli {
    /// Explicit cortex directory. Defaults to discovery from the CWD.
    #[arg(long, global = true)]
    cortex: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new cortex directory
    Init {
        name: String,
        #[arg(long, default_value = "alm")]
        r#type: String,
        #[arg(long, default_value = "en")]
        language: String,
        #[arg(long)]
        force: bool,
    },
    /// Create a new Neurona
    New { r#type: String, title: String },
    /// Show a Neurona by id or `neurona://` URI
    Show {
        id: String,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        no_body: bool,
        #[arg(long)]
        no_connections: bool,
    },
    /// Link two Neuronas with a typed, weighted connection
    Link {
        src: String,
        tgt: String,
        conn_type: String,
        #[arg(long, default_value_t = engram_core::model::DEFAULT_WEIGHT)]
        weight: u8,
    },
    /// Delete a Neurona
    Delete { id: String },
    /// Update editable fields on a Neurona
    Update {
        id: String,
        #[arg(long = "set")]
        set: String,
    },
    /// Rebuild derived indices from the Neurona files
    Sync {
        #[arg(long)]
        force: bool,
    },
    /// Summarize the cortex by type/status
    Status {
        #[arg(long = "type")]
        type_filter: Option<String>,
        #[arg(long = "status")]
        status_filter: Option<String>,
    },
    /// Walk the graph from a Neurona
    Trace {
        id: String,
        #[arg(long)]
        up: bool,
        #[arg(long)]
        down: bool,
        #[arg(long)]
        both: bool,
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Report everything transitively downstream of a Neurona
    Impact { id: String },
    /// Run an EQL query
    Query {
        eql: String,
        #[arg(long, default_value = "filter")]
        mode: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Link a source file to a requirement as an implementing artifact
    LinkArtifact {
        src_file: String,
        requirement_id: String,
        #[arg(long)]
        runtime: Option<String>,
    },
    /// Report requirement completion against issues/artifacts
    ReleaseStatus,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> std::process::ExitCode {
    init_logging();
    let cli = Cli::parse();
    let cortex_override = cli.cortex.clone();
    match dispatch(cli.command, cortex_override) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            if let Some(hint) = e.remediation() {
                eprintln!("  {}", hint.dimmed());
            }
            std::process::ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn dispatch(command: Commands, cortex_override: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Init { name, r#type, language, force } => run_init(&name, &r#type, &language, force),
        Commands::New { r#type, title } => run_new(&resolve_cortex(cortex_override)?, &r#type, &title),
        Commands::Show { id, json, no_body, no_connections } => {
            run_show(&resolve_cortex(cortex_override)?, &id, json, no_body, no_connections)
        }
        Commands::Link { src, tgt, conn_type, weight } => {
            run_link(&resolve_cortex(cortex_override)?, &src, &tgt, &conn_type, weight)
        }
        Commands::Delete { id } => run_delete(&resolve_cortex(cortex_override)?, &id),
        Commands::Update { id, set } => run_update(&resolve_cortex(cortex_override)?, &id, &set),
        Commands::Sync { force } => run_sync(&resolve_cortex(cortex_override)?, force),
        Commands::Status { type_filter, status_filter } => {
            run_status(&resolve_cortex(cortex_override)?, type_filter.as_deref(), status_filter.as_deref())
        }
        Commands::Trace { id, up, down, both, depth } => {
            run_trace(&resolve_cortex(cortex_override)?, &id, up, down, both, depth)
        }
        Commands::Impact { id } => run_impact(&resolve_cortex(cortex_override)?, &id),
        Commands::Query { eql, mode, limit, json } => {
            run_query(&resolve_cortex(cortex_override)?, &eql, &mode, limit, json)
        }
        Commands::LinkArtifact { src_file, requirement_id, runtime } => {
            run_link_artifact(&resolve_cortex(cortex_override)?, &src_file, &requirement_id, runtime.as_deref())
        }
        Commands::ReleaseStatus => run_release_status(&resolve_cortex(cortex_override)?),
    }
}

/// Resolve the active cortex directory: explicit `--cortex` wins, otherwise
/// discovery runs from the current working directory.
fn resolve_cortex(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|e| EngramError::io(".", e))?;
    uri::find_cortex_dir(&cwd)
}

fn neuronas_dir(cortex: &Path) -> PathBuf {
    cortex.join("neuronas")
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn run_init(name: &str, type_str: &str, language: &str, force: bool) -> Result<()> {
    let cortex_type = CortexType::parse_name(type_str)
        .ok_or_else(|| EngramError::User(UserError::InvalidFlagValue {
            flag: "--type".to_string(),
            value: type_str.to_string(),
        }))?;

    let dir = PathBuf::from(name);
    if dir.join("cortex.json").exists() && !force {
        return Err(EngramError::User(UserError::InvalidFlagValue {
            flag: "name".to_string(),
            value: format!("{name} already initialized; pass --force to reinitialize"),
        }));
    }

    std::fs::create_dir_all(dir.join("neuronas")).map_err(|e| EngramError::io(&dir, e))?;
    std::fs::create_dir_all(dir.join(".activations/cache")).map_err(|e| EngramError::io(&dir, e))?;

    let mut cortex = Cortex::new(name, name, cortex_type);
    cortex.capabilities.default_language = language.to_string();
    let json = serde_json::to_string_pretty(&cortex)?;
    std::fs::write(dir.join("cortex.json"), json).map_err(|e| EngramError::io(&dir, e))?;

    println!("{} cortex {} at {}", "created".green().bold(), name, dir.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

fn type_prefix(t: NeuronaType) -> &'static str {
    match t {
        NeuronaType::Concept => "concept",
        NeuronaType::Reference => "ref",
        NeuronaType::Artifact => "artifact",
        NeuronaType::StateMachine => "sm",
        NeuronaType::Lesson => "lesson",
        NeuronaType::Requirement => "req",
        NeuronaType::TestCase => "test",
        NeuronaType::Issue => "issue",
        NeuronaType::Feature => "feature",
        _ => unreachable!("NeuronaType is exhaustively listed in NeuronaType::ALL"),
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_hyphen = true;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// The type-appropriate default context a fresh Neurona starts with — e.g. a
/// new requirement starts `status: draft`, an issue `status: open`.
fn default_context_for(t: NeuronaType) -> Context {
    match t {
        NeuronaType::Requirement => Context::Requirement(Default::default()),
        NeuronaType::Issue => Context::Issue(Default::default()),
        NeuronaType::TestCase => Context::TestCase(Default::default()),
        NeuronaType::Artifact => Context::Artifact(Default::default()),
        NeuronaType::Concept => Context::Concept(Default::default()),
        NeuronaType::Reference => Context::Reference(Default::default()),
        NeuronaType::Lesson => Context::Lesson(Default::default()),
        NeuronaType::StateMachine => Context::StateMachine(Default::default()),
        NeuronaType::Feature => Context::None,
        _ => unreachable!("NeuronaType is exhaustively listed in NeuronaType::ALL"),
    }
}

fn run_new(cortex: &Path, type_str: &str, title: &str) -> Result<()> {
    let neurona_type = NeuronaType::parse_name(type_str);
    let id = format!("{}.{}", type_prefix(neurona_type), slugify(title));
    let dir = neuronas_dir(cortex);
    let path = dir.join(format!("{id}.md"));
    if path.exists() {
        return Err(EngramError::User(UserError::InvalidFlagValue {
            flag: "title".to_string(),
            value: format!("{id} already exists"),
        }));
    }

    let mut neurona = Neurona::new(id.clone(), title, neurona_type);
    neurona.context = default_context_for(neurona_type);
    store::write_neurona(&neurona, &path, false)?;
    println!("{} {} at {}", "created".green().bold(), id, path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn load_by_id_or_uri(cortex: &Path, id_or_uri: &str) -> Result<Neurona> {
    if let Ok(parsed) = uri::NeuronaUri::parse(id_or_uri) {
        let path = uri::resolve_uri(&parsed, cortex)?;
        return store::read_neurona(&path);
    }
    let path = store::find_neurona_path(&neuronas_dir(cortex), id_or_uri)?;
    store::read_neurona(&path)
}

fn run_show(cortex: &Path, id: &str, json: bool, no_body: bool, no_connections: bool) -> Result<()> {
    let mut neurona = load_by_id_or_uri(cortex, id)?;
    if no_connections {
        neurona.connections.clear();
    }
    if no_body {
        neurona.body.clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&neurona)?);
        return Ok(());
    }

    println!("{} {}", neurona.id.cyan().bold(), neurona.title);
    println!("  type: {}  updated: {}  language: {}", neurona.r#type, neurona.updated, neurona.language);
    if !neurona.tags.is_empty() {
        println!("  tags: {}", neurona.tags.join(", "));
    }
    if let Some(status) = neurona.context.status() {
        println!("  status: {status}");
    }
    if !neurona.connections.is_empty() {
        println!("  connections:");
        for (group, edges) in &neurona.connections {
            for edge in edges {
                println!("    {group} -> {} (weight {})", edge.target_id, edge.weight);
            }
        }
    }
    if !no_body && !neurona.body.trim().is_empty() {
        println!();
        println!("{}", neurona.body.trim());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// link
// ---------------------------------------------------------------------------

fn run_link(cortex: &Path, src_id: &str, tgt_id: &str, conn_type_str: &str, weight: u8) -> Result<()> {
    let conn_type = ConnectionType::parse_name(conn_type_str).ok_or_else(|| {
        EngramError::User(UserError::InvalidFlagValue {
            flag: "conn-type".to_string(),
            value: conn_type_str.to_string(),
        })
    })?;

    let dir = neuronas_dir(cortex);
    let src_path = store::find_neurona_path(&dir, src_id)?;
    let mut src = store::read_neurona(&src_path)?;
    let tgt = load_by_id_or_uri(cortex, tgt_id)?;

    if !validate::is_allowed(src.r#type, tgt.r#type, conn_type) {
        return Err(EngramError::Validation(engram_core::error::ValidationError::ConnectionTypeNotAllowed {
            from_type: src.r#type.as_str().to_string(),
            to_type: tgt.r#type.as_str().to_string(),
            conn_type: conn_type.as_str().to_string(),
        }));
    }

    let group = src.connections.entry(conn_type.as_str().to_string()).or_default();
    if let Some(max) = validate::max_cardinality(src.r#type, tgt.r#type, conn_type) {
        if group.len() >= max {
            return Err(EngramError::Validation(engram_core::error::ValidationError::CardinalityExceeded {
                from: src.id.clone(),
                to_type: tgt.r#type.as_str().to_string(),
                max,
            }));
        }
    }
    group.push(Connection::new(tgt.id.clone(), conn_type, weight));
    src.touch();
    store::write_neurona(&src, &src_path, true)?;

    println!(
        "{} {} --{}--> {} (weight {weight})",
        "linked".green().bold(),
        src.id,
        conn_type.as_str(),
        tgt.id
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

fn run_delete(cortex: &Path, id: &str) -> Result<()> {
    let path = store::find_neurona_path(&neuronas_dir(cortex), id)?;
    std::fs::remove_file(&path).map_err(|e| EngramError::io(&path, e))?;
    println!("{} {id} (run `engram sync` to drop its edges from the indices)", "deleted".yellow().bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

fn run_update(cortex: &Path, id: &str, set: &str) -> Result<()> {
    let (field, value) = set.split_once('=').ok_or_else(|| {
        EngramError::User(UserError::InvalidFlagValue { flag: "--set".to_string(), value: set.to_string() })
    })?;

    let dir = neuronas_dir(cortex);
    let path = store::find_neurona_path(&dir, id)?;
    let mut neurona = store::read_neurona(&path)?;

    match field {
        "title" => neurona.title = value.to_string(),
        "type" => neurona.r#type = NeuronaType::parse_name(value),
        "language" => neurona.language = value.to_string(),
        "hash" => neurona.hash = Some(value.to_string()),
        "tags" => neurona.tags = value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
        "context.status" => {
            if let Some(kind) = validate::kind_for(neurona.r#type) {
                validate::transition(kind, &neurona.id, neurona.context.status().unwrap_or(""), value)?;
            }
            neurona.context.set_status(value);
        }
        other => {
            return Err(EngramError::User(UserError::UnknownFlag(format!("--set {other}"))));
        }
    }
    neurona.touch();
    store::write_neurona(&neurona, &path, true)?;
    println!("{} {id}: {field} = {value}", "updated".green().bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

fn run_sync(cortex: &Path, force: bool) -> Result<()> {
    let report = sync::run(cortex, sync::SyncConfig { force }, &|| false)?;
    println!("{} {} neuronas", "synced".green().bold(), report.neurona_count);
    for stage in &report.stages {
        println!("  {:<8} {:>6.1?}  {}", stage.name, stage.duration, stage.detail);
    }
    for warning in &report.warnings {
        println!("  {} {warning}", "warn:".yellow());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

fn run_status(cortex: &Path, type_filter: Option<&str>, status_filter: Option<&str>) -> Result<()> {
    let neuronas = store::scan_neuronas(&neuronas_dir(cortex))?;
    let wanted_type = type_filter.map(NeuronaType::parse_name);
    let filtered: Vec<&Neurona> = neuronas
        .iter()
        .filter(|n| wanted_type.map(|t| n.r#type.as_str() == t.as_str()).unwrap_or(true))
        .filter(|n| status_filter.map(|s| n.context.status() == Some(s)).unwrap_or(true))
        .collect();

    println!("{} {} / {} neuronas", "status:".cyan().bold(), filtered.len(), neuronas.len());
    let mut by_type: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for n in &filtered {
        *by_type.entry(n.r#type.as_str()).or_default() += 1;
    }
    for (t, count) in by_type {
        println!("  {t}: {count}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// trace / impact
// ---------------------------------------------------------------------------

fn build_ephemeral_graph(cortex: &Path) -> Result<(Vec<Neurona>, engram_core::graph::Graph)> {
    let neuronas = store::scan_neuronas(&neuronas_dir(cortex))?;
    let mut g = engram_core::graph::Graph::new();
    for n in &neuronas {
        for conn in n.all_connections() {
            g.add_edge(&n.id, &conn.target_id, conn.weight);
        }
    }
    Ok((neuronas, g))
}

/// Reverse BFS over incoming edges — `Graph` only exposes a forward `bfs`,
/// so "trace down"/"impact" walk `get_incoming` directly.
fn bfs_reverse(graph: &engram_core::graph::Graph, start: &str, max_depth: usize) -> Vec<(String, usize)> {
    use std::collections::{HashSet, VecDeque};
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let mut out = Vec::new();
    queue.push_back((start.to_string(), 0));
    visited.insert(start.to_string());
    while let Some((id, level)) = queue.pop_front() {
        out.push((id.clone(), level));
        if level >= max_depth {
            continue;
        }
        for edge in graph.get_incoming(&id) {
            if visited.insert(edge.target.clone()) {
                queue.push_back((edge.target.clone(), level + 1));
            }
        }
    }
    out
}

/// Connections point from the dependent to the thing it depends on (a test
/// `validates` its requirement, an artifact `implements` its requirement),
/// so "up" follows outgoing edges toward those depended-on Neuronas and
/// "down" follows incoming edges toward the dependents.
fn run_trace(cortex: &Path, id: &str, up: bool, down: bool, both: bool, depth: Option<usize>) -> Result<()> {
    let (_, graph) = build_ephemeral_graph(cortex)?;
    let max_depth = depth.unwrap_or(usize::MAX);
    let direction_both = both || (!up && !down);

    if up || direction_both {
        println!("{}", "up:".cyan().bold());
        for node in graph.bfs(id) {
            if node.level <= max_depth {
                println!("  {} (lvl {})", node.id, node.level);
            }
        }
    }
    if down || direction_both {
        println!("{}", "down:".cyan().bold());
        for (nid, level) in bfs_reverse(&graph, id, max_depth) {
            println!("  {nid} (lvl {level})");
        }
    }
    Ok(())
}

/// Everything transitively dependent on `id` — what would need attention if
/// `id` changed. Since a dependent Neurona's connection points at the thing
/// it depends on, "dependent on `id`" means everything that can reach `id`
/// by following edges, i.e. an unbounded reverse BFS from `id`.
fn run_impact(cortex: &Path, id: &str) -> Result<()> {
    let (neuronas, graph) = build_ephemeral_graph(cortex)?;
    let by_id: std::collections::HashMap<&str, &Neurona> = neuronas.iter().map(|n| (n.id.as_str(), n)).collect();

    let affected = bfs_reverse(&graph, id, usize::MAX);
    println!("{} {} neurona(s) downstream of {id}", "impact:".cyan().bold(), affected.len().saturating_sub(1));
    for (nid, level) in affected.iter().skip(1) {
        let type_name = by_id.get(nid.as_str()).map(|n| n.r#type.as_str()).unwrap_or("?");
        println!("  {nid} ({type_name}, lvl {level})");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// query
// ---------------------------------------------------------------------------

fn run_query(cortex: &Path, eql: &str, mode_str: &str, limit: usize, json: bool) -> Result<()> {
    let mode = match mode_str {
        "filter" => query::QueryMode::Filter,
        "text" => query::QueryMode::Text,
        "vector" => query::QueryMode::Vector,
        "hybrid" => query::QueryMode::Hybrid,
        "activation" => query::QueryMode::Activation,
        other => {
            return Err(EngramError::User(UserError::InvalidFlagValue {
                flag: "--mode".to_string(),
                value: other.to_string(),
            }))
        }
    };

    let neuronas = store::scan_neuronas(&neuronas_dir(cortex))?;

    let mut bm25 = search::Bm25Index::new();
    for n in &neuronas {
        bm25.add_document(&n.id, &n.indexable_text());
    }
    bm25.build();

    let (_, graph) = build_ephemeral_graph(cortex)?;

    // Vector/hybrid/activation modes read `sync`'s persisted indices rather
    // than recomputing embeddings inline; an unsynced cortex just falls back
    // to filter/text results for those modes.
    let vectors = search::VectorIndex::load(&cortex.join(".activations/vectors.bin")).map(|(v, _)| v);
    let glove_path = std::env::var("ENGRAM_GLOVE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| cortex.join(".activations/cache/glove_cache.bin"));
    let glove = engram_core::embeddings::GloveTable::load_cache(&glove_path);

    let config = query::QueryConfig {
        mode,
        eql: Some(eql.to_string()),
        text: Some(eql.to_string()),
        limit,
    };
    let ctx = query::QueryContext {
        neuronas: &neuronas,
        bm25: Some(&bm25),
        vectors: vectors.as_ref(),
        glove: glove.as_ref(),
        graph: Some(&graph),
    };
    let results = query::execute(&config, &ctx)?;

    if json {
        let payload: Vec<_> = results
            .iter()
            .map(|r| serde_json::json!({"id": r.neurona.id, "title": r.neurona.title, "score": r.score}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for r in &results {
        println!("{:>8.3}  {}  {}", r.score, r.neurona.id.cyan(), r.neurona.title);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// link-artifact
// ---------------------------------------------------------------------------

fn run_link_artifact(cortex: &Path, src_file: &str, requirement_id: &str, runtime: Option<&str>) -> Result<()> {
    let dir = neuronas_dir(cortex);
    let id = format!("{}.{}", type_prefix(NeuronaType::Artifact), slugify(src_file));
    let path = dir.join(format!("{id}.md"));

    let mut artifact = if path.exists() {
        store::read_neurona(&path)?
    } else {
        Neurona::new(id.clone(), src_file, NeuronaType::Artifact)
    };
    artifact.context = Context::Artifact(ArtifactContext {
        file_path: src_file.to_string(),
        runtime: runtime.unwrap_or_default().to_string(),
        ..Default::default()
    });

    let requirement = load_by_id_or_uri(cortex, requirement_id)?;
    if !validate::is_allowed(NeuronaType::Artifact, requirement.r#type, ConnectionType::Implements) {
        return Err(EngramError::Validation(engram_core::error::ValidationError::ConnectionTypeNotAllowed {
            from_type: "artifact".to_string(),
            to_type: requirement.r#type.as_str().to_string(),
            conn_type: "implements".to_string(),
        }));
    }
    artifact
        .connections
        .entry(ConnectionType::Implements.as_str().to_string())
        .or_default()
        .push(Connection::new(requirement.id.clone(), ConnectionType::Implements, engram_core::model::DEFAULT_WEIGHT));
    artifact.touch();
    store::write_neurona(&artifact, &path, true)?;

    println!("{} {} implements {}", "linked".green().bold(), artifact.id, requirement.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// release-status
// ---------------------------------------------------------------------------

fn run_release_status(cortex: &Path) -> Result<()> {
    let neuronas = store::scan_neuronas(&neuronas_dir(cortex))?;
    let by_id: std::collections::HashMap<&str, &Neurona> = neuronas.iter().map(|n| (n.id.as_str(), n)).collect();

    let requirements: Vec<&Neurona> = neuronas.iter().filter(|n| n.r#type == NeuronaType::Requirement).collect();
    let total = requirements.len();
    let mut blocked = 0usize;
    let mut implemented = 0usize;
    let mut blockers: Vec<(String, String)> = Vec::new();

    for req in &requirements {
        // A blocker can be declared from either side: the requirement's own
        // `blocked_by` list, or an issue's `blocks` edge pointing at it.
        let mut issue_ids: Vec<String> = req
            .connections
            .get(ConnectionType::BlockedBy.as_str())
            .map(|edges| edges.iter().map(|e| e.target_id.clone()).collect())
            .unwrap_or_default();
        for n in &neuronas {
            if let Some(edges) = n.connections.get(ConnectionType::Blocks.as_str()) {
                if edges.iter().any(|e| e.target_id == req.id) {
                    issue_ids.push(n.id.clone());
                }
            }
        }

        let open_blockers: Vec<&String> = issue_ids
            .iter()
            .filter(|issue_id| {
                by_id
                    .get(issue_id.as_str())
                    .and_then(|issue| issue.context.status())
                    .map(|status| status != "closed")
                    .unwrap_or(false)
            })
            .collect();
        if !open_blockers.is_empty() {
            blocked += 1;
            for issue_id in open_blockers {
                blockers.push((issue_id.clone(), req.id.clone()));
            }
        }

        let is_implemented = neuronas.iter().any(|n| {
            n.r#type == NeuronaType::Artifact
                && n.connections
                    .get(ConnectionType::Implements.as_str())
                    .is_some_and(|edges| edges.iter().any(|e| e.target_id == req.id))
        });
        if is_implemented {
            implemented += 1;
        }
    }

    let completion = if total > 0 { implemented as f64 / total as f64 } else { 1.0 };

    println!("{}", "release status".cyan().bold());
    println!("  requirements.total = {total}");
    println!("  blocked = {blocked}");
    println!("  implemented = {implemented}");
    println!("  completion = {completion:.2}");
    for (issue_id, req_id) in blockers {
        println!("  blocker: {issue_id} blocks {req_id}");
    }
    Ok(())
}
