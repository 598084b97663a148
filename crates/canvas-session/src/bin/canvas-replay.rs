use anyhow::{bail, Context};
use canvas_artifact::{DocumentId, StreamEvent, View};
use canvas_kinds::{builtin_registry, UnavailableRunner};
use canvas_session::{init_tracing, models_by_provider, resolve_model, CanvasConfig};
use canvas_stream::{DocumentStream, StreamReconciler};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("canvas-replay")
        .version(canvas_session::VERSION)
        .about("Replay recorded artifact stream events")
        .arg(
            Arg::new("events")
                .required_unless_present("models")
                .value_parser(value_parser!(PathBuf))
                .help("File with one {\"type\", \"data\"} event per line"),
        )
        .arg(
            Arg::new("document")
                .long("document")
                .default_value("replay")
                .help("Document id the events belong to"),
        )
        .arg(
            Arg::new("terminal")
                .long("terminal")
                .help("Terminal signal to apply after the last event"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("models")
                .long("models")
                .action(ArgAction::SetTrue)
                .help("List the chat model catalog and exit"),
        )
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CanvasConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => CanvasConfig::default(),
    };
    init_tracing(&config.log);

    if matches.get_flag("models") {
        list_models(&config);
        return Ok(());
    }
    replay(&config, &matches)
}

fn list_models(config: &CanvasConfig) {
    let default = resolve_model(&config.default_model);
    for (provider, models) in models_by_provider() {
        println!("{provider}:");
        for model in models {
            let marker = if model.id == default.id { "*" } else { " " };
            println!(" {marker} {} ({}) - {}", model.id, model.name, model.description);
        }
    }
}

fn replay(config: &CanvasConfig, args: &ArgMatches) -> anyhow::Result<()> {
    let Some(path) = args.get_one::<PathBuf>("events") else {
        bail!("missing events file");
    };
    let document_id = args
        .get_one::<String>("document")
        .map_or_else(|| DocumentId::from("replay"), |id| DocumentId::from(id.as_str()));

    let registry = builtin_registry(Arc::new(UnavailableRunner)).context("building built-in registry")?;
    let mut reconciler = StreamReconciler::new(Arc::new(registry), config.reveal.clone());

    let input = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut applied = 0usize;
    for (line_no, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: StreamEvent = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid event", path.display(), line_no + 1))?;
        match reconciler.apply(&document_id, &event) {
            Ok(outcome) => {
                if outcome.is_change() {
                    applied += 1;
                }
            }
            Err(err) => tracing::error!(line = line_no + 1, error = %err, "event rejected"),
        }
    }

    if let Some(signal) = args.get_one::<String>("terminal") {
        reconciler.terminate(&document_id, signal);
    }

    let Some(document) = reconciler.get(&document_id) else {
        bail!("no artifact was opened for document {document_id}");
    };
    tracing::info!(events = applied, "replay finished");

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary(document))?);
    } else {
        print_text(document);
    }
    Ok(())
}

fn summary(document: &DocumentStream) -> serde_json::Value {
    serde_json::json!({
        "state": document.state(),
        "phase": document.phase(),
        "versions": document.versions().len(),
        "view": document.render(),
    })
}

fn print_text(document: &DocumentStream) {
    let state = document.state();
    println!("Document: {}", state.document_id);
    println!("Kind: {}", state.kind);
    println!("Phase: {}", document.phase());
    if !state.title.is_empty() {
        println!("Title: {}", state.title);
    }
    println!("Visible: {}", state.is_visible);
    println!(
        "Versions: {} (viewing {})",
        document.versions().len(),
        state.current_version_index
    );
    match document.render() {
        View::Placeholder(placeholder) => println!("View: placeholder ({})", placeholder.message),
        View::Grid(grid) => println!("View: grid {}x{}", grid.row_count(), grid.column_count()),
        View::Code(_) => println!("View: code"),
        View::Document(_) => println!("View: document"),
    }
    println!();
    println!("{}", state.content);
}
