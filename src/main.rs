//! Formwork CLI - Field Filtering and Validation
//!
//! This is a demonstration CLI for the formwork library.

use anyhow::{bail, Context, Result};
use formwork::prelude::*;
use indexmap::IndexMap;
use std::path::Path;

fn main() {
    env_logger::init();

    println!("📋 Formwork - Field Filtering and Validation v{}", formwork::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let result = match args[1].as_str() {
        "list" => {
            list_plugins(args.get(2).map(String::as_str));
            Ok(())
        }
        "validate" => {
            if args.len() < 4 {
                eprintln!("Error: Please specify a model file and an input file");
                eprintln!("Usage: {} validate <model.toml|model.json> <input.json>", args[0]);
                return;
            }
            validate(Path::new(&args[2]), Path::new(&args[3]))
        }
        "render" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a model file");
                eprintln!("Usage: {} render <model.toml|model.json> [input.json]", args[0]);
                return;
            }
            render(Path::new(&args[2]), args.get(3).map(Path::new))
        }
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            Ok(())
        }
    };

    if let Err(error) = result {
        eprintln!("✗ Error: {:#}", error);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list [query]                   List registered plugins, optionally filtered");
    println!("  validate <model> <input.json>  Filter and validate input against a model");
    println!("  render <model> [input.json]    Render every field of a model");
    println!("  help                           Show this help message");
    println!();
    println!("Model files are TOML or JSON, chosen by extension.");
    println!("Set RUST_LOG=debug to trace plugin resolution and construction.");
}

fn list_plugins(query: Option<&str>) {
    let plugins = PluginSet::new();

    match query {
        Some(query) => {
            let results = plugins.search(query);
            println!("Plugins matching '{}' ({} found):", query, results.len());
            println!();
            for (kind, name) in results {
                println!("  • [{}] {}", kind, name);
            }
        }
        None => {
            let catalog = plugins.catalog();
            println!("Available plugins ({} total):", catalog.len());
            for kind in PluginType::all() {
                println!();
                println!("  📁 {}", kind.display_name());
                for (_, name, description) in catalog.iter().filter(|(k, _, _)| k == kind) {
                    println!("      • {} - {}", name, description);
                }
            }
        }
    }
}

fn load_input(path: &Path) -> Result<IndexMap<String, Value>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input {}", path.display()))?;
    match serde_json::from_str(&source)
        .with_context(|| format!("failed to parse input {}", path.display()))?
    {
        Value::Map(map) => Ok(map),
        other => bail!("input must be a JSON object, got {}", other.kind()),
    }
}

fn validate(model_path: &Path, input_path: &Path) -> Result<()> {
    let mut model = Model::from_config(model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?;
    let input = load_input(input_path)?;

    println!("Validating '{}' ({} field(s))...", model.name(), model.fields().len());
    model.populate(&input);
    let report = model.validate()?;

    println!("{}", report.summary());
    for line in report.detailed_messages() {
        println!("  {}", line);
    }
    for field in &report.skipped {
        println!("  - {}: skipped", field);
    }
    println!();
    println!("Filtered data:");
    println!("{}", serde_json::to_string_pretty(&model.data())?);
    println!("Completed in {}ms", report.duration_ms);

    if !report.success {
        std::process::exit(2);
    }
    Ok(())
}

fn render(model_path: &Path, input_path: Option<&Path>) -> Result<()> {
    let mut model = Model::from_config(model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?;
    if let Some(input_path) = input_path {
        let input = load_input(input_path)?;
        model.populate(&input);
    }

    let rendered = model.render_all()?;
    if rendered.is_empty() {
        println!("✗ No field of '{}' has a default renderer", model.name());
        return Ok(());
    }
    for (name, html) in rendered {
        println!("<!-- {} -->", name);
        println!("{}", html);
    }
    Ok(())
}
