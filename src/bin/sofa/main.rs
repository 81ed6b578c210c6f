//! SOFA CLI - Tool for inspecting SOFA files.

use std::env;
use std::path::Path;

use serde_json::{json, Map};
use sofa::core::NamespaceKind;
use sofa::util::format_shape;
use sofa::{Result, Sofa, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Default log filter for each verbosity flag.
const LOG_QUIET: &str = "error";
const LOG_INFO: &str = "info";
const LOG_DEBUG: &str = "sofa=debug,info";
const LOG_TRACE: &str = "sofa=trace,debug";

/// `RUST_LOG` wins over the verbosity flags.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = LOG_INFO;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = LOG_DEBUG,
            "-vv" | "--trace" => level = LOG_TRACE,
            "-q" | "--quiet" => level = LOG_QUIET,
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Info command - global attributes and dataset shapes
        "info" | "i" => with_file(&filtered_args, "info <file.sofa>", cmd_info),

        // Dump command - every resolvable namespace field
        "dump" | "d" => {
            let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            let rest: Vec<&str> = filtered_args
                .iter()
                .copied()
                .filter(|&s| s != "--json" && s != "-j")
                .collect();
            with_file(&rest, "dump <file.sofa> [--json]", |path| cmd_dump(path, json_mode))
        }

        // Get command - one Namespace.Field
        "get" | "g" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: sofa get <file.sofa> <Namespace.Field>");
                std::process::exit(1);
            }
            cmd_get(filtered_args[1], filtered_args[2])
        }

        // Check command - convention report
        "check" | "c" => with_file(&filtered_args, "check <file.sofa>", cmd_check),

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        "version" | "-V" | "--version" => {
            println!(
                "sofa {} (built {})",
                env!("CARGO_PKG_VERSION"),
                env!("SOFA_BUILD_DATE")
            );
            Ok(())
        }

        // Default: if file exists, show info; otherwise error
        other => {
            if Path::new(other).exists() {
                cmd_info(other)
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn with_file(args: &[&str], usage: &str, run: impl FnOnce(&str) -> Result<()>) -> Result<()> {
    match args.get(1) {
        Some(&path) => run(path),
        None => {
            eprintln!("Error: missing file argument");
            eprintln!("Usage: sofa {}", usage);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("sofa - SOFA (AES69) file inspector");
    println!();
    println!("USAGE:");
    println!("    sofa [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info  <file>                Show global attributes and datasets");
    println!("    d, dump  <file> [--json]       Dump every namespace field that resolves");
    println!("    g, get   <file> <Ns.Field>     Print one field, e.g. Listener.Position");
    println!("    c, check <file>                Report missing required attributes");
    println!("    h, help                        Show this help");
    println!("    version                        Show version and build date");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (every key lookup)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    sofa info subject_003.sofa");
    println!("    sofa get subject_003.sofa Data.SamplingRate");
    println!("    sofa get subject_003.sofa Source.Position_Units");
    println!("    sofa dump subject_003.sofa --json > subject_003.json");
    println!();
    println!("NOTES:");
    println!("    - Passing a .sofa file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides the verbosity flags");
    println!("    - Reading files requires the `hdf5` feature");
}

fn open(path: &str) -> Result<Sofa> {
    info!("Opening {}", path);
    let sofa = Sofa::open(path)?;
    debug!("Opened {:?}", sofa);
    Ok(sofa)
}

fn cmd_info(path: &str) -> Result<()> {
    let sofa = open(path)?;

    println!("File: {}", path);
    println!();

    println!("Attributes:");
    for name in sofa.attribute_names()? {
        match sofa.attribute(&name) {
            Ok(value) => println!("  {:<24} {}", name, value),
            Err(e) => println!("  {:<24} <{}>", name, e),
        }
    }
    println!();

    println!("Datasets:");
    for name in sofa.dataset_names()? {
        let shape = sofa.dataset_shape(&name)?;
        println!("  {:<24} {}", name, format_shape(&shape));
    }

    if let Ok(fir) = sofa.data().fir() {
        println!();
        println!(
            "FIR: {} measurements, {} receivers, {} samples at {} {}",
            fir.num_measurements(),
            fir.num_receivers(),
            fir.num_samples(),
            fir.sampling_rate_hz().unwrap_or(f64::NAN),
            fir.sampling_rate_units,
        );
    }

    sofa.close();
    Ok(())
}

/// Fields to try for a namespace: the convention's own list, then whatever
/// else the file stores under the prefix.
fn candidate_fields(sofa: &Sofa, namespace: &str, known: &[&str]) -> Vec<String> {
    let mut fields: Vec<String> = known.iter().map(|f| f.to_string()).collect();
    match sofa.namespace(namespace).fields() {
        Ok(stored) => {
            for f in stored {
                if !fields.contains(&f) {
                    fields.push(f);
                }
            }
        }
        Err(e) => debug!("Cannot list {}: {}", namespace, e),
    }
    fields
}

fn cmd_dump(path: &str, json_mode: bool) -> Result<()> {
    let sofa = open(path)?;
    let mut root = Map::new();

    if !json_mode {
        println!("File: {}", path);
    }

    for ns in sofa.convention().namespaces() {
        let mut fields = candidate_fields(&sofa, ns.name, ns.fields);
        if ns.kind == NamespaceKind::AudioObject {
            fields.push("Position_Type".to_string());
            fields.push("Position_Units".to_string());
        } else if ns.kind == NamespaceKind::Data {
            fields.push("SamplingRate_Units".to_string());
        }

        let mut entries = Map::new();
        if !json_mode {
            println!();
            println!("{}:", ns.name);
        }
        for field in &fields {
            match sofa.get(ns.name, field) {
                Ok(value) => {
                    if json_mode {
                        entries.insert(field.clone(), value.to_json());
                    } else {
                        println!("  {:<20} {}", field, value);
                    }
                }
                Err(e) if e.is_not_found() => debug!("{}", e),
                Err(e) => {
                    if json_mode {
                        entries.insert(field.clone(), json!({ "error": e.to_string() }));
                    } else {
                        println!("  {:<20} <{}>", field, e);
                    }
                }
            }
        }
        root.insert(ns.name.to_string(), serde_json::Value::Object(entries));
    }

    if json_mode {
        let out = json!({ "file": path, "namespaces": root });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    }

    sofa.close();
    Ok(())
}

fn cmd_get(path: &str, field_path: &str) -> Result<()> {
    let sofa = open(path)?;
    let value = sofa.get_path(field_path)?;
    match &value {
        Value::Text(s) => println!("{}", s),
        other => println!("{}", other),
    }
    sofa.close();
    Ok(())
}

fn cmd_check(path: &str) -> Result<()> {
    let sofa = open(path)?;
    let report = sofa.check()?;

    println!("File: {}", path);
    match &report.datatype {
        Some(dt) if report.datatype_supported => println!("DataType: {} (supported)", dt),
        Some(dt) => println!("DataType: {} (unsupported)", dt),
        None => println!("DataType: <missing>"),
    }
    if report.missing_required.is_empty() {
        println!("All required attributes present");
    } else {
        println!("Missing required attributes:");
        for name in &report.missing_required {
            println!("  {}", name);
        }
    }

    sofa.close();
    if report.is_complete() {
        Ok(())
    } else {
        std::process::exit(2);
    }
}
