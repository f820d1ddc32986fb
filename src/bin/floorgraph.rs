use std::{env, process};

use serde_json::{Map, Value, json};

use floorgraph::{
    NavGraphError, NavService, Role, SqliteSource,
    config::CommandLineConfig,
    safety::{run_safety_checks, run_strict_safety_checks},
};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let source = match SqliteSource::open(&config.database) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let service = NavService::new(source);
    if let Err(err) = run_command(&service, &config) {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn run_command(
    service: &NavService<SqliteSource>,
    config: &CommandLineConfig,
) -> Result<(), NavGraphError> {
    let args = &config.command_args;
    match config.command.as_str() {
        "status" => {
            let report = service.reload()?;
            println!(
                "generation={} nodes={} edges={} dropped={}",
                report.generation, report.node_count, report.edge_count, report.dropped_edges
            );
            Ok(())
        }
        "list" => {
            service.reload()?;
            let snapshot = service.store().snapshot();
            for node in snapshot.nodes_sorted() {
                println!(
                    "{}:{}:{}:{}",
                    node.id,
                    node.floor,
                    node.kind,
                    node.access.as_str()
                );
            }
            Ok(())
        }
        "path" => {
            let start = required_value(args, "--start")?;
            let end = required_value(args, "--end")?;
            let role = Role::parse(&value(args, "--role").unwrap_or_default());
            service.reload()?;
            let mut object = Map::new();
            object.insert("command".into(), Value::String("path".into()));
            object.insert("role".into(), Value::String(role.as_str().into()));
            match service.route(&start, &end, role) {
                Some(route) => {
                    object.insert("path".into(), json!(route.path));
                    object.insert("cost".into(), json!(route.cost));
                }
                None => {
                    object.insert("path".into(), Value::Null);
                }
            }
            println!("{}", encode(object)?);
            Ok(())
        }
        "check" => {
            let strict = args.iter().any(|arg| arg == "--strict");
            let report = if strict {
                match run_strict_safety_checks(service.source()) {
                    Ok(()) => run_safety_checks(service.source())?,
                    Err(err) => {
                        if let Some(source) = err.source {
                            return Err(source);
                        }
                        let detail = serde_json::to_string(&err.report)
                            .map_err(|e| NavGraphError::invalid_input(e.to_string()))?;
                        return Err(NavGraphError::invalid_input(format!(
                            "safety violations: {detail}"
                        )));
                    }
                }
            } else {
                run_safety_checks(service.source())?
            };
            let mut object = Map::new();
            object.insert("command".into(), Value::String("check".into()));
            object.insert("report".into(), json!(report));
            println!("{}", encode(object)?);
            Ok(())
        }
        other => Err(NavGraphError::invalid_input(format!("unknown command {other}"))),
    }
}

fn required_value(args: &[String], flag: &str) -> Result<String, NavGraphError> {
    value(args, flag).ok_or_else(|| NavGraphError::invalid_input(format!("missing {flag}")))
}

fn value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().cloned();
        }
    }
    None
}

fn encode(object: Map<String, Value>) -> Result<String, NavGraphError> {
    serde_json::to_string(&Value::Object(object))
        .map_err(|e| NavGraphError::invalid_input(format!("serialization failed: {e}")))
}
