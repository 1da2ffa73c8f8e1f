//! trinetra-cli: command-line front end for the TriNetra monitoring backend.
//!
//! Usage:
//!   trinetra-cli --db trinetra.db seed
//!   trinetra-cli --db trinetra.db timeline --scenario crypto_sanctions
//!   trinetra-cli --db trinetra.db report --scenario human_trafficking
//!   trinetra-cli --seed 7 hydra-simulate --rounds 20
//!   trinetra-cli --db trinetra.db --ipc-mode

use anyhow::Result;
use serde_json::{json, Value};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use trinetra_core::{
    clock::{Clock, SystemClock},
    config::ReportConfig,
    hydra::{HydraEngine, DEFAULT_SIMULATION_ROUNDS},
    report_generator::ReportGenerator,
    service::{render, ApiResponse, MonitoringService, ServiceRequest},
    store::TransactionStore,
    synthetic::{init_database, SyntheticGenerator},
    types::{ALL_SCENARIOS, TERRORIST_FINANCING},
};

const FLAGS_WITH_VALUES: &[&str] = &["--db", "--data-dir", "--seed", "--scenario", "--rounds"];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let command = positional_command(&args).unwrap_or("health");

    let store = if db == ":memory:" {
        TransactionStore::in_memory()?
    } else {
        TransactionStore::open(db)?
    };
    store.migrate()?;

    let generator = SyntheticGenerator::new(seed, SystemClock.now());
    let seeded = init_database(&store, &generator)?;
    log::info!("db={} seed={} seeded_rows={}", db, seed, seeded);

    let config = if Path::new(data_dir).join("reports").is_dir() {
        ReportConfig::load(data_dir)?
    } else {
        log::info!("No report tables under {}, using built-in tables", data_dir);
        ReportConfig::builtin()
    };
    let mut service =
        MonitoringService::new(store, ReportGenerator::new(config), HydraEngine::new(seed));

    if ipc_mode {
        return run_ipc_loop(&mut service);
    }

    let scenario = flag_value(&args, "--scenario");
    let response = match command {
        "seed" => json!({
            "status": "success",
            "inserted": seeded,
            "total_transactions": service.store().transaction_count()?,
        }),
        "timeline" => service.handle(ServiceRequest::Timeline {
            scenario: Some(scenario.unwrap_or(ALL_SCENARIOS).to_string()),
        }),
        "patterns" => service.handle(ServiceRequest::Patterns),
        "report" => service.handle(ServiceRequest::GenerateSar {
            pattern: Some(json!({ "scenario": scenario.unwrap_or(TERRORIST_FINANCING) })),
        }),
        "templates" => service.handle(ServiceRequest::Templates),
        "health" => service.handle(ServiceRequest::Health),
        "hydra-generate" => service.handle(ServiceRequest::HydraGenerate),
        "hydra-simulate" => service.handle(ServiceRequest::HydraSimulation {
            rounds: parse_arg(&args, "--rounds", DEFAULT_SIMULATION_ROUNDS),
        }),
        other => render(ApiResponse::<()>::Error {
            message: format!("Unknown command: {other}"),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// One JSON request per stdin line, one JSON response per stdout line.
/// `{"type": "quit"}` or EOF ends the loop.
fn run_ipc_loop(service: &mut MonitoringService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let response = match parse_request(&buffer) {
            Ok(None) => break,
            Ok(Some(request)) => service.handle(request),
            Err(e) => {
                log::warn!("Malformed IPC request: {}", e);
                render(ApiResponse::<()>::Error {
                    message: e.to_string(),
                })
            }
        };
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }
    Ok(())
}

/// `Ok(None)` for a quit request.
fn parse_request(line: &str) -> Result<Option<ServiceRequest>> {
    let value: Value = serde_json::from_str(line)?;
    if value.get("type").and_then(Value::as_str) == Some("quit") {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// First argument that is neither a flag nor a flag's value.
fn positional_command(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if FLAGS_WITH_VALUES.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with("--") {
            return Some(arg.as_str());
        }
    }
    None
}
