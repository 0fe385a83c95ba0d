//! brickrules CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use brickrules_diagnostics::{GroupedDiagnostics, ResultReport};
use brickrules_engine::{EvaluationReport, EvaluatorConfig};
use brickrules_foundation::{ErrorCategory, Namespace};
use brickrules_runtime::{Session, init_logging};
use serde::Serialize;

/// The command to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Command {
    #[default]
    None,
    Check,
    Compile,
    Evaluate,
}

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    command: Command,
    files: Vec<PathBuf>,
    namespace: Option<String>,
    rule_prefix: Option<String>,
    timeout_ms: Option<u64>,
    json: bool,
    verbose: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbose = true,
            "--json" => config.json = true,
            flag @ ("--namespace" | "--rule-prefix" | "--timeout-ms") => {
                i += 1;
                if i >= args.len() {
                    return Err(format!("{flag} requires a value").into());
                }
                let value = args[i].clone();
                match flag {
                    "--namespace" => config.namespace = Some(value),
                    "--rule-prefix" => config.rule_prefix = Some(value),
                    _ => {
                        config.timeout_ms = Some(
                            value
                                .parse()
                                .map_err(|_| format!("invalid --timeout-ms value: {value}"))?,
                        );
                    }
                }
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            "check" if config.command == Command::None => config.command = Command::Check,
            "compile" if config.command == Command::None => config.command = Command::Compile,
            "evaluate" if config.command == Command::None => config.command = Command::Evaluate,
            path if config.command != Command::None => config.files.push(PathBuf::from(path)),
            other => return Err(format!("unknown command: {other}").into()),
        }
        i += 1;
    }

    Ok(config)
}

fn evaluator_config(cli: &CliConfig) -> EvaluatorConfig {
    let mut config = EvaluatorConfig::default();
    if let Some(namespace) = &cli.namespace {
        config = config.with_namespace(Namespace::new(namespace.as_str()));
    }
    if let Some(prefix) = &cli.rule_prefix {
        config = config.with_rule_prefix(prefix.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_query_timeout(std::time::Duration::from_millis(ms));
    }
    config
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if config.show_version {
        println!("brickrules {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    init_logging(config.verbose);
    let session = Session::new(evaluator_config(&config));

    match (config.command, config.files.as_slice()) {
        (Command::Check, [rules]) => {
            let loaded = session.load_rules(rules)?;
            let summary = session.check(&loaded);
            println!(
                "{} rules, {} queries compiled, {} problems",
                summary.rules,
                summary.compiled,
                summary.problems.len()
            );
            for (rule, message) in &summary.problems {
                println!("  \x1b[33m{rule}\x1b[0m: {message}");
            }
            Ok(if summary.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        (Command::Compile, [rules]) => {
            let loaded = session.load_rules(rules)?;
            for rejection in &loaded.rejected {
                eprintln!("\x1b[33m{}\x1b[0m: {}", rejection.rule, rejection.error);
            }
            for step in session.compile(&loaded) {
                println!(
                    "\x1b[1m# {} / {} / {}\x1b[0m",
                    step.rule, step.query.class, step.query.variable
                );
                match &step.query.query {
                    Ok(query) => println!("{query}\n"),
                    Err(error) => println!("# error: {error}\n"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        (Command::Evaluate, [rules, model]) => {
            let evaluation = session.evaluate(rules, model)?;
            let report = ResultReport::build(&evaluation, &GroupedDiagnostics::new());
            if config.json {
                print_json(&evaluation, &report)?;
            } else {
                print!("{}", report.to_markdown());
                for failure in &evaluation.failures {
                    eprintln!("\x1b[33mwarning:\x1b[0m {failure}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        (Command::None, _) => {
            print_help();
            Ok(ExitCode::FAILURE)
        }
        (Command::Evaluate, _) => Err("evaluate expects <rules.json> <model.nt>".into()),
        (_, _) => Err("expected exactly one rule document".into()),
    }
}

#[derive(Serialize)]
struct FailureRecord<'a> {
    rule: &'a str,
    class: Option<&'a str>,
    variable: Option<&'a str>,
    category: ErrorCategory,
    message: String,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: &'a ResultReport,
    errors: Vec<FailureRecord<'a>>,
}

fn print_json(
    evaluation: &EvaluationReport,
    report: &ResultReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let errors = evaluation
        .failures
        .iter()
        .map(|failure| FailureRecord {
            rule: &failure.rule,
            class: failure.class.as_deref(),
            variable: failure.variable.as_deref(),
            category: failure.error.category(),
            message: failure.error.to_string(),
        })
        .collect();
    let output = JsonOutput {
        results: report,
        errors,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mbrickrules\x1b[0m - Building-model rule compiler and evaluator

\x1b[1mUSAGE:\x1b[0m
    brickrules <COMMAND> [OPTIONS] <FILES...>

\x1b[1mCOMMANDS:\x1b[0m
    check <rules.json>                 Compile every rule and report problems
    compile <rules.json>               Print each compiled query
    evaluate <rules.json> <model.nt>   Apply rules to an N-Triples model

\x1b[1mOPTIONS:\x1b[0m
    -h, --help             Print help information
    -V, --version          Print version information
    -v, --verbose          Enable debug logging (RUST_LOG overrides)
    --namespace IRI        Namespace for class and relationship names
    --rule-prefix PREFIX   Prefix for rule IRIs (default urn:rules_manifest/)
    --timeout-ms N         Per-query time limit
    --json                 Print evaluation results as JSON

\x1b[1mEXAMPLES:\x1b[0m
    brickrules check rules.json
    brickrules compile --namespace https://brickschema.org/schema/Brick# rules.json
    brickrules evaluate --json rules.json building.nt"
    );
}
