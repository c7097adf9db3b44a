use std::{env, fs, io};
use std::process::exit;

use thiserror::Error;
use tracing::{debug, Level};

use minic::backend::{export_json, generate_code};
use minic::frontend::ast::Program;
use minic::frontend::error::FrontendErrorKind;
use minic::frontend::{check_semantics, parse_file, render_report};


/// failures of a single output action, none of them stops the others
#[derive(Debug, Error)]
enum DriverError {
    #[error("Cannot write to {path}")]
    Write { path: String, source: io::Error },
    #[error("Cannot serialize ast: {0}")]
    Json(#[from] serde_json::Error),
}

/// all options of a single run, taken from the command line
#[derive(Debug, Default, PartialEq)]
struct DriverOptions {
    input: String,
    json_output: Option<String>,
    code_output: Option<String>,
    semantic: bool,
    verbose: bool,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <input_file> [options]", program_name);
    eprintln!("Options:");
    eprintln!("  --json <output.json>    Export AST to JSON");
    eprintln!("  --code <output.c>       Generate C code");
    eprintln!("  --semantic              Run semantic analysis");
    eprintln!("  --verbose               Log progress of all passes to stderr");
}

/// first argument is the input file, flags may follow in any order,
/// unknown arguments and a flag missing its value are ignored
fn parse_args(args: &[String]) -> Option<DriverOptions> {
    let input = args.get(1)?;
    let mut options = DriverOptions { input: input.clone(), ..DriverOptions::default() };
    let mut flags = args.iter().skip(2);
    while let Some(flag) = flags.next() {
        match flag.as_str() {
            "--json" => if let Some(path) = flags.next() {
                options.json_output = Some(path.clone());
            },
            "--code" => if let Some(path) = flags.next() {
                options.code_output = Some(path.clone());
            },
            "--semantic" => options.semantic = true,
            "--verbose" => options.verbose = true,
            _ => {}
        }
    }
    Some(options)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn write_output(path: &str, contents: &str) -> Result<(), DriverError> {
    fs::write(path, contents).map_err(|source| DriverError::Write { path: String::from(path), source })?;
    debug!("wrote {} bytes to {}", contents.len(), path);
    Ok(())
}

fn export_json_file(program: &Program, path: &str) -> Result<(), DriverError> {
    let json = export_json(program)?;
    write_output(path, &json)
}

fn run_semantic_analysis(program: &Program) {
    println!("\nRunning semantic analysis...");
    match check_semantics(program) {
        Ok(_) => println!("Semantic analysis passed!"),
        Err(errors) => {
            eprintln!("Semantic errors:");
            eprintln!("{}", render_report(&errors));
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            let program_name = args.get(0).map(String::as_str).unwrap_or("minic");
            print_usage(program_name);
            exit(1);
        }
    };
    init_logging(options.verbose);
    debug!("running with {:?}", options);

    println!("Parsing {}...", options.input);
    let program = match parse_file(&options.input) {
        Ok(program) => program,
        Err(errors) => {
            let unreadable = errors.iter()
                .any(|e| matches!(e.item, FrontendErrorKind::SystemError { .. }));
            if unreadable {
                eprintln!("Error: Cannot open file {}", options.input);
            } else {
                eprintln!("Parse error!");
            }
            for err in errors.iter() {
                eprintln!("{}", err);
            }
            exit(1);
        }
    };
    println!("Parse successful! Found {} top-level statements.", program.len());

    if options.semantic {
        run_semantic_analysis(&program);
    }

    if let Some(path) = &options.json_output {
        println!("\nExporting AST to {}...", path);
        match export_json_file(&program, path) {
            Ok(_) => println!("AST exported successfully!"),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if let Some(path) = &options.code_output {
        println!("\nGenerating C code to {}...", path);
        let code = generate_code(&program);
        match write_output(path, &code) {
            Ok(_) => println!("Code generated successfully!"),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn missing_input_is_rejected() {
        assert_eq!(parse_args(&args(&["minic"])), None);
    }

    #[test]
    fn flags_are_combined() {
        let options = parse_args(&args(&["minic", "a.c", "--semantic", "--code", "out.c", "--json", "out.json"]))
            .unwrap();
        assert_eq!(options, DriverOptions {
            input: String::from("a.c"),
            json_output: Some(String::from("out.json")),
            code_output: Some(String::from("out.c")),
            semantic: true,
            verbose: false,
        });
    }

    #[test]
    fn flag_without_value_is_ignored() {
        let options = parse_args(&args(&["minic", "a.c", "--verbose", "--json"])).unwrap();
        assert_eq!(options.json_output, None);
        assert!(options.verbose);
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        let options = parse_args(&args(&["minic", "a.c", "--optimize", "--semantic"])).unwrap();
        assert_eq!(options, DriverOptions {
            input: String::from("a.c"),
            semantic: true,
            ..DriverOptions::default()
        });
    }

    #[test]
    fn write_failure_names_the_path() {
        let err = write_output("/nonexistent-dir/out.c", "").unwrap_err();
        assert_eq!(err.to_string(), "Cannot write to /nonexistent-dir/out.c");
    }
}
