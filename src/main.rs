//! CLI tool to format, validate, and resolve curl cell commands.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use curlcell::{
    ExecOptions, FormatCurlOptions, Platform, Variable, curl_with_values, curl_with_values_strict,
    dedupe_variables, format_curl, lex, prepare_exec, validate,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "curlcell", version, about = "Format, validate, and resolve curl commands")]
struct Cli {
    /// Platform the command targets (defaults to the host platform)
    #[arg(long, global = true, value_enum)]
    platform: Option<PlatformArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Unix,
    Windows,
    Browser,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Unix => Self::Unix,
            PlatformArg::Windows => Self::Windows,
            PlatformArg::Browser => Self::Browser,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Format command(s) and print to stdout
    Fmt {
        /// Drop comments from the output
        #[arg(long)]
        remove_comments: bool,
        files: Vec<PathBuf>,
    },
    /// Check if command(s) are formatted
    Check { files: Vec<PathBuf> },
    /// Report syntax, variable, and option errors
    Validate {
        #[command(flatten)]
        vars: VarArgs,
        files: Vec<PathBuf>,
    },
    /// Print command(s) with variable values substituted
    Resolve {
        /// Fail on bare references without a value
        #[arg(long)]
        strict: bool,
        /// Print the command handed to curl, writing the body to OUTPUT
        #[arg(long, value_name = "OUTPUT", conflicts_with = "strict")]
        exec: Option<String>,
        #[command(flatten)]
        vars: VarArgs,
        files: Vec<PathBuf>,
    },
    /// Print the classified parts of command(s)
    Parts { files: Vec<PathBuf> },
}

#[derive(Args)]
struct VarArgs {
    /// Define a variable
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,
    /// Load variables from a JSON array of `{"key", "value"}` records
    #[arg(long = "vars", value_name = "FILE")]
    vars_file: Option<PathBuf>,
}

impl VarArgs {
    fn load(&self) -> Result<Vec<Variable>, String> {
        let mut variables = Vec::new();

        if let Some(path) = &self.vars_file {
            let content =
                fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
            let loaded: Vec<Variable> =
                serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
            variables.extend(loaded);
        }

        for definition in &self.vars {
            let (key, value) = definition
                .split_once('=')
                .ok_or_else(|| format!("invalid variable definition: {definition}"))?;
            Variable::validate_key(key).map_err(|e| e.to_string())?;
            variables.push(Variable::manual(key, value));
        }

        Ok(dedupe_variables(variables))
    }
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let platform = cli.platform.map_or_else(Platform::current, Platform::from);

    let (files, vars) = match &cli.command {
        Command::Fmt { files, .. } | Command::Check { files } | Command::Parts { files } => {
            (files, None)
        }
        Command::Validate { vars, files } | Command::Resolve { vars, files, .. } => {
            (files, Some(vars))
        }
    };

    let variables = match vars.map(VarArgs::load).transpose() {
        Ok(variables) => variables.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let mut had_error = false;

    for (path, content) in read_inputs(files) {
        let content = match content {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match &cli.command {
            Command::Fmt {
                remove_comments, ..
            } => {
                let mut options = FormatCurlOptions::for_platform(platform);
                options.remove_comments = *remove_comments;
                println!("{}", format_curl(&content, &options));
            }
            Command::Check { .. } => {
                let formatted = format_curl(&content, &FormatCurlOptions::for_platform(platform));
                if formatted == content.trim_end_matches('\n') {
                    eprintln!("{path}: formatted");
                } else {
                    eprintln!("{path}: not formatted");
                    had_error = true;
                }
            }
            Command::Validate { .. } => {
                let errors = validate(&content, &variables, platform);
                if errors.is_empty() {
                    eprintln!("{path}: valid");
                }
                for error in &errors {
                    println!("{path}:{}:{}: {}", error.line(), error.column(), error.message());
                }
                had_error |= !errors.is_empty();
            }
            Command::Resolve {
                exec: Some(output),
                ..
            } => {
                let options = ExecOptions::new(platform, output);
                had_error |= !print_result(&path, prepare_exec(&content, &variables, &options));
            }
            Command::Resolve { strict: true, .. } => {
                had_error |= !print_result(&path, curl_with_values_strict(&content, &variables));
            }
            Command::Resolve { .. } => println!("{}", curl_with_values(&content, &variables)),
            Command::Parts { .. } => {
                for part in lex(&content) {
                    println!("{}:{}\t{}\t{:?}", part.line, part.column, part.kind, part.value);
                }
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Print a resolved command, or report why it failed.
fn print_result<E: fmt::Display>(path: &str, result: Result<String, E>) -> bool {
    match result {
        Ok(command) => {
            println!("{command}");
            true
        }
        Err(e) => {
            eprintln!("{path}: {e}");
            false
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_inputs(files: &[PathBuf]) -> Vec<(String, io::Result<String>)> {
    if files.is_empty() {
        let mut content = String::new();
        let result = io::stdin().read_to_string(&mut content).map(|_| content);
        return vec![("<stdin>".to_string(), result)];
    }

    files
        .iter()
        .map(|path| (path.display().to_string(), fs::read_to_string(path)))
        .collect()
}
