//! Admin entry point over `workzen_core`.
//!
//! # Responsibility
//! - Run one directory or attendance command against the configured store.
//! - Print results as JSON on stdout and failures as `kind: message` on
//!   stderr with a non-zero exit code.

use clap::{Parser, Subcommand};
use log::error;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use workzen_core::{
    init_logging_from_config, open_store, AttendanceService, EmployeeService, ErrorKind,
    JsonFileBackend, RecordStore, ServiceError, StoreConfig,
};

#[derive(Parser)]
#[command(name = "workzen")]
#[command(version = workzen_core::core_version())]
#[command(about = "Inspect and update the WorkZen employee store", long_about = None)]
struct Cli {
    /// Store document to use instead of the configured one
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List employees, optionally for one company
    List {
        #[arg(long, default_value = "")]
        company: String,
    },
    /// Show one employee
    Show { id: String },
    /// Mark an employee present
    CheckIn {
        id: String,
        /// Timestamp to record; defaults to now (UTC)
        #[arg(long)]
        at: Option<String>,
    },
    /// Mark an employee checked out
    CheckOut {
        id: String,
        /// Timestamp to record; defaults to now (UTC)
        #[arg(long)]
        at: Option<String>,
    },
    /// Count employees per attendance status
    Summary {
        #[arg(long, default_value = "")]
        company: String,
    },
    /// Delete an employee and its login
    Delete { id: String },
}

#[derive(Debug)]
enum CliError {
    Config(String),
    Service(ServiceError),
    Output(serde_json::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Service(err) => err.kind().as_str(),
            Self::Output(_) => ErrorKind::Internal.as_str(),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Config(message) => message.clone(),
            Self::Service(err) => err.to_string(),
            Self::Output(err) => format!("failed to encode output: {err}"),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error error_code={}",
                err.code()
            );
            eprintln!("{}: {}", err.code(), err.message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = StoreConfig::from_env().map_err(CliError::Config)?;
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    // A bad log setup only warns; the command still runs.
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = open_store(&config.data_file).map_err(ServiceError::from)?;
    execute(&store, &config, cli.command)
}

fn execute(
    store: &RecordStore<JsonFileBackend>,
    config: &StoreConfig,
    command: Commands,
) -> Result<(), CliError> {
    let employees = EmployeeService::new(store);
    let attendance = AttendanceService::with_policy(store, config.check_out_policy);

    match command {
        Commands::List { company } => print_json(&employees.list_employees(&company)?),
        Commands::Show { id } => print_json(&employees.get_employee(&id)?),
        Commands::CheckIn { id, at } => {
            let employee = match at {
                Some(at) => attendance.check_in(&id, &at)?,
                None => attendance.check_in_now(&id)?,
            };
            print_json(&employee)
        }
        Commands::CheckOut { id, at } => {
            let employee = match at {
                Some(at) => attendance.check_out(&id, &at)?,
                None => attendance.check_out_now(&id)?,
            };
            print_json(&employee)
        }
        Commands::Summary { company } => print_json(&attendance.summary(&company)?),
        Commands::Delete { id } => print_json(&employees.delete_employee(&id)?),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
