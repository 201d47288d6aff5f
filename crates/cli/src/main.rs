mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use udfpack_lib::GatewayType;

use output::{OutputFormat, print_error};

/// udfpack - package the UDFs referenced by a streaming-SQL script
#[derive(Parser)]
#[command(name = "udfpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve, compile and package the UDFs referenced by a script
  Resolve {
    /// Path to the SQL script
    file: PathBuf,

    /// Target execution gateway (e.g. yarn-session, kubernetes-application)
    #[arg(short, long)]
    gateway: GatewayType,

    /// Directory holding registry records (`<qualified name>.json`)
    #[arg(short, long)]
    registry: PathBuf,

    /// Base directory for generated artifacts (overrides UDFPACK_UDF_PATH)
    #[arg(long)]
    udf_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// List the functions a script references
  Extract {
    /// Path to the SQL script
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// List gateway types and whether they accept packaged UDFs
  Gateways {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Resolve {
      file,
      gateway,
      registry,
      udf_path,
      format,
    } => cmd::cmd_resolve(&file, gateway, &registry, udf_path, format),
    Commands::Extract { file, format } => cmd::cmd_extract(&file, format),
    Commands::Gateways { format } => cmd::cmd_gateways(format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
