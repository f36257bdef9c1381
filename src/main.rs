#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use synth_bench::config::{CliOverrides, SynthConfig};
use synth_bench::{SynthResult, compare_cmd, env_cmd};

#[derive(Parser, Debug)]
#[command(name = "synth-bench")]
#[command(about = "Compare CIRCT, Yosys+ABC and hybrid synthesis flows", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set SYNTH_BENCH_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run all flows on a design file, or on every design under a directory
    Compare {
        /// Verilog/SystemVerilog file or directory
        input: PathBuf,
        /// LUT input count used by every flow
        #[arg(short = 'k', long)]
        lut_k: Option<u32>,
        /// Root directory for artifacts and reports
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also export results as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Also write the JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Show host information and detected tool versions
    Env {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("SYNTH_BENCH_LOG").unwrap_or_else(|_| {
        if verbose { "synth_bench=debug".to_string() } else { "synth_bench=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn dispatch(cli: Cli) -> SynthResult<bool> {
    match cli.command {
        Commands::Compare { input, lut_k, output_dir, config, csv, json } => {
            let overrides = CliOverrides { lut_k, output_dir, verbose: cli.verbose };
            let config = SynthConfig::load(config.as_deref(), overrides)?;
            compare_cmd::run(input, &config, csv, json)
        }
        Commands::Env { config } => {
            let overrides = CliOverrides { verbose: cli.verbose, ..Default::default() };
            let config = SynthConfig::load(config.as_deref(), overrides)?;
            env_cmd::run(&config).map(|()| true)
        }
    }
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}
