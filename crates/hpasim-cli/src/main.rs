use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

mod commands;
mod report;

use commands::{ConfigArgs, DefaultsFormat, RunFormat, SweepFormat};

#[derive(Parser)]
#[command(
    name = "hpasim",
    about = "HPA v2 simulator — replay a queue workload against the Kubernetes autoscaler",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one configuration.
    ///
    /// Without --config the reference configuration is used. Individual
    /// fields can be overridden with flags.
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = RunFormat::Text)]
        format: RunFormat,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the reference configuration as a starting point.
    Defaults {
        #[arg(short, long, value_enum, default_value_t = DefaultsFormat::Toml)]
        format: DefaultsFormat,
    },
    /// Simulate variants of one configuration concurrently.
    #[command(group(
        ArgGroup::new("axis")
            .required(true)
            .args(["max_pods", "producing_rate"]),
    ))]
    Sweep {
        /// Configuration file (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated maxPods values, one variant each
        #[arg(long, value_delimiter = ',')]
        max_pods: Vec<u32>,
        /// Comma-separated producingRateTotal values, one variant each
        #[arg(long, value_delimiter = ',')]
        producing_rate: Vec<f64>,
        #[arg(short, long, value_enum, default_value_t = SweepFormat::Text)]
        format: SweepFormat,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hpasim=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            format,
            output,
        } => commands::run::run(&config, format, output.as_deref()),
        Commands::Defaults { format } => commands::defaults::defaults(format),
        Commands::Sweep {
            config,
            max_pods,
            producing_rate,
            format,
        } => commands::sweep::sweep(config.as_deref(), &max_pods, &producing_rate, format),
    }
}
