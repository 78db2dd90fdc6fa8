pub mod dashboard;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::{
    session::Session,
    settings::Settings,
    utils::{
        dir::application_dir,
        logging::{LogOptions, enable_logging},
    },
};

/// Reference dataset shipped next to the executable.
pub const DEFAULT_PUBLIC_DATA: &str = "data/study_stats.csv";

#[derive(Parser, Debug)]
#[command(name = "focus-recommender", version, long_about = None)]
#[command(about = "Compares your time-use log with public statistics and recommends a focus time slot", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Mirror logs to stdout")]
    log: bool,
    #[arg(
        long,
        help = "Settings file in JSON. By default config.json in the application directory is used if present"
    )]
    config: Option<PathBuf>,
    #[arg(
        long,
        help = "Application directory. By default $XDG_STATE_HOME or $HOME/.local/state is used"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Aggregate a single CSV file and print category totals")]
    Summary {
        file: PathBuf,
    },
    #[command(about = "Compare your data with the public data and recommend a focus slot")]
    Compare {
        #[command(flatten)]
        inputs: Inputs,
    },
    #[command(about = "Export a comparison report")]
    Report {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(short, long, default_value = "focus_report.txt")]
        output: PathBuf,
        #[arg(short, long, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

#[derive(clap::Args, Debug)]
struct Inputs {
    #[arg(long, default_value = DEFAULT_PUBLIC_DATA, help = "Public reference CSV")]
    public: PathBuf,
    #[arg(long, help = "Your time-use CSV")]
    user: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_dir = application_dir(args.dir)?;
    enable_logging(&LogOptions::for_cli(&application_dir, args.log))?;

    let settings = Settings::resolve(args.config.as_deref(), &application_dir)?;
    let (aggregator, engine) = settings.build()?;
    let mut session = Session::new(aggregator, engine);

    match args.commands {
        Commands::Summary { file } => {
            let snapshot = session.load_user(&file)?;
            dashboard::print_snapshot(&file.display().to_string(), snapshot);
            Ok(())
        }
        Commands::Compare { inputs } => {
            load_inputs(&mut session, &inputs)?;
            session.predict();
            dashboard::print_dashboard(&session);
            Ok(())
        }
        Commands::Report {
            inputs,
            output,
            format,
        } => {
            load_inputs(&mut session, &inputs)?;
            session.predict();
            report::export(&session, &output, format)?;
            info!(output = %output.display(), %format, "Report saved");
            println!("Report saved to {}", output.display());
            Ok(())
        }
    }
}

fn load_inputs(session: &mut Session, inputs: &Inputs) -> Result<()> {
    session.load_public(&inputs.public)?;
    session.load_user(&inputs.user)?;
    Ok(())
}
