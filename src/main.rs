use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use wealth_report::{
    AppState, Config, FinancialProfile, GeminiClient, Report, RiskTolerance, SYSTEM_INSTRUCTION,
    Session, build_prompt,
};

#[derive(Parser)]
#[command(name = "wealth-report")]
#[command(about = "Generate a personal financial planning report")]
struct Cli {
    /// Config file (falls back to built-in defaults when missing)
    #[arg(short, long, global = true, default_value = "wealth-report.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the model for a report on a profile and write it out
    Analyze {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Render an existing markdown report without calling the model
    Render {
        /// Input markdown file
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the instruction and prompt that would be sent to the model
    Prompt {
        #[command(flatten)]
        profile: ProfileArgs,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// TOML file with profile fields; flags override it
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(long)]
    income: Option<f64>,

    #[arg(long)]
    expenses: Option<f64>,

    #[arg(long)]
    assets: Option<f64>,

    #[arg(long)]
    liabilities: Option<f64>,

    #[arg(long)]
    age: Option<u32>,

    #[arg(long)]
    goal: Option<String>,

    #[arg(long, value_enum)]
    risk: Option<RiskTolerance>,
}

impl ProfileArgs {
    fn resolve(self) -> Result<FinancialProfile, String> {
        let mut profile = match &self.profile {
            Some(path) => FinancialProfile::load(path).map_err(|e| e.to_string())?,
            None => FinancialProfile::default(),
        };

        if let Some(v) = self.income {
            profile.monthly_income = v;
        }
        if let Some(v) = self.expenses {
            profile.monthly_expenses = v;
        }
        if let Some(v) = self.assets {
            profile.total_assets = v;
        }
        if let Some(v) = self.liabilities {
            profile.total_liabilities = v;
        }
        if let Some(v) = self.age {
            profile.age = v;
        }
        if let Some(v) = self.goal {
            profile.financial_goal = v;
        }
        if let Some(v) = self.risk {
            profile.risk_tolerance = v;
        }
        Ok(profile)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Html,
    Typst,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Html => "html",
            Format::Typst => "typ",
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pdf")]
    format: Format,

    /// Output file (defaults to report.<ext>, or the input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> Result<(), String> {
    match command {
        Command::Analyze { profile, output } => {
            let profile = profile.resolve()?;
            let client = GeminiClient::from_env(&config.api).map_err(|e| {
                log::error!("{e}");
                e.user_message().to_string()
            })?;

            let mut session = Session::new();
            let state = session
                .analyze(&client, profile)
                .await
                .map_err(|e| e.to_string())?;

            match (state, session.report()) {
                (AppState::Result, Some(report)) => {
                    let path = output.output.clone().unwrap_or_else(|| {
                        PathBuf::from("report").with_extension(output.format.extension())
                    });
                    write_report(report, output.format, config, &path)
                }
                _ => Err(session
                    .error()
                    .unwrap_or(wealth_report::GENERATION_FAILED_MESSAGE)
                    .to_string()),
            }
        }
        Command::Render { input, output } => {
            let markdown = fs::read_to_string(&input)
                .map_err(|e| format!("reading {}: {}", input.display(), e))?;
            let path = output
                .output
                .clone()
                .unwrap_or_else(|| input.with_extension(output.format.extension()));

            let bytes = match output.format {
                Format::Pdf => wealth_report::markdown_to_pdf_with_config(&markdown, config)?,
                Format::Html => wealth_report::markdown_to_html(&markdown).into_bytes(),
                Format::Typst => {
                    wealth_report::markdown_to_typst_with_config(&markdown, config).into_bytes()
                }
            };
            write_output(&path, bytes)
        }
        Command::Prompt { profile } => {
            let profile = profile.resolve()?;
            println!("{}", SYSTEM_INSTRUCTION);
            println!("---");
            println!("{}", build_prompt(&profile));
            Ok(())
        }
    }
}

fn write_report(
    report: &Report,
    format: Format,
    config: &Config,
    path: &Path,
) -> Result<(), String> {
    let bytes = match format {
        Format::Pdf => report.to_pdf(config)?,
        Format::Html => report.to_html(config).into_bytes(),
        Format::Typst => report.to_typst(config).into_bytes(),
    };
    write_output(path, bytes)
}

fn write_output(path: &Path, bytes: Vec<u8>) -> Result<(), String> {
    fs::write(path, bytes).map_err(|e| format!("writing {}: {}", path.display(), e))?;
    println!("Created {}", path.display());
    Ok(())
}
