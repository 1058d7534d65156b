//! PulsePredict CLI - terminal front-end for arrhythmia screening.
//!
//! Loads the classifier once, runs one user action, and prints the render
//! instructions it produced.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_predict_core::models::{ChestPainType, ExerciseAngina, RestingEcg, Sex, StSlope};
use pulse_predict_core::{
    reveal_disease_percentage, Classifier, Config, Frontend, ManualEntry, Render, SvmModel,
};

mod terminal;

/// Command-line arguments for pulse-predict
#[derive(Parser, Debug)]
#[command(name = "pulse-predict")]
#[command(about = "Arrhythmia screening with a pre-trained SVM classifier")]
#[command(version)]
struct Cli {
    /// Classifier artifact (JSON); overrides the config file
    #[arg(short, long, global = true, env = "PULSE_PREDICT_MODEL")]
    model: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "PULSE_PREDICT_CONFIG")]
    config: Option<PathBuf>,

    /// Print render instructions as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every row of a CSV table
    Score {
        /// CSV file with a header row
        input: PathBuf,

        /// Write the results CSV here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score one manually entered patient
    Assess(AssessArgs),

    /// Show the loaded model's fingerprint and kernel
    ModelInfo,
}

#[derive(Args, Debug)]
struct AssessArgs {
    #[arg(long)]
    age: u32,
    /// Resting blood pressure (mm Hg)
    #[arg(long)]
    resting_bp: u32,
    #[arg(long)]
    cholesterol: u32,
    /// 1 if fasting blood sugar > 120 mg/dl
    #[arg(long, default_value_t = 0)]
    fasting_bs: u8,
    /// Maximum heart rate achieved
    #[arg(long)]
    max_hr: u32,
    /// ST depression
    #[arg(long, default_value_t = 0.0)]
    oldpeak: f64,
    /// Male or Female
    #[arg(long)]
    sex: Sex,
    /// ATA, NAP, TA or ASY
    #[arg(long)]
    chest_pain_type: ChestPainType,
    /// Normal, ST or LVH
    #[arg(long)]
    resting_ecg: RestingEcg,
    /// Yes or No
    #[arg(long)]
    exercise_angina: ExerciseAngina,
    /// Up, Flat or Down
    #[arg(long)]
    st_slope: StSlope,

    /// Also show the predicted disease chance and risk band
    #[arg(long)]
    show_disease_chance: bool,
}

impl From<&AssessArgs> for ManualEntry {
    fn from(args: &AssessArgs) -> Self {
        ManualEntry {
            age: args.age,
            resting_bp: args.resting_bp,
            cholesterol: args.cholesterol,
            fasting_bs: args.fasting_bs,
            max_hr: args.max_hr,
            oldpeak: args.oldpeak,
            sex: args.sex,
            chest_pain_type: args.chest_pain_type,
            resting_ecg: args.resting_ecg,
            exercise_angina: args.exercise_angina,
            st_slope: args.st_slope,
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing; logs go to stderr so stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Model path: {}", config.model_path.display());

    let model = SvmModel::load(&config.model_path).with_context(|| {
        format!(
            "Failed to load classifier from {}",
            config.model_path.display()
        )
    })?;

    let frontend = Frontend::new(&model).with_export_file_name(config.export_file_name.clone());

    let mut renders: Vec<Render> = Vec::new();
    let mut output_path = None;
    // Rejected input; an arrhythmia alert is still a successful run
    let rejected;

    match &cli.command {
        Command::Score { input, output } => {
            let file = File::open(input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let render = frontend.submit_table(file)?;
            rejected = render.download().is_none();
            renders.push(render);
            output_path = output.clone();
        }
        Command::Assess(args) => {
            let response = frontend.submit_form(&ManualEntry::from(args))?;
            rejected = response.assessment.is_none();
            renders.push(response.render);
            if args.show_disease_chance {
                if let Some(assessment) = response.assessment {
                    renders.push(reveal_disease_percentage(&assessment));
                }
            }
        }
        Command::ModelInfo => {
            let info = model.describe();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("fingerprint:     {}", info.fingerprint);
                println!("kernel:          {}", info.kernel);
                println!("support vectors: {}", info.support_vector_count);
            }
            return Ok(ExitCode::SUCCESS);
        }
    }

    for render in &renders {
        if cli.json {
            println!("{}", render.to_json()?);
        } else {
            terminal::print_render(render, output_path.as_deref())?;
        }
    }

    Ok(if rejected {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
