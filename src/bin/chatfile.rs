use chatfile::{
    config::AnalysisConfig, drop_single_utterance_turns, parse_query, Addressee, Error,
    Transcript, TurnMode, TypeTokenRatio, WordClass,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};
use strum::IntoEnumIterator;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, default_value = "chatfile.json", global = true)]
    config: PathBuf,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Utterance, word and word class counts
    Summary {
        file: PathBuf,
    },

    /// Conversational turns by speaker
    Turns {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Mode::Cds)]
        mode: Mode,

        /// Close adult-directed turns on any other speaker
        #[arg(long)]
        no_interventions: bool,

        /// Keep single utterance adult-directed turns (child-directed turns are never filtered)
        #[arg(long)]
        keep_single: bool,
    },

    /// Utterances matching a morphological query, e.g. "lex:tene lex:que cat:inf,v"
    Query {
        file: PathBuf,

        query: String,
    },

    /// Dominant activity of every utterance
    Activities {
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Child-directed speech
    Cds,
    /// Adult-directed speech
    Ads,
}

#[derive(Serialize)]
struct Summary<'a> {
    name: &'a str,
    language: Option<String>,
    speakers: &'a [String],
    utterances: usize,
    utterances_by_addressee: BTreeMap<Addressee, usize>,
    has_bullets: bool,
    ambiguous_lines: &'a [usize],
    #[serde(skip_serializing_if = "Option::is_none")]
    morphology: Option<MorphologySummary>,
}

#[derive(Serialize)]
struct MorphologySummary {
    words_by_addressee: BTreeMap<Addressee, usize>,
    classes_by_addressee: BTreeMap<WordClass, BTreeMap<Addressee, usize>>,
    type_token_ratio: f64,
}

#[derive(Serialize)]
struct TurnView<'a> {
    lines: Vec<usize>,
    text: Vec<&'a str>,
}

#[derive(Serialize)]
struct QueryHit<'a> {
    line: usize,
    speaker: &'a str,
    text: &'a str,
    matched: Vec<String>,
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig, Error> {
    if cli.config.exists() {
        let config = AnalysisConfig::from_file(&cli.config)?;
        info!("config loaded.");
        Ok(config)
    } else {
        debug!("No config at {}, using defaults", cli.config.display());
        Ok(AnalysisConfig::default())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn summary(transcript: &Transcript) -> Result<(), Error> {
    let morphology = if transcript.has_morphology() {
        let mut classes_by_addressee = BTreeMap::new();
        for class in WordClass::iter() {
            classes_by_addressee.insert(class, transcript.count_class_by_addressee(class)?);
        }
        Some(MorphologySummary {
            words_by_addressee: transcript.count_words_by_addressee()?,
            classes_by_addressee,
            type_token_ratio: transcript.lexical_diversity(&TypeTokenRatio, None)?,
        })
    } else {
        None
    };

    print_json(&Summary {
        name: transcript.name(),
        language: transcript.language().map(|l| l.to_string()),
        speakers: transcript.speakers(),
        utterances: transcript.count_utterances(),
        utterances_by_addressee: transcript.count_utterances_by_addressee(),
        has_bullets: transcript.has_bullets(),
        ambiguous_lines: transcript.ambiguous_lines(),
        morphology,
    })
}

fn turns(
    transcript: &Transcript,
    config: &AnalysisConfig,
    mode: Mode,
    no_interventions: bool,
    keep_single: bool,
) -> Result<(), Error> {
    let mode = match mode {
        Mode::Cds => TurnMode::ChildDirected,
        Mode::Ads => TurnMode::AdultDirected {
            allow_interventions: !no_interventions,
        },
    };

    let mut turns = transcript.turns(mode, &config.turns);
    if !keep_single && !mode.keeps_single_turns() {
        drop_single_utterance_turns(&mut turns);
    }

    let view: BTreeMap<&str, Vec<TurnView>> = turns
        .iter()
        .map(|(speaker, turns)| {
            let views = turns
                .iter()
                .map(|turn| TurnView {
                    lines: turn.utterances.iter().map(|u| u.line_number).collect(),
                    text: turn.utterances.iter().map(|u| u.text.as_str()).collect(),
                })
                .collect();
            (*speaker, views)
        })
        .collect();
    print_json(&view)
}

fn query(transcript: &Transcript, query: &str) -> Result<(), Error> {
    let criteria = parse_query(query)?;
    debug!("criteria: {:?}", criteria);

    let hits: Vec<QueryHit> = transcript
        .find_by_criteria(&criteria)?
        .into_iter()
        .map(|hit| QueryHit {
            line: hit.utterance.line_number,
            speaker: &hit.utterance.speaker,
            text: &hit.utterance.text,
            matched: hit.units.iter().map(|unit| unit.composite()).collect(),
        })
        .collect();
    print_json(&hits)
}

fn activities(transcript: &Transcript) -> Result<(), Error> {
    let dominant: BTreeMap<usize, String> = transcript
        .utterances()
        .iter()
        .zip(transcript.dominant_activities())
        .filter_map(|(utterance, activity)| {
            activity.map(|activity| (utterance.line_number, activity.to_string()))
        })
        .collect();
    print_json(&dominant)
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = load_config(cli)?;

    let file = match &cli.command {
        Commands::Summary { file }
        | Commands::Turns { file, .. }
        | Commands::Query { file, .. }
        | Commands::Activities { file } => file,
    };
    debug!("Parsing transcript: {:?}", file);
    let transcript = Transcript::from_path(file, &config.transcript)?;

    match &cli.command {
        Commands::Summary { .. } => summary(&transcript),
        Commands::Turns {
            mode,
            no_interventions,
            keep_single,
            ..
        } => turns(&transcript, &config, *mode, *no_interventions, *keep_single),
        Commands::Query { query: text, .. } => query(&transcript, text),
        Commands::Activities { .. } => activities(&transcript),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
