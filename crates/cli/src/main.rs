use std::fmt::Write as _;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use introscore_core::pipeline::infrastructure::threaded_scoring_executor::ThreadedScoringExecutor;
use introscore_core::pipeline::scoring_engine::ScoringEngine;
use introscore_core::pipeline::scoring_executor::{ScoringExecutor, SequentialScoringExecutor};
use introscore_core::pipeline::scoring_logger::StdoutScoringLogger;
use introscore_core::rubric::domain::rubric::{Criterion, Rubric};
use introscore_core::rubric::infrastructure::rubric_file;
use introscore_core::scoring::domain::grammar_checker::GrammarChecker;
use introscore_core::scoring::domain::score_report::ScoreReport;
use introscore_core::scoring::domain::text_embedder::TextEmbedder;
use introscore_core::scoring::infrastructure::bag_of_words_embedder::BagOfWordsEmbedder;
use introscore_core::scoring::infrastructure::language_tool_checker::LanguageToolChecker;
use introscore_core::scoring::infrastructure::onnx_sentence_embedder::OnnxSentenceEmbedder;
use introscore_core::shared::constants::{
    DEFAULT_DURATION_MINUTES, DEFAULT_REPORT_FILENAME, EMBEDDING_MODEL_NAME,
    LANGUAGE_TOOL_LANGUAGE, LANGUAGE_TOOL_URL, SAMPLE_TRANSCRIPT,
};
use introscore_core::shared::model_resolver::{self, ProgressFn};
use introscore_core::shared::text;

const EMBEDDERS: [&str; 3] = ["onnx", "bag-of-words", "none"];

/// Rubric-based scoring for spoken self-introduction transcripts.
#[derive(Parser)]
#[command(name = "introscore", version)]
struct Cli {
    /// Transcript text file, or `-` to read from stdin.
    input: Option<PathBuf>,

    /// Score the built-in sample transcript instead of INPUT.
    #[arg(long)]
    sample: bool,

    /// Speech duration in minutes.
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    duration: f64,

    /// JSON rubric file; omitted sections keep their defaults.
    #[arg(long)]
    rubric: Option<PathBuf>,

    /// Sentence embedder: onnx, bag-of-words, or none.
    #[arg(long, default_value = "onnx")]
    embedder: String,

    /// Directory holding pre-downloaded embedding model files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// LanguageTool server used for grammar checking.
    #[arg(long, default_value = LANGUAGE_TOOL_URL)]
    grammar_url: String,

    /// Language code passed to the grammar checker.
    #[arg(long, default_value = LANGUAGE_TOOL_LANGUAGE)]
    language: String,

    /// Skip the grammar service and use the default grammar score.
    #[arg(long)]
    no_grammar: bool,

    /// Run criterion scorers on worker threads.
    #[arg(long)]
    parallel: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to a file.
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_REPORT_FILENAME)]
    output: Option<PathBuf>,

    /// Print the rubric before scoring.
    #[arg(long)]
    show_rubric: bool,

    /// Write the effective rubric as JSON to a file.
    #[arg(long)]
    write_rubric: Option<PathBuf>,

    /// Hide per-criterion details.
    #[arg(long)]
    no_details: bool,

    /// Hide matched keywords.
    #[arg(long)]
    no_keywords: bool,
}

impl Cli {
    fn has_transcript(&self) -> bool {
        self.sample || self.input.is_some()
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let rubric = match &cli.rubric {
        Some(path) => rubric_file::load(path)?,
        None => Rubric::default(),
    };

    if let Some(path) = &cli.write_rubric {
        rubric_file::save(&rubric, path)?;
        log::info!("Rubric written to {}", path.display());
    }
    if cli.show_rubric {
        print!("{}", render_rubric(&rubric));
    }
    if !cli.has_transcript() {
        return Ok(());
    }

    let transcript = read_transcript(&cli)?;
    if transcript.trim().is_empty() {
        return Err("Transcript is empty".into());
    }

    let executor: Box<dyn ScoringExecutor> = if cli.parallel {
        Box::new(ThreadedScoringExecutor::new())
    } else {
        Box::new(SequentialScoringExecutor)
    };
    let mut engine = ScoringEngine::new(
        rubric,
        build_embedder(&cli),
        build_grammar_checker(&cli),
        executor,
        Box::new(StdoutScoringLogger::new()),
    )?;

    let report = engine.score_transcript(&transcript, cli.duration)?;
    engine.summary();

    if cli.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        let options = RenderOptions {
            details: !cli.no_details,
            keywords: !cli.no_keywords,
        };
        print!("{}", render_report(&report, options));
    }

    if let Some(path) = &cli.output {
        fs::write(path, report.to_json_pretty()?)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.sample && cli.input.is_some() {
        return Err("--sample and INPUT are mutually exclusive".into());
    }
    if !cli.has_transcript() && !cli.show_rubric && cli.write_rubric.is_none() {
        return Err("No transcript given: pass a file, '-' for stdin, or --sample".into());
    }
    if let Some(input) = &cli.input {
        if !is_stdin(input) && !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if !cli.duration.is_finite() || cli.duration <= 0.0 {
        return Err(format!(
            "Duration must be a positive number of minutes, got {}",
            cli.duration
        )
        .into());
    }
    if !EMBEDDERS.contains(&cli.embedder.as_str()) {
        return Err(format!(
            "Embedder must be one of: {}, got '{}'",
            EMBEDDERS.join(", "),
            cli.embedder
        )
        .into());
    }
    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_transcript(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    if cli.sample {
        return Ok(SAMPLE_TRANSCRIPT.to_string());
    }
    let Some(input) = &cli.input else {
        return Err("No transcript given".into());
    };
    if is_stdin(input) {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(input)
        .map_err(|e| format!("Failed to read {}: {e}", input.display()).into())
}

fn build_embedder(cli: &Cli) -> Option<Arc<dyn TextEmbedder>> {
    match cli.embedder.as_str() {
        "none" => None,
        "bag-of-words" => Some(Arc::new(BagOfWordsEmbedder::default())),
        _ => match load_onnx_embedder(cli.model_dir.as_deref()) {
            Ok(embedder) => Some(Arc::new(embedder)),
            Err(e) => {
                log::warn!("Sentence embedding model unavailable: {e}");
                None
            }
        },
    }
}

fn load_onnx_embedder(
    model_dir: Option<&Path>,
) -> Result<OnnxSentenceEmbedder, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {EMBEDDING_MODEL_NAME}");
    let progress: ProgressFn = Box::new(download_progress);
    let assets = model_resolver::resolve_embedding_assets(model_dir, Some(&progress))?;
    OnnxSentenceEmbedder::new(&assets.model, &assets.tokenizer)
}

fn build_grammar_checker(cli: &Cli) -> Option<Arc<dyn GrammarChecker>> {
    if cli.no_grammar {
        return None;
    }
    match LanguageToolChecker::connect(&cli.grammar_url, &cli.language) {
        Ok(checker) => Some(Arc::new(checker)),
        Err(e) => {
            log::warn!("Grammar checker unavailable: {e}");
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RenderOptions {
    details: bool,
    keywords: bool,
}

fn render_report(report: &ScoreReport, options: RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Overall score: {:.1}/100", report.overall_score);
    let _ = write!(out, "Words: {}", report.word_count);
    if let Some(wpm) = report.wpm {
        let _ = write!(out, "  |  Speech rate: {wpm:.0} WPM");
    }
    out.push_str("\n\n");

    for criterion in &report.criteria {
        let _ = writeln!(
            out,
            "{}: {:.1}/{:.0} ({})",
            criterion.name,
            criterion.score,
            criterion.max_score,
            text::percent(criterion.ratio(), 0)
        );
        let _ = writeln!(out, "  {}", criterion.feedback);
        if options.details {
            if let Some(details) = &criterion.details {
                for (label, value) in details.iter() {
                    let _ = writeln!(out, "  - {label}: {value}");
                }
            }
        }
        if options.keywords {
            if let Some(keywords) = criterion.keywords_found.as_ref().filter(|k| !k.is_empty()) {
                let _ = writeln!(out, "  Keywords: {}", keywords.join(", "));
            }
        }
        out.push('\n');
    }
    out
}

fn render_rubric(rubric: &Rubric) -> String {
    let mut out = String::from("Scoring rubric\n");
    for criterion in Criterion::ALL {
        let _ = writeln!(
            out,
            "  {:20} {:>5.1} pts  {}",
            criterion.display_name(),
            rubric.weight(criterion),
            rubric.description(criterion)
        );
    }
    let _ = writeln!(out, "  {:20} {:>5.1} pts\n", "Total", rubric.total_weight());
    out
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
    if total > 0 && downloaded >= total {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use introscore_core::scoring::domain::criterion_result::{CriterionResult, Details};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("introscore").chain(args.iter().copied())).unwrap()
    }

    fn sample_report() -> ScoreReport {
        ScoreReport::assemble(
            vec![
                CriterionResult::new(Criterion::Salutation, 3.0, 5.0, "Good greeting.")
                    .with_keywords(&["hello"]),
                CriterionResult::new(Criterion::Clarity, 15.0, 15.0, "Clear.")
                    .with_details(Details::new().with("Fillers found", "None")),
                CriterionResult::new(Criterion::SpeechRate, 10.0, 10.0, "Good pace.")
                    .with_wpm(130.0),
            ],
            130,
            75.0,
        )
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--sample"]);
        assert_eq!(cli.duration, DEFAULT_DURATION_MINUTES);
        assert_eq!(cli.embedder, "onnx");
        assert_eq!(cli.grammar_url, LANGUAGE_TOOL_URL);
        assert!(cli.output.is_none());
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_output_without_value_uses_default_name() {
        let cli = parse(&["--sample", "--output"]);
        assert_eq!(cli.output, Some(PathBuf::from(DEFAULT_REPORT_FILENAME)));
    }

    #[test]
    fn test_sample_and_input_are_exclusive() {
        let cli = parse(&["-", "--sample"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_missing_transcript_rejected() {
        assert!(validate(&parse(&[])).is_err());
        assert!(validate(&parse(&["--show-rubric"])).is_ok());
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        assert!(validate(&parse(&["--sample", "--duration", "0"])).is_err());
        assert!(validate(&parse(&["--sample", "--duration=-2"])).is_err());
    }

    #[test]
    fn test_unknown_embedder_rejected() {
        assert!(validate(&parse(&["--sample", "--embedder", "word2vec"])).is_err());
    }

    #[test]
    fn test_missing_input_file_rejected() {
        assert!(validate(&parse(&["/nonexistent/transcript.txt"])).is_err());
    }

    #[test]
    fn test_render_report() {
        let rendered = render_report(
            &sample_report(),
            RenderOptions {
                details: true,
                keywords: true,
            },
        );
        assert!(rendered.starts_with("Overall score: 37.3/100\n"));
        assert!(rendered.contains("Speech rate: 130 WPM"));
        assert!(rendered.contains("Salutation: 3.0/5 (60%)"));
        assert!(rendered.contains("  Keywords: hello"));
        assert!(rendered.contains("  - Fillers found: None"));
    }

    #[test]
    fn test_render_report_hides_sections() {
        let rendered = render_report(
            &sample_report(),
            RenderOptions {
                details: false,
                keywords: false,
            },
        );
        assert!(!rendered.contains("Keywords:"));
        assert!(!rendered.contains("Fillers found"));
    }

    #[test]
    fn test_render_rubric_lists_every_criterion() {
        let rendered = render_rubric(&Rubric::default());
        for criterion in Criterion::ALL {
            assert!(rendered.contains(criterion.display_name()));
        }
        assert!(rendered.contains("75.0 pts"));
    }
}
