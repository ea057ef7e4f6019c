//! gather CLI: run, validate, and explain YAML pipelines over numeric input.

use std::fs;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gather_core::{ExecConfig, Number};
use gather_exec::{Engine, RunOutput};
use gather_planner::{
    bind, parse_yaml_pipeline, pipeline_characteristics, ParsedPipeline, PipelineConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gather")]
#[command(about = "Run stateful stream operators described in YAML over JSON numbers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pipeline over whitespace-separated JSON numbers
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Maximum number of input elements (overrides config)
        #[arg(long)]
        max_input: Option<usize>,

        /// Trace every input element (overrides config)
        #[arg(long)]
        trace_elements: bool,

        /// Print the run manifest as JSON to stderr
        #[arg(long)]
        manifest: bool,
    },

    /// Validate a pipeline YAML file
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the steps of a pipeline with their characteristics
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },
}

/// Flags given on the command line; they win over every other source.
#[derive(Debug, Default)]
struct CliOverrides {
    max_input: Option<usize>,
    trace_elements: bool,
}

/// `RUST_LOG` when set and valid, `warn` otherwise. Element tracing adds a
/// `gather_exec=trace` directive on top, leaving every other target alone.
fn log_filter(rust_log: Option<&str>, trace_elements: bool) -> EnvFilter {
    let filter = rust_log
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    if !trace_elements {
        return filter;
    }
    match "gather_exec=trace".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn init_tracing(trace_elements: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    // Logs go to stderr; stdout carries records only.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(log_filter(rust_log.as_deref(), trace_elements))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            pipeline,
            input,
            max_input,
            trace_elements,
            manifest,
        } => run_pipeline(
            &pipeline,
            input.as_deref(),
            CliOverrides {
                max_input,
                trace_elements,
            },
            manifest,
        ),
        Commands::Validate { pipeline } => {
            init_tracing(false);
            validate_pipeline(&pipeline)
        }
        Commands::Explain { pipeline } => {
            init_tracing(false);
            explain_pipeline(&pipeline)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_pipeline(
    pipeline_path: &Path,
    input_path: Option<&Path>,
    overrides: CliOverrides,
    print_manifest: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;

    let config = resolve_config(ExecConfig::from_env(), &parsed.config, &overrides);
    init_tracing(config.trace_elements);
    tracing::debug!(?config, steps = parsed.steps.len(), "resolved configuration");

    let reader: Box<dyn Read> = match input_path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output = run_from_reader(&Engine::new(config), &parsed, reader)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in &output.records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    if print_manifest {
        eprintln!("{}", serde_json::to_string_pretty(&output.manifest)?);
    }
    tracing::info!(
        elements_in = output.manifest.elements_in,
        records_out = output.manifest.records_out,
        duration_ms = output.manifest.duration_ms(),
        plan_hash = %output.manifest.plan_hash,
        "pipeline finished"
    );
    Ok(())
}

/// Decode whitespace-separated JSON numbers from `reader` as the engine pulls
/// them, so a stopped pipeline never reads past the element that stopped it.
fn run_from_reader<R: Read>(
    engine: &Engine,
    parsed: &ParsedPipeline,
    reader: R,
) -> Result<RunOutput, Box<dyn std::error::Error>> {
    let mut bad_input = None;
    let numbers = serde_json::Deserializer::from_reader(reader)
        .into_iter::<Number>()
        .map_while(|r| match r {
            Ok(n) => Some(n),
            Err(e) => {
                bad_input = Some(e);
                None
            }
        });
    let output = engine.run(parsed, numbers)?;
    if let Some(e) = bad_input {
        return Err(format!("input: {e}").into());
    }
    Ok(output)
}

fn validate_pipeline(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    println!("✓ Pipeline is valid ({} steps)", parsed.steps.len());
    Ok(())
}

fn explain_pipeline(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    let bindings = bind(&parsed);

    println!("Pipeline Steps");
    println!("==============");
    for b in &bindings {
        println!(
            "  {}. {:<22} {:<20} [{}]",
            b.index, b.key, b.detail, b.characteristics
        );
    }
    if let Some(all) = pipeline_characteristics(&bindings) {
        println!();
        println!("Pipeline: [{all}]");
    }
    if let Some(n) = parsed.config.max_input_elements {
        println!("Input cap: {n} elements");
    }
    Ok(())
}

/// defaults < environment < YAML `config:` < CLI flags.
fn resolve_config(env: ExecConfig, doc: &PipelineConfig, cli: &CliOverrides) -> ExecConfig {
    let mut cfg = env;
    doc.apply_to(&mut cfg);
    if let Some(n) = cli.max_input {
        cfg.max_input_elements = Some(n);
    }
    if cli.trace_elements {
        cfg.trace_elements = true;
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::{log_filter, resolve_config, run_from_reader, CliOverrides};
    use gather_core::{ExecConfig, Number, Record};
    use gather_exec::Engine;
    use gather_planner::{parse_yaml_pipeline, PipelineConfig};
    use std::io::{self, Read};

    /// Endless "1 1 1 ..." input.
    #[derive(Default)]
    struct Ones {
        pos: usize,
    }

    impl Read for Ones {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            for b in buf.iter_mut() {
                *b = if self.pos % 2 == 0 { b'1' } else { b' ' };
                self.pos += 1;
            }
            Ok(buf.len())
        }
    }

    #[test]
    fn limit_stops_reading_unbounded_input() {
        let p = parse_yaml_pipeline("steps:\n  - op: limit\n    n: 3\n").unwrap();
        let out = run_from_reader(&Engine::new(ExecConfig::default()), &p, Ones::default()).unwrap();
        assert_eq!(out.records, vec![Record::Value(Number::Int(1)); 3]);
        assert!(out.manifest.stopped_early);
        assert_eq!(out.manifest.elements_in, 3);
    }

    #[test]
    fn malformed_input_is_reported_after_the_run() {
        let p = parse_yaml_pipeline("steps:\n  - op: do_nothing\n").unwrap();
        let engine = Engine::new(ExecConfig::default());
        assert!(run_from_reader(&engine, &p, &b"1 2 oops 3"[..]).is_err());
        let out = run_from_reader(&engine, &p, &b"1 2.5\n-3"[..]).unwrap();
        assert_eq!(out.records.len(), 3);
    }

    #[test]
    fn global_rust_log_level_is_kept() {
        let filter = log_filter(Some("trace"), true).to_string();
        assert!(filter.contains("trace"));
        assert!(!filter.contains("warn"));
    }

    #[test]
    fn trace_elements_enables_engine_tracing_over_the_default() {
        let filter = log_filter(None, true).to_string();
        assert!(filter.contains("gather_exec=trace"));
        assert!(filter.contains("warn"));
        assert!(!log_filter(None, false).to_string().contains("gather_exec"));
    }

    #[test]
    fn pipeline_config_overrides_env() {
        let env = ExecConfig {
            max_input_elements: Some(10),
            trace_elements: true,
        };
        let doc = PipelineConfig {
            max_input_elements: Some(20),
            trace_elements: None,
        };
        let cfg = resolve_config(env, &doc, &CliOverrides::default());
        assert_eq!(cfg.max_input_elements, Some(20));
        assert!(cfg.trace_elements);
    }

    #[test]
    fn cli_overrides_higher_priority_than_config() {
        let doc = PipelineConfig {
            max_input_elements: Some(20),
            trace_elements: Some(false),
        };
        let cli = CliOverrides {
            max_input: Some(5),
            trace_elements: true,
        };
        let cfg = resolve_config(ExecConfig::default(), &doc, &cli);
        assert_eq!(cfg.max_input_elements, Some(5));
        assert!(cfg.trace_elements);
    }
}
