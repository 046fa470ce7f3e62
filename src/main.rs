//! satsplit CLI - sentence segmentation against a remote scoring model.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::error;
use tokenizers::Tokenizer;

use satsplit::{Benchmark, Splitter, SplitConfig, TritonBackend};

#[derive(Parser)]
#[command(name = "satsplit")]
#[command(version)]
#[command(about = "Sentence segmentation via remote model inference", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split text into sentences
    Split {
        /// Text to split (reads stdin when omitted)
        text: Option<String>,

        /// Read the input text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Print the boundary probability for every character
    Probs {
        /// Text to score (reads stdin when omitted)
        text: Option<String>,

        /// Read the input text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Check server and model readiness
    Ready {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Run the concurrent load benchmark
    Bench {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Requests issued by each client
        #[arg(short, long, default_value = "20")]
        requests: usize,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// Inference server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Inference server HTTP port
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Model name served by the backend
    #[arg(short, long, default_value = "sat_3l_sm")]
    model: String,
}

#[derive(Args)]
struct PipelineArgs {
    /// Probability threshold for sentence boundaries
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Maximum token window including boundary markers
    #[arg(long)]
    block_size: Option<usize>,

    /// Token advance between window starts
    #[arg(long)]
    stride: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local tokenizer.json (downloads the XLM-RoBERTa tokenizer when omitted)
    #[arg(long)]
    tokenizer: Option<PathBuf>,
}

impl PipelineArgs {
    fn to_config(&self) -> satsplit::Result<SplitConfig> {
        let mut config = match &self.config {
            Some(path) => SplitConfig::from_file(path)?,
            None => SplitConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }

        config.validate()?;
        Ok(config)
    }

    fn load_tokenizer(&self) -> satsplit::Result<Tokenizer> {
        let path = satsplit::fetch_tokenizer(self.tokenizer.as_deref())?;
        Tokenizer::from_file(&path).map_err(satsplit::Error::Tokenizer)
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(err) = run(cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> satsplit::Result<()> {
    match cli.command {
        Commands::Split {
            text,
            file,
            connection,
            pipeline,
        } => {
            let input = read_input(text, file)?;
            let splitter = build_splitter(&connection, &pipeline)?;

            let sentences = splitter.split(&input)?;
            println!("{} sentences:", sentences.len());
            for (i, sentence) in sentences.iter().enumerate() {
                println!("[{}] {}", i + 1, sentence);
            }
            Ok(())
        }

        Commands::Probs {
            text,
            file,
            connection,
            pipeline,
        } => {
            let input = read_input(text, file)?;
            let splitter = build_splitter(&connection, &pipeline)?;

            let probs = splitter.predict_char_probs(&input)?;
            for (i, (c, prob)) in input.chars().zip(&probs).enumerate() {
                println!("{:>6}  {:?}  {:.4}", i, c, prob);
            }
            Ok(())
        }

        Commands::Ready { connection } => {
            let backend =
                TritonBackend::new(&connection.host, connection.port, &connection.model)?;
            backend.ensure_ready()?;
            println!(
                "server and model ready: {}:{} ({})",
                connection.host, connection.port, connection.model
            );
            Ok(())
        }

        Commands::Bench {
            connection,
            pipeline,
            requests,
        } => {
            let config = pipeline.to_config()?;
            let tokenizer = pipeline.load_tokenizer()?;
            Benchmark::new(
                &connection.host,
                connection.port,
                &connection.model,
                requests,
                tokenizer,
                config,
            )
            .run()
        }
    }
}

fn build_splitter(
    connection: &ConnectionArgs,
    pipeline: &PipelineArgs,
) -> satsplit::Result<Splitter<TritonBackend>> {
    let config = pipeline.to_config()?;
    let tokenizer = pipeline.load_tokenizer()?;

    let backend = TritonBackend::new(&connection.host, connection.port, &connection.model)?;
    backend.ensure_ready()?;

    Splitter::new(backend, tokenizer, config)
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> satsplit::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(fs::read_to_string(path)?);
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
