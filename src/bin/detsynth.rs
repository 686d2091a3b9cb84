use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use detsynth::{RngMode, SynthConfig};

#[derive(Parser, Debug)]
#[command(name = "detsynth", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset into `<out>/images` and `<out>/labels`.
    Generate(ConfigArgs),
    /// Print the effective configuration as JSON without generating anything.
    DumpConfig(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of background (map) images.
    #[arg(long = "bg-dir")]
    bg_dir: Option<PathBuf>,

    /// Directory of foreground icons with transparency.
    #[arg(long = "fg-dir")]
    fg_dir: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of samples.
    #[arg(long)]
    count: Option<u64>,

    /// Side of the square output image in pixels.
    #[arg(long = "image-size")]
    image_size: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long = "min-scale")]
    min_scale: Option<f64>,

    #[arg(long = "max-scale")]
    max_scale: Option<f64>,

    #[arg(long = "interference-prob")]
    interference_prob: Option<f64>,

    #[arg(long = "glare-prob")]
    glare_prob: Option<f64>,

    #[arg(long = "perspective-prob")]
    perspective_prob: Option<f64>,

    /// Give every sample its own random stream so output does not depend on scheduling.
    #[arg(long = "per-sample-rng", default_value_t = false)]
    per_sample_rng: bool,

    /// Worker threads; implies --per-sample-rng.
    #[arg(long)]
    threads: Option<usize>,
}

impl ConfigArgs {
    fn resolve(self) -> anyhow::Result<SynthConfig> {
        let mut cfg = match &self.config {
            Some(path) => SynthConfig::from_path(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => SynthConfig::default(),
        };

        if let Some(v) = self.bg_dir {
            cfg.background_dir = v;
        }
        if let Some(v) = self.fg_dir {
            cfg.foreground_dir = v;
        }
        if let Some(v) = self.out {
            cfg.output_dir = v;
        }
        if let Some(v) = self.count {
            cfg.count = v;
        }
        if let Some(v) = self.image_size {
            cfg.image_size = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.min_scale {
            cfg.min_scale = v;
        }
        if let Some(v) = self.max_scale {
            cfg.max_scale = v;
        }
        if let Some(v) = self.interference_prob {
            cfg.interference_prob = v;
        }
        if let Some(v) = self.glare_prob {
            cfg.glare_prob = v;
        }
        if let Some(v) = self.perspective_prob {
            cfg.perspective_prob = v;
        }
        if self.per_sample_rng || self.threads.is_some() {
            cfg.rng_mode = RngMode::PerSample;
        }
        if self.threads.is_some() {
            cfg.threads = self.threads;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::DumpConfig(args) => cmd_dump_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_generate(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    let stats = detsynth::run_dataset(&cfg)?;

    eprintln!(
        "wrote {} samples to {} ({} labeled, {} without label, {} exhausted retries, {} failed)",
        stats.samples_total - stats.failed,
        cfg.output_dir.display(),
        stats.labeled,
        stats.accepted_without_label + stats.exhausted_unlabeled,
        stats.exhausted_retries,
        stats.failed,
    );
    Ok(())
}

fn cmd_dump_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    println!("{}", cfg.to_json_pretty()?);
    Ok(())
}
