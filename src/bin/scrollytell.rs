use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollytell::{Progress, Timeline};

#[derive(Parser, Debug)]
#[command(name = "scrollytell", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a timeline JSON.
    Validate(ValidateArgs),
    /// Evaluate a timeline over an even progress sweep and print every write.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of evenly spaced samples, inclusive of both ends.
    #[arg(long, default_value_t = 11)]
    steps: usize,

    /// Emit one JSON object per write instead of columns.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn read_timeline(path: &Path) -> anyhow::Result<Timeline> {
    let f = File::open(path).with_context(|| format!("open timeline '{}'", path.display()))?;
    let r = BufReader::new(f);
    let timeline: Timeline = serde_json::from_reader(r).with_context(|| "parse timeline JSON")?;
    Ok(timeline)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let timeline = read_timeline(&args.in_path)?;
    timeline.validate()?;
    eprintln!(
        "ok: {} groups, {} labels",
        timeline.groups.len(),
        timeline.labels.len()
    );
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let timeline = read_timeline(&args.in_path)?;
    timeline.validate()?;

    let steps = args.steps.max(2);
    for i in 0..steps {
        let p = Progress(i as f64 / (steps - 1) as f64);
        for write in timeline.sample(p) {
            if args.json {
                let serde_json::Value::Object(mut line) = serde_json::to_value(&write)? else {
                    anyhow::bail!("write did not serialize to an object (bug)");
                };
                line.insert("progress".to_string(), serde_json::json!(p.0));
                println!("{}", serde_json::Value::Object(line));
            } else {
                println!(
                    "p={:.4} {} {:?} {:.6}",
                    p.0, write.target, write.prop, write.value
                );
            }
        }
    }
    Ok(())
}
