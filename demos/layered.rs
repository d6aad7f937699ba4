use anyhow::Context;
use clap::Parser;
use confpatch::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Load a base config, layer extensions over it and print the result
#[derive(Parser)]
#[command(name = "layered")]
struct Cli {
    /// Base TOML file
    base: PathBuf,

    /// Extension files, applied in order
    #[arg(short, long = "ext")]
    extensions: Vec<PathBuf>,

    /// Dotted section to print (whole tree by default)
    #[arg(short, long, default_value = "")]
    section: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_file(&cli.base)
        .with_context(|| format!("loading {}", cli.base.display()))?;

    for ext in &cli.extensions {
        config
            .load_ext(ext)
            .with_context(|| format!("applying {}", ext.display()))?;
    }

    match config.get(&cli.section) {
        Some(toml::Value::Table(table)) => print!("{}", toml::to_string_pretty(table)?),
        Some(value) => println!("{value}"),
        None => {
            eprintln!("Section '{}' not found", cli.section);
            std::process::exit(1);
        }
    }

    Ok(())
}
