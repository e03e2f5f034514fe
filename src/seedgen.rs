use anyhow::Result;
use opsdesk::{write_synthetic, SyntheticDataset};
use std::env;

struct Config {
    rows_per_table: usize,
    seed: u64,
    output_file: Option<String>,
    use_brotli: bool,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = SyntheticDataset::default();
        Config {
            rows_per_table: defaults.rows_per_table(),
            seed: defaults.seed(),
            output_file: None,
            use_brotli: false,
        }
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-rows" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-rows requires an argument");
                }
                config.rows_per_table = args[i].parse()?;
            }
            "-seed" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-seed requires an argument");
                }
                config.seed = args[i].parse()?;
            }
            "-out" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-out requires a file path argument");
                }
                config.output_file = Some(args[i].clone());
            }
            "-brotli" => {
                config.use_brotli = true;
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                log::warn!("unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Opsdesk Dataset Generator");
    println!("Usage: opsdesk-seedgen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -rows <N>              Rows per table (default: 2000)");
    println!("  -seed <N>              Random seed (default: 42)");
    println!("  -out <FILE>            Output file path (default: dataset.jsonl)");
    println!("  -brotli                Compress with Brotli (appends .br when missing)");
    println!("  -h, -help, --help      Show this help message");
}

/// Resolves the output path; `.br` selects compression in the writer.
fn output_path(config: &Config) -> String {
    let path = config
        .output_file
        .clone()
        .unwrap_or_else(|| "dataset.jsonl".to_string());
    if config.use_brotli && !path.ends_with(".br") {
        format!("{}.br", path)
    } else {
        path
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args()?;
    let output_path = output_path(&config);
    let dataset = SyntheticDataset::new(config.seed, config.rows_per_table);

    let rows = write_synthetic(&output_path, &dataset)?;
    println!("Dataset written to: {} ({} rows)", output_path, rows);

    Ok(())
}
