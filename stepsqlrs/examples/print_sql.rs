use std::{env, path::PathBuf};

use stepsql::{DialectRegistry, Step, StepSqlConfig};
use tracing_subscriber::EnvFilter;

fn usage() {
    eprintln!("Usage: print_sql <connection_string> <step_file>");
    eprintln!("Example: cargo run --example print_sql -- jdbc:oracle:thin:@db:1521/ORCL demos/sample.yaml");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() < 2 {
        usage();
        std::process::exit(1);
    }

    let connection_string = args.remove(0);
    let step_path = PathBuf::from(args.remove(0));

    let config = StepSqlConfig::load_default();
    let registry = DialectRegistry::from_config(&config)?;
    let provider = registry.resolve(&connection_string)?;
    let step = Step::from_file(&step_path)?;

    let sql = provider.to_sql(&step)?;
    println!("{sql}");
    Ok(())
}
