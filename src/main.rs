use avl_collections::avl_tree::AvlSet;
use avl_collections::dataset::{self, Config};
use avl_collections::shell::Shell;
use avl_collections::{Error, Result};
use log::{error, info, LevelFilter};
use simplelog::SimpleLogger;
use std::env;
use std::io;
use std::process;
use std::str::FromStr;
use std::time::Instant;

// usage: avl-shell [SIZE] [PATH] [SEED]
fn parse_config() -> Result<Config> {
    let mut config = Config::default();
    let mut args = env::args().skip(1);
    if let Some(size) = args.next() {
        config.size = size.parse().map_err(|_| Error::InvalidArgument {
            command: "size",
            value: size.clone(),
        })?;
    }
    if let Some(path) = args.next() {
        config.path = path.into();
    }
    if let Some(seed) = args.next() {
        let seed = seed.parse().map_err(|_| Error::InvalidArgument {
            command: "seed",
            value: seed.clone(),
        })?;
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn run() -> Result<()> {
    let config = parse_config()?;
    let keys = config.generate();
    dataset::dump(&config.path, &keys)?;

    let start = Instant::now();
    let set = keys.into_iter().collect::<AvlSet<i64>>();
    info!(
        "built tree of {} keys with height {} in {:?}",
        set.len(),
        set.tree_height(),
        start.elapsed(),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(set).run(stdin.lock(), stdout.lock())
}

fn main() {
    let level = env::var("AVL_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info);
    if let Err(err) = SimpleLogger::init(level, simplelog::Config::default()) {
        eprintln!("failed to initialize logger: {}", err);
    }

    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
