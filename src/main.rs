// src/main.rs

use env_logger::Env;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::{error, info};
use std::path::PathBuf;
use ramanujan::config::SearchConfig;
use ramanujan::core::constant::{Constant, ConstantId};
use ramanujan::core::pcf::Pcf;
use ramanujan::core::store::{ConstantStore, MemoryStore};
use ramanujan::error::{PcfError, Result};
use ramanujan::jobs::{const_cf, poly_pslq, precision};
use ramanujan::numeric::{NamedConstant, Precision};

const USAGE: &str = "usage: ramanujan [--config FILE] [--store FILE] [--const-cf] [--pcf A:B]...
  A and B are comma separated coefficients, highest degree first, e.g. --pcf -1,0,0:2,1";

#[derive(Debug, Default)]
struct Arguments {
    config: Option<PathBuf>,
    store: Option<PathBuf>,
    pcfs: Vec<Pcf>,
    const_cf: bool,
}

fn parse_coefficients(text: &str) -> Result<Vec<i64>> {
    text.split(',')
        .map(|c| c.trim().parse::<i64>().map_err(|_| PcfError::InvalidArgument(format!("bad coefficient {:?}", c))))
        .collect()
}

fn parse_pcf(text: &str) -> Result<Pcf> {
    let (a, b) = text
        .split_once(':')
        .ok_or_else(|| PcfError::InvalidArgument(format!("expected A:B, got {:?}", text)))?;
    Pcf::from_coefficients(&parse_coefficients(a)?, &parse_coefficients(b)?)
}

fn parse_arguments(args: &[String]) -> Result<Arguments> {
    let mut arguments = Arguments::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| PcfError::InvalidArgument(format!("{} needs a value", arg)))
        };
        match arg.as_str() {
            "--config" => arguments.config = Some(PathBuf::from(value()?)),
            "--store" => arguments.store = Some(PathBuf::from(value()?)),
            "--pcf" => arguments.pcfs.push(parse_pcf(&value()?)?),
            "--const-cf" => arguments.const_cf = true,
            other => return Err(PcfError::InvalidArgument(format!("unknown argument {:?}\n{}", other, USAGE))),
        }
    }
    Ok(arguments)
}

/// A per-process log file when one is configured, stderr otherwise. The handle must outlive
/// the run.
fn init_logging(config: &SearchConfig) -> Result<Option<LoggerHandle>> {
    match &config.log_file {
        Some(basename) => {
            let handle = Logger::try_with_str(&config.log_level)?
                .log_to_file(FileSpec::default().basename(format!("{}_{}", basename, std::process::id())))
                .start()?;
            Ok(Some(handle))
        }
        None => {
            env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str())).init();
            Ok(None)
        }
    }
}

fn seed_named<S: ConstantStore>(store: &mut S, digits: u32) {
    if store.constants().iter().any(|c| c.is_named()) {
        return;
    }
    let precision = Precision::from_digits(digits);
    for named in NamedConstant::ALL {
        let constant = Constant::named(ConstantId(0), named, precision);
        let id = store.insert(constant.value, constant.precision, constant.kind);
        info!("seeded {} as {}", named.name(), id);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let arguments = parse_arguments(&args)?;

    let config = match &arguments.config {
        Some(path) => SearchConfig::load_from_file(path)?,
        None => SearchConfig::load()?,
    };
    let _logger = init_logging(&config)?;

    let mut store = match &arguments.store {
        Some(path) if path.exists() => MemoryStore::load(path)?,
        _ => MemoryStore::new(),
    };
    seed_named(&mut store, config.jobs.named_precision);
    for pcf in arguments.pcfs {
        let constant = Constant::pcf(ConstantId(0), pcf);
        store.insert(None, None, constant.kind);
    }

    precision::run(&mut store, &config)?;
    poly_pslq::run(&mut store, &config)?;
    if arguments.const_cf {
        const_cf::run(&mut store, &config)?;
    }

    if let Some(path) = &arguments.store {
        store.save(path)?;
    }
    println!("{}", serde_json::to_string_pretty(&store.relations())?);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        error!("{}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
