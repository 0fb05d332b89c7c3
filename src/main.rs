use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, process};

use dirmirror::callbacks::EventSink;
use dirmirror::config::Config;
use dirmirror::journal::Journal;
use dirmirror::logging::{self, *};
use dirmirror::schedule;
use dirmirror::utils::{setup_signal_handlers, Shutdown};

fn cli() -> Command {
	Command::new("dirmirror")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Periodically mirror a source directory into a replica")
		.arg(Arg::new("source").value_name("SOURCE").help("Source directory [default: ./source]"))
		.arg(
			Arg::new("replica")
				.value_name("REPLICA")
				.help("Replica directory [default: ./replica]"),
		)
		.arg(
			Arg::new("interval")
				.value_name("INTERVAL")
				.value_parser(value_parser!(u64))
				.help("Seconds between passes [default: 60]"),
		)
		.arg(
			Arg::new("log_file")
				.value_name("LOG_FILE")
				.help("Action journal [default: ./logs/sync.log]"),
		)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.help("TOML config file; positional values override it"),
		)
		.arg(
			Arg::new("once")
				.long("once")
				.action(ArgAction::SetTrue)
				.help("Run a single pass and exit"),
		)
}

/// Defaults, then the config file, then positional values
fn build_config(matches: &ArgMatches) -> Result<Config, Box<dyn Error>> {
	let mut config = match matches.get_one::<String>("config") {
		Some(path) => Config::load_file(Path::new(path))?,
		None => Config::default(),
	};

	if let Some(source) = matches.get_one::<String>("source") {
		config.source = PathBuf::from(source);
	}
	if let Some(replica) = matches.get_one::<String>("replica") {
		config.replica = PathBuf::from(replica);
	}
	if let Some(interval) = matches.get_one::<u64>("interval") {
		config.interval_secs = *interval;
	}
	if let Some(log_file) = matches.get_one::<String>("log_file") {
		config.log_file = PathBuf::from(log_file);
	}

	Ok(config)
}

fn open_journal(path: &Path) -> Result<Journal, Box<dyn Error>> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)
				.map_err(|e| format!("Cannot create log directory {}: {}", parent.display(), e))?;
		}
	}
	Journal::open(path).map_err(|e| format!("Cannot open log file {}: {}", path.display(), e).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	logging::init_tracing();

	let matches = cli().get_matches();
	let config = build_config(&matches)?;
	config.check()?;

	let sink: Arc<dyn EventSink> = Arc::new(open_journal(&config.log_file)?);
	let shutdown = Shutdown::new();
	setup_signal_handlers(shutdown.clone());

	if matches.get_flag("once") {
		match schedule::run_pass(&config, sink, shutdown).await {
			Ok(report) => {
				if !report.failures.is_empty() {
					warn!("{} items failed", report.failures.len());
				}
				return Ok(());
			}
			Err(e) => {
				error!("Pass aborted: {}", e);
				process::exit(1);
			}
		}
	}

	schedule::run(config, sink, shutdown).await;
	Ok(())
}


// vim: ts=4
