//! An interactive tag input, in the terminal

#![warn(clippy::style, clippy::perf)]
#![deny(
    clippy::perf,
    clippy::len_zero,
    clippy::redundant_closure,
    unused_must_use
)]

use clap::{Arg, ArgMatches};
use std::path::{Path, PathBuf};
use std::process::exit;

use tagedit::config::{self, ConfigBuilder};
use tagedit::{host, logger, Config, Strategy};

/// The default name for the configuration file within its directory
static DEFAULT_CONFIG_FILE_NAME: &str = "tagedit.yml";

fn main() {
    let matches = generate_main_clap_app().get_matches();

    if let Err(e) = logger::init() {
        eprintln!("fatal error: failed to initialize logger: {}", e);
        exit(1);
    }

    let config = match load_config(&matches) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("fatal error: {}", e);
            exit(1);
        }
    };

    logger::set_level(config.log_level);
    if let Some(path) = config.log_file.as_ref() {
        if let Err(e) = logger::open_file(path) {
            eprintln!("fatal error: {}", e);
            exit(1);
        }
    }

    log::info!("config parsed, logging fully initialized: {:?}", config);

    match host::run(&config) {
        Ok(tags) => {
            for tag in tags {
                println!("{}", tag);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("fatal error: {}", e);
            exit(1);
        }
    }
}

/// Produces the final configuration from the config file and the command-line arguments
///
/// An explicitly given config file must exist. The default one is allowed to be missing.
fn load_config(matches: &ArgMatches) -> Result<Config, String> {
    let from_file = match matches.value_of("config") {
        Some(path) => ConfigBuilder::from_file(Path::new(path)).map_err(|e| e.to_string())?,
        None => {
            let default_file = config::find_default_directory_location()
                .map(|dir| dir.join(DEFAULT_CONFIG_FILE_NAME))
                .filter(|path| path.is_file());

            match default_file {
                Some(path) => ConfigBuilder::from_file(&path).map_err(|e| e.to_string())?,
                None => ConfigBuilder::default(),
            }
        }
    };

    let from_args = builder_from_args(matches)?;
    from_file.merge(from_args).build().map_err(|e| e.to_string())
}

fn builder_from_args(matches: &ArgMatches) -> Result<ConfigBuilder, String> {
    let delimiter = match matches.value_of("delimiter") {
        None => None,
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => return Err(format!("delimiter must be a single character, got {:?}", s)),
            }
        }
    };

    let strategy = matches.value_of("strategy").map(|s| match s {
        "delimited" => Strategy::Delimited,
        _ => Strategy::Tracking,
    });

    Ok(ConfigBuilder {
        delimiter,
        strategy,
        log_level: matches
            .value_of("log-level")
            .and_then(logger::level_filter_from_str),
        log_file: matches.value_of("log-file").map(PathBuf::from),
        ..ConfigBuilder::default()
    })
}

/// Generates the command-line arguments for the application
#[rustfmt::skip]
fn generate_main_clap_app() -> clap::App<'static> {
    clap::App::new("tagedit")
        .version("0.1")
        .about("Type text, commit it as tags")
        .arg(Arg::new("config")
            .long("config")
            .help("Sets the config file to use")
            .long_help(concat!(
                "Sets the config file to use.\n",
                "If not given, the default behavior is as follows: We search for the existence",
                " of a directory '$XDG_CONFIG_HOME/tagedit', '$HOME/.config/tagedit', and then",
                " '$HOME/.tagedit'. For the first directory $dir that we find, we parse the",
                " configuration from '$dir/tagedit.yml', if it exists.\n"
            ))
            .takes_value(true)
        )
        .arg(Arg::new("log-file")
            .long("log-file")
            .help("Optionally enables logging to a file")
            .takes_value(true)
        )
        .arg(Arg::new("log-level")
            .long("log-level")
            .help("Sets the level of log output to provide")
            .long_help(concat!(
                "Sets the level of log output to provide.\n",
                r#"Defaults to "Warn" - i.e. excluding "Trace", "Debug", and "Info" messages."#,
                " This can also be provided by the 'log_level' field in the configuration file",
            ))
            .takes_value(true)
            .possible_values(["Off", "Trace", "Debug", "Info", "Warn", "Error"])
        )
        .arg(Arg::new("strategy")
            .long("strategy")
            .help("Sets how tags are derived from the text")
            .long_help(concat!(
                "Sets how tags are derived from the text.\n",
                "'tracking' (the default) commits the pending text with the commit key.",
                " 'delimited' splits the text on the delimiter every time it's typed.",
            ))
            .takes_value(true)
            .possible_values(["tracking", "delimited"])
        )
        .arg(Arg::new("delimiter")
            .long("delimiter")
            .help("Sets the character that separates tags (default ',')")
            .takes_value(true)
        )
}
