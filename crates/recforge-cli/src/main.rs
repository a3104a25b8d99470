use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::BuildArgs;

fn cli() -> Command {
    Command::new("recforge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build validated result records from broadcast inputs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("build")
                .about("Build records from a step spec and a JSON field file")
                .arg(
                    Arg::new("spec")
                        .long("spec")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Step spec (.toml, .yaml or .json)"),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON object of named input fields"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write records here instead of stdout"),
                )
                .arg(
                    Arg::new("undefined")
                        .long("undefined")
                        .value_name("TOKEN")
                        .help("String read as an undefined value; JSON null is always a plain null"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the output"),
                ),
        )
        .subcommand(
            Command::new("cache-path")
                .about("Print the cache file path for a category and identifier")
                .arg(Arg::new("category").required(true).help("Object category"))
                .arg(
                    Arg::new("id")
                        .long("id")
                        .help("Object identifier; only the first 8 characters are used"),
                )
                .arg(
                    Arg::new("workdir")
                        .long("workdir")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Cache working directory"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_args(args: &ArgMatches) -> Option<BuildArgs> {
    Some(BuildArgs {
        spec: args.get_one::<PathBuf>("spec")?.clone(),
        input: args.get_one::<PathBuf>("input")?.clone(),
        output: args.get_one::<PathBuf>("output").cloned(),
        pretty: args.get_flag("pretty"),
        undefined: args.get_one::<String>("undefined").cloned(),
    })
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("build", args)) => {
            let args = build_args(args).ok_or_else(|| anyhow::anyhow!("missing --spec or --input"))?;
            commands::build(&args)
        }
        Some(("cache-path", args)) => {
            let category = args
                .get_one::<String>("category")
                .ok_or_else(|| anyhow::anyhow!("missing category"))?;
            let workdir = args
                .get_one::<PathBuf>("workdir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            let id = args.get_one::<String>("id").map(String::as_str);
            println!("{}", commands::cache_path(&workdir, category, id).display());
            Ok(())
        }
        _ => anyhow::bail!("no subcommand given"),
    }
}
