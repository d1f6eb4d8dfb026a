use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tour_cli::{ReplayOptions, SyncOptions};

fn cli() -> Command {
    let metadata = Arg::new("metadata")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("JSON file with the document metadata object");
    let document_id = Arg::new("document-id")
        .long("document-id")
        .help("Document id (defaults to the metadata file name)");
    let config = Arg::new("config")
        .long("config")
        .value_parser(clap::value_parser!(PathBuf))
        .help("TOML file with synchronizer settings");

    Command::new("tourctl")
        .version(tour_cli::VERSION)
        .about("Inspect and replay document tours")
        .subcommand_required(true)
        .subcommand(
            Command::new("sync")
                .about("Register the tours declared in document metadata")
                .arg(metadata.clone())
                .arg(document_id.clone())
                .arg(config.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Feed recorded renderer events to one tour")
                .arg(metadata)
                .arg(
                    Arg::new("tour")
                        .long("tour")
                        .required(true)
                        .help("Definition id of the tour"),
                )
                .arg(
                    Arg::new("events")
                        .long("events")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("JSON file with an array of events"),
                )
                .arg(document_id)
                .arg(config),
        )
}

fn path_arg(args: &ArgMatches, name: &str) -> PathBuf {
    args.get_one::<PathBuf>(name).cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("sync", args)) => {
            let options = SyncOptions {
                metadata: path_arg(args, "metadata"),
                document_id: args.get_one::<String>("document-id").cloned(),
                config: args.get_one::<PathBuf>("config").cloned(),
                json: args.get_flag("json"),
            };
            let summary = tour_cli::sync(&options)?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.render_text());
            }
        }
        Some(("replay", args)) => {
            let options = ReplayOptions {
                metadata: path_arg(args, "metadata"),
                tour: args.get_one::<String>("tour").cloned().unwrap_or_default(),
                events: path_arg(args, "events"),
                document_id: args.get_one::<String>("document-id").cloned(),
                config: args.get_one::<PathBuf>("config").cloned(),
            };
            let summary = tour_cli::replay(&options).await?;
            println!("{}", summary.render_text());
        }
        _ => {}
    }

    Ok(())
}
