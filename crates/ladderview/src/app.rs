use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("ladderview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Drive and inspect the StarCraft II ladder stats panel from a terminal")
        .long_about("ladderview mounts a viewer panel against a fixture-backed gateway, keeps it fresh on a timer and prints what the panel would render. It can also inspect the persistent per-channel cache and check profile URLs the way the broadcaster configuration form does.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("watch")
                .about("Mount a viewer panel and print the view after every change")
                .arg(
                    Arg::new("channel")
                        .long("channel")
                        .short('c')
                        .help("Channel id the viewer is authenticated for")
                        .required(true)
                )
                .arg(
                    Arg::new("token")
                        .long("token")
                        .help("Access token passed to the gateway")
                        .required(true)
                )
                .arg(
                    Arg::new("fixtures")
                        .long("fixtures")
                        .help("Directory with <channel>.json gateway responses, re-read on every poll")
                        .required(true)
                )
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Polling interval in milliseconds (overrides config)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("ticks")
                        .long("ticks")
                        .help("Unmount after this many polling intervals (default: run until Ctrl+C)")
                        .value_parser(clap::value_parser!(u64))
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON object per view")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("cache")
                .about("Inspect the persistent view cache")
                .subcommand_required(true)
                .subcommand(
                    Command::new("show")
                        .about("Print the cached view for a channel")
                        .arg(
                            Arg::new("channel")
                                .long("channel")
                                .short('c')
                                .help("Channel id")
                                .required(true)
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Print the raw cache entry as JSON")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("clear")
                        .about("Remove the cached view for a channel")
                        .arg(
                            Arg::new("channel")
                                .long("channel")
                                .short('c')
                                .help("Channel id")
                                .required(true)
                        )
                )
        )
        .subcommand(
            Command::new("profile")
                .about("Work with StarCraft II profile URLs")
                .subcommand_required(true)
                .subcommand(
                    Command::new("parse")
                        .about("Validate a profile URL and print its region, realm and player ids")
                        .arg(
                            Arg::new("url")
                                .help("Profile URL, e.g. https://starcraft2.com/en-us/profile/2/1/4567890")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
        )
}
