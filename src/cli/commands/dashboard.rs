use clap::{Arg, ArgAction, Command};

pub const NAME: &str = "dashboard";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(NAME)
        .about("Render the dashboard in the terminal")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of a running TechyPark API")
                .default_value("http://localhost:8080")
                .env("TECHYPARK_API_URL"),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .help("Seconds between metric refreshes")
                .default_value("5")
                .env("TECHYPARK_DASHBOARD_INTERVAL")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .help("Render a single frame and exit")
                .action(ArgAction::SetTrue),
        )
}
