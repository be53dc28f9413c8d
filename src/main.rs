use std::io::{self, Read};

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wsvn::configuration::{build_configuration, get_environment};
use wsvn::domain::ChangeLog;
use wsvn::render_change_log;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let environment = get_environment()?;
    let configuration = build_configuration(environment)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&configuration.application.log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let browser = configuration.websvn2.browser()?;
    info!(
        "Linking {} change logs into repository {} ({} configuration)",
        browser.display_name(),
        browser.repname(),
        environment.as_str()
    );

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let change_log: ChangeLog = serde_json::from_str(&input)?;

    let rendered = render_change_log(&browser, &change_log)?;
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
