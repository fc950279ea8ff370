use story_spoiler::configuration::get_configuration;
use story_spoiler::suite;
use story_spoiler::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("story-spoiler".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    let report = suite::run(&configuration).await?;
    println!("{}", report);

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
