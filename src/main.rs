use env_logger::Env;
use lead_sieve::{configuration::get_configuration, startup::run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let report_path = run(configuration).await?;
    println!("Success! File saved as '{}'", report_path.display());

    Ok(())
}
