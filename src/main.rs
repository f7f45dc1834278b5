use clap::Parser;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging, info level unless RUST_LOG says otherwise
    if let Err(e) = docs_scraper::logging::init("info") {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Fatal error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Note: scraping requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Using {} (set WEBDRIVER_URL or --webdriver-url to change it)",
        config.webdriver_url
    );

    let start_time = std::time::Instant::now();
    match docs_scraper::run(&config).await {
        Ok(report) => {
            for (link, reason) in report.failures() {
                ::log::warn!("Not scraped: {} ({})", link.url, reason);
            }
            println!(
                "Scraped {} of {} pages into {} in {:.2} seconds",
                report.saved(),
                report.outcomes.len(),
                config.out_dir.display(),
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            ::log::error!("Fatal error: {}", e);
            std::process::exit(1);
        }
    }
}
