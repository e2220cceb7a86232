use std::{env, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, Command};
use tracing::{info, warn};

use crate::{
    config::GatewayConfig,
    export::{
        CommandRasterizer, HtmlFilePrintHost, MarkdownExporter, PdfExporter, PrintHost, PrintJob,
    },
    render::{render, RenderOptions},
    AppState, BudgetLevel, GeminiGateway, StateController, TravelerGroup, UserPreferences,
};

fn command() -> Command {
    Command::new("wander")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate a day-by-day travel itinerary and export it as HTML, Markdown and PDF")
        .arg(
            Arg::new("destination")
                .short('d')
                .long("destination")
                .value_name("PLACE")
                .help("Where to go, e.g. 东京")
                .required(true),
        )
        .arg(
            Arg::new("days")
                .short('n')
                .long("days")
                .value_name("DAYS")
                .help("Trip length in days (1-14)")
                .value_parser(value_parser!(u32).range(1..=14))
                .default_value("3"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("LEVEL")
                .help("budget, moderate or luxury")
                .default_value("moderate"),
        )
        .arg(
            Arg::new("interest")
                .short('i')
                .long("interest")
                .value_name("INTEREST")
                .help("Interest to focus on; repeat for more (at most 5)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("travelers")
                .short('w')
                .long("travelers")
                .value_name("GROUP")
                .help("solo, couple, family or friends")
                .default_value("couple"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Directory the exports are written to")
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("rasterizer-cmd")
                .long("rasterizer-cmd")
                .value_name("COMMAND")
                .help("HTML-on-stdin to P6-PPM-on-stdout command; enables PDF export"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Gemini API key (or set GEMINI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Gemini API base URL (or set GEMINI_BASE_URL env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds")
                .value_parser(value_parser!(u64)),
        )
}

/// CLI entry point for the wander tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = command().get_matches();

    let destination = matches
        .get_one::<String>("destination")
        .cloned()
        .unwrap_or_default();
    let days = matches.get_one::<u32>("days").copied().unwrap_or(3);
    let budget_level: BudgetLevel = matches
        .get_one::<String>("budget")
        .map(String::as_str)
        .unwrap_or("moderate")
        .parse()?;
    let travelers: TravelerGroup = matches
        .get_one::<String>("travelers")
        .map(String::as_str)
        .unwrap_or("couple")
        .parse()?;
    let interests: Vec<String> = matches
        .get_many::<String>("interest")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let prefs = UserPreferences::new(destination, days)
        .with_budget_level(budget_level)
        .with_travelers(travelers)
        .with_interests(interests);

    let api_key = matches.get_one::<String>("api-key").cloned();
    let mut config = GatewayConfig::from_lookup(|name| match (name, &api_key) {
        ("GEMINI_API_KEY", Some(key)) => Some(key.clone()),
        _ => env::var(name).ok(),
    })?;
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*seconds));
    }

    info!(
        destination = %prefs.destination,
        days = prefs.duration,
        budget = %prefs.budget_level,
        text_model = %config.text_model,
        "Planning trip"
    );

    let gateway = GeminiGateway::new(config)?;
    let mut controller = StateController::new();
    println!("正在精心制作攻略...");

    let trip = match controller.run(&gateway, &prefs).await? {
        AppState::Display(trip) => trip.clone(),
        AppState::Error { message } => bail!("哎呀！出错了：{message}"),
        other => bail!("generation ended in unexpected state `{}`", other.name()),
    };

    let out_dir = matches
        .get_one::<PathBuf>("out-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    let document = render(
        &trip.itinerary,
        trip.hero_image.as_ref(),
        &RenderOptions::default(),
    );
    println!("\n{}\n{}\n", document.title, trip.itinerary.summary);

    let host = HtmlFilePrintHost::new(out_dir.clone());
    let job = PrintJob::from_document(&document);
    host.print(&job).await?;
    println!("打印版: {}", host.path_for(&job).display());

    let markdown = MarkdownExporter::new().export(&trip.itinerary);
    let path = markdown.write_to(&out_dir).await?;
    println!("Markdown: {}", path.display());

    if let Some(rasterizer) = matches
        .get_one::<String>("rasterizer-cmd")
        .map(String::as_str)
        .and_then(CommandRasterizer::from_command_line)
    {
        let exporter = PdfExporter::new(rasterizer);
        match exporter.export(&document).await {
            Ok(file) => match file.write_to(&out_dir).await {
                Ok(path) => println!("PDF: {}", path.display()),
                Err(err) => eprintln!("{}", err.advisory()),
            },
            Err(err) => {
                warn!(code = err.error_code(), "PDF export skipped");
                eprintln!("{}", err.advisory());
            }
        }
    }

    Ok(())
}
