use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use cohort_flow::utils::logging::{create_spinner, finish_spinner};
use cohort_flow::{
    ClassificationCache, CohortConfig, DatasetKey, DimensionSelection, Level, Metric, ReportQuery,
    dimension_options, load_encounters_async,
};
use log::{info, warn};

const DATA_PATH_ENV: &str = "COHORT_DATA_PATH";

const USAGE: &str = "usage: cohort-flow <data-path> [level] [metric] [date-from] [date-to] [value]";

fn parse_date(arg: Option<&String>, name: &str) -> anyhow::Result<Option<NaiveDate>> {
    arg.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid {name} '{s}', expected YYYY-MM-DD"))
    })
    .transpose()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let data_path = match args.first() {
        Some(path) => PathBuf::from(path),
        None => match std::env::var(DATA_PATH_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => bail!("{USAGE}\n(or set {DATA_PATH_ENV})"),
        },
    };
    let level: Level = args.get(1).map_or(Ok(Level::Global), |s| s.parse())?;
    let metric: Metric = args.get(2).map_or(Ok(Metric::New), |s| s.parse())?;
    let date_from = parse_date(args.get(3), "date-from")?;
    let date_to = parse_date(args.get(4), "date-to")?;
    let selection = DimensionSelection::from(args.get(5).map(String::as_str));

    let config = CohortConfig::from_env();
    info!("{config}");

    let start = Instant::now();
    let spinner = create_spinner(&format!("Loading {}", data_path.display()));
    let key = DatasetKey::from_path(&data_path)
        .with_context(|| format!("Cannot read data source {}", data_path.display()))?;
    let records = load_encounters_async(&data_path, &config)
        .await
        .with_context(|| format!("Failed to load encounters from {}", data_path.display()))?;
    finish_spinner(&spinner, &format!("Loaded {} encounters", records.len()));

    let cache = ClassificationCache::new();
    let dataset = cache
        .get_or_classify(&key, move || Ok(records))
        .context("Failed to classify encounters")?;

    let Some(bounds) = dataset.date_bounds() else {
        warn!("No encounters found in {}", data_path.display());
        return Ok(());
    };
    let query = ReportQuery::new(
        level,
        metric,
        date_from.unwrap_or(bounds.start_date()),
        date_to.unwrap_or(bounds.end_date()),
        selection,
    )?;

    let options = dimension_options(&dataset, level, &query.range);
    if !options.is_empty() {
        info!("{} values for {level} in {}: {}", options.len(), query.range, options.join(", "));
    }

    let rows = query.run(&dataset)?;
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }

    info!(
        "Report '{query}' over {} produced {} rows in {:?}",
        query.range,
        rows.len(),
        start.elapsed()
    );
    Ok(())
}
