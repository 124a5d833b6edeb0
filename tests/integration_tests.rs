use anyhow::Result;
use serde_json::Value;
use tempfile::TempDir;
use ufo_etl::core::Pipeline;
use ufo_etl::{CliConfig, EtlEngine, EtlError, LocalStorage, Sighting, SightingPipeline};

const SCRUBBED_HEADER: &str = "datetime,city,state,country,shape,duration (seconds),\
duration (hours/min),comments,date posted,latitude,longitude \n";

const PLAIN_HEADER: &str = "datetime,city,state,country,shape,duration (seconds),\
duration (hours/min),comments,date posted,latitude,longitude\n";

const ROWS: &str = "\
10/10/1949 20:30,san marcos,tx,us,cylinder,2700,45 minutes,This event took place in early fall around 1949-50,4/27/2004,29.8830556,-97.9411111
10/10/1949 21:00,lackland afb,tx,,light,7200,1-2 hrs,1949 Lackland AFB&#44 TX.  Lights racing across the sky,12/16/2005,29.38421,-98.581082
,houston,tx,us,disk,60,1 minute,no datetime,1/1/2000,29.76,-95.36
10/10/1955 17:00,chester (uk/england),,gb,circle,20,20 seconds,Green/Orange circular disc over Chester,1/21/2008,abc,-2.916667
10/10/1956 21:00,,tx,us,disk,1200,20 minutes,no city,1/17/2004,28.97,-96.64
10/10/1960 20:00,kaneohe,hi,us,light,900,15 minutes,AS a Marine 1st Lt. flying an FJ4B,1/22/2004,21.4180556,-157.8036111
";

struct Fixture {
    _temp_dir: TempDir,
    input: String,
    output: String,
}

fn fixture(header: &str, rows: &str) -> Result<Fixture> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("scrubbed.csv");
    std::fs::write(&input, format!("{}{}", header, rows))?;
    let output = temp_dir.path().join("app/src/main/assets/sightings.json");

    Ok(Fixture {
        input: input.to_str().unwrap().to_string(),
        output: output.to_str().unwrap().to_string(),
        _temp_dir: temp_dir,
    })
}

fn config(fixture: &Fixture, limit: Option<usize>) -> CliConfig {
    CliConfig {
        input: fixture.input.clone(),
        output: fixture.output.clone(),
        limit,
        pretty: false,
        verbose: false,
        monitor: false,
    }
}

async fn run(fixture: &Fixture, limit: Option<usize>) -> ufo_etl::Result<String> {
    let pipeline = SightingPipeline::new(LocalStorage::default(), config(fixture, limit))
        .with_posted_fallback("2026-10-16");
    EtlEngine::new(pipeline).run().await
}

fn read_sightings(path: &str) -> Result<Vec<Sighting>> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} got {}",
        expected,
        actual
    );
}

#[tokio::test]
async fn test_end_to_end_conversion() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;

    let output_path = run(&fixture, None).await?;
    assert_eq!(output_path, fixture.output);

    let sightings = read_sightings(&fixture.output)?;
    let cities: Vec<&str> = sightings.iter().map(|s| s.city.as_str()).collect();
    assert_eq!(
        cities,
        vec!["san marcos", "lackland afb", "chester (uk/england)", "kaneohe"]
    );

    // empty country falls back, empty state is kept
    assert_eq!(sightings[1].country, "Unknown");
    assert_eq!(sightings[2].state, "");

    // unparseable latitude keeps the row
    assert_eq!(sightings[2].latitude, 0.0);
    assert_close(sightings[2].longitude, -2.916667);

    assert_close(sightings[3].latitude, 21.4180556);
    assert_close(sightings[3].longitude, -157.8036111);
    Ok(())
}

#[tokio::test]
async fn test_output_is_array_with_exact_keys() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;
    run(&fixture, None).await?;

    let value: Value = serde_json::from_slice(&std::fs::read(&fixture.output)?)?;
    let items = value.as_array().expect("top level must be an array");
    assert_eq!(items.len(), 4);

    let mut keys: Vec<&str> = items[0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "city",
            "country",
            "dateTime",
            "duration",
            "latitude",
            "longitude",
            "posted",
            "shape",
            "state",
            "summary"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_dayton_row_encodes_exactly() -> Result<()> {
    let fixture = fixture(
        "datetime,city,state,country,shape,duration (hours/min),comments,date posted,latitude,longitude\n",
        "1/1/2020 20:00,dayton,oh,us,circle,5 minutes,bright light,1/2/2020,39.75,-84.19\n",
    )?;
    run(&fixture, None).await?;

    let written = std::fs::read_to_string(&fixture.output)?;
    assert_eq!(
        written,
        r#"[{"dateTime":"1/1/2020 20:00","city":"dayton","state":"oh","country":"us","shape":"circle","duration":"5 minutes","summary":"bright light","posted":"1/2/2020","latitude":39.75,"longitude":-84.19}]"#
    );
    Ok(())
}

#[tokio::test]
async fn test_longitude_header_variants_agree() -> Result<()> {
    let spaced = fixture(SCRUBBED_HEADER, ROWS)?;
    let plain = fixture(PLAIN_HEADER, ROWS)?;
    run(&spaced, None).await?;
    run(&plain, None).await?;

    assert_eq!(read_sightings(&spaced.output)?, read_sightings(&plain.output)?);
    Ok(())
}

#[tokio::test]
async fn test_limit_caps_emitted_records() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;

    run(&fixture, Some(3)).await?;
    let sightings = read_sightings(&fixture.output)?;
    assert_eq!(sightings.len(), 3);
    assert_eq!(sightings[2].city, "chester (uk/england)");

    run(&fixture, Some(100)).await?;
    assert_eq!(read_sightings(&fixture.output)?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_are_identical() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;

    run(&fixture, None).await?;
    let first = std::fs::read(&fixture.output)?;
    run(&fixture, None).await?;
    let second = std::fs::read(&fixture.output)?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_blank_date_posted_uses_fallback_date() -> Result<()> {
    let fixture = fixture(
        SCRUBBED_HEADER,
        "7/4/1999 23:00,roswell,nm,us,,,,,,33.39,-104.52\n",
    )?;
    run(&fixture, None).await?;

    let sightings = read_sightings(&fixture.output)?;
    assert_eq!(sightings[0].posted, "2026-10-16");
    assert_eq!(sightings[0].shape, "Unknown");
    assert_eq!(sightings[0].duration, "Unknown");
    assert_eq!(sightings[0].summary, "");
    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_is_fatal() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;
    let mut missing = config(&fixture, None);
    missing.input = format!("{}.missing", fixture.input);

    let pipeline = SightingPipeline::new(LocalStorage::default(), missing);
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, EtlError::IoError(_)));
    assert_ne!(err.exit_code(), 0);
    assert!(!std::path::Path::new(&fixture.output).exists());
    Ok(())
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;
    let blocker = std::path::Path::new(&fixture.input).with_file_name("blocker");
    std::fs::write(&blocker, "regular file")?;

    let mut unwritable = config(&fixture, None);
    unwritable.output = blocker
        .join("sub/sightings.json")
        .to_str()
        .unwrap()
        .to_string();

    let pipeline = SightingPipeline::new(LocalStorage::default(), unwritable);
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, EtlError::IoError(_)));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(std::fs::read_to_string(&blocker)?, "regular file");
    Ok(())
}

#[tokio::test]
async fn test_missing_latitude_column_is_fatal() -> Result<()> {
    let fixture = fixture(
        "datetime,city,state,country,shape,duration (hours/min),comments,date posted,longitude\n",
        "1/1/2020 20:00,dayton,oh,us,circle,5 minutes,bright light,1/2/2020,-84.19\n",
    )?;

    let err = run(&fixture, None).await.unwrap_err();

    assert!(matches!(err, EtlError::MissingColumn { ref column } if column == "latitude"));
    assert!(!std::path::Path::new(&fixture.output).exists());
    Ok(())
}

#[tokio::test]
async fn test_header_only_input_writes_empty_array() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, "")?;
    run(&fixture, None).await?;

    assert_eq!(std::fs::read_to_string(&fixture.output)?, "[]");
    Ok(())
}

#[tokio::test]
async fn test_pretty_output_parses_to_same_records() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;
    run(&fixture, None).await?;
    let compact = read_sightings(&fixture.output)?;

    let mut pretty = config(&fixture, None);
    pretty.pretty = true;
    let pipeline =
        SightingPipeline::new(LocalStorage::default(), pretty).with_posted_fallback("2026-10-16");
    EtlEngine::new_with_monitoring(pipeline, true).run().await?;

    let text = std::fs::read_to_string(&fixture.output)?;
    assert!(text.contains('\n'));
    assert_eq!(read_sightings(&fixture.output)?, compact);
    Ok(())
}

#[tokio::test]
async fn test_pipeline_phases_can_run_individually() -> Result<()> {
    let fixture = fixture(SCRUBBED_HEADER, ROWS)?;
    let pipeline = SightingPipeline::new(LocalStorage::default(), config(&fixture, None));

    let table = pipeline.extract().await?;
    assert_eq!(table.records.len(), 6);

    let result = pipeline.transform(table).await?;
    assert_eq!(result.sightings.len(), 4);
    assert_eq!(result.stats.rows_skipped, 2);
    assert_eq!(result.stats.coordinate_fallbacks, 1);
    Ok(())
}
