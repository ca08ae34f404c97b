//! K-means geo point clustering tool
//!
//! Reads restaurant records from a CSV file, groups them into `k` spatial
//! clusters and reports per-cluster statistics, or writes every record with
//! its cluster and display color.

use clap::Parser;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;

mod cluster;
mod summary;


use cluster::{Cluster, KMeans, MAX_ITERATIONS, Point, UniformBounds};
use summary::{average_cluster_size, summarize};

#[derive(Parser)]
#[command(name = "geo_kmeans")]
#[command(about = "K-means geo point clustering tool", long_about = None)]
struct Args {
    /// Input CSV file with a header row and latitude/longitude columns
    #[arg(short, long, default_value = "restaurants.csv")]
    input: PathBuf,

    /// Output CSV file with every record and its cluster (default: summary on stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of clusters
    #[arg(short = 'k', long = "clusters", default_value_t = 5, allow_negative_numbers = true)]
    clusters: i64,

    /// Seed for centroid initialization (default: fresh seed per run)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Upper bound on assignment/update rounds
    #[arg(short = 'm', long, default_value_t = MAX_ITERATIONS)]
    max_iterations: usize,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let kmeans = match KMeans::new(args.clusters) {
        Ok(kmeans) => kmeans.with_max_iterations(args.max_iterations),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let points = match read_points(&args.input) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("Error reading CSV: {}", e);
            std::process::exit(1);
        }
    };

    if points.is_empty() {
        log::warn!("no points found in {:?}", args.input);
    }

    log::info!("read {} points from {:?}", points.len(), args.input);
    log::debug!(
        "running k-means with k={}, max_iterations={}, seed={:?}",
        kmeans.k(),
        kmeans.max_iterations(),
        args.seed
    );

    let mut init = match args.seed {
        Some(seed) => UniformBounds::seeded(seed),
        None => UniformBounds::from_os(),
    };
    let result = match kmeans.run(&points, &mut init) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error clustering: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "found {} clusters in {} iterations (converged: {})",
        result.clusters.len(),
        result.iterations,
        result.converged
    );

    match args.output {
        None => print_summary(&result.clusters),
        Some(output_file) => {
            if let Err(e) = write_clusters_to_csv(&output_file, &result.clusters) {
                eprintln!("Error writing CSV: {}", e);
                std::process::exit(1);
            }
            log::info!("clustered points written to {:?}", output_file);
        }
    }
}

/// Uses `RUST_LOG` when set, `info` otherwise; `--debug` forces `debug`
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

/// Column positions resolved from the header row
#[derive(Debug, PartialEq)]
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    lat: usize,
    lon: usize,
    /// Every other column, kept as a categorical attribute
    attributes: Vec<(usize, String)>,
}

/// Matches header names case-insensitively
///
/// Accepted: `id`, `name`, `lat|latitude`, `lon|lng|long|longitude`.
fn detect_columns(headers: &StringRecord) -> Result<Columns, Box<dyn std::error::Error>> {
    let mut id = None;
    let mut name = None;
    let mut lat = None;
    let mut lon = None;
    let mut attributes = Vec::new();

    for (i, header) in headers.iter().enumerate() {
        let key = header.trim().to_lowercase();
        match key.as_str() {
            "id" => id = Some(i),
            "name" => name = Some(i),
            "lat" | "latitude" => lat = Some(i),
            "lon" | "lng" | "long" | "longitude" => lon = Some(i),
            "" => {}
            _ => attributes.push((i, key)),
        }
    }

    Ok(Columns {
        id,
        name,
        lat: lat.ok_or("missing latitude column")?,
        lon: lon.ok_or("missing longitude column")?,
        attributes,
    })
}

/// Reads points from a CSV file with a header row
///
/// Rows whose coordinates do not parse to finite numbers are skipped.
/// Records without an `id` are numbered by their data row, starting at 1.
/// Ids are unique: a row whose id is already taken, explicitly or by a row
/// number, is skipped.
fn read_points(filename: &PathBuf) -> Result<Vec<Point>, Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let columns = detect_columns(reader.headers()?)?;
    let mut points = Vec::new();
    let mut skipped = 0;
    let mut duplicates = 0;
    let mut seen = HashSet::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let row = row + 1;

        let lat = record.get(columns.lat).and_then(|s| s.trim().parse::<f64>().ok());
        let lon = record.get(columns.lon).and_then(|s| s.trim().parse::<f64>().ok());
        let (lat, lon) = match (lat, lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
            _ => {
                log::warn!("skipping row {}: invalid coordinates", row);
                skipped += 1;
                continue;
            }
        };

        let id = columns
            .id
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| row.to_string(), str::to_string);
        if !seen.insert(id.clone()) {
            log::warn!("skipping row {}: duplicate id {:?}", row, id);
            duplicates += 1;
            continue;
        }
        let mut point = Point::new(id, lat, lon);

        if let Some(name) = columns
            .name
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            point = point.with_name(name);
        }

        for (i, key) in &columns.attributes {
            if let Some(value) = record.get(*i).map(str::trim).filter(|s| !s.is_empty()) {
                point = point.with_attribute(key.as_str(), value);
            }
        }

        points.push(point);
    }

    if skipped > 0 {
        log::warn!("skipped {} rows with invalid coordinates", skipped);
    }
    if duplicates > 0 {
        log::warn!("skipped {} rows with duplicate ids", duplicates);
    }

    Ok(points)
}

/// Writes every clustered point to output CSV
///
/// Format: `id,name,latitude,longitude,cluster,color`, grouped by cluster
fn write_clusters_to_csv(
    output_file: &PathBuf,
    clusters: &[Cluster<Point>],
) -> Result<(), Box<dyn std::error::Error>> {
    let out_file = File::create(output_file)?;
    let mut writer = WriterBuilder::new().from_writer(out_file);

    writer.write_record(["id", "name", "latitude", "longitude", "cluster", "color"])?;

    for cluster in clusters {
        let index = cluster.index.to_string();
        for point in &cluster.members {
            let lat = point.position.lat().to_string();
            let lon = point.position.lon().to_string();
            writer.write_record([
                point.id.as_str(),
                point.name.as_deref().unwrap_or(""),
                lat.as_str(),
                lon.as_str(),
                index.as_str(),
                cluster.display_color,
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Prints one line per cluster, then the average cluster size
fn print_summary(clusters: &[Cluster<Point>]) {
    for s in summarize(clusters) {
        let dominant: Vec<String> = s
            .dominant
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        println!(
            "cluster {} {} count={} centroid={:.6},{:.6} radius_km={:.3} {}",
            s.index,
            s.color,
            s.count,
            s.centroid.lat(),
            s.centroid.lon(),
            s.radius_km,
            dominant.join(" ")
        );
    }
    println!("average cluster size {:.2}", average_cluster_size(clusters));
}
