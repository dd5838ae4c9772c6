//! Warehouse Floor-Plan Headless Harness
//!
//! Generates the warehouse from a configuration, checks the dataset
//! invariants and walks the map through a set of selection scenarios.
//! Runs entirely in-process, no rendering.
//!
//! Usage:
//!   cargo run -p floorplan-simtest
//!   cargo run -p floorplan-simtest -- --verbose --seed 7
//!   cargo run -p floorplan-simtest -- --config warehouse.json
//!   cargo run -p floorplan-simtest -- --dump view

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use floorplan_logic::anomalies::AnomalyCategory;
use floorplan_logic::browse::type_summaries;
use floorplan_logic::config::WarehouseConfig;
use floorplan_logic::dataset::{generate, WarehouseDataset};
use floorplan_logic::outline::{build_outline, OutlineSource};
use floorplan_logic::placement::pick_active;
use floorplan_logic::selection::SelectionState;
use floorplan_logic::validation::{validate_all, Severity};
use floorplan_logic::view::{derive_view_state, ViewState, ViewStateCache};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ── Command line ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dump {
    Dataset,
    View,
    Outline,
}

#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    seed: u64,
    verbose: bool,
    dump: Option<Dump>,
}

#[derive(Debug)]
enum ConfigError {
    Usage(String),
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Usage(msg) => write!(f, "{}", msg),
            ConfigError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            ConfigError::Json { path, source } => {
                write!(f, "invalid configuration in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Usage(_) => None,
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, ConfigError> {
    let mut opts = Options {
        config: None,
        seed: 42,
        verbose: false,
        dump: None,
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| ConfigError::Usage(format!("{} needs a value", flag)))
        };
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--config" => opts.config = Some(PathBuf::from(value("--config")?)),
            "--seed" => {
                let raw = value("--seed")?;
                opts.seed = raw
                    .parse()
                    .map_err(|_| ConfigError::Usage(format!("--seed: not a number: {}", raw)))?;
            }
            "--dump" => {
                opts.dump = Some(match value("--dump")?.as_str() {
                    "dataset" => Dump::Dataset,
                    "view" => Dump::View,
                    "outline" => Dump::Outline,
                    other => {
                        return Err(ConfigError::Usage(format!(
                            "--dump: expected dataset, view or outline, got {}",
                            other
                        )))
                    }
                });
            }
            other => return Err(ConfigError::Usage(format!("unknown argument {}", other))),
        }
    }
    Ok(opts)
}

fn load_config(path: Option<&Path>) -> Result<WarehouseConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(WarehouseConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

#[derive(Serialize)]
struct OutlineDump {
    source: OutlineSource,
    path: String,
}

fn dump(kind: Dump, config: &WarehouseConfig, dataset: &WarehouseDataset) -> serde_json::Result<String> {
    match kind {
        Dump::Dataset => serde_json::to_string_pretty(dataset),
        Dump::View => serde_json::to_string_pretty(&derive_view_state(
            &SelectionState::default(),
            dataset,
            &config.view,
        )),
        Dump::Outline => serde_json::to_string_pretty(&OutlineDump {
            source: dataset.outline.source,
            path: dataset.outline.to_svg_path(),
        }),
    }
}

fn main() {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: floorplan-simtest [--config FILE] [--seed N] [--verbose] [--dump dataset|view|outline]");
            std::process::exit(2);
        }
    };
    init_logging(opts.verbose);

    let config = match load_config(opts.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let dataset = generate(&config, &mut StdRng::seed_from_u64(opts.seed));
    info!(
        "generated {} with seed {}: revision {}",
        dataset.version, opts.seed, dataset.revision
    );

    if let Some(kind) = opts.dump {
        match dump(kind, &config, &dataset) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot serialize {:?}: {}", kind, e);
                std::process::exit(1);
            }
        }
        return;
    }

    let verbose = opts.verbose;
    println!("=== Warehouse Floor-Plan Harness (seed {}) ===\n", opts.seed);

    let mut results = Vec::new();

    // 1. Dataset invariants
    results.extend(validate_dataset_invariants(&config, &dataset, verbose));

    // 2. Placement grid and cell selector
    results.extend(validate_placement(&config, &dataset, verbose));

    // 3. Outline
    results.extend(validate_outline(&config, &dataset, verbose));

    // 4. View-state scenarios
    results.extend(validate_view_scenarios(&config, &dataset, verbose));

    // 5. Determinism
    results.extend(validate_determinism(&config, &dataset, opts.seed));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Dataset invariants ───────────────────────────────────────────────

fn validate_dataset_invariants(
    config: &WarehouseConfig,
    dataset: &WarehouseDataset,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Dataset Invariants ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "dataset_not_empty",
        !dataset.zones.is_empty() && !dataset.assets.is_empty(),
        format!(
            "{} zones, {} assets, {} anomaly types",
            dataset.zones.len(),
            dataset.assets.len(),
            dataset.anomalies.len()
        ),
    ));

    let issues = validate_all(dataset, config);
    let warnings = issues.iter().filter(|e| e.severity == Severity::Warning);
    for w in warnings {
        println!("  warning [{}]: {}", w.category, w.message);
    }

    let categories = [
        "zone_config",
        "row_geometry",
        "asset_ids",
        "asset_rows",
        "asset_history",
        "exclusive_types",
        "anomalies",
        "outline",
    ];
    for category in categories {
        let errors: Vec<_> = issues
            .iter()
            .filter(|e| e.category == category && e.severity == Severity::Error)
            .collect();
        results.push(TestResult::new(
            category,
            errors.is_empty(),
            match errors.first() {
                None => "ok".into(),
                Some(first) => format!("{} errors, first: {}", errors.len(), first.message),
            },
        ));
    }

    if verbose {
        println!("  Assets by type:");
        for t in type_summaries(dataset) {
            println!(
                "    {:16} {:5} ({} missing, {} in transit)",
                t.asset_type, t.count, t.missing, t.in_transit
            );
        }
    }

    results
}

// ── 2. Placement ────────────────────────────────────────────────────────

fn validate_placement(
    config: &WarehouseConfig,
    dataset: &WarehouseDataset,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Placement Grid ---");
    let mut results = Vec::new();

    let mut bad = Vec::new();
    for spec in &config.zones {
        let (Some(grid), Some(placement)) = (spec.placement, dataset.placements.get(&spec.id))
        else {
            continue;
        };
        let expected = grid.fill.min(placement.all.len());
        let unique: HashSet<_> = placement.active.iter().collect();
        if placement.active.len() != expected
            || unique.len() != expected
            || placement.active.iter().any(|&i| i >= placement.all.len())
        {
            bad.push(spec.id.as_str());
        }
        if verbose {
            println!(
                "  {}: {} cells, {} active",
                spec.id,
                placement.all.len(),
                placement.active.len()
            );
        }
    }
    results.push(TestResult::new(
        "active_cells_cardinality",
        bad.is_empty(),
        if bad.is_empty() {
            "every zone has min(fill, cells) distinct active cells".into()
        } else {
            format!("wrong active set in {}", bad.join(", "))
        },
    ));

    let sample = pick_active(80, 15);
    results.push(TestResult::new(
        "selector_stride_sample",
        sample.len() == 15 && sample.first() == Some(&0) && sample.windows(2).all(|w| w[0] < w[1]),
        format!("pick_active(80, 15) = {:?}", sample),
    ));

    results
}

// ── 3. Outline ──────────────────────────────────────────────────────────

fn validate_outline(
    config: &WarehouseConfig,
    dataset: &WarehouseDataset,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Building Outline ---");
    let mut results = Vec::new();

    let pts = &dataset.outline.points;
    results.push(TestResult::new(
        "outline_closed",
        !pts.is_empty() && pts.first() == pts.last(),
        format!("{:?} outline with {} points", dataset.outline.source, pts.len()),
    ));

    let mut hull_tuning = config.outline.clone();
    hull_tuning.use_manual_points = false;
    let hull = build_outline(&dataset.zones, &dataset.blueprint, &dataset.assets, &hull_tuning);
    let axis_aligned = hull
        .points
        .windows(2)
        .all(|w| w[0].x == w[1].x || w[0].y == w[1].y);
    results.push(TestResult::new(
        "hull_outline_rectilinear",
        !hull.is_empty() && axis_aligned,
        format!("{} points", hull.points.len()),
    ));
    if verbose {
        println!("  hull path: {}", hull.to_svg_path());
    }

    results
}

// ── 4. View-state scenarios ─────────────────────────────────────────────

fn all_zones_at(view: &ViewState, opacity: f32) -> bool {
    view.zone_opacity.values().all(|&o| o == opacity)
}

fn validate_view_scenarios(
    config: &WarehouseConfig,
    dataset: &WarehouseDataset,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- View-State Scenarios ---");
    let tuning = &config.view;
    let mut results = Vec::new();
    let mut cache = ViewStateCache::new(tuning.clone());

    // Default view
    let mut selection = SelectionState::default();
    let default_view = cache.get(dataset, &selection).clone();
    results.push(TestResult::new(
        "default_view",
        all_zones_at(&default_view, 1.0) && default_view.anomaly_markers.is_empty(),
        format!("viewBox {}", default_view.view_box),
    ));

    // Asset type selected
    if let Some(summary) = type_summaries(dataset).into_iter().next() {
        selection.select_asset_type(summary.asset_type);
        let v = cache.get(dataset, &selection);
        let zones_ok = dataset.zones.iter().all(|z| {
            let expected = if dataset.zone_has_type(&z.id, summary.asset_type) {
                1.0
            } else {
                tuning.zone_opacity_type_absent
            };
            v.zone_opacity(&z.id) == expected
        });
        let markers_ok = v.anomaly_markers.len() == summary.missing + summary.in_transit;
        results.push(TestResult::new(
            "type_selection",
            zones_ok && markers_ok,
            format!(
                "{}: {} markers",
                summary.asset_type,
                v.anomaly_markers.len()
            ),
        ));
    }

    // Specific anomaly keeps the camera
    if let Some(anomaly) = dataset
        .anomalies
        .values()
        .flat_map(|g| g.list(AnomalyCategory::Missing))
        .next()
    {
        let before = cache.get(dataset, &selection).view_box;
        selection.select_anomaly(Some(anomaly.to_ref()));
        let v = cache.get(dataset, &selection);
        let position = anomaly
            .position
            .offset(dataset.zone_offset(anomaly.zone_id.as_deref()));
        let passed = v.view_box == before
            && all_zones_at(v, tuning.zone_opacity_anomaly)
            && v.anomaly_markers.len() == 1
            && v.anomaly_markers[0].position == position;
        results.push(TestResult::new(
            "anomaly_selection",
            passed,
            format!("{} at ({}, {})", anomaly.id, position.x, position.y),
        ));
    }

    // Rack zoom wins over an earlier zone view
    let first_zone = dataset.zones.first();
    let rack_zone = dataset.zones.iter().rev().find(|z| !z.rows.is_empty());
    if let (Some(first), Some(zone)) = (first_zone, rack_zone) {
        let row = &zone.rows[0];
        selection.select_zone(&first.id);
        selection.select_rack(&row.id);
        let v = cache.get(dataset, &selection);
        let expected = zone.focus_view_box(tuning.zone_padding);
        results.push(TestResult::new(
            "rack_selection",
            Some(v.view_box) == expected,
            format!("{} → viewBox {}", row.id, v.view_box),
        ));
    }

    selection.reset();
    let back = cache.get(dataset, &selection);
    results.push(TestResult::new(
        "reset_restores_default",
        *back == default_view,
        "selection cleared".into(),
    ));

    if verbose {
        let (hits, misses) = cache.stats();
        println!("  view cache: {} hits, {} misses", hits, misses);
    }

    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(
    config: &WarehouseConfig,
    dataset: &WarehouseDataset,
    seed: u64,
) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let again = generate(config, &mut StdRng::seed_from_u64(seed));
    let same_assets = dataset.assets.len() == again.assets.len()
        && dataset
            .assets
            .iter()
            .zip(&again.assets)
            .all(|(a, b)| a.id == b.id && a.position == b.position);
    let same_cells = dataset.placements.iter().all(|(id, p)| {
        again
            .placements
            .get(id)
            .is_some_and(|q| p.all == q.all && p.active == q.active)
    });
    vec![
        TestResult::new(
            "same_seed_same_assets",
            same_assets,
            format!("{} assets regenerated", again.assets.len()),
        ),
        TestResult::new(
            "placement_is_pure",
            same_cells,
            format!("{} zone grids compared", dataset.placements.len()),
        ),
        TestResult::new(
            "new_revision_per_generation",
            again.revision != dataset.revision,
            format!("revisions {} and {}", dataset.revision, again.revision),
        ),
    ]
}
