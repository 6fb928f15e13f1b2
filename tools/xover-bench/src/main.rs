/// Crossover Bench — passive network response validation CLI.
///
/// Builds a filter chain, sweeps its simulated frequency response and checks
/// corner behavior against filter theory.
///
/// Usage:
///   xover-bench catalog
///   xover-bench sweep [--load R] [--start F1] [--end F2] [--step S]
///                     [--chain SPEC] [--baseline FILE] [--csv FILE] [--json FILE]
///   xover-bench corner [--topology KEY] [--f0 F] [--load R]
///
/// Chain spec: semicolon-separated stages, each `key[:param=value,...]`:
///   "lowpass-2-linkwitz-riley:f0=2500;highshelf-1-default:f0=8000,db=2"
///
/// Baseline file: CSV lines `freq_hz,mag_db,phase_deg`, frequencies ascending.

use openxover_engine::catalog::{self, Topology};
use openxover_engine::engine::XoverEngine;
use openxover_engine::stage::ParamUpdate;
use openxover_engine::sweep::{
    DEFAULT_END_HZ, DEFAULT_START_HZ, DEFAULT_STEP_DECADES, SweepPoint,
};
use openxover_engine::units::hz_to_rad_per_second;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "catalog" => cmd_catalog(),
        "sweep" => cmd_sweep(&args[2..]),
        "corner" => cmd_corner(&args[2..]),
        _ => {
            eprintln!("Unknown subcommand: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Crossover Bench — passive network response validation");
    eprintln!();
    eprintln!("Subcommands:");
    eprintln!("  catalog   List every filter topology and its default parameters");
    eprintln!("  sweep     Frequency response sweep of a chain spec (log scale)");
    eprintln!("  corner    Single-stage response at the corner frequency");
}

fn parse_flag(args: &[String], flag: &str, default: f64) -> f64 {
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            return args[i + 1].parse().unwrap_or(default);
        }
    }
    default
}

fn parse_flag_str<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            return &args[i + 1];
        }
    }
    default
}

// ─── Catalog listing ────────────────────────────────────────────────────────

fn cmd_catalog() {
    println!("Topology catalog ({} entries)", Topology::ALL.len());
    for group in catalog::grouping() {
        println!();
        println!("{}", group.category);
        for order_group in &group.orders {
            println!("  order {}", order_group.order);
            for info in &order_group.entries {
                let topology = Topology::from_key(&info.key).expect("catalog key");
                println!(
                    "    {:<34} {}",
                    info.key,
                    format_defaults(topology)
                );
            }
        }
    }
}

fn format_defaults(topology: Topology) -> String {
    let defaults = topology.default_params();
    let mut out = format!("f0={}", defaults.f0);
    if let Some(q) = defaults.q {
        out.push_str(&format!("  q={q}"));
    }
    if let Some(db) = defaults.db {
        out.push_str(&format!("  db={db}"));
    }
    if let Some(l1r) = defaults.l1r {
        out.push_str(&format!("  l1r={l1r}"));
    }
    out
}

// ─── Frequency sweep ────────────────────────────────────────────────────────

fn cmd_sweep(args: &[String]) {
    let load = parse_flag(args, "--load", 8.0);
    let start = parse_flag(args, "--start", DEFAULT_START_HZ);
    let end = parse_flag(args, "--end", DEFAULT_END_HZ);
    let step = parse_flag(args, "--step", DEFAULT_STEP_DECADES);
    let chain_spec = parse_flag_str(args, "--chain", "");
    let baseline_path = parse_flag_str(args, "--baseline", "");
    let csv_path = parse_flag_str(args, "--csv", "");
    let json_path = parse_flag_str(args, "--json", "");

    let mut engine = XoverEngine::new(load);

    if !chain_spec.is_empty() {
        if let Err(message) = build_chain(&mut engine, chain_spec) {
            eprintln!("Bad chain spec: {message}");
            std::process::exit(1);
        }
    }

    if !baseline_path.is_empty() {
        match load_baseline_csv(baseline_path) {
            Ok((frequencies, magnitudes, phases)) => {
                if let Err(error) = engine.set_baseline(frequencies, magnitudes, phases) {
                    eprintln!("Bad baseline data: {error}");
                    std::process::exit(1);
                }
            }
            Err(message) => {
                eprintln!("Cannot read baseline {baseline_path}: {message}");
                std::process::exit(1);
            }
        }
    }

    let points: Vec<SweepPoint> = engine.sweep(start, end, step).collect();

    println!("Frequency response sweep (load = {load:.1} Ω, {} stages)", engine.snapshot().len());
    println!("{:>10}  {:>10}  {:>10}", "Freq (Hz)", "Mag (dB)", "Phase (°)");
    println!("{:-<10}  {:-<10}  {:-<10}", "", "", "");

    // keep the terminal table readable; exports carry every point
    let stride = (points.len() / 40).max(1);
    for (i, point) in points.iter().enumerate() {
        if i % stride == 0 || i == points.len() - 1 {
            println!(
                "{:>10.1}  {:>10.2}  {:>10.1}",
                point.freq_hz, point.mag_db, point.phase_deg
            );
        }
    }

    if !csv_path.is_empty() {
        let mut csv_lines = Vec::with_capacity(points.len() + 1);
        csv_lines.push("freq_hz,mag_db,phase_deg".to_string());
        for point in &points {
            csv_lines.push(format!(
                "{:.3},{:.4},{:.4}",
                point.freq_hz, point.mag_db, point.phase_deg
            ));
        }
        std::fs::write(csv_path, csv_lines.join("\n") + "\n").expect("Failed to write CSV");
        println!("\nCSV written to {csv_path}");
    }

    if !json_path.is_empty() {
        let json = serde_json::to_string_pretty(&points).expect("Failed to encode JSON");
        std::fs::write(json_path, json + "\n").expect("Failed to write JSON");
        println!("\nJSON written to {json_path}");
    }
}

fn build_chain(engine: &mut XoverEngine, spec: &str) -> Result<(), String> {
    for stage_spec in spec.split(';').filter(|s| !s.trim().is_empty()) {
        let stage_spec = stage_spec.trim();
        let (key, params) = stage_spec.split_once(':').unwrap_or((stage_spec, ""));
        let key = key.trim();
        let topology =
            Topology::from_key(key).ok_or_else(|| format!("unknown topology `{key}`"))?;
        let position = engine.append(topology);

        let mut update = ParamUpdate::default();
        for pair in params.split(',').filter(|p| !p.trim().is_empty()) {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("bad parameter `{pair}` (expected name=value)"))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| format!("bad number in `{pair}`"))?;
            match name.trim() {
                "f0" => update.f0 = Some(value),
                "q" => update.q = Some(value),
                "db" => update.db = Some(value),
                "l1r" => update.l1r = Some(value),
                other => return Err(format!("unknown parameter `{other}`")),
            }
        }
        engine
            .set_params(position, update)
            .expect("freshly appended stage is in range");
    }
    Ok(())
}

fn load_baseline_csv(path: &str) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut frequencies = Vec::new();
    let mut magnitudes = Vec::new();
    let mut phases = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // tolerate a header row
        if number == 0 && line.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(format!("line {}: expected 3 fields, got {}", number + 1, fields.len()));
        }
        let parse = |field: &str| -> Result<f64, String> {
            field
                .parse()
                .map_err(|_| format!("line {}: bad number `{field}`", number + 1))
        };
        frequencies.push(parse(fields[0])?);
        magnitudes.push(parse(fields[1])?);
        phases.push(parse(fields[2])?);
    }
    Ok((frequencies, magnitudes, phases))
}

// ─── Corner check ───────────────────────────────────────────────────────────

fn cmd_corner(args: &[String]) {
    let key = parse_flag_str(args, "--topology", "lowpass-1-default");
    let f0 = parse_flag(args, "--f0", 2000.0);
    let load = parse_flag(args, "--load", 8.0);

    let Some(topology) = Topology::from_key(key) else {
        eprintln!("Unknown topology `{key}` — see `xover-bench catalog`");
        std::process::exit(1);
    };

    let mut engine = XoverEngine::new(load);
    let position = engine.append(topology);
    engine
        .set_params(
            position,
            ParamUpdate {
                f0: Some(f0),
                ..Default::default()
            },
        )
        .expect("freshly appended stage is in range");

    let response = engine.chain().response_at(hz_to_rad_per_second(f0));
    let mag_db = 20.0 * response.ratio.norm().log10();
    let phase_deg = response.ratio.arg().to_degrees();

    // classic single-pole corner attenuation
    let reference_db = 20.0 * (1.0 / 2f64.sqrt()).log10();
    let delta = mag_db - reference_db;

    println!("Corner response");
    println!("  Topology:    {key}");
    println!("  f0:          {f0:.0} Hz");
    println!("  Load:        {load:.1} Ω");
    println!("  Mag:         {mag_db:.2} dB");
    println!("  Phase:       {phase_deg:.1}°");
    println!("  1st-order reference: {reference_db:.2} dB (delta {delta:+.2} dB)");
}
