//! # Bridgeworks CLI
//!
//! Command line front end for `bridge_core`: abutment design, hydraulic
//! analysis, cost estimates and project files.
//!
//! ```text
//! bridgeworks design --type both
//! bridgeworks design --input a1.json --criteria pwd.toml --pdf a1.pdf
//! bridgeworks hydraulics channel.json --json
//! bridgeworks estimate --rates sor-2024.toml --count 2
//! bridgeworks project new kherwara.bwp --engineer "R. Sharma" --job-id BR-0425
//! bridgeworks project run kherwara.bwp --pdf kherwara.pdf
//! bridgeworks equations
//! ```
//!
//! Log output goes to stderr and follows `RUST_LOG`; `--verbose` raises the
//! default to debug.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge_core::calculations::{
    compare_abutment_types, design_abutment, estimate, footing, hydraulics, AbutmentDesign, AbutmentInput,
    AbutmentType, CalculationItem, CalculationResult, CostEstimate, FootingDesign, FootingInput, FootingStatus,
    HydraulicInput, HydraulicResult, RateSchedule, StemProfile, TypeComparison,
};
use bridge_core::criteria::DesignCriteria;
use bridge_core::equations::generate_equations_markdown;
use bridge_core::errors::{CalcError, CalcResult};
use bridge_core::file_io::{load_project_with_lock_check, save_project, write_atomic, FileLock};
use bridge_core::pdf::{render_abutment_pdf, render_project_pdf, ReportHeader};
use bridge_core::project::Project;

/// Exit code when a design completes but fails a stability check.
const EXIT_REQUIRES_OPTIMIZATION: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "bridgeworks",
    version,
    about = "Bridge abutment design, hydraulic analysis and cost estimates"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Design an abutment (defaults, or a JSON input file).
    Design(DesignArgs),
    /// Waterway, afflux and scour for a channel section.
    Hydraulics(HydraulicsArgs),
    /// Cost estimate for an abutment design.
    Estimate(EstimateArgs),
    /// Create or run a project file.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Print the equation reference as markdown.
    Equations {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    Battered,
    Cantilever,
    /// Design both and recommend the lighter
    Both,
}

#[derive(Args, Debug)]
struct DesignInputArgs {
    /// Abutment input as JSON (defaults when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Design criteria TOML (defaults when omitted)
    #[arg(short, long)]
    criteria: Option<PathBuf>,

    /// Abutment type, overriding the input file
    #[arg(short = 't', long = "type", value_enum)]
    abutment_type: Option<TypeArg>,
}

#[derive(Args, Debug)]
struct DesignArgs {
    #[command(flatten)]
    source: DesignInputArgs,

    /// Also size the footing by trial enlargement
    #[arg(long)]
    footing: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write a PDF calculation report
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct HydraulicsArgs {
    /// Hydraulic input as JSON (defaults when omitted)
    input: Option<PathBuf>,

    /// Design criteria TOML (defaults when omitted)
    #[arg(short, long)]
    criteria: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[command(flatten)]
    source: DesignInputArgs,

    /// Rate schedule TOML (defaults when omitted)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Number of identical abutments to price
    #[arg(long, default_value_t = estimate::DEFAULT_ABUTMENT_COUNT)]
    count: u32,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum ProjectAction {
    /// Create a project with a default abutment and channel section.
    New {
        path: PathBuf,
        #[arg(long, default_value = "")]
        engineer: String,
        #[arg(long, default_value = "")]
        job_id: String,
        #[arg(long, default_value = "")]
        client: String,
        #[arg(long, default_value = "")]
        bridge_name: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Design every item in a project.
    Run {
        path: PathBuf,
        /// Lock holder name (defaults to $USER)
        #[arg(long)]
        user: Option<String>,
        /// Print the outcomes as JSON
        #[arg(long)]
        json: bool,
        /// Write a PDF calculation package
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "bridge_cli=debug,bridge_core=debug"
    } else {
        "bridge_cli=info,bridge_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Command) -> CalcResult<ExitCode> {
    match command {
        Command::Design(args) => run_design(args),
        Command::Hydraulics(args) => run_hydraulics(args),
        Command::Estimate(args) => run_estimate(args),
        Command::Project { action } => match action {
            ProjectAction::New {
                path,
                engineer,
                job_id,
                client,
                bridge_name,
                force,
            } => new_project(&path, engineer, job_id, client, bridge_name, force),
            ProjectAction::Run { path, user, json, pdf } => run_project(&path, user, json, pdf.as_deref()),
        },
        Command::Equations { output } => {
            let markdown = generate_equations_markdown();
            match output {
                Some(path) => {
                    write_atomic(&path, markdown.as_bytes())?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", markdown),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> CalcResult<T> {
    let text = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error(format!("read {}", what), path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| CalcError::serialization(format!("Invalid {} {}: {}", what, path.display(), e)))
}

fn load_criteria(path: Option<&Path>) -> CalcResult<DesignCriteria> {
    match path {
        Some(p) => DesignCriteria::load(p),
        None => Ok(DesignCriteria::default()),
    }
}

/// Resolved abutment input plus whether both types should be compared.
fn load_abutment(args: &DesignInputArgs) -> CalcResult<(AbutmentInput, DesignCriteria, bool)> {
    let mut input = match &args.input {
        Some(p) => read_json::<AbutmentInput>(p, "abutment input")?,
        None => AbutmentInput::default(),
    };
    let criteria = load_criteria(args.criteria.as_deref())?;
    let compare = match args.abutment_type {
        Some(TypeArg::Battered) => {
            input.abutment_type = AbutmentType::Battered;
            false
        }
        Some(TypeArg::Cantilever) => {
            input.abutment_type = AbutmentType::Cantilever;
            false
        }
        Some(TypeArg::Both) => true,
        None => false,
    };
    Ok((input, criteria, compare))
}

/// Run the single design or the comparison, returning the design to report.
fn design_or_compare(
    input: &AbutmentInput,
    criteria: &DesignCriteria,
    compare: bool,
) -> CalcResult<(AbutmentDesign, Option<TypeComparison>)> {
    if compare {
        let comparison = compare_abutment_types(&input.project, &input.soil, &input.material, criteria)?;
        Ok((comparison.recommended_design().clone(), Some(comparison)))
    } else {
        let design = design_abutment(
            &input.project,
            &input.soil,
            &input.material,
            input.abutment_type,
            criteria,
        )?;
        Ok((design, None))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(CalcError::serialization)?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn run_design(args: DesignArgs) -> CalcResult<ExitCode> {
    let (mut input, criteria, compare) = load_abutment(&args.source)?;
    let (design, comparison) = design_or_compare(&input, &criteria, compare)?;
    input.abutment_type = design.abutment_type;

    let footing_design = if args.footing {
        Some(footing::calculate(&FootingInput::from_design(&design, &input.soil), &criteria)?)
    } else {
        None
    };

    if args.json {
        #[derive(serde::Serialize)]
        struct DesignOutput<'a> {
            design: &'a AbutmentDesign,
            #[serde(skip_serializing_if = "Option::is_none")]
            comparison: Option<&'a TypeComparison>,
            #[serde(skip_serializing_if = "Option::is_none")]
            footing: Option<&'a FootingDesign>,
        }
        print_json(&DesignOutput {
            design: &design,
            comparison: comparison.as_ref(),
            footing: footing_design.as_ref(),
        })?;
    } else {
        if let Some(c) = &comparison {
            print_comparison(c);
        }
        print_design(&input, &design);
        if let Some(f) = &footing_design {
            print_footing(f);
        }
    }

    if let Some(path) = &args.pdf {
        let header = ReportHeader {
            code: bridge_core::project::ProjectSettings::default().code,
            ..ReportHeader::default()
        };
        let bytes = render_abutment_pdf(&input, &design, &criteria, &header)?;
        write_atomic(path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "report written");
    }

    Ok(design_exit_code(&design))
}

fn run_hydraulics(args: HydraulicsArgs) -> CalcResult<ExitCode> {
    let input = match &args.input {
        Some(p) => read_json::<HydraulicInput>(p, "hydraulic input")?,
        None => HydraulicInput::default(),
    };
    let criteria = load_criteria(args.criteria.as_deref())?;
    let result = hydraulics::calculate(&input, &criteria)?;

    if args.json {
        print_json(&result)?;
    } else {
        print_hydraulics(&input, &result);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_estimate(args: EstimateArgs) -> CalcResult<ExitCode> {
    let (input, criteria, compare) = load_abutment(&args.source)?;
    let rates = match &args.rates {
        Some(p) => RateSchedule::load(p)?,
        None => RateSchedule::default(),
    };
    let (design, _) = design_or_compare(&input, &criteria, compare)?;
    let cost = estimate::calculate(&design.quantities, &input.material, &rates, args.count)?;

    if args.json {
        print_json(&cost)?;
    } else {
        print_estimate(&design, &cost);
    }
    Ok(ExitCode::SUCCESS)
}

fn new_project(
    path: &Path,
    engineer: String,
    job_id: String,
    client: String,
    bridge_name: String,
    force: bool,
) -> CalcResult<ExitCode> {
    if path.exists() && !force {
        return Err(CalcError::file_error(
            "create project",
            path.display().to_string(),
            "File already exists (use --force to overwrite)",
        ));
    }

    let mut project = Project::new(engineer, job_id, client);
    project.meta.bridge_name = bridge_name;
    project.add_item(CalculationItem::Abutment(AbutmentInput::default()));
    project.add_item(CalculationItem::Hydraulic(HydraulicInput::default()));

    save_project(&project, path)?;
    println!("Created {} with {} items", path.display(), project.item_count());
    Ok(ExitCode::SUCCESS)
}

fn run_project(path: &Path, user: Option<String>, json: bool, pdf: Option<&Path>) -> CalcResult<ExitCode> {
    let (project, holder) = load_project_with_lock_check(path)?;
    if let Some(info) = &holder {
        return Err(CalcError::file_locked(
            path.display().to_string(),
            info.holder(),
            info.locked_at.to_rfc3339(),
        ));
    }

    let user = user
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .unwrap_or_else(|| "bridgeworks".to_string());
    let _lock = FileLock::acquire(path, user)?;

    let outcomes = project.run_all();
    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
    let unsafe_designs = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Ok(CalculationResult::Abutment(d)) if !d.is_safe()))
        .count();

    if json {
        #[derive(serde::Serialize)]
        struct OutcomeJson<'a> {
            id: String,
            label: &'a str,
            calc_type: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            result: Option<&'a CalculationResult>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a CalcError>,
        }
        let rows: Vec<_> = outcomes
            .iter()
            .map(|o| OutcomeJson {
                id: o.id.to_string(),
                label: &o.label,
                calc_type: o.calc_type,
                result: o.result.as_ref().ok(),
                error: o.result.as_ref().err(),
            })
            .collect();
        print_json(&rows)?;
    } else {
        banner(&format!("PROJECT {}", project.meta.job_id));
        println!("  Engineer: {}", project.meta.engineer);
        println!("  Client:   {}", project.meta.client);
        if !project.meta.bridge_name.is_empty() {
            println!("  Bridge:   {}", project.meta.bridge_name);
        }
        println!();
        for outcome in &outcomes {
            let summary = match &outcome.result {
                Ok(CalculationResult::Abutment(d)) => format!(
                    "{} {}",
                    d.abutment_type,
                    status_icon(d.is_safe())
                ),
                Ok(CalculationResult::Hydraulic(h)) => format!(
                    "V = {:.2} m/s, scour level {:.2} m {}",
                    h.velocity,
                    h.scour_level,
                    status_icon(h.freeboard_ok)
                ),
                Err(e) => format!("[ERROR] {}", e),
            };
            println!("  {:<16} {:<10} {}", outcome.label, outcome.calc_type, summary);
        }
        println!();
        rule();
        println!(
            "  {} items, {} failed, {} require optimization",
            outcomes.len(),
            failures,
            unsafe_designs
        );
        rule();
    }

    if let Some(pdf_path) = pdf {
        let bytes = render_project_pdf(&project)?;
        write_atomic(pdf_path, &bytes)?;
        tracing::info!(path = %pdf_path.display(), bytes = bytes.len(), "calculation package written");
    }

    Ok(if failures > 0 {
        ExitCode::FAILURE
    } else if unsafe_designs > 0 {
        ExitCode::from(EXIT_REQUIRES_OPTIMIZATION)
    } else {
        ExitCode::SUCCESS
    })
}

fn design_exit_code(design: &AbutmentDesign) -> ExitCode {
    if design.is_safe() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REQUIRES_OPTIMIZATION)
    }
}

// ============================================================================
// Text output
// ============================================================================

fn rule() {
    println!("═══════════════════════════════════════");
}

fn banner(title: &str) {
    rule();
    println!("  {}", title);
    rule();
    println!();
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_design(input: &AbutmentInput, design: &AbutmentDesign) {
    let g = &design.geometry;
    let s = &design.stability;
    let r = &design.reinforcement;
    let q = &design.quantities;

    banner(&format!("{} ABUTMENT {}", design.abutment_type.display_name().to_uppercase(), input.label));

    println!("Input:");
    println!("  Height:     {:.2} m (deck {:.2}, foundation {:.2})", g.height, input.project.deck_level, input.project.foundation_level);
    println!("  Width:      {:.2} m", input.project.bridge_width);
    println!(
        "  Soil:       γ = {:.1} kN/m³, φ = {:.1}°, SBC = {:.0} kN/m²",
        input.soil.unit_weight, input.soil.friction_angle, input.soil.bearing_capacity
    );
    println!("  Material:   {}", input.material.display_name());
    println!();

    println!("Geometry:");
    match g.stem {
        StemProfile::Battered {
            top_width,
            bottom_width,
            batter_ratio,
        } => println!(
            "  Stem:       {:.2} m top, {:.2} m bottom (batter 1:{:.0})",
            top_width,
            bottom_width,
            1.0 / batter_ratio
        ),
        StemProfile::Cantilever {
            stem_thickness,
            heel_length,
            toe_length,
        } => println!(
            "  Stem:       {:.2} m thick, heel {:.2} m, toe {:.2} m",
            stem_thickness, heel_length, toe_length
        ),
    }
    println!(
        "  Base:       {:.2} × {:.2} × {:.2} m",
        g.base_length, g.base_width, g.base_thickness
    );
    println!(
        "  Wings:      {:.2} × {:.2} × {:.2} m",
        g.wing_length, g.wing_height, g.wing_thickness
    );
    println!();

    println!("Loads:");
    println!("  Dead load:  {:.1} kN", design.loads.total_dead_load);
    println!("  Vertical:   {:.1} kN", design.loads.total_vertical_load);
    println!(
        "  Ka = {:.3}, Kp = {:.3}, Pa = {:.1} kN",
        design.earth_pressures.ka, design.earth_pressures.kp, design.earth_pressures.active_force
    );
    println!();

    println!("Stability Checks:");
    println!("  Overturning: {:.2} {}", s.overturning_factor, status_icon(s.overturning_safe));
    println!("  Sliding:     {:.2} {}", s.sliding_factor, status_icon(s.sliding_safe));
    println!(
        "  Bearing:     {:.1}/{:.0} kN/m² (e = {:.3} m) {}",
        s.bearing_pressure,
        s.bearing_capacity,
        s.eccentricity,
        status_icon(s.bearing_safe)
    );
    println!();

    println!("Reinforcement:");
    println!("  Mu = {:.1} kN·m, d = {:.0} mm", r.design_moment, r.effective_depth);
    println!(
        "  Ast = {:.0} mm² (min {:.0}), provide {}",
        r.ast_required,
        r.ast_min,
        r.schedule()
    );
    println!();

    println!("Quantities:");
    println!("  Concrete:   {:.2} m³", q.concrete_volume);
    println!("  Steel:      {:.0} kg", q.steel_weight);
    println!("  Formwork:   {:.2} m²", q.formwork_area);
    println!("  Excavation: {:.2} m³", q.excavation_volume);
    println!();

    rule();
    if design.is_safe() {
        println!("  RESULT: {}", design.design_status);
    } else {
        println!(
            "  RESULT: {} (failed: {})",
            design.design_status,
            s.failed_checks().join(", ")
        );
    }
    rule();
}

fn print_comparison(c: &TypeComparison) {
    banner("TYPE COMPARISON");
    for design in [&c.battered, &c.cantilever] {
        println!(
            "  {:<11} dead {:>9.1} kN  concrete {:>8.2} m³  {}",
            design.abutment_type.display_name(),
            design.loads.total_dead_load,
            design.quantities.concrete_volume,
            status_icon(design.is_safe())
        );
    }
    println!();
    println!(
        "  Recommended: {} ({:.1} kN lighter)",
        c.recommended.display_name(),
        c.dead_load_difference
    );
    println!();
}

fn print_footing(f: &FootingDesign) {
    println!();
    println!("Footing:");
    match (f.status, &f.accepted) {
        (FootingStatus::Accepted, Some(t)) => {
            println!(
                "  Extension {:.2} m per side: {:.2} × {:.2} m, σmax = {:.1} kN/m² {}",
                t.extension,
                t.length,
                t.width,
                t.max_pressure.unwrap_or(0.0),
                status_icon(true)
            );
            if let Some(ratio) = f.utilization_ratio() {
                println!("  Utilization {:.2} after {} trials", ratio, f.trials.len());
            }
        }
        _ => println!(
            "  No acceptable size within {} trials {}",
            f.trials.len(),
            status_icon(false)
        ),
    }
}

fn print_hydraulics(input: &HydraulicInput, h: &HydraulicResult) {
    banner(&format!("HYDRAULICS {}", input.label));

    println!("Input:");
    println!("  Q = {:.2} m³/s, n = {:.3}, S = {}", input.discharge, input.manning_n, input.bed_slope);
    println!("  HFL {:.2} m, deck {:.2} m", input.hfl, input.deck_level);
    println!();
    println!("Section:");
    println!("  Area:       {:.2} m²", h.wetted_area);
    println!("  Perimeter:  {:.2} m", h.wetted_perimeter);
    println!("  R:          {:.3} m", h.hydraulic_radius);
    println!("  Velocity:   {:.3} m/s", h.velocity);
    println!();
    println!("Waterway:");
    println!("  Regime:     {:.2} m", h.regime_width);
    println!("  Effective:  {:.2} m ({:.2} m piers)", h.effective_waterway, h.obstruction_width);
    println!("  Afflux:     {:.3} m", h.afflux);
    println!();
    println!("Scour:");
    println!("  q = {:.3} m³/s/m", h.discharge_intensity);
    println!("  Normal:     {:.2} m", h.normal_scour_depth);
    println!("  Design:     {:.2} m", h.design_scour_depth);
    println!("  Level:      {:.2} m", h.scour_level);
    println!();
    rule();
    println!("  FREEBOARD: {:.2} m {}", h.freeboard, status_icon(h.freeboard_ok));
    rule();
}

fn print_estimate(design: &AbutmentDesign, cost: &CostEstimate) {
    banner(&format!(
        "ESTIMATE {} × {}",
        cost.abutment_count,
        design.abutment_type.display_name().to_uppercase()
    ));
    for line in &cost.lines {
        println!(
            "  {:<22} {:>10.2} {:<3} @ {:>9.0}  {:>14.0}",
            line.item, line.quantity, line.unit, line.rate, line.amount
        );
    }
    println!();
    println!("  {:<48} {:>14.0}", "Direct cost", cost.direct_cost);
    println!("  {:<48} {:>14.0}", "Miscellaneous", cost.miscellaneous);
    println!("  {:<48} {:>14.0}", "Subtotal", cost.subtotal);
    println!("  {:<48} {:>14.0}", "Contractor's profit", cost.contractor_profit);
    rule();
    println!("  TOTAL: ₹ {:.0}", cost.total);
    rule();
}
