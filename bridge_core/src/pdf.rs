//! # PDF Calculation Reports
//!
//! Builds abutment and project calculation reports with Typst.
//!
//! ## Architecture
//!
//! - Report markup is assembled with `format!` from the typed results
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Compilation happens in memory; output is raw PDF bytes (`Vec<u8>`)
//! - Every report ends with an appendix listing the equations applied
//!
//! ## Example
//!
//! ```rust,no_run
//! use bridge_core::calculations::{abutment, AbutmentInput};
//! use bridge_core::criteria::DesignCriteria;
//! use bridge_core::pdf::{render_abutment_pdf, ReportHeader};
//!
//! let input = AbutmentInput::default();
//! let criteria = DesignCriteria::default();
//! let design = abutment::calculate(&input, &criteria).unwrap();
//!
//! let header = ReportHeader {
//!     engineer: "R. Sharma".into(),
//!     job_id: "BR-0425".into(),
//!     ..ReportHeader::default()
//! };
//! let pdf = render_abutment_pdf(&input, &design, &criteria, &header).unwrap();
//! std::fs::write("A1.pdf", pdf).unwrap();
//! ```

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::{
    AbutmentDesign, AbutmentInput, CalculationItem, CalculationResult, DesignStatus, HydraulicInput,
    HydraulicResult, StemProfile,
};
use crate::criteria::DesignCriteria;
use crate::equations::registry::{abutment_design_equations, hydraulic_analysis_equations, EquationTracker};
use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, ProjectMetadata};

// ============================================================================
// Typst World
// ============================================================================

static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let fonts: Vec<Font> = typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect();
    tracing::debug!(count = fonts.len(), "report fonts loaded");
    fonts
});

static FONT_BOOK: Lazy<LazyHash<FontBook>> = Lazy::new(|| LazyHash::new(FontBook::from_fonts(FONTS.iter())));

/// A single-file Typst world with the bundled fonts.
struct PdfWorld {
    main: Source,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONT_BOOK
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now().date_naive();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

/// Compile Typst markup to PDF bytes.
fn compile(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", msgs.join("; ")),
        }
    })?;

    let pdf = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", msgs.join("; ")),
        }
    })?;

    tracing::debug!(bytes = pdf.len(), "report compiled");
    Ok(pdf)
}

// ============================================================================
// Report content
// ============================================================================

/// Title-block information printed on every report.
#[derive(Debug, Clone, Default)]
pub struct ReportHeader {
    pub engineer: String,
    pub job_id: String,
    pub client: String,
    pub bridge_name: String,
    /// Governing code, e.g. "IRC 78:2014 / IS 456:2000"
    pub code: String,
}

impl From<&ProjectMetadata> for ReportHeader {
    fn from(meta: &ProjectMetadata) -> Self {
        ReportHeader {
            engineer: meta.engineer.clone(),
            job_id: meta.job_id.clone(),
            client: meta.client.clone(),
            bridge_name: meta.bridge_name.clone(),
            code: String::new(),
        }
    }
}

fn preamble(header: &ReportHeader) -> String {
    format!(
        r##"
#set page(
  paper: "a4",
  margin: (top: 22mm, bottom: 22mm, left: 20mm, right: 20mm),
  header: align(right)[
    #text(size: 8pt, fill: gray)[BridgeWorks Substructure Calculations]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 8pt)[Job: {job_id}]],
      align(center)[#text(size: 8pt)[Page #counter(page).display()]],
      align(right)[#text(size: 8pt)[{date}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10.5pt)
#set table(inset: 6pt, stroke: 0.5pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      [Bridge:], [{bridge}],
      [Engineer:], [{engineer}],
      [Job ID:], [{job_id}],
      [Client:], [{client}],
      [Date:], [{date}],
    )
  ],
  [
    *Code Reference*
    #v(4pt)
    {code}
  ]
)
"##,
        job_id = escape_typst(&header.job_id),
        bridge = escape_typst(&header.bridge_name),
        engineer = escape_typst(&header.engineer),
        client = escape_typst(&header.client),
        code = escape_typst(if header.code.is_empty() {
            "IRC 78:2014 / IS 456:2000"
        } else {
            &header.code
        }),
        date = Utc::now().format("%Y-%m-%d"),
    )
}

fn title_block(title: &str, subtitle: &str) -> String {
    format!(
        r##"
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{}]
    #v(4pt)
    #text(size: 13pt)[{}]
  ]
]
#v(10pt)
"##,
        escape_typst(title),
        escape_typst(subtitle)
    )
}

/// `(label, value, unit)` rows as a three-column table.
fn value_table(rows: &[(&str, String, &str)]) -> String {
    let mut out = String::from(
        "#table(\n  columns: (1fr, auto, auto),\n  align: (left, right, left),\n  table.header([*Item*], [*Value*], [*Unit*]),\n",
    );
    for (label, value, unit) in rows {
        out.push_str(&format!("  [{}], [{}], [{}],\n", label, value, unit));
    }
    out.push_str(")\n");
    out
}

fn ok_fail(pass: bool) -> &'static str {
    if pass {
        "OK"
    } else {
        "FAIL"
    }
}

fn status_block(status: DesignStatus, failed: &[&str]) -> String {
    let (fill, text) = match status {
        DesignStatus::DesignComplete => ("rgb(\"#d4edda\")", "DESIGN COMPLETE"),
        DesignStatus::RequiresOptimization => ("rgb(\"#f8d7da\")", "REQUIRES OPTIMIZATION"),
    };
    let detail = if failed.is_empty() {
        "All stability checks satisfied".to_string()
    } else {
        format!("Failed checks: {}", failed.join(", "))
    };
    format!(
        r##"
#align(center)[
  #block(width: auto, fill: {fill}, inset: 14pt, radius: 4pt)[
    #text(size: 14pt, weight: "bold")[{text}]
    #v(4pt)
    #text(size: 10pt)[{detail}]
  ]
]
"##
    )
}

/// Report body for one abutment.
fn abutment_section(input: &AbutmentInput, design: &AbutmentDesign, criteria: &DesignCriteria) -> String {
    let p = &input.project;
    let s = &input.soil;
    let g = &design.geometry;
    let l = &design.loads;
    let e = &design.earth_pressures;
    let st = &design.stability;
    let r = &design.reinforcement;
    let q = &design.quantities;

    let mut out = title_block(
        &format!("Abutment Design: {}", input.label),
        &format!("{} abutment, {}", design.abutment_type, input.material.display_name()),
    );

    out.push_str("== Input Parameters\n\n");
    out.push_str(&value_table(&[
        ("Bridge width", format!("{:.2}", p.bridge_width), "m"),
        ("Deck level", format!("{:.3}", p.deck_level), "m"),
        ("Foundation level", format!("{:.3}", p.foundation_level), "m"),
        ("HFL", format!("{:.3}", p.hfl), "m"),
        ("Soil unit weight γ", format!("{:.1}", s.unit_weight), "kN/m³"),
        ("Angle of friction φ", format!("{:.1}", s.friction_angle), "deg"),
        ("Safe bearing capacity", format!("{:.0}", s.bearing_capacity), "kN/m²"),
        ("Base friction μ", format!("{:.2}", s.friction_coefficient), ""),
        ("Concrete fck", format!("{:.0}", input.material.fck), "N/mm²"),
        ("Steel fy", format!("{:.0}", input.material.fy), "N/mm²"),
    ]));

    out.push_str("\n== Geometry\n\n");
    let mut geometry_rows = vec![("Height H", format!("{:.3}", g.height), "m")];
    match g.stem {
        StemProfile::Battered {
            top_width,
            bottom_width,
            batter_ratio,
        } => {
            geometry_rows.push(("Stem top width", format!("{:.3}", top_width), "m"));
            geometry_rows.push(("Stem bottom width", format!("{:.3}", bottom_width), "m"));
            geometry_rows.push(("Batter", format!("{:.2}", batter_ratio), "H:V"));
        }
        StemProfile::Cantilever {
            stem_thickness,
            heel_length,
            toe_length,
        } => {
            geometry_rows.push(("Stem thickness", format!("{:.3}", stem_thickness), "m"));
            geometry_rows.push(("Heel length", format!("{:.3}", heel_length), "m"));
            geometry_rows.push(("Toe length", format!("{:.3}", toe_length), "m"));
        }
    }
    geometry_rows.extend([
        ("Base length L", format!("{:.3}", g.base_length), "m"),
        ("Base width B", format!("{:.3}", g.base_width), "m"),
        ("Base thickness t", format!("{:.3}", g.base_thickness), "m"),
        ("Stem volume", format!("{:.2}", g.stem_volume), "m³"),
        ("Base volume", format!("{:.2}", g.base_volume), "m³"),
        ("Wing wall volume", format!("{:.2}", g.wing_volume), "m³"),
    ]);
    out.push_str(&value_table(&geometry_rows));

    out.push_str("\n== Loads\n\n");
    out.push_str(&value_table(&[
        ("Stem self weight", format!("{:.1}", l.stem_weight), "kN"),
        ("Base self weight", format!("{:.1}", l.base_weight), "kN"),
        ("Wing wall self weight", format!("{:.1}", l.wing_weight), "kN"),
        ("Total dead load", format!("{:.1}", l.total_dead_load), "kN"),
        ("Deck reaction", format!("{:.1}", l.deck_reaction), "kN"),
        ("Live load reaction", format!("{:.1}", l.live_load_reaction), "kN"),
        ("Total vertical load ΣV", format!("{:.1}", l.total_vertical_load), "kN"),
    ]));

    out.push_str(&format!(
        r##"
== Earth Pressure

$ K_a = tan^2(45° - phi/2) = {ka:.4} quad K_p = tan^2(45° + phi/2) = {kp:.4} $

$ P_a = 1/2 K_a gamma H^2 = {pa:.2} "kN" quad M_a = P_a H / 3 = {ma:.2} "kN·m" $

$ P_p = 1/2 K_p gamma t^2 = {pp:.2} "kN" quad H_"net" = P_a - P_p = {net:.2} "kN" $

"##,
        ka = e.ka,
        kp = e.kp,
        pa = e.active_force,
        ma = e.active_moment,
        pp = e.passive_force,
        net = e.net_horizontal_force,
    ));

    out.push_str(&format!(
        r##"
== Stability Checks

#table(
  columns: (1fr, auto, auto, auto),
  align: (left, right, right, center),
  table.header([*Check*], [*Value*], [*Limit*], [*Status*]),
  [Overturning FOS], [{otf:.2}], [≥ {otm:.2}], [{ots}],
  [Sliding FOS], [{slf:.2}], [≥ {slm:.2}], [{sls}],
  [Bearing pressure (kN/m²)], [{bp:.1}], [≤ {sbc:.0}], [{bs}],
)

Eccentricity $e = {ecc:.3}$ m, effective width $B' = B - 2|e| = {beff:.3}$ m.

"##,
        otf = st.overturning_factor,
        otm = criteria.overturning_fos_min,
        ots = ok_fail(st.overturning_safe),
        slf = st.sliding_factor,
        slm = criteria.sliding_fos_min,
        sls = ok_fail(st.sliding_safe),
        bp = st.bearing_pressure,
        sbc = st.bearing_capacity,
        bs = ok_fail(st.bearing_safe),
        ecc = st.eccentricity,
        beff = st.effective_width,
    ));

    out.push_str("\n== Reinforcement (per metre strip)\n\n");
    out.push_str(&value_table(&[
        ("Design moment", format!("{:.2}", r.design_moment), "kN·m"),
        ("Effective depth d", format!("{:.0}", r.effective_depth), "mm"),
        ("Ast required", format!("{:.0}", r.ast_required), "mm²"),
        ("Ast minimum", format!("{:.0}", r.ast_min), "mm²"),
        ("Ast provided", format!("{:.0}", r.ast_provided), "mm²"),
        ("Ast from bars", format!("{:.0}", r.ast_from_bars), "mm²"),
    ]));
    out.push_str(&format!("\n*Provide:* {}\n", escape_typst(&r.schedule())));

    out.push_str("\n== Quantities\n\n");
    out.push_str(&value_table(&[
        ("Concrete", format!("{:.2}", q.concrete_volume), "m³"),
        ("Reinforcement", format!("{:.0}", q.steel_weight), "kg"),
        ("Formwork", format!("{:.2}", q.formwork_area), "m²"),
        ("Excavation", format!("{:.2}", q.excavation_volume), "m³"),
    ]));

    out.push_str(&status_block(design.design_status, &st.failed_checks()));
    out
}

/// Report body for one hydraulic section.
fn hydraulic_section(input: &HydraulicInput, result: &HydraulicResult) -> String {
    let mut out = title_block(&format!("Hydraulic Analysis: {}", input.label), "Waterway, afflux and scour");

    out.push_str("== Input Parameters\n\n");
    out.push_str(&value_table(&[
        ("Design discharge Q", format!("{:.2}", input.discharge), "m³/s"),
        ("Manning's n", format!("{:.3}", input.manning_n), ""),
        ("Bed slope", input.bed_slope.to_string(), ""),
        ("Silt factor Ksf", format!("{:.2}", input.silt_factor), ""),
        ("HFL", format!("{:.3}", input.hfl), "m"),
        ("Deck level", format!("{:.3}", input.deck_level), "m"),
        ("Piers", format!("{} × {:.2}", input.pier_count, input.pier_width), "m"),
        ("Skew angle", format!("{:.1}", input.skew_angle), "deg"),
    ]));

    out.push_str("\n== Results\n\n");
    out.push_str(&value_table(&[
        ("Wetted area A", format!("{:.2}", result.wetted_area), "m²"),
        ("Wetted perimeter P", format!("{:.2}", result.wetted_perimeter), "m"),
        ("Hydraulic radius R", format!("{:.3}", result.hydraulic_radius), "m"),
        ("Velocity V", format!("{:.3}", result.velocity), "m/s"),
        ("Regime width W", format!("{:.2}", result.regime_width), "m"),
        ("Effective waterway", format!("{:.2}", result.effective_waterway), "m"),
        ("Afflux", format!("{:.3}", result.afflux), "m"),
        ("Obstructed velocity", format!("{:.3}", result.obstructed_velocity), "m/s"),
        ("Normal scour depth", format!("{:.2}", result.normal_scour_depth), "m"),
        ("Design scour depth", format!("{:.2}", result.design_scour_depth), "m"),
        ("Scour level", format!("{:.3}", result.scour_level), "m"),
        ("Freeboard", format!("{:.3}", result.freeboard), "m"),
    ]));
    out.push_str(&format!("\nFreeboard check: *{}*\n", ok_fail(result.freeboard_ok)));
    out
}

// ============================================================================
// Public API
// ============================================================================

/// Render the calculation report for one abutment.
pub fn render_abutment_pdf(
    input: &AbutmentInput,
    design: &AbutmentDesign,
    criteria: &DesignCriteria,
    header: &ReportHeader,
) -> CalcResult<Vec<u8>> {
    compile(abutment_report_source(input, design, criteria, header))
}

fn abutment_report_source(
    input: &AbutmentInput,
    design: &AbutmentDesign,
    criteria: &DesignCriteria,
    header: &ReportHeader,
) -> String {
    let mut source = preamble(header);
    source.push_str(&abutment_section(input, design, criteria));

    let mut tracker = EquationTracker::new();
    for equation in abutment_design_equations(design.abutment_type) {
        tracker.record_for_member(equation, "Abutment design", input.label.clone());
    }
    source.push_str(&tracker.generate_appendix_typst());
    source
}

/// Render a report for every item in a project.
///
/// Items that fail to calculate are listed on the summary page with their
/// error and skipped in the body.
pub fn render_project_pdf(project: &Project) -> CalcResult<Vec<u8>> {
    compile(project_report_source(project))
}

fn project_report_source(project: &Project) -> String {
    let mut header = ReportHeader::from(&project.meta);
    header.code = project.settings.code.clone();
    let criteria = &project.settings.criteria;

    let mut source = preamble(&header);
    source.push_str(&title_block("Calculation Package", &project.meta.bridge_name));

    let mut summary = Vec::new();
    let mut body = String::new();
    let mut tracker = EquationTracker::new();

    for (i, (_, item)) in project.sorted_items().into_iter().enumerate() {
        let label = escape_typst(item.label());
        let status = match (item, item.calculate(criteria)) {
            (CalculationItem::Abutment(input), Ok(CalculationResult::Abutment(design))) => {
                body.push_str("\n#pagebreak()\n");
                body.push_str(&abutment_section(input, &design, criteria));
                for equation in abutment_design_equations(design.abutment_type) {
                    tracker.record_for_member(equation, "Abutment design", input.label.clone());
                }
                design.design_status.to_string()
            }
            (CalculationItem::Hydraulic(input), Ok(CalculationResult::Hydraulic(result))) => {
                body.push_str("\n#pagebreak()\n");
                body.push_str(&hydraulic_section(input, &result));
                for equation in hydraulic_analysis_equations() {
                    tracker.record_for_member(equation, "Hydraulic analysis", input.label.clone());
                }
                format!("Freeboard {}", ok_fail(result.freeboard_ok))
            }
            (_, Err(e)) => format!("ERROR: {}", e.error_code()),
            (_, Ok(_)) => "ERROR: INTERNAL_ERROR".to_string(),
        };
        summary.push(format!(
            "  [{}], [{}], [{}], [{}],",
            i + 1,
            item.calc_type(),
            label,
            escape_typst(&status)
        ));
    }

    source.push_str(&format!(
        r##"
== Calculation Summary

#table(
  columns: (auto, auto, 1fr, auto),
  align: (left, left, left, center),
  table.header([*No.*], [*Type*], [*Item*], [*Status*]),
{}
)

#v(16pt)
#text(size: 8pt, fill: gray)[
  Generated by BridgeWorks. \
  Calculations must be checked by the responsible engineer before use.
]
"##,
        summary.join("\n")
    ));
    source.push_str(&body);
    source.push_str(&tracker.generate_appendix_typst());
    source
}

/// Escape characters with markup meaning in user-provided text.
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
