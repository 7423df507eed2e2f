//! # Equation Registry
//!
//! Central registry of every formula used in the abutment and hydraulic
//! calculations. Each equation carries its code reference, formula and
//! variable definitions so reports can cite exactly what was applied.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Full metadata for PDF generation and audit trails
//! - Serialization support for JSON export
//!
//! ## Usage
//!
//! ```rust
//! use bridge_core::equations::registry::{Equation, EquationUsage};
//!
//! // Track equation usage during calculation
//! let usage = EquationUsage::new(Equation::RankineActiveCoefficient, "Backfill");
//!
//! // Get metadata for PDF appendix
//! let meta = Equation::RankineActiveCoefficient.metadata();
//! println!("Formula: {}", meta.formula_typst);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::calculations::AbutmentType;

// ============================================================================
// Code References
// ============================================================================

/// Reference to a design code or standard.
///
/// All equations should cite their source for auditability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// Indian Roads Congress road bridge codes (IRC 5, IRC 6, IRC 78)
    IRC {
        code: u16,
        clause: &'static str,
    },
    /// IRC SP 13 - Guidelines for the Design of Small Bridges and Culverts
    IRCSP13 {
        section: &'static str,
    },
    /// IS 456 - Plain and Reinforced Concrete, Code of Practice
    IS456 {
        clause: &'static str,
    },
    /// Fundamental mechanics (no specific code reference needed)
    Mechanics,
}

impl CodeReference {
    /// Format the reference for display in PDF reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::IRC { code, clause } => format!("IRC {} Clause {}", code, clause),
            CodeReference::IRCSP13 { section } => format!("IRC SP 13 Section {}", section),
            CodeReference::IS456 { clause } => format!("IS 456:2000 Clause {}", clause),
            CodeReference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::IRC { .. } => "IRC",
            CodeReference::IRCSP13 { .. } => "IRC SP 13",
            CodeReference::IS456 { .. } => "IS 456",
            CodeReference::Mechanics => "Mechanics",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the PDF appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Proportioning of stem, base and wing walls
    Geometry,
    /// Self weight and superstructure reactions
    Loads,
    /// Lateral earth pressure coefficients and thrusts
    EarthPressure,
    /// Overturning, sliding and bearing
    Stability,
    /// Flexural steel
    Reinforcement,
    /// Bill of quantities
    Quantities,
    /// Waterway, velocity and scour
    Hydraulics,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Geometry => "Geometry",
            EquationCategory::Loads => "Loads",
            EquationCategory::EarthPressure => "Earth Pressure",
            EquationCategory::Stability => "Stability",
            EquationCategory::Reinforcement => "Reinforcement",
            EquationCategory::Quantities => "Quantities",
            EquationCategory::Hydraulics => "Hydraulics",
        }
    }

    /// Sort order for PDF appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::Hydraulics => 1,
            EquationCategory::Geometry => 2,
            EquationCategory::Loads => 3,
            EquationCategory::EarthPressure => 4,
            EquationCategory::Stability => 5,
            EquationCategory::Reinforcement => 6,
            EquationCategory::Quantities => 7,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "K_a", "H", "gamma")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "kN", "m", "kN/m³")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for an equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name (e.g., "Rankine Active Coefficient")
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    /// Code/standard reference
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping in appendix
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations used in BridgeWorks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------
    /// b_bot = b_top + 2 × batter × H
    BatteredStemWidth,
    /// V = (b_top + b_bot)/2 × H × L
    TrapezoidalStemVolume,
    /// t = max(t_min, H/12)
    CantileverStemThickness,
    /// heel = 0.6H, toe = 0.3H, t_base = max(0.6, H/10)
    CantileverBaseProportions,
    /// V = L × B × t
    FootingVolume,
    /// V = 2 × l × rH × t
    WingWallVolume,

    // -------------------------------------------------------------------------
    // Loads
    // -------------------------------------------------------------------------
    /// W = ΣV × γc
    ConcreteSelfWeight,
    /// ΣV = W + R_dead + R_live
    TotalVerticalLoad,

    // -------------------------------------------------------------------------
    // Earth Pressure
    // -------------------------------------------------------------------------
    /// Ka = tan²(45° − φ/2)
    RankineActiveCoefficient,
    /// Kp = tan²(45° + φ/2)
    RankinePassiveCoefficient,
    /// Pa = ½ Ka γ H², Ma = Pa H / 3
    ActiveThrust,
    /// Pp = ½ Kp γ t²
    PassiveResistance,

    // -------------------------------------------------------------------------
    // Stability
    // -------------------------------------------------------------------------
    /// FOS = Mr / Mo
    OverturningFactor,
    /// FOS = (μV + Pp) / H_net
    SlidingFactor,
    /// e = (Mo − Mr)/V
    Eccentricity,
    /// q = V / (L (B − 2|e|))
    EffectiveAreaBearing,
    /// σmax = V/(LB) × (1 + 6e/L)
    KernBearingPressure,

    // -------------------------------------------------------------------------
    // Reinforcement
    // -------------------------------------------------------------------------
    /// Mu = γf × Ma
    FactoredMoment,
    /// d = D − cover
    EffectiveDepth,
    /// Ast = Mu / (0.87 fy × 0.9d)
    RequiredSteelArea,
    /// Ast,min = 0.12% b D
    MinimumSteelArea,
    /// s = b / ⌈Ast / a_bar⌉
    BarSpacing,

    // -------------------------------------------------------------------------
    // Quantities
    // -------------------------------------------------------------------------
    /// W_s = V_c × p/100 × ρs
    SteelQuantity,
    /// A_f = 2HL + 2(L + B)t
    FormworkArea,
    /// V_e = (L + 1)(B + 1)(t + 0.5)
    ExcavationVolume,

    // -------------------------------------------------------------------------
    // Hydraulics
    // -------------------------------------------------------------------------
    /// W = 4.8 √Q
    LaceyRegimeWidth,
    /// R = A / P
    HydraulicRadius,
    /// V = (1/n) R^(2/3) S^(1/2)
    ManningVelocity,
    /// dsm = 1.34 (Db²/Ksf)^(1/3)
    LaceyScourDepth,
    /// h = (Q/W_eff)²/2g × (1/r² − 1)
    Afflux,
    /// V' = V / cos θ
    ObstructedVelocity,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            // Geometry
            Equation::BatteredStemWidth => EquationMetadata {
                name: "Battered Stem Bottom Width",
                description: "Width of a battered stem at its base from the top width and batter",
                formula_typst: r#"$b_("bot") = b_("top") + 2 n H$"#,
                formula_plain: "b_bot = b_top + 2nH",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("b_(\"top\")", "Stem width at bearing level", "m"),
                    Variable::new("n", "Batter (horizontal per unit height)", "-"),
                    Variable::new("H", "Abutment height", "m"),
                ],
                assumptions: vec!["Batter applied to both faces"],
                category: EquationCategory::Geometry,
                source_module: "calculations/geometry.rs",
                source_function: "battered",
            },

            Equation::TrapezoidalStemVolume => EquationMetadata {
                name: "Trapezoidal Stem Volume",
                description: "Concrete volume of a stem with linearly varying width",
                formula_typst: r#"$V_s = (b_("top") + b_("bot")) / 2 dot H dot L$"#,
                formula_plain: "V_s = (b_top + b_bot)/2 * H * L",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("V_s", "Stem volume", "m³"),
                    Variable::new("L", "Stem length across the carriageway", "m"),
                ],
                assumptions: vec!["Prismatic along the length"],
                category: EquationCategory::Geometry,
                source_module: "calculations/geometry.rs",
                source_function: "battered",
            },

            Equation::CantileverStemThickness => EquationMetadata {
                name: "Cantilever Stem Thickness",
                description: "Stem thickness proportioned from the retained height",
                formula_typst: r#"$t_s = max(t_("min"), H / 12)$"#,
                formula_plain: "t_s = max(t_min, H/12)",
                reference: CodeReference::IRC { code: 78, clause: "710" },
                variables: vec![
                    Variable::new("t_s", "Stem thickness", "m"),
                    Variable::new("t_(\"min\")", "Minimum stem thickness (0.3 m)", "m"),
                    Variable::new("H", "Abutment height", "m"),
                ],
                assumptions: vec!["Preliminary proportioning rule"],
                category: EquationCategory::Geometry,
                source_module: "calculations/geometry.rs",
                source_function: "cantilever",
            },

            Equation::CantileverBaseProportions => EquationMetadata {
                name: "Cantilever Base Proportions",
                description: "Heel, toe and base slab thickness from the retained height",
                formula_typst: r#"$l_h = 0.6 H$, $l_t = 0.3 H$, $t_b = max(0.6, H / 10)$"#,
                formula_plain: "l_heel = 0.6H, l_toe = 0.3H, t_base = max(0.6, H/10)",
                reference: CodeReference::IRC { code: 78, clause: "710" },
                variables: vec![
                    Variable::new("l_h", "Heel length", "m"),
                    Variable::new("l_t", "Toe length", "m"),
                    Variable::new("t_b", "Base slab thickness", "m"),
                ],
                assumptions: vec!["Base width B = l_t + t_s + l_h"],
                category: EquationCategory::Geometry,
                source_module: "calculations/geometry.rs",
                source_function: "cantilever",
            },

            Equation::FootingVolume => EquationMetadata {
                name: "Footing Volume",
                description: "Concrete volume of a rectangular base slab",
                formula_typst: r#"$V_b = L dot B dot t$"#,
                formula_plain: "V_b = L * B * t",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("L", "Base length", "m"),
                    Variable::new("B", "Base width", "m"),
                    Variable::new("t", "Base thickness", "m"),
                ],
                assumptions: vec!["Rectangular slab of uniform thickness"],
                category: EquationCategory::Geometry,
                source_module: "calculations/geometry.rs",
                source_function: "calculate",
            },

            Equation::WingWallVolume => EquationMetadata {
                name: "Wing Wall Volume",
                description: "Concrete volume of the two return wing walls",
                formula_typst: r#"$V_w = 2 dot l_w dot r H dot t_w$"#,
                formula_plain: "V_w = 2 * l_w * rH * t_w",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("l_w", "Wing wall length", "m"),
                    Variable::new("r", "Wing height as a fraction of H", "-"),
                    Variable::new("t_w", "Wing wall thickness", "m"),
                ],
                assumptions: vec!["Two identical wings", "Average height rH"],
                category: EquationCategory::Geometry,
                source_module: "calculations/geometry.rs",
                source_function: "calculate",
            },

            // Loads
            Equation::ConcreteSelfWeight => EquationMetadata {
                name: "Concrete Self Weight",
                description: "Dead load of the abutment from its concrete volume",
                formula_typst: r#"$W = (V_s + V_b + V_w) gamma_c$"#,
                formula_plain: "W = (V_s + V_b + V_w) * gamma_c",
                reference: CodeReference::IRC { code: 6, clause: "203" },
                variables: vec![
                    Variable::new("W", "Self weight", "kN"),
                    Variable::new("gamma_c", "Unit weight of reinforced concrete", "kN/m³"),
                ],
                assumptions: vec!["Reinforced concrete unit weight 24 kN/m³ unless overridden"],
                category: EquationCategory::Loads,
                source_module: "calculations/loads.rs",
                source_function: "calculate",
            },

            Equation::TotalVerticalLoad => EquationMetadata {
                name: "Total Vertical Load",
                description: "Sum of self weight and superstructure reactions",
                formula_typst: r#"$sum V = W + R_D + R_L$"#,
                formula_plain: "V = W + R_D + R_L",
                reference: CodeReference::IRC { code: 6, clause: "202" },
                variables: vec![
                    Variable::new("R_D", "Superstructure dead load reaction", "kN"),
                    Variable::new("R_L", "Live load reaction", "kN"),
                ],
                assumptions: vec!["Reactions applied at the base centroid"],
                category: EquationCategory::Loads,
                source_module: "calculations/loads.rs",
                source_function: "calculate",
            },

            // Earth Pressure
            Equation::RankineActiveCoefficient => EquationMetadata {
                name: "Rankine Active Coefficient",
                description: "Active lateral earth pressure coefficient for a cohesionless backfill",
                formula_typst: r#"$K_a = tan^2(45 degree - phi / 2)$"#,
                formula_plain: "Ka = tan^2(45 - phi/2)",
                reference: CodeReference::IRC { code: 78, clause: "710.4" },
                variables: vec![
                    Variable::new("K_a", "Active coefficient", "-"),
                    Variable::new("phi", "Angle of internal friction", "deg"),
                ],
                assumptions: vec!["Vertical smooth wall back", "Horizontal backfill", "c = 0"],
                category: EquationCategory::EarthPressure,
                source_module: "equations/earth_pressure.rs",
                source_function: "rankine_active_coefficient",
            },

            Equation::RankinePassiveCoefficient => EquationMetadata {
                name: "Rankine Passive Coefficient",
                description: "Passive lateral earth pressure coefficient for a cohesionless soil",
                formula_typst: r#"$K_p = tan^2(45 degree + phi / 2)$"#,
                formula_plain: "Kp = tan^2(45 + phi/2)",
                reference: CodeReference::IRC { code: 78, clause: "710.4" },
                variables: vec![
                    Variable::new("K_p", "Passive coefficient", "-"),
                    Variable::new("phi", "Angle of internal friction", "deg"),
                ],
                assumptions: vec!["Vertical smooth wall", "Horizontal ground", "c = 0"],
                category: EquationCategory::EarthPressure,
                source_module: "equations/earth_pressure.rs",
                source_function: "rankine_passive_coefficient",
            },

            Equation::ActiveThrust => EquationMetadata {
                name: "Active Thrust and Moment",
                description: "Resultant of the triangular active pressure and its moment about the base",
                formula_typst: r#"$P_a = 1/2 K_a gamma H^2$, $M_a = P_a H / 3$"#,
                formula_plain: "Pa = 0.5 * Ka * gamma * H^2, Ma = Pa * H / 3",
                reference: CodeReference::IRC { code: 6, clause: "214" },
                variables: vec![
                    Variable::new("P_a", "Active thrust per metre", "kN/m"),
                    Variable::new("M_a", "Overturning moment per metre", "kN·m/m"),
                    Variable::new("gamma", "Soil unit weight", "kN/m³"),
                    Variable::new("H", "Retained height", "m"),
                ],
                assumptions: vec!["Resultant at H/3 above the base", "No surcharge"],
                category: EquationCategory::EarthPressure,
                source_module: "equations/earth_pressure.rs",
                source_function: "triangular_resultant",
            },

            Equation::PassiveResistance => EquationMetadata {
                name: "Passive Resistance",
                description: "Passive resistance mobilised in front of the base slab",
                formula_typst: r#"$P_p = 1/2 K_p gamma t^2$"#,
                formula_plain: "Pp = 0.5 * Kp * gamma * t^2",
                reference: CodeReference::IRC { code: 78, clause: "706.3.4" },
                variables: vec![
                    Variable::new("P_p", "Passive resistance per metre", "kN/m"),
                    Variable::new("t", "Base thickness (embedment)", "m"),
                ],
                assumptions: vec!["Only the base thickness is embedded"],
                category: EquationCategory::EarthPressure,
                source_module: "equations/earth_pressure.rs",
                source_function: "triangular_resultant",
            },

            // Stability
            Equation::OverturningFactor => EquationMetadata {
                name: "Factor of Safety Against Overturning",
                description: "Ratio of restoring to overturning moment about the toe",
                formula_typst: r#"$"FOS"_o = M_r / M_o >= 2.0$"#,
                formula_plain: "FOS_o = Mr / Mo >= 2.0",
                reference: CodeReference::IRC { code: 78, clause: "706.3.4" },
                variables: vec![
                    Variable::new("M_r", "Restoring moment, V × B/2", "kN·m"),
                    Variable::new("M_o", "Overturning moment", "kN·m"),
                ],
                assumptions: vec!["Vertical resultant at mid-width of base"],
                category: EquationCategory::Stability,
                source_module: "equations/stability.rs",
                source_function: "overturning_factor",
            },

            Equation::SlidingFactor => EquationMetadata {
                name: "Factor of Safety Against Sliding",
                description: "Ratio of base friction plus passive resistance to net horizontal force",
                formula_typst: r#"$"FOS"_s = (mu sum V + P_p) / H_("net") >= 1.5$"#,
                formula_plain: "FOS_s = (mu * V + Pp) / H_net >= 1.5",
                reference: CodeReference::IRC { code: 78, clause: "706.3.4" },
                variables: vec![
                    Variable::new("mu", "Base friction coefficient", "-"),
                    Variable::new("H_(\"net\")", "Active thrust less passive resistance", "kN"),
                ],
                assumptions: vec!["Net horizontal force must be positive"],
                category: EquationCategory::Stability,
                source_module: "equations/stability.rs",
                source_function: "sliding_factor",
            },

            Equation::Eccentricity => EquationMetadata {
                name: "Eccentricity of Resultant",
                description: "Offset of the vertical resultant derived from the moment balance",
                formula_typst: r#"$e = (M_o - M_r) / (sum V)$"#,
                formula_plain: "e = (Mo - Mr) / V",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("e", "Eccentricity", "m"),
                ],
                assumptions: vec!["Sign is not significant; magnitude is used"],
                category: EquationCategory::Stability,
                source_module: "equations/stability.rs",
                source_function: "eccentricity",
            },

            Equation::EffectiveAreaBearing => EquationMetadata {
                name: "Bearing Pressure on Effective Area",
                description: "Uniform soil pressure over the effective base width",
                formula_typst: r#"$q = (sum V) / (L (B - 2 |e|)) <= q_("allow")$"#,
                formula_plain: "q = V / (L * (B - 2|e|)) <= q_allow",
                reference: CodeReference::IRC { code: 78, clause: "706.2" },
                variables: vec![
                    Variable::new("q", "Bearing pressure", "kN/m²"),
                    Variable::new("q_(\"allow\")", "Safe bearing capacity", "kN/m²"),
                ],
                assumptions: vec!["Meyerhof effective width", "Effective width must be positive"],
                category: EquationCategory::Stability,
                source_module: "equations/stability.rs",
                source_function: "bearing_pressure",
            },

            Equation::KernBearingPressure => EquationMetadata {
                name: "Peak Base Pressure (Middle Third)",
                description: "Maximum toe pressure for a resultant inside the kern",
                formula_typst: r#"$sigma_("max") = V / (L B) (1 + 6 e / L)$"#,
                formula_plain: "sigma_max = V/(L*B) * (1 + 6e/L)",
                reference: CodeReference::IRC { code: 78, clause: "706.3.1" },
                variables: vec![
                    Variable::new("sigma_(\"max\")", "Peak base pressure", "kN/m²"),
                    Variable::new("e", "Eccentricity along L", "m"),
                ],
                assumptions: vec!["e <= L/6 (no tension under the base)"],
                category: EquationCategory::Stability,
                source_module: "equations/stability.rs",
                source_function: "kern_peak_pressure",
            },

            // Reinforcement
            Equation::FactoredMoment => EquationMetadata {
                name: "Factored Design Moment",
                description: "Ultimate moment from the active earth pressure moment",
                formula_typst: r#"$M_u = gamma_f M_a$"#,
                formula_plain: "Mu = gamma_f * Ma",
                reference: CodeReference::IS456 { clause: "36.4.1" },
                variables: vec![
                    Variable::new("M_u", "Factored moment", "kN·m"),
                    Variable::new("gamma_f", "Partial load factor (1.5)", "-"),
                ],
                assumptions: vec!["Earth pressure moment governs the stem"],
                category: EquationCategory::Reinforcement,
                source_module: "calculations/reinforcement.rs",
                source_function: "calculate",
            },

            Equation::EffectiveDepth => EquationMetadata {
                name: "Effective Depth",
                description: "Depth to the centroid of tension steel",
                formula_typst: r#"$d = D - c$"#,
                formula_plain: "d = D - cover",
                reference: CodeReference::IS456 { clause: "26.4" },
                variables: vec![
                    Variable::new("D", "Overall section depth", "mm"),
                    Variable::new("c", "Cover to bar centre (75 mm)", "mm"),
                ],
                assumptions: vec!["Single layer of tension steel"],
                category: EquationCategory::Reinforcement,
                source_module: "equations/flexure.rs",
                source_function: "effective_depth",
            },

            Equation::RequiredSteelArea => EquationMetadata {
                name: "Required Tension Steel",
                description: "Steel area from a simplified lever arm",
                formula_typst: r#"$A_("st") = M_u / (0.87 f_y dot 0.9 d)$"#,
                formula_plain: "Ast = Mu / (0.87 * fy * 0.9d)",
                reference: CodeReference::IS456 { clause: "G-1.1" },
                variables: vec![
                    Variable::new("A_(\"st\")", "Tension steel area per metre", "mm²"),
                    Variable::new("f_y", "Steel yield strength", "N/mm²"),
                    Variable::new("d", "Effective depth", "mm"),
                ],
                assumptions: vec!["Lever arm z = 0.9d", "Under-reinforced section"],
                category: EquationCategory::Reinforcement,
                source_module: "equations/flexure.rs",
                source_function: "required_steel_area",
            },

            Equation::MinimumSteelArea => EquationMetadata {
                name: "Minimum Reinforcement",
                description: "Minimum steel for a slab-like member",
                formula_typst: r#"$A_("st,min") = 0.12 / 100 dot b D$"#,
                formula_plain: "Ast_min = 0.12/100 * b * D",
                reference: CodeReference::IS456 { clause: "26.5.2.1" },
                variables: vec![
                    Variable::new("b", "Design strip width (1000 mm)", "mm"),
                    Variable::new("D", "Overall depth", "mm"),
                ],
                assumptions: vec!["High-yield deformed bars"],
                category: EquationCategory::Reinforcement,
                source_module: "equations/flexure.rs",
                source_function: "minimum_steel_area",
            },

            Equation::BarSpacing => EquationMetadata {
                name: "Bar Spacing",
                description: "Bar count and centre-to-centre spacing across a 1 m strip",
                formula_typst: r#"$n = ceil(A_("st") / a_b)$, $s = b / n$"#,
                formula_plain: "n = ceil(Ast / a_bar), s = b / n",
                reference: CodeReference::IS456 { clause: "26.3.3" },
                variables: vec![
                    Variable::new("a_b", "Area of one bar (314 mm² for 20 mm)", "mm²"),
                    Variable::new("s", "Spacing", "mm"),
                ],
                assumptions: vec!["Uniform bar size"],
                category: EquationCategory::Reinforcement,
                source_module: "equations/flexure.rs",
                source_function: "bar_spacing",
            },

            // Quantities
            Equation::SteelQuantity => EquationMetadata {
                name: "Steel Quantity",
                description: "Reinforcement mass from a volumetric steel percentage",
                formula_typst: r#"$W_s = V_c dot p / 100 dot rho_s$"#,
                formula_plain: "W_s = V_c * p/100 * rho_s",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("V_c", "Concrete volume", "m³"),
                    Variable::new("p", "Steel by volume (1.5%)", "%"),
                    Variable::new("rho_s", "Density of steel (7850)", "kg/m³"),
                ],
                assumptions: vec!["Uniform steel percentage throughout"],
                category: EquationCategory::Quantities,
                source_module: "calculations/quantities.rs",
                source_function: "calculate",
            },

            Equation::FormworkArea => EquationMetadata {
                name: "Formwork Area",
                description: "Shuttering for both stem faces and the base perimeter",
                formula_typst: r#"$A_f = 2 H L + 2 (L + B) t$"#,
                formula_plain: "A_f = 2HL + 2(L + B)t",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("A_f", "Formwork area", "m²"),
                ],
                assumptions: vec!["Wing wall shuttering not included"],
                category: EquationCategory::Quantities,
                source_module: "calculations/quantities.rs",
                source_function: "calculate",
            },

            Equation::ExcavationVolume => EquationMetadata {
                name: "Excavation Volume",
                description: "Foundation pit with working space on each side",
                formula_typst: r#"$V_e = (L + 2w)(B + 2w)(t + d_e)$"#,
                formula_plain: "V_e = (L + 2w)(B + 2w)(t + d_e)",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("w", "Working space per side (0.5 m)", "m"),
                    Variable::new("d_e", "Extra depth below base (0.5 m)", "m"),
                ],
                assumptions: vec!["Vertical pit sides"],
                category: EquationCategory::Quantities,
                source_module: "calculations/quantities.rs",
                source_function: "calculate",
            },

            // Hydraulics
            Equation::LaceyRegimeWidth => EquationMetadata {
                name: "Lacey Regime Width",
                description: "Stable waterway width of an alluvial stream",
                formula_typst: r#"$W = 4.8 sqrt(Q)$"#,
                formula_plain: "W = 4.8 * sqrt(Q)",
                reference: CodeReference::IRC { code: 5, clause: "104.3" },
                variables: vec![
                    Variable::new("W", "Regime width", "m"),
                    Variable::new("Q", "Design discharge", "m³/s"),
                ],
                assumptions: vec!["Alluvial bed in regime"],
                category: EquationCategory::Hydraulics,
                source_module: "equations/hydraulics.rs",
                source_function: "regime_width",
            },

            Equation::HydraulicRadius => EquationMetadata {
                name: "Hydraulic Radius",
                description: "Flow area over wetted perimeter",
                formula_typst: r#"$R = A / P$"#,
                formula_plain: "R = A / P",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("A", "Flow area below HFL", "m²"),
                    Variable::new("P", "Wetted perimeter", "m"),
                ],
                assumptions: vec!["Surveyed section linear between points"],
                category: EquationCategory::Hydraulics,
                source_module: "equations/hydraulics.rs",
                source_function: "hydraulic_radius",
            },

            Equation::ManningVelocity => EquationMetadata {
                name: "Manning Velocity",
                description: "Mean velocity of uniform flow",
                formula_typst: r#"$V = 1/n R^(2/3) S^(1/2)$"#,
                formula_plain: "V = (1/n) * R^(2/3) * S^(1/2)",
                reference: CodeReference::IRCSP13 { section: "4.4" },
                variables: vec![
                    Variable::new("V", "Mean velocity", "m/s"),
                    Variable::new("n", "Manning roughness", "-"),
                    Variable::new("S", "Bed slope", "-"),
                ],
                assumptions: vec!["Uniform flow", "SI units"],
                category: EquationCategory::Hydraulics,
                source_module: "equations/hydraulics.rs",
                source_function: "manning_velocity",
            },

            Equation::LaceyScourDepth => EquationMetadata {
                name: "Lacey Scour Depth",
                description: "Normal scour depth below HFL from the discharge intensity",
                formula_typst: r#"$d_("sm") = 1.34 (D_b^2 / K_("sf"))^(1/3)$"#,
                formula_plain: "dsm = 1.34 * (Db^2 / Ksf)^(1/3)",
                reference: CodeReference::IRC { code: 78, clause: "703.2" },
                variables: vec![
                    Variable::new("D_b", "Discharge per metre of effective waterway", "m³/s/m"),
                    Variable::new("K_(\"sf\")", "Silt factor", "-"),
                ],
                assumptions: vec!["Design scour taken as 1.5 × dsm for abutments"],
                category: EquationCategory::Hydraulics,
                source_module: "equations/hydraulics.rs",
                source_function: "lacey_scour_depth",
            },

            Equation::Afflux => EquationMetadata {
                name: "Afflux",
                description: "Heading up of water upstream of a constricted opening",
                formula_typst: r#"$h = (Q \/ W_e)^2 / (2 g) (1 / r^2 - 1)$, $r = W_e / W$"#,
                formula_plain: "h = (Q/W_e)^2/(2g) * (1/r^2 - 1), r = W_e/W",
                reference: CodeReference::IRCSP13 { section: "11" },
                variables: vec![
                    Variable::new("W_e", "Effective linear waterway", "m"),
                    Variable::new("W", "Natural surface width at HFL", "m"),
                    Variable::new("g", "Gravitational acceleration", "m/s²"),
                ],
                assumptions: vec!["Zero when the opening is not constricted"],
                category: EquationCategory::Hydraulics,
                source_module: "equations/hydraulics.rs",
                source_function: "afflux",
            },

            Equation::ObstructedVelocity => EquationMetadata {
                name: "Velocity at Skewed Piers",
                description: "Velocity component normal to the pier line",
                formula_typst: r#"$V' = V / cos theta$"#,
                formula_plain: "V' = V / cos(theta)",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("theta", "Skew angle", "deg"),
                ],
                assumptions: vec!["Skew below 90°"],
                category: EquationCategory::Hydraulics,
                source_module: "equations/hydraulics.rs",
                source_function: "obstructed_velocity",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories that contain at least one equation
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            Geometry,
            Loads,
            EarthPressure,
            Stability,
            Reinforcement,
            Quantities,
            Hydraulics,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    // Geometry
    Equation::BatteredStemWidth,
    Equation::TrapezoidalStemVolume,
    Equation::CantileverStemThickness,
    Equation::CantileverBaseProportions,
    Equation::FootingVolume,
    Equation::WingWallVolume,
    // Loads
    Equation::ConcreteSelfWeight,
    Equation::TotalVerticalLoad,
    // Earth pressure
    Equation::RankineActiveCoefficient,
    Equation::RankinePassiveCoefficient,
    Equation::ActiveThrust,
    Equation::PassiveResistance,
    // Stability
    Equation::OverturningFactor,
    Equation::SlidingFactor,
    Equation::Eccentricity,
    Equation::EffectiveAreaBearing,
    Equation::KernBearingPressure,
    // Reinforcement
    Equation::FactoredMoment,
    Equation::EffectiveDepth,
    Equation::RequiredSteelArea,
    Equation::MinimumSteelArea,
    Equation::BarSpacing,
    // Quantities
    Equation::SteelQuantity,
    Equation::FormworkArea,
    Equation::ExcavationVolume,
    // Hydraulics
    Equation::LaceyRegimeWidth,
    Equation::HydraulicRadius,
    Equation::ManningVelocity,
    Equation::LaceyScourDepth,
    Equation::Afflux,
    Equation::ObstructedVelocity,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Context describing where it was used (e.g., "Stem at base")
    pub context: String,
    /// Optional: the item label this equation was applied to
    pub member_label: Option<String>,
}

impl EquationUsage {
    /// Create a new equation usage record
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            member_label: None,
        }
    }

    /// Create usage record with an item label
    pub fn for_member(equation: Equation, context: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            member_label: Some(label.into()),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Record equation usage for a specific item
    pub fn record_for_member(&mut self, equation: Equation, context: impl Into<String>, label: impl Into<String>) {
        self.usages.push(EquationUsage::for_member(equation, context, label));
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by equation for appendix generation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category for appendix
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "List of Equations" appendix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bridge_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record_for_member(Equation::RankineActiveCoefficient, "Backfill", "A-1");
    /// tracker.record_for_member(Equation::OverturningFactor, "Stability", "A-1");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Rankine Active Coefficient"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)

#text(size: 10pt)[
  This appendix lists the formulas applied in this design report.
  Each entry gives the formula, its code reference and the items it was applied to.
]

#v(16pt)
"##);

        let by_category = self.by_category();

        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this project.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", meta.reference.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("*Variables:*\n");
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  align: (left, left, left),\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");

                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            var.description,
                            var.units
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let mut labels: Vec<&str> = usages
                        .iter()
                        .filter_map(|u| u.member_label.as_deref())
                        .collect();
                    labels.sort();
                    labels.dedup();

                    if !labels.is_empty() {
                        output.push_str(&format!("*Applied to:* {}\n\n", labels.join(", ")));
                    }
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#v(8pt)\n");
                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n");
                output.push_str("#v(8pt)\n\n");
            }
        }

        output
    }
}

/// Equations applied by one abutment design, in pipeline order.
pub fn abutment_design_equations(abutment_type: AbutmentType) -> Vec<Equation> {
    let mut equations = match abutment_type {
        AbutmentType::Battered => vec![Equation::BatteredStemWidth, Equation::TrapezoidalStemVolume],
        AbutmentType::Cantilever => vec![Equation::CantileverStemThickness, Equation::CantileverBaseProportions],
    };
    equations.extend([
        Equation::FootingVolume,
        Equation::WingWallVolume,
        Equation::ConcreteSelfWeight,
        Equation::TotalVerticalLoad,
        Equation::RankineActiveCoefficient,
        Equation::RankinePassiveCoefficient,
        Equation::ActiveThrust,
        Equation::PassiveResistance,
        Equation::OverturningFactor,
        Equation::SlidingFactor,
        Equation::Eccentricity,
        Equation::EffectiveAreaBearing,
        Equation::FactoredMoment,
        Equation::EffectiveDepth,
        Equation::RequiredSteelArea,
        Equation::MinimumSteelArea,
        Equation::BarSpacing,
        Equation::SteelQuantity,
        Equation::FormworkArea,
        Equation::ExcavationVolume,
    ]);
    equations
}

/// Equations applied by a hydraulic analysis.
pub fn hydraulic_analysis_equations() -> Vec<Equation> {
    vec![
        Equation::LaceyRegimeWidth,
        Equation::HydraulicRadius,
        Equation::ManningVelocity,
        Equation::LaceyScourDepth,
        Equation::Afflux,
        Equation::ObstructedVelocity,
    ]
}

/// Escape special characters for Typst math mode
fn escape_typst_math(s: &str) -> String {
    s.replace('\\', "\\\\")
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate a complete EQUATIONS.md file for documentation.
///
/// # Example
///
/// ```rust
/// use bridge_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("BridgeWorks Equations Reference"));
/// assert!(markdown.contains("Earth Pressure"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(32_000);

    output.push_str(r#"# BridgeWorks Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists every formula used in BridgeWorks abutment and hydraulic
calculations, with its code reference, source location and assumptions.

## Sign Conventions

| Quantity | Positive Direction |
|----------|-------------------|
| Vertical loads | Downward (gravity direction) |
| Horizontal forces | Away from the backfill |
| Moments | About the toe of the base |
| Elevations | Above datum |

---

"#);

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        var.symbol, var.description, var.units
                    ));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output.push_str(r#"## How to Audit

1. Find the equation you want to verify in the sections above
2. Check the **Reference** for the governing clause (IRC 5, IRC 78, IS 456, ...)
3. Follow the **Source** link to the implementing function
4. Run `cargo test` to check the implementation against worked values
"#);

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 31);

        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(!meta.formula_typst.is_empty(), "Equation {:?} has no formula", eq);
            assert!(!meta.variables.is_empty(), "Equation {:?} has no variables", eq);
            assert!(!meta.source_module.is_empty(), "Equation {:?} missing source_module", eq);
            assert!(!meta.source_function.is_empty(), "Equation {:?} missing source_function", eq);
        }

        let ka = Equation::RankineActiveCoefficient.metadata();
        assert!(ka.formula_plain.contains("45 - phi/2"));

        let ast = Equation::RequiredSteelArea.metadata();
        assert!(ast.formula_plain.contains("0.87"));
    }

    #[test]
    fn test_code_reference_citation() {
        let irc = CodeReference::IRC { code: 78, clause: "706.3.4" };
        assert_eq!(irc.citation(), "IRC 78 Clause 706.3.4");

        let is456 = CodeReference::IS456 { clause: "26.5.2.1" };
        assert_eq!(is456.citation(), "IS 456:2000 Clause 26.5.2.1");
        assert_eq!(is456.short_form(), "IS 456");
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::ActiveThrust, "Stem");
        tracker.record(Equation::OverturningFactor, "Stem");
        tracker.record(Equation::ActiveThrust, "Wing");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations(), vec![Equation::ActiveThrust, Equation::OverturningFactor]);
    }

    #[test]
    fn test_by_category_sorted() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::BarSpacing, "test");
        tracker.record(Equation::ManningVelocity, "test");
        tracker.record(Equation::SlidingFactor, "test");

        let cats: Vec<_> = tracker.by_category().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            cats,
            vec![EquationCategory::Hydraulics, EquationCategory::Stability, EquationCategory::Reinforcement]
        );
    }

    #[test]
    fn test_every_category_populated() {
        for cat in Equation::all_categories() {
            assert!(!Equation::in_category(cat).is_empty(), "{:?} is empty", cat);
        }
    }

    #[test]
    fn test_abutment_equations_by_type() {
        let battered = abutment_design_equations(AbutmentType::Battered);
        let cantilever = abutment_design_equations(AbutmentType::Cantilever);

        assert!(battered.contains(&Equation::TrapezoidalStemVolume));
        assert!(!battered.contains(&Equation::CantileverStemThickness));
        assert!(cantilever.contains(&Equation::CantileverBaseProportions));
        assert_eq!(battered.len(), cantilever.len());
        assert!(battered.contains(&Equation::EffectiveAreaBearing));
    }

    #[test]
    fn test_generate_appendix_typst() {
        let mut tracker = EquationTracker::new();
        for eq in abutment_design_equations(AbutmentType::Battered) {
            tracker.record_for_member(eq, "design", "Abutment A1");
        }

        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("Appendix: List of Equations"));
        assert!(typst.contains("Rankine Active Coefficient"));
        assert!(typst.contains("IRC 78"));
        assert!(typst.contains("Abutment A1"));
        assert!(typst.contains("== Earth Pressure"));
        assert!(!typst.contains("== Hydraulics"));
    }

    #[test]
    fn test_generate_appendix_empty_tracker() {
        let typst = EquationTracker::new().generate_appendix_typst();
        assert!(typst.contains("Appendix: List of Equations"));
        assert!(typst.contains("No equations recorded"));
    }

    #[test]
    fn test_generate_equations_markdown() {
        let markdown = generate_equations_markdown();

        assert!(markdown.contains("# BridgeWorks Equations Reference"));
        assert!(markdown.contains("## Sign Conventions"));
        for cat in Equation::all_categories() {
            assert!(markdown.contains(&format!("## {}", cat.display_name())));
        }
        assert!(markdown.contains("`Ka = tan^2(45 - phi/2)`"));
        assert!(markdown.contains("equations/earth_pressure.rs"));
        assert!(markdown.contains("**Total Equations:** 31"));
        assert!(markdown.contains("**Categories:** 7"));
    }
}
