//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Time-current characteristic curves for relays and fuses."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
//! Time-current characteristic evaluation.
//!
//! Inverse-time families are evaluated against the current multiple
//! `M = I / pickup` and scaled by the element time dial. Published formulas
//! raise `M` to the configured exponent with [`f64::powf`].
use serde::{Deserialize, Serialize};

/// Breakpoint of a piecewise characteristic: (current or multiple, seconds).
pub type Breakpoint = (f64, f64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Characteristic {
    DefiniteTime {
        delay_s: f64,
    },
    /// IEC 60255 inverse: `tds * a1 / (M^a2 - a3)`.
    IecInverse {
        a1: f64,
        a2: f64,
        a3: f64,
    },
    AnsiIeee {
        a1: f64,
        a2: f64,
        a3: f64,
        a4: f64,
    },
    AnsiIeeeSquared {
        a1: f64,
        a2: f64,
    },
    AbbWestinghouse {
        a1: f64,
        a2: f64,
        a3: f64,
        a4: f64,
        a5: f64,
    },
    /// Piecewise linear data sorted by ascending x. Fuses may carry a second
    /// (total clearing) breakpoint set alongside the melt curve.
    Interpolated {
        points: Vec<Breakpoint>,
        #[serde(default)]
        clearing: Option<Vec<Breakpoint>>,
    },
    SpecialEquation {
        a1: f64,
        a2: f64,
        a3: f64,
        b1: f64,
        b2: f64,
        b3: f64,
    },
    LinearApproximation,
    EquationDriven,
    I2tBased,
}

impl Characteristic {
    pub fn family(&self) -> &'static str {
        match self {
            Characteristic::DefiniteTime { .. } => "definite_time",
            Characteristic::IecInverse { .. } => "iec_inverse",
            Characteristic::AnsiIeee { .. } => "ansi_ieee",
            Characteristic::AnsiIeeeSquared { .. } => "ansi_ieee_squared",
            Characteristic::AbbWestinghouse { .. } => "abb_westinghouse",
            Characteristic::Interpolated { .. } => "interpolated",
            Characteristic::SpecialEquation { .. } => "special_equation",
            Characteristic::LinearApproximation => "linear_approximation",
            Characteristic::EquationDriven => "equation_driven",
            Characteristic::I2tBased => "i2t_based",
        }
    }

    pub fn is_definite_time(&self) -> bool {
        matches!(self, Characteristic::DefiniteTime { .. })
    }

    /// Operate time for a current multiple already known to exceed pickup.
    pub fn operate_time(&self, multiple: f64, time_dial: f64) -> OperateTime {
        let m = multiple;
        let tds = time_dial;
        let seconds = match *self {
            Characteristic::DefiniteTime { delay_s } => tds * delay_s,
            Characteristic::IecInverse { a1, a2, a3 } => tds * a1 / (m.powf(a2) - a3),
            Characteristic::AnsiIeee { a1, a2, a3, a4 } => tds * (a1 / (m.powf(a2) - a3) + a4),
            Characteristic::AnsiIeeeSquared { a1, a2 } => (tds * a1 + a2) / m.powi(2),
            Characteristic::AbbWestinghouse { a1, a2, a3, a4, a5 } => {
                if m >= 1.5 {
                    ((a1 + a2) / (m - a3).powf(a4)) * tds / 24000.0
                } else {
                    (a5 / (m - 1.0)) * tds / 24000.0
                }
            }
            Characteristic::SpecialEquation { a1, a2, a3, b1, b2, b3 } => {
                tds * a1 / ((m + b1).powf(b2) + b3) + tds * a2 + a3
            }
            Characteristic::Interpolated {
                ref points,
                ref clearing,
            } => {
                // Multi-curve relay data is not evaluated.
                if clearing.is_some() {
                    return OperateTime::NoOperate;
                }
                return match interpolate(points, m) {
                    Interpolation::Below => OperateTime::NoOperate,
                    Interpolation::Within(t) => OperateTime::from_seconds(t * tds),
                    Interpolation::Saturated(t) => OperateTime::from_seconds(t),
                };
            }
            Characteristic::LinearApproximation
            | Characteristic::EquationDriven
            | Characteristic::I2tBased => return OperateTime::Unsupported(self.family()),
        };
        OperateTime::from_seconds(seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperateTime {
    Trip(f64),
    NoOperate,
    Unsupported(&'static str),
}

impl OperateTime {
    fn from_seconds(seconds: f64) -> Self {
        if seconds.is_finite() {
            OperateTime::Trip(seconds)
        } else {
            OperateTime::NoOperate
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            OperateTime::Trip(t) => Some(*t),
            _ => None,
        }
    }

    /// Strictly positive operate time; zero or negative results never clear a fault.
    pub fn clearing_seconds(&self) -> Option<f64> {
        self.seconds().filter(|t| *t > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolation {
    Below,
    Within(f64),
    Saturated(f64),
}

impl Interpolation {
    pub fn seconds(&self) -> Option<f64> {
        match self {
            Interpolation::Below => None,
            Interpolation::Within(t) | Interpolation::Saturated(t) => Some(*t),
        }
    }
}

/// Linear interpolation on ascending breakpoints.
pub fn interpolate(points: &[Breakpoint], query: f64) -> Interpolation {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Interpolation::Below;
    };
    if query < first.0 {
        return Interpolation::Below;
    }
    if query > last.0 || points.len() == 1 {
        return Interpolation::Saturated(last.1);
    }
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if query == x1 {
            return Interpolation::Within(y1);
        }
        if x0 <= query && query < x1 {
            let ratio = (query - x0) / (x1 - x0);
            return Interpolation::Within(y0 - ratio * (y0 - y1));
        }
    }
    Interpolation::Below
}

/// IDMT relay element operate time for a measured primary current.
pub fn relay_operate_time(
    characteristic: &Characteristic,
    current_a: f64,
    pickup_a: f64,
    time_dial: f64,
) -> OperateTime {
    if pickup_a <= 0.0 || current_a <= pickup_a {
        return OperateTime::NoOperate;
    }
    characteristic.operate_time(current_a / pickup_a, time_dial)
}

/// Instantaneous element: fixed operate time at or above pickup.
pub fn instantaneous_operate_time(current_a: f64, pickup_a: f64, operate_time_s: f64) -> OperateTime {
    if current_a >= pickup_a {
        OperateTime::from_seconds(operate_time_s)
    } else {
        OperateTime::NoOperate
    }
}

/// Fuse total clearing time against absolute current.
pub fn fuse_operate_time(characteristic: &Characteristic, current_a: f64) -> OperateTime {
    match characteristic {
        Characteristic::Interpolated { points, clearing } => {
            let curve = clearing.as_deref().unwrap_or(points);
            match interpolate(curve, current_a).seconds() {
                Some(t) => OperateTime::from_seconds(t),
                None => OperateTime::NoOperate,
            }
        }
        other => OperateTime::Unsupported(other.family()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [Breakpoint; 3] = [(1.0, 10.0), (2.0, 5.0), (4.0, 2.0)];

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn interpolation_brackets_saturates_and_rejects() {
        assert_eq!(interpolate(&POINTS, 3.0), Interpolation::Within(3.5));
        assert_eq!(interpolate(&POINTS, 0.5), Interpolation::Below);
        assert_eq!(interpolate(&POINTS, 5.0), Interpolation::Saturated(2.0));
        assert_eq!(interpolate(&POINTS, 1.0), Interpolation::Within(10.0));
        assert_eq!(interpolate(&[], 1.0), Interpolation::Below);
    }

    #[test]
    fn breakpoint_queries_return_exact_ordinates() {
        let steep = [(100.0, 2.0), (1000.0, 0.02)];
        assert_eq!(interpolate(&steep, 1000.0), Interpolation::Within(0.02));
        assert_eq!(interpolate(&steep, 100.0), Interpolation::Within(2.0));
        let fuse = Characteristic::Interpolated {
            points: steep.to_vec(),
            clearing: None,
        };
        assert_eq!(fuse_operate_time(&fuse, 1000.0), OperateTime::Trip(0.02));
    }

    #[test]
    fn relay_interpolation_scales_by_time_dial_inside_range_only() {
        let curve = Characteristic::Interpolated {
            points: POINTS.to_vec(),
            clearing: None,
        };
        assert_eq!(curve.operate_time(3.0, 0.5), OperateTime::Trip(1.75));
        assert_eq!(curve.operate_time(5.0, 0.5), OperateTime::Trip(2.0));
        let multi = Characteristic::Interpolated {
            points: POINTS.to_vec(),
            clearing: Some(POINTS.to_vec()),
        };
        assert_eq!(multi.operate_time(3.0, 1.0), OperateTime::NoOperate);
    }

    #[test]
    fn iec_standard_inverse_matches_published_value() {
        let curve = Characteristic::IecInverse {
            a1: 0.14,
            a2: 0.02,
            a3: 1.0,
        };
        // 0.14 / (10^0.02 - 1) = 2.9706
        let t = relay_operate_time(&curve, 1000.0, 100.0, 1.0).seconds().expect("trips");
        assert!((t - 2.9706).abs() < 1e-3);
    }

    #[test]
    fn ansi_families_use_exponentiation() {
        let ansi = Characteristic::AnsiIeee {
            a1: 28.2,
            a2: 2.0,
            a3: 1.0,
            a4: 0.1217,
        };
        assert_close(ansi.operate_time(5.0, 0.5).seconds().expect("trips"), 0.5 * (28.2 / 24.0 + 0.1217));

        let squared = Characteristic::AnsiIeeeSquared { a1: 2.0, a2: 0.5 };
        assert_close(squared.operate_time(2.0, 1.0).seconds().expect("trips"), 2.5 / 4.0);
    }

    #[test]
    fn abb_westinghouse_switches_formula_at_one_and_a_half() {
        let curve = Characteristic::AbbWestinghouse {
            a1: 100.0,
            a2: 20.0,
            a3: 1.0,
            a4: 2.0,
            a5: 60.0,
        };
        assert_close(
            curve.operate_time(3.0, 24000.0).seconds().expect("trips"),
            120.0 / 4.0,
        );
        assert_close(
            curve.operate_time(1.25, 24000.0).seconds().expect("trips"),
            60.0 / 0.25,
        );
    }

    #[test]
    fn special_equation_adds_constant_terms() {
        let curve = Characteristic::SpecialEquation {
            a1: 1.0,
            a2: 0.1,
            a3: 0.05,
            b1: 0.0,
            b2: 2.0,
            b3: -1.0,
        };
        assert_close(
            curve.operate_time(3.0, 2.0).seconds().expect("trips"),
            2.0 / 8.0 + 0.2 + 0.05,
        );
    }

    #[test]
    fn pickup_gate_and_definite_time() {
        let curve = Characteristic::DefiniteTime { delay_s: 0.4 };
        assert_eq!(relay_operate_time(&curve, 100.0, 100.0, 1.0), OperateTime::NoOperate);
        assert_eq!(relay_operate_time(&curve, 101.0, 100.0, 0.5), OperateTime::Trip(0.2));
        assert_eq!(relay_operate_time(&curve, 500.0, 0.0, 1.0), OperateTime::NoOperate);
    }

    #[test]
    fn unimplemented_families_report_unsupported() {
        for curve in [
            Characteristic::LinearApproximation,
            Characteristic::EquationDriven,
            Characteristic::I2tBased,
        ] {
            assert!(matches!(
                relay_operate_time(&curve, 500.0, 100.0, 1.0),
                OperateTime::Unsupported(_)
            ));
        }
        assert_eq!(
            fuse_operate_time(&Characteristic::IecInverse { a1: 1.0, a2: 1.0, a3: 1.0 }, 10.0),
            OperateTime::Unsupported("iec_inverse")
        );
    }

    #[test]
    fn instantaneous_operates_at_pickup() {
        assert_eq!(instantaneous_operate_time(800.0, 800.0, 0.02), OperateTime::Trip(0.02));
        assert_eq!(instantaneous_operate_time(799.0, 800.0, 0.02), OperateTime::NoOperate);
        assert_eq!(OperateTime::Trip(0.0).clearing_seconds(), None);
    }

    #[test]
    fn fuse_prefers_clearing_breakpoints() {
        let fuse = Characteristic::Interpolated {
            points: vec![(50.0, 100.0), (500.0, 0.1)],
            clearing: Some(vec![(60.0, 120.0), (600.0, 0.2)]),
        };
        assert_eq!(fuse_operate_time(&fuse, 55.0), OperateTime::NoOperate);
        assert_eq!(fuse_operate_time(&fuse, 1000.0), OperateTime::Trip(0.2));
    }

    #[test]
    fn characteristic_deserializes_from_tagged_json() {
        let curve: Characteristic =
            serde_json::from_str(r#"{"family":"iec_inverse","a1":0.14,"a2":0.02,"a3":1.0}"#)
                .expect("parse");
        assert_eq!(curve.family(), "iec_inverse");
        let curve: Characteristic =
            serde_json::from_str(r#"{"family":"i2t_based"}"#).expect("parse");
        assert_eq!(curve, Characteristic::I2tBased);
    }
}
