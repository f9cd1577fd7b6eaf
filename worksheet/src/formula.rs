//! Worksheet #1 arithmetic: S, LUF, MDA and MFA.

use crate::{round_to, WorksheetError};

/// Regulatory constants of a buildability worksheet.
///
/// Slopes are in percent, areas in acres (`An`) or square feet
/// (MDA/MFA).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Worksheet {
    /// `k` in `S = k × I × L / An`.
    pub slope_coefficient: f64,

    /// Slope at or below which the full lot area counts.
    pub flat_slope: f64,

    /// Slope at or above which LUF, MDA and MFA stop declining.
    pub steep_slope: f64,

    /// LUF reduction per slope percent above `flat_slope`.
    pub luf_decline: f64,

    /// MDA per unit of LUF on flat lots.
    pub mda_base: f64,

    /// MDA reduction per slope percent above `flat_slope`.
    pub mda_decline: f64,

    /// MDA per unit of LUF on steep lots.
    pub mda_steep: f64,

    /// MFA per unit of LUF on flat lots.
    pub mfa_base: f64,

    /// MFA reduction per slope percent above `flat_slope`.
    pub mfa_decline: f64,

    /// MFA per unit of LUF on steep lots.
    pub mfa_steep: f64,

    /// Lots with a LUF above this get the minimum MDA and MFA; lots at
    /// or below it need a Conditional Development Permit.
    pub cdp_luf: f64,

    /// Minimum MDA, in square feet.
    pub mda_min: f64,

    /// Minimum MFA, in square feet.
    pub mfa_min: f64,
}

/// Development limits for a lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// Lot Unit Factor.
    pub luf: f64,

    /// Maximum Development Area in square feet, to 0.1 ft².
    pub mda: f64,

    /// Maximum Floor Area in square feet, to 0.1 ft².
    pub mfa: f64,

    /// Whether a Conditional Development Permit is required.
    pub requires_cdp: bool,
}

impl Worksheet {
    /// Town of Los Altos Hills, Worksheet #1.
    pub const LOS_ALTOS_HILLS: Worksheet = Worksheet {
        slope_coefficient: 0.0023,
        flat_slope: 10.0,
        steep_slope: 30.0,
        luf_decline: 0.02143,
        mda_base: 15_000.0,
        mda_decline: 375.0,
        mda_steep: 7_500.0,
        mfa_base: 6_000.0,
        mfa_decline: 50.0,
        mfa_steep: 5_000.0,
        cdp_luf: 0.50,
        mda_min: 7_500.0,
        mfa_min: 5_000.0,
    };

    /// Returns the average slope, in percent.
    ///
    /// `S = k × I × L / An`, where `I` is the contour interval (ft),
    /// `L` the total contour length inside the lot (ft) and `An` the
    /// lot area (acres).
    pub fn average_slope(
        &self,
        contour_length_ft: f64,
        interval_ft: f64,
        area_acres: f64,
    ) -> Result<f64, WorksheetError> {
        if !(area_acres > 0.0) {
            return Err(WorksheetError::ZeroArea);
        }
        if !(interval_ft > 0.0) {
            return Err(WorksheetError::Interval(interval_ft));
        }
        Ok(self.slope_coefficient * interval_ft * contour_length_ft.max(0.0) / area_acres)
    }

    /// Returns the Lot Unit Factor for a lot of `area_acres` with
    /// average slope `slope`.
    pub fn lot_unit_factor(&self, area_acres: f64, slope: f64) -> f64 {
        let over = slope.clamp(self.flat_slope, self.steep_slope) - self.flat_slope;
        area_acres * (1.0 - self.luf_decline * over)
    }

    /// Returns MDA and MFA for average slope `slope` and `luf`.
    pub fn limits(&self, slope: f64, luf: f64) -> Limits {
        let (mut mda, mut mfa) = if slope <= self.flat_slope {
            (luf * self.mda_base, luf * self.mfa_base)
        } else if slope < self.steep_slope {
            let over = slope - self.flat_slope;
            (
                luf * (self.mda_base - self.mda_decline * over),
                luf * (self.mfa_base - self.mfa_decline * over),
            )
        } else {
            (luf * self.mda_steep, luf * self.mfa_steep)
        };

        let requires_cdp = luf <= self.cdp_luf;
        if !requires_cdp {
            mda = mda.max(self.mda_min);
            mfa = mfa.max(self.mfa_min);
        }

        Limits {
            luf,
            mda: round_to(mda, 1),
            mfa: round_to(mfa, 1),
            requires_cdp,
        }
    }

    /// Returns the development limits for a lot.
    pub fn evaluate(&self, area_acres: f64, slope: f64) -> Limits {
        let luf = self.lot_unit_factor(area_acres, slope);
        self.limits(slope, luf)
    }
}

impl Default for Worksheet {
    fn default() -> Self {
        Self::LOS_ALTOS_HILLS
    }
}

#[cfg(test)]
mod tests {
    use super::{Worksheet, WorksheetError};
    use assert_approx_eq::assert_approx_eq;

    const LAH: Worksheet = Worksheet::LOS_ALTOS_HILLS;

    /// One acre, 43,560 ft².
    const ACRE: f64 = 1.0;

    #[test]
    fn test_flat_acre() {
        let limits = LAH.evaluate(ACRE, 5.0);
        assert_eq!(limits.luf, 1.0);
        assert_eq!(limits.mda, 15_000.0);
        assert_eq!(limits.mfa, 6_000.0);
        assert!(!limits.requires_cdp);
    }

    #[test]
    fn test_moderate_acre() {
        let limits = LAH.evaluate(ACRE, 20.0);
        assert_approx_eq!(limits.luf, 0.7857, 1e-12);
        assert_eq!(limits.mda, 8_839.1);
        // 0.7857 × 5,500 = 4,321.35, raised to the minimum.
        assert_eq!(limits.mfa, 5_000.0);
        assert!(!limits.requires_cdp);
    }

    #[test]
    fn test_within_band_above_minimums() {
        let limits = LAH.evaluate(ACRE, 15.0);
        assert_approx_eq!(limits.luf, 0.892_85, 1e-12);
        assert_eq!(limits.mda, 11_718.7);
        assert_eq!(limits.mfa, 5_133.9);
    }

    #[test]
    fn test_steep_acre() {
        for slope in [30.0, 42.5, 80.0] {
            let limits = LAH.evaluate(ACRE, slope);
            assert_approx_eq!(limits.luf, 0.5714, 1e-12);
            // 0.5714 × 7,500 and 0.5714 × 5,000 fall under the minimums.
            assert_eq!(limits.mda, 7_500.0);
            assert_eq!(limits.mfa, 5_000.0);
            assert!(!limits.requires_cdp);
        }
    }

    #[test]
    fn test_small_lot_requires_cdp() {
        let limits = LAH.evaluate(0.5, 0.0);
        assert_eq!(limits.luf, 0.5);
        assert_eq!(limits.mda, 7_500.0);
        assert_eq!(limits.mfa, 3_000.0);
        assert!(limits.requires_cdp);

        let limits = LAH.evaluate(0.4, 25.0);
        assert!(limits.requires_cdp);
        assert!(limits.mfa < 5_000.0);
    }

    #[test]
    fn test_luf_is_non_increasing() {
        let mut prev = f64::INFINITY;
        for tenth in 0..600 {
            let slope = f64::from(tenth) / 10.0;
            let luf = LAH.lot_unit_factor(2.5, slope);
            assert!(luf <= prev, "LUF rose at S = {slope}");
            assert_eq!(luf, LAH.lot_unit_factor(2.5, slope));
            prev = luf;
        }
    }

    #[test]
    fn test_average_slope() {
        // 0.0023 × 5 ft × 1,000 ft / 1 acre
        let slope = LAH.average_slope(1_000.0, 5.0, ACRE).unwrap();
        assert_approx_eq!(slope, 11.5, 1e-9);

        let doubled = LAH.average_slope(2_000.0, 5.0, ACRE).unwrap();
        assert_approx_eq!(doubled, 2.0 * slope, 1e-9);

        assert_eq!(LAH.average_slope(0.0, 5.0, ACRE).unwrap(), 0.0);
    }

    #[test]
    fn test_average_slope_rejects_bad_input() {
        assert_eq!(
            LAH.average_slope(1_000.0, 5.0, 0.0),
            Err(WorksheetError::ZeroArea)
        );
        assert_eq!(
            LAH.average_slope(1_000.0, 0.0, ACRE),
            Err(WorksheetError::Interval(0.0))
        );
    }
}
