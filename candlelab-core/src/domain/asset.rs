//! Asset profiles: the constants that turn a price move into money.

use serde::{Deserialize, Serialize};

/// Point and contract value for one tradable asset.
///
/// `point_value` is the price size of one point (stop/target/spread inputs are
/// given in points). `contract_value` multiplies a price delta into account
/// currency for one unit of position size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub point_value: f64,
    pub contract_value: f64,
}

const FX_MAJOR: AssetProfile = AssetProfile::new(0.0001, 100_000.0);
const FX_JPY: AssetProfile = AssetProfile::new(0.01, 1_000.0);
const INDEX_CFD: AssetProfile = AssetProfile::new(1.0, 1.0);

/// Built-in asset table. Read-only, matched case-insensitively.
static ASSET_PROFILES: &[(&str, AssetProfile)] = &[
    ("EURUSD", FX_MAJOR),
    ("GBPUSD", FX_MAJOR),
    ("AUDUSD", FX_MAJOR),
    ("NZDUSD", FX_MAJOR),
    ("USDCHF", FX_MAJOR),
    ("USDCAD", FX_MAJOR),
    ("EURGBP", FX_MAJOR),
    ("USDJPY", FX_JPY),
    ("EURJPY", FX_JPY),
    ("GBPJPY", FX_JPY),
    ("XAUUSD", AssetProfile::new(0.01, 100.0)),
    ("XAGUSD", AssetProfile::new(0.001, 5_000.0)),
    ("BTCUSD", INDEX_CFD),
    ("ETHUSD", INDEX_CFD),
    ("US30", INDEX_CFD),
    ("NAS100", INDEX_CFD),
    ("SPX500", INDEX_CFD),
    ("GER40", INDEX_CFD),
];

impl AssetProfile {
    /// Profile used for assets missing from the table.
    pub const DEFAULT: AssetProfile = AssetProfile::new(0.01, 1_000.0);

    pub const fn new(point_value: f64, contract_value: f64) -> Self {
        Self {
            point_value,
            contract_value,
        }
    }

    /// Look up a known asset. `None` for anything not in the table.
    pub fn lookup(asset: &str) -> Option<AssetProfile> {
        ASSET_PROFILES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(asset.trim()))
            .map(|(_, profile)| *profile)
    }

    /// Look up an asset, falling back to [`AssetProfile::DEFAULT`].
    pub fn for_asset(asset: &str) -> AssetProfile {
        Self::lookup(asset).unwrap_or(Self::DEFAULT)
    }

    /// Price distance of `points` points.
    pub fn points_to_price(&self, points: f64) -> f64 {
        points * self.point_value
    }
}

impl Default for AssetProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_assets_resolve() {
        let eur = AssetProfile::for_asset("EURUSD");
        assert_eq!(eur.point_value, 0.0001);
        assert_eq!(eur.contract_value, 100_000.0);

        let gold = AssetProfile::for_asset("XAUUSD");
        assert_eq!(gold, AssetProfile::new(0.01, 100.0));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(
            AssetProfile::lookup("usdjpy"),
            Some(AssetProfile::new(0.01, 1_000.0))
        );
        assert_eq!(AssetProfile::lookup(" btcusd "), Some(INDEX_CFD));
    }

    #[test]
    fn unknown_asset_falls_back_to_default() {
        assert_eq!(AssetProfile::lookup("DOGEUSD"), None);
        let profile = AssetProfile::for_asset("DOGEUSD");
        assert_eq!(profile.point_value, 0.01);
        assert_eq!(profile.contract_value, 1000.0);
    }

    #[test]
    fn table_values_are_positive() {
        for (name, p) in ASSET_PROFILES {
            assert!(p.point_value > 0.0, "{name}");
            assert!(p.contract_value > 0.0, "{name}");
        }
    }

    #[test]
    fn points_convert_to_price() {
        let eur = AssetProfile::for_asset("EURUSD");
        assert!((eur.points_to_price(20.0) - 0.0020).abs() < 1e-12);
    }
}
