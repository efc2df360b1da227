//! Filename routing.
//!
//! Raw exports are named `<prefix>_<SUFFIX>.csv`: the prefix picks the
//! statistic processor, the suffix picks the market folder. Anything outside
//! the documented enumerations is a configuration error, never a silent
//! write under a wrong name.

use crate::config::{Config, Market, Statistic};
use crate::error::MungeError;

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub statistic: Statistic,
    pub market: &'static Market,
}

/// Derives the statistic type and market from an input filename.
pub fn route_filename(config: &Config, filename: &str) -> Result<Route, MungeError> {
    let stem = filename
        .strip_suffix(".csv")
        .or_else(|| filename.strip_suffix(".CSV"))
        .ok_or_else(|| MungeError::configuration(filename, "not a .csv file"))?;

    let (prefix, suffix) = stem
        .rsplit_once('_')
        .ok_or_else(|| MungeError::configuration(filename, "no market suffix in filename"))?;

    let market = config.market_by_abbr(suffix).ok_or_else(|| {
        MungeError::configuration(filename, format!("unknown market suffix '{suffix}'"))
    })?;

    let statistic = Statistic::from_prefix(&prefix.to_lowercase()).ok_or_else(|| {
        MungeError::configuration(filename, format!("unknown statistic prefix '{prefix}'"))
    })?;

    Ok(Route { statistic, market })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_documented_pairs() {
        let config = Config::new();
        let route = route_filename(&config, "vol_data_AUT.csv").unwrap();
        assert_eq!(route.statistic, Statistic::VolSummary);
        assert_eq!(route.market.folder, "auto-loans");

        let route = route_filename(&config, "Volume_data_Age_Group_STU.csv").unwrap();
        assert_eq!(route.statistic, Statistic::AgeVolume);
        assert_eq!(route.market.folder, "student-loans");
    }

    #[test]
    fn unknown_market_is_configuration_error() {
        let config = Config::new();
        let err = route_filename(&config, "vol_data_XYZ.csv").unwrap_err();
        assert!(matches!(err, MungeError::Configuration { .. }), "{err}");
    }

    #[test]
    fn unknown_prefix_is_configuration_error() {
        let config = Config::new();
        let err = route_filename(&config, "pet_data_AUT.csv").unwrap_err();
        assert!(matches!(err, MungeError::Configuration { .. }), "{err}");
    }

    #[test]
    fn non_csv_is_configuration_error() {
        let config = Config::new();
        assert!(route_filename(&config, "vol_data_AUT.txt").is_err());
        assert!(route_filename(&config, "README").is_err());
    }
}
