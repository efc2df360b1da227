//! Static configuration for the munger.
//!
//! Everything the pipeline needs to recognise Office of Research exports and
//! name the public artifacts: market abbreviations, statistic-type prefixes,
//! output column schemas, demographic group rosters, and the FIPS table.
//! All of it is immutable, built once at startup, and handed to the pipeline
//! explicitly.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// January of this year is month zero in the raw exports.
pub const BASE_YEAR: i32 = 2000;

/// Canonical date form for output rows, e.g. "2009-01".
pub const DATA_FILE_DATE_FORMAT: &str = "%Y-%m";

/// Date form used inside the data snapshot JSON.
pub const SNAPSHOT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Filename fragment that marks the non-market data snapshot export.
pub const SNAPSHOT_FNAME_KEY: &str = "data_snapshot";

/// One credit market: the filename suffix and the output folder it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Market {
    pub abbr: &'static str,
    pub folder: &'static str,
}

/// Markets recognised in input filenames. The first four are the public
/// consumer-credit-trends set; the rest appear in research-office exports.
pub const MARKETS: &[Market] = &[
    Market { abbr: "AUT", folder: "auto-loans" },
    Market { abbr: "CRC", folder: "credit-cards" },
    Market { abbr: "MTG", folder: "mortgages" },
    Market { abbr: "STU", folder: "student-loans" },
    Market { abbr: "HCE", folder: "heces" },
    Market { abbr: "HLC", folder: "helocs" },
    Market { abbr: "PER", folder: "personal-loans" },
    Market { abbr: "RET", folder: "retail-loans" },
];

/// Statistic type encoded in the filename prefix of each export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Map,
    NumSummary,
    VolSummary,
    AgeVolume,
    IncomeVolume,
    ScoreVolume,
    YoySummary,
    AgeYoy,
    IncomeYoy,
    ScoreYoy,
    InquiryIndex,
    TightnessIndex,
}

impl Statistic {
    /// Resolves a lowercased filename prefix to its statistic type.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        let statistic = match prefix {
            "map_data" => Statistic::Map,
            "num_data" => Statistic::NumSummary,
            "vol_data" => Statistic::VolSummary,
            "volume_data_age_group" => Statistic::AgeVolume,
            "volume_data_income_level" => Statistic::IncomeVolume,
            "volume_data_score_level" => Statistic::ScoreVolume,
            "yoy_data_all" => Statistic::YoySummary,
            "yoy_data_age_group" => Statistic::AgeYoy,
            "yoy_data_income_level" => Statistic::IncomeYoy,
            "yoy_data_score_level" => Statistic::ScoreYoy,
            "inq_data" => Statistic::InquiryIndex,
            "crt_data" => Statistic::TightnessIndex,
            _ => return None,
        };
        Some(statistic)
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Statistic::Map => "map_data",
            Statistic::NumSummary => "num_data",
            Statistic::VolSummary => "vol_data",
            Statistic::AgeVolume => "volume_data_age_group",
            Statistic::IncomeVolume => "volume_data_income_level",
            Statistic::ScoreVolume => "volume_data_score_level",
            Statistic::YoySummary => "yoy_data_all",
            Statistic::AgeYoy => "yoy_data_age_group",
            Statistic::IncomeYoy => "yoy_data_income_level",
            Statistic::ScoreYoy => "yoy_data_score_level",
            Statistic::InquiryIndex => "inq_data",
            Statistic::TightnessIndex => "crt_data",
        }
    }
}

// Output column schemas. Row order in the emitted CSV follows these exactly.
pub const MAP_OUTPUT_SCHEMA: &[&str] = &["fips_code", "state_abbr", "value"];
pub const SUMMARY_NUM_OUTPUT_SCHEMA: &[&str] = &["month", "date", "num", "num_unadj"];
pub const SUMMARY_VOL_OUTPUT_SCHEMA: &[&str] = &["month", "date", "vol", "vol_unadj"];
pub const YOY_SUMMARY_OUTPUT_SCHEMA: &[&str] = &["month", "date", "yoy_num", "yoy_vol"];
pub const INQUIRY_INDEX_OUTPUT_SCHEMA: &[&str] =
    &["month", "date", "inquiry_index", "unadjusted_inquiry_index"];
pub const TIGHTNESS_INDEX_OUTPUT_SCHEMA: &[&str] =
    &["month", "date", "tightness_index", "unadjusted_credit_tightness_index"];

/// A demographic breakdown: the column-name prefix plus the fixed member
/// roster in its three spellings (raw input, CSV column, public JSON label).
#[derive(Debug)]
pub struct GroupSet {
    /// Becomes the `<kind>_group` column name in grouped volume output.
    pub kind: &'static str,
    pub members_in: &'static [&'static str],
    pub members_col: &'static [&'static str],
    pub members_json: &'static [&'static str],
}

pub static AGE_GROUPS: GroupSet = GroupSet {
    kind: "age",
    members_in: &["Younger than 30", "30-44", "45-64", "65 and older"],
    members_col: &["younger-than-30", "30-44", "45-64", "65-and-older"],
    members_json: &["Younger than 30", "30-44", "45-64", "65 and older"],
};

pub static INCOME_GROUPS: GroupSet = GroupSet {
    kind: "income_level",
    members_in: &["Low", "Moderate", "Middle", "High"],
    members_col: &["low", "moderate", "middle", "high"],
    members_json: &["Low", "Moderate", "Middle", "High"],
};

pub static SCORE_GROUPS: GroupSet = GroupSet {
    kind: "credit_score",
    members_in: &["Deep Subprime", "Subprime", "Near Prime", "Prime", "Superprime"],
    members_col: &["deep-subprime", "subprime", "near-prime", "prime", "super-prime"],
    members_json: &["Deep subprime", "Subprime", "Near-prime", "Prime", "Super-prime"],
};

// Label rewrites required by the agency design manual: sentence case, no
// spaces around dashes, "Age" prefix on bare age ranges.
const TEXT_FIXES: &[(&str, &str)] = &[
    ("30-44", "Age 30-44"),
    ("45-64", "Age 45-64"),
    ("65 and older", "Age 65 and older"),
    ("Deep Subprime", "Deep subprime"),
    ("Near Prime", "Near-prime"),
    ("Superprime", "Super-prime"),
];

/// Applies the agency text fixes to a raw group label, if one applies.
pub fn text_fix(label: &str) -> &str {
    TEXT_FIXES
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, fixed)| *fixed)
        .unwrap_or(label)
}

/// State FIPS code → postal abbreviation, for the map exports.
static FIPS_CODES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "AL"),
        (2, "AK"),
        (4, "AZ"),
        (5, "AR"),
        (6, "CA"),
        (8, "CO"),
        (9, "CT"),
        (10, "DE"),
        (11, "DC"),
        (12, "FL"),
        (13, "GA"),
        (15, "HI"),
        (16, "ID"),
        (17, "IL"),
        (18, "IN"),
        (19, "IA"),
        (20, "KS"),
        (21, "KY"),
        (22, "LA"),
        (23, "ME"),
        (24, "MD"),
        (25, "MA"),
        (26, "MI"),
        (27, "MN"),
        (28, "MS"),
        (29, "MO"),
        (30, "MT"),
        (31, "NE"),
        (32, "NV"),
        (33, "NH"),
        (34, "NJ"),
        (35, "NM"),
        (36, "NY"),
        (37, "NC"),
        (38, "ND"),
        (39, "OH"),
        (40, "OK"),
        (41, "OR"),
        (42, "PA"),
        (44, "RI"),
        (45, "SC"),
        (46, "SD"),
        (47, "TN"),
        (48, "TX"),
        (49, "UT"),
        (50, "VT"),
        (51, "VA"),
        (53, "WA"),
        (54, "WV"),
        (55, "WI"),
        (56, "WY"),
    ])
});

/// Immutable lookup tables handed to the pipeline at startup.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    markets: &'static [Market],
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config { markets: MARKETS }
    }

    /// Scans `input` for a known market abbreviation, as the raw filenames
    /// carry the market code somewhere in their name.
    pub fn find_market(&self, input: &str) -> Option<&'static Market> {
        self.markets.iter().find(|m| input.contains(m.abbr))
    }

    pub fn market_by_abbr(&self, abbr: &str) -> Option<&'static Market> {
        self.markets.iter().find(|m| m.abbr == abbr)
    }

    pub fn state_abbr(&self, fips: u32) -> Option<&'static str> {
        FIPS_CODES.get(&fips).copied()
    }
}
