use std::collections::HashSet;
use std::sync::OnceLock;

/// ISO 3166-1 alpha-3 codes accepted as issuing state and nationality.
/// `UTO` is the ICAO-reserved code used on specimen documents.
const ALPHA3: &[&str] = &[
    "AFG", "ALB", "DZA", "AND", "AGO", "ARG", "ARM", "AUS", "AUT",
    "AZE", "BHS", "BHR", "BGD", "BRB", "BLR", "BEL", "BLZ", "BEN",
    "BTN", "BOL", "BIH", "BWA", "BRA", "BRN", "BGR", "BFA", "BDI",
    "KHM", "CMR", "CAN", "CPV", "CAF", "TCD", "CHL", "CHN", "COL",
    "COG", "CRI", "HRV", "CUB", "CYP", "CZE", "DNK", "DJI", "DOM",
    "ECU", "EGY", "SLV", "GNQ", "ERI", "EST", "ETH", "FIN", "FRA",
    "GAB", "GMB", "GEO", "DEU", "GHA", "GRC", "GTM", "GIN", "GUY",
    "HTI", "HND", "HUN", "ISL", "IND", "IDN", "IRN", "IRQ", "IRL",
    "ISR", "ITA", "JAM", "JPN", "JOR", "KAZ", "KEN", "KWT", "KGZ",
    "LAO", "LVA", "LBN", "LSO", "LBR", "LBY", "LIE", "LTU", "LUX",
    "MDG", "MWI", "MYS", "MDV", "MLI", "MLT", "MRT", "MUS", "MEX",
    "MDA", "MCO", "MNG", "MNE", "MAR", "MOZ", "MMR", "NAM", "NPL",
    "NLD", "NZL", "NIC", "NER", "NGA", "NOR", "OMN", "PAK", "PAN",
    "PRY", "PER", "PHL", "POL", "PRT", "QAT", "ROU", "RUS", "RWA",
    "SAU", "SEN", "SRB", "SGP", "SVK", "SVN", "SOM", "ZAF", "KOR",
    "ESP", "LKA", "SDN", "SUR", "SWZ", "SWE", "CHE", "SYR", "TWN",
    "TJK", "TZA", "THA", "TGO", "TTO", "TUN", "TUR", "TKM", "UGA",
    "UKR", "ARE", "GBR", "USA", "URY", "UZB", "VEN", "VNM", "YEM",
    "ZMB", "ZWE", "UTO",
];

static ALPHA3_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();

pub(crate) fn is_known_alpha3(code: &str) -> bool {
    ALPHA3_SET
        .get_or_init(|| ALPHA3.iter().copied().collect())
        .contains(code)
}
