//! Categorical vocabularies shared by training and serving
//!
//! Codes are positions in the fixed orderings below. The offline pipeline
//! label-encodes the same columns; its recorded mappings must equal these
//! tables or predictions silently misalign, which is why the model loader
//! cross-checks the persisted training manifest against this module.

/// Observation sites, alphabetical. Code = index.
pub const LOCATIONS: [&str; 48] = [
    "Adelaide",
    "Albury",
    "AliceSprings",
    "BadgerysCreek",
    "Ballarat",
    "Bendigo",
    "Brisbane",
    "Cairns",
    "Canberra",
    "Cobar",
    "CoffsHarbour",
    "Dartmoor",
    "Darwin",
    "GoldCoast",
    "Hobart",
    "Katherine",
    "Launceston",
    "Melbourne",
    "MelbourneAirport",
    "Mildura",
    "Moree",
    "MountGambier",
    "MountGinini",
    "Newcastle",
    "Nhil",
    "NorahHead",
    "NorfolkIsland",
    "Nuriootpa",
    "PearceRAAF",
    "Penrith",
    "Perth",
    "PerthAirport",
    "Portland",
    "Richmond",
    "Sale",
    "SalmonGums",
    "Sydney",
    "SydneyAirport",
    "Townsville",
    "Tuggeranong",
    "Uluru",
    "WaggaWagga",
    "Walpole",
    "Watsonia",
    "Williamtown",
    "Witchcliffe",
    "Wollongong",
    "Woomera",
];

/// Compass directions in compass order. Code = index.
pub const WIND_DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Fallback direction when a location has no prevailing-wind entry.
pub const DEFAULT_WIND_DIRECTION: &str = "SW";

/// Encode a location name to its training-time integer code.
///
/// Unknown locations fall back to code 0 (the first alphabetical entry);
/// this is a defined fallback, not an error.
pub fn encode_location(location: &str) -> u32 {
    LOCATIONS
        .iter()
        .position(|l| *l == location)
        .unwrap_or(0) as u32
}

/// Encode a compass direction to its training-time integer code.
///
/// Unknown directions fall back to the code for `SW`.
pub fn encode_wind_direction(direction: &str) -> u32 {
    WIND_DIRECTIONS
        .iter()
        .position(|d| *d == direction)
        .unwrap_or_else(|| {
            WIND_DIRECTIONS
                .iter()
                .position(|d| *d == DEFAULT_WIND_DIRECTION)
                .unwrap_or(0)
        }) as u32
}

/// Encode a yes/no indicator: No = 0, Yes = 1.
pub fn encode_yes_no(yes: bool) -> u32 {
    if yes {
        1
    } else {
        0
    }
}

/// Typical prevailing wind direction by broad region.
///
/// Partial table; unlisted locations default to `SW`.
pub fn prevailing_direction(location: &str) -> &'static str {
    match location {
        "Sydney" | "SydneyAirport" | "Wollongong" => "NE",
        "Melbourne" | "MelbourneAirport" | "Geelong" => "SW",
        "Perth" | "PerthAirport" => "SW",
        "Brisbane" | "GoldCoast" | "Cairns" | "Townsville" => "SE",
        "Hobart" | "Launceston" => "W",
        "Darwin" | "Katherine" => "NW",
        _ => DEFAULT_WIND_DIRECTION,
    }
}
