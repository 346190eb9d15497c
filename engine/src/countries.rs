//! Country dataset: one record per country with name, population and
//! geographic coordinates. Loaded once at startup, immutable thereafter.

use serde::Deserialize;

/// Errors from loading the country dataset.
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    /// The document itself is not valid JSON.
    #[error("dataset parse: {0}")]
    Json(#[from] serde_json::Error),
}

/// One country record. Coordinates are degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Country {
    /// Display name.
    pub name: String,
    /// Population count.
    pub population: u64,
    /// Latitude in [-90, 90].
    pub lat: f32,
    /// Longitude in [-180, 180].
    pub lng: f32,
}

/// Raw row as it appears in the JSON document. Rows may be incomplete;
/// validation happens in [`parse_countries`], not in serde.
#[derive(Deserialize)]
struct RawCountry {
    name: String,
    population: Option<u64>,
    latlng: Option<Vec<f64>>,
}

/// Parse the dataset document. Rows missing `population` or `latlng`, or
/// carrying out-of-range coordinates, violate the data contract: they are
/// skipped with a warning and never abort the rest of the build.
pub fn parse_countries(json: &str) -> Result<Vec<Country>, DataError> {
    let raws: Vec<RawCountry> = serde_json::from_str(json)?;
    let mut out = Vec::with_capacity(raws.len());
    for raw in raws {
        let Some(population) = raw.population else {
            println!("[data] skipping {:?}: missing population", raw.name);
            continue;
        };
        let Some(latlng) = raw.latlng.as_deref() else {
            println!("[data] skipping {:?}: missing latlng", raw.name);
            continue;
        };
        let [lat, lng] = latlng else {
            println!("[data] skipping {:?}: latlng is not a pair", raw.name);
            continue;
        };
        if !(-90.0..=90.0).contains(lat) || !(-180.0..=180.0).contains(lng) {
            println!("[data] skipping {:?}: latlng out of range ({lat}, {lng})", raw.name);
            continue;
        }
        out.push(Country {
            name: raw.name,
            population,
            lat: *lat as f32,
            lng: *lng as f32,
        });
    }
    Ok(out)
}

/// Parse the dataset bundled with the crate.
pub fn embedded() -> Result<Vec<Country>, DataError> {
    parse_countries(include_str!("../data/countries.json"))
}

/// Format a population count with thousands separators ("1,402,112,000").
pub fn format_population(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_groups_thousands() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1_000), "1,000");
        assert_eq!(format_population(1_402_112_000), "1,402,112,000");
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let json = r#"[
            {"name": "A", "population": 10, "latlng": [1.0, 2.0]},
            {"name": "B", "latlng": [1.0, 2.0]},
            {"name": "C", "population": 10},
            {"name": "D", "population": 10, "latlng": [91.0, 0.0]},
            {"name": "E", "population": 10, "latlng": [0.0]},
            {"name": "F", "population": 7, "latlng": [-3.5, 120.0]}
        ]"#;
        let countries = parse_countries(json).unwrap();
        let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "F"]);
    }

    #[test]
    fn invalid_document_is_an_error() {
        assert!(parse_countries("not json").is_err());
    }

    #[test]
    fn embedded_dataset_loads() {
        let countries = embedded().unwrap();
        assert!(countries.len() >= 50);
        assert!(countries.iter().all(|c| c.lat.abs() <= 90.0 && c.lng.abs() <= 180.0));
    }
}
