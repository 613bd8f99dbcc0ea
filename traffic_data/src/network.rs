//! Fixed city and junction tables
//!
//! The generator, the trainer and the server all rely on these tables
//! agreeing: a junction id in a training row must name the same junction
//! file the server later loads.

/// Traffic profile of a city used by the dataset generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityProfile {
    /// City name as it appears in datasets and requests
    pub name: &'static str,
    /// Typical vehicles per hour outside peak and night hours
    pub base_traffic: i64,
    /// Half-width of the uniform noise added to each hour
    pub variation: i64,
    /// Multiplier applied to the base during peak hours
    pub peak_multiplier: f64,
}

/// A named road junction, identical in every city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Junction {
    /// Numeric id used as a model feature
    pub id: u8,
    /// Name used in dataset file names
    pub name: &'static str,
}

/// Served cities, in listing order
pub const CITIES: [CityProfile; 4] = [
    CityProfile {
        name: "Kalaburagi",
        base_traffic: 80,
        variation: 30,
        peak_multiplier: 1.3,
    },
    CityProfile {
        name: "Bangalore",
        base_traffic: 150,
        variation: 50,
        peak_multiplier: 1.8,
    },
    CityProfile {
        name: "Bidar",
        base_traffic: 60,
        variation: 20,
        peak_multiplier: 1.2,
    },
    CityProfile {
        name: "Raichur",
        base_traffic: 70,
        variation: 25,
        peak_multiplier: 1.25,
    },
];

/// Junctions present in every city, ordered by id
pub const JUNCTIONS: [Junction; 4] = [
    Junction {
        id: 1,
        name: "main_street",
    },
    Junction {
        id: 2,
        name: "highway_cross",
    },
    Junction {
        id: 3,
        name: "city_center",
    },
    Junction {
        id: 4,
        name: "airport_road",
    },
];

/// File holding every generated record, used for training
pub const COMBINED_FILE_NAME: &str = "combined_traffic_all_cities.csv";

/// Names of the served cities, in listing order
pub fn city_names() -> Vec<&'static str> {
    CITIES.iter().map(|city| city.name).collect()
}

/// Look up a city profile by exact name
pub fn find_city(name: &str) -> Option<&'static CityProfile> {
    CITIES.iter().find(|city| city.name == name)
}

/// Look up a junction by id
pub fn find_junction(id: u8) -> Option<&'static Junction> {
    JUNCTIONS.iter().find(|junction| junction.id == id)
}

/// Key of a dataset in the city-junction table, e.g. `Bangalore_1`
pub fn dataset_key(city: &str, junction: impl std::fmt::Display) -> String {
    format!("{}_{}", city, junction)
}

/// File name of a city-junction dataset, e.g. `bangalore_main_street_traffic.csv`
pub fn dataset_file_name(city: &str, junction: &Junction) -> String {
    format!("{}_{}_traffic.csv", city.to_lowercase(), junction.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_order() {
        assert_eq!(
            city_names(),
            vec!["Kalaburagi", "Bangalore", "Bidar", "Raichur"]
        );
    }

    #[test]
    fn test_lookups() {
        assert_eq!(find_city("Bidar").unwrap().base_traffic, 60);
        assert!(find_city("bidar").is_none());
        assert_eq!(find_junction(4).unwrap().name, "airport_road");
        assert!(find_junction(0).is_none());
    }

    #[test]
    fn test_names() {
        assert_eq!(dataset_key("Bangalore", 1), "Bangalore_1");
        assert_eq!(dataset_key("Bangalore", "01"), "Bangalore_01");
        assert_eq!(
            dataset_file_name("Kalaburagi", &JUNCTIONS[1]),
            "kalaburagi_highway_cross_traffic.csv"
        );
    }
}
