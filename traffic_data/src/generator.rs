//! Synthetic traffic generation
//!
//! Produces one record for every hour of every weekday at a city junction.
//! Traffic follows a fixed shape: a peak-hour bump in the morning and evening
//! rush, a night-time trough, a weekend discount and a per-junction
//! multiplier, with uniform noise on top. Temperature follows its own daily
//! curve.
//!
//! Each (city, junction) pair draws from its own ChaCha8 stream seeded by a
//! hash of the pair, so the output never changes between runs or platforms.

use crate::network::{dataset_file_name, CityProfile, Junction, CITIES, JUNCTIONS};
use crate::TrafficRecord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use xxhash_rust::xxh32::xxh32;

/// Hours of the morning and evening rush
pub const PEAK_HOURS: [u8; 8] = [7, 8, 9, 10, 17, 18, 19, 20];

/// Hours before this one get the night-time reduction
pub const NIGHT_END_HOUR: u8 = 6;

/// Fraction of base traffic seen at night
pub const NIGHT_FACTOR: f64 = 0.3;

/// Multiplier applied on Saturday and Sunday
pub const WEEKEND_FACTOR: f64 = 0.85;

/// Lowest traffic flow ever recorded
pub const MIN_TRAFFIC_FLOW: u32 = 10;

const SEED_SALT: u32 = 0;

/// Generated records for one city junction
#[derive(Debug, Clone, PartialEq)]
pub struct CityJunctionDataset {
    /// City the records belong to
    pub city: &'static str,
    /// Junction the records belong to
    pub junction: Junction,
    /// One record per (weekday, hour), weekday-major
    pub records: Vec<TrafficRecord>,
}

impl CityJunctionDataset {
    /// File name this dataset is stored under
    pub fn file_name(&self) -> String {
        dataset_file_name(self.city, &self.junction)
    }
}

/// Seed of the random stream for a city junction
pub fn pair_seed(city: &str, junction_id: u8) -> u64 {
    let key = format!("{}{}", city, junction_id);
    u64::from(xxh32(key.as_bytes(), SEED_SALT))
}

/// Multiplier reflecting how busy a junction is relative to the others
pub fn junction_multiplier(junction_id: u8) -> f64 {
    1.0 + (f64::from(junction_id) - 2.5) * 0.1
}

/// Whether a weekday index falls on the weekend
pub fn is_weekend(weekday: u8) -> bool {
    weekday == 5 || weekday == 6
}

/// Uniform integer in `[low, high)`, or zero when the range is empty
fn noise(rng: &mut ChaCha8Rng, low: i64, high: i64) -> i64 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        0
    }
}

/// Traffic before the weekend and junction adjustments
fn hourly_traffic(rng: &mut ChaCha8Rng, profile: &CityProfile, hour: u8) -> f64 {
    let base = profile.base_traffic as f64;
    let var = profile.variation;

    if PEAK_HOURS.contains(&hour) {
        base * profile.peak_multiplier + noise(rng, -var, var) as f64
    } else if hour < NIGHT_END_HOUR {
        base * NIGHT_FACTOR + noise(rng, (-var).div_euclid(2), var.div_euclid(2)) as f64
    } else {
        base + noise(rng, -var, var) as f64
    }
}

/// Generate a week of hourly records for one city junction
pub fn generate_city_junction(profile: &CityProfile, junction: &Junction) -> Vec<TrafficRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(pair_seed(profile.name, junction.id));
    let mut records = Vec::with_capacity(7 * 24);

    for weekday in 0..7u8 {
        for hour in 0..24u8 {
            let mut traffic = hourly_traffic(&mut rng, profile, hour);

            if is_weekend(weekday) {
                traffic *= WEEKEND_FACTOR;
            }

            let temperature = 20.0 + rng.gen::<f64>() * 15.0 + (f64::from(hour) / 24.0) * 10.0;

            traffic *= junction_multiplier(junction.id);

            // Truncation toward zero, then the floor
            let flow = (traffic as i64).max(i64::from(MIN_TRAFFIC_FLOW)) as u32;

            records.push(TrafficRecord {
                city: profile.name.to_string(),
                hour,
                weekday,
                junction: junction.id,
                temperature: (temperature * 100.0).round() / 100.0,
                traffic_flow: flow,
            });
        }
    }

    debug!(
        city = profile.name,
        junction = junction.name,
        records = records.len(),
        "generated city junction dataset"
    );

    records
}

/// Generate datasets for every city and junction, city-major
pub fn generate_all() -> Vec<CityJunctionDataset> {
    CITIES
        .iter()
        .flat_map(|profile| {
            JUNCTIONS.iter().map(move |junction| CityJunctionDataset {
                city: profile.name,
                junction: *junction,
                records: generate_city_junction(profile, junction),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::find_city;
    use rstest::rstest;

    #[test]
    fn test_week_of_hours() {
        let profile = find_city("Bangalore").unwrap();
        let records = generate_city_junction(profile, &JUNCTIONS[0]);

        assert_eq!(records.len(), 168);
        assert_eq!((records[0].weekday, records[0].hour), (0, 0));
        assert_eq!((records[25].weekday, records[25].hour), (1, 1));
        assert_eq!((records[167].weekday, records[167].hour), (6, 23));
        assert!(records.iter().all(|r| r.city == "Bangalore" && r.junction == 1));
    }

    #[test]
    fn test_deterministic() {
        let profile = find_city("Raichur").unwrap();
        let first = generate_city_junction(profile, &JUNCTIONS[2]);
        let second = generate_city_junction(profile, &JUNCTIONS[2]);
        assert_eq!(first, second);

        let other_junction = generate_city_junction(profile, &JUNCTIONS[3]);
        assert_ne!(first, other_junction);
    }

    #[test]
    fn test_pair_seed_is_stable() {
        assert_eq!(pair_seed("Bidar", 2), pair_seed("Bidar", 2));
        assert_ne!(pair_seed("Bidar", 2), pair_seed("Bidar", 3));
        assert!(pair_seed("Bidar", 2) <= u64::from(u32::MAX));
    }

    #[rstest]
    #[case(1, 0.85)]
    #[case(2, 0.95)]
    #[case(3, 1.05)]
    #[case(4, 1.15)]
    fn test_junction_multiplier(#[case] id: u8, #[case] expected: f64) {
        assert!((junction_multiplier(id) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_values_stay_within_model_bounds() {
        for dataset in generate_all() {
            let profile = find_city(dataset.city).unwrap();
            let mult = junction_multiplier(dataset.junction.id);
            let base = profile.base_traffic as f64;
            let var = profile.variation as f64;

            for record in &dataset.records {
                assert!(record.traffic_flow >= MIN_TRAFFIC_FLOW);
                assert!(record.temperature >= 20.0 && record.temperature <= 45.0);

                let weekend = if is_weekend(record.weekday) { WEEKEND_FACTOR } else { 1.0 };
                let upper = if PEAK_HOURS.contains(&record.hour) {
                    base * profile.peak_multiplier + var
                } else if record.hour < NIGHT_END_HOUR {
                    base * NIGHT_FACTOR + var / 2.0
                } else {
                    base + var
                };
                assert!(f64::from(record.traffic_flow) <= (upper * weekend * mult).max(10.0));
            }
        }
    }

    #[test]
    fn test_peak_hours_busier_than_night() {
        let profile = find_city("Bangalore").unwrap();
        let records = generate_city_junction(profile, &JUNCTIONS[1]);

        let mean_for = |hours: &[u8]| {
            let flows: Vec<f64> = records
                .iter()
                .filter(|r| hours.contains(&r.hour))
                .map(|r| f64::from(r.traffic_flow))
                .collect();
            flows.iter().sum::<f64>() / flows.len() as f64
        };

        assert!(mean_for(&PEAK_HOURS) > 2.0 * mean_for(&[0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_generate_all_order() {
        let datasets = generate_all();
        assert_eq!(datasets.len(), 16);
        assert_eq!(datasets[0].city, "Kalaburagi");
        assert_eq!(datasets[0].junction.id, 1);
        assert_eq!(datasets[5].city, "Bangalore");
        assert_eq!(datasets[5].junction.id, 2);
        assert_eq!(
            datasets[5].file_name(),
            "bangalore_highway_cross_traffic.csv"
        );
    }
}
