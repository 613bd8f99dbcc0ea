use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use traffic_data::generator::generate_all;
use traffic_data::io::{read_records, write_datasets};
use traffic_data::network::{dataset_file_name, find_city, COMBINED_FILE_NAME, JUNCTIONS};
use traffic_data::{generate_city_junction, CityJunctionTable};

#[test]
fn test_generator_writes_all_files() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");

    let summary = write_datasets(&data_dir, &generate_all()).unwrap();

    assert_eq!(summary.files.len(), 16);
    assert!(summary.files.iter().all(|(_, count)| *count == 168));
    assert_eq!(summary.total_records, 16 * 168);
    assert_eq!(summary.combined_path, data_dir.join(COMBINED_FILE_NAME));

    let combined = read_records(&summary.combined_path).unwrap();
    assert_eq!(combined.len(), 2688);
    assert_eq!(combined[0].city, "Kalaburagi");
    assert_eq!(combined[2687].city, "Raichur");
    assert_eq!(combined[2687].junction, 4);
}

#[test]
fn test_regenerating_produces_identical_files() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write_datasets(first.path(), &generate_all()).unwrap();
    write_datasets(second.path(), &generate_all()).unwrap();

    let name = dataset_file_name("Bidar", &JUNCTIONS[2]);
    let a = fs::read_to_string(first.path().join(&name)).unwrap();
    let b = fs::read_to_string(second.path().join(&name)).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with("City,Hour,Weekday,Junction,Temperature,TrafficFlow\n"));
}

#[test]
fn test_table_lookup_matches_generated_row() {
    let dir = tempdir().unwrap();
    write_datasets(dir.path(), &generate_all()).unwrap();

    let table = CityJunctionTable::load(dir.path()).unwrap();
    assert_eq!(table.len(), 16);

    let generated = generate_city_junction(find_city("Bangalore").unwrap(), &JUNCTIONS[0]);
    let expected = generated
        .iter()
        .find(|r| r.hour == 8 && r.weekday == 2)
        .unwrap()
        .traffic_flow;

    assert_eq!(table.lookup_flow("Bangalore", "1", 8, 2), Some(expected));

    let head = table.head("Bangalore", "1", 50).unwrap();
    assert_eq!(head.len(), 50);
    assert!(head.iter().all(|r| r.city == "Bangalore" && r.junction == 1));
}

#[test]
fn test_missing_files_are_skipped() {
    let dir = tempdir().unwrap();
    write_datasets(dir.path(), &generate_all()).unwrap();
    fs::remove_file(dir.path().join(dataset_file_name("Raichur", &JUNCTIONS[3]))).unwrap();

    let table = CityJunctionTable::load(dir.path()).unwrap();
    assert_eq!(table.len(), 15);
    assert!(table.dataset("Raichur", "4").is_none());
    assert!(table.dataset("Raichur", "3").is_some());

    let empty = tempdir().unwrap();
    assert!(CityJunctionTable::load(empty.path()).unwrap().is_empty());
}

#[test]
fn test_corrupt_file_fails_load() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(dataset_file_name("Bidar", &JUNCTIONS[0])),
        "City,Hour,Weekday,Junction,Temperature,TrafficFlow\nBidar,x,0,1,20.0,10\n",
    )
    .unwrap();

    assert!(CityJunctionTable::load(dir.path()).is_err());
}
