use cctmunger::config::Config;
use cctmunger::process::{process_directory, process_file};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_vol_data_end_to_end() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_file(
        input.path(),
        "vol_data_AUT.csv",
        "month,value,seasonal\n\
         108,1234.5,Seasonally Adjusted\n\
         108,1300.25,Unadjusted\n\
         109,1250,Seasonally Adjusted\n\
         109,NA,Unadjusted\n",
    );

    let config = Config::new();
    let wrote = process_file(
        &config,
        &input.path().join("vol_data_AUT.csv"),
        output.path(),
    )
    .unwrap();
    assert!(wrote);

    let csv_path = output.path().join("auto-loans/vol_data_AUT.csv");
    let json_path = output.path().join("auto-loans/vol_data_AUT.json");
    assert!(csv_path.exists());
    assert!(json_path.exists());

    let csv_content = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv_content.lines();
    assert_eq!(lines.next().unwrap(), "month,date,vol,vol_unadj");
    assert_eq!(lines.next().unwrap(), "108,2009-01,1234.5,1300.25");
    assert_eq!(lines.next().unwrap(), "109,2009-02,1250,NA");

    // two input months, two output rows: no silent drops
    assert_eq!(csv_content.lines().count(), 3);

    // every numeric CSV value appears in the JSON at its month's timestamp
    let json = read_json(&json_path);
    let adjusted = json["adjusted"].as_array().unwrap();
    assert_eq!(adjusted.len(), 2);
    assert_eq!(adjusted[0][0].as_i64().unwrap(), 1_230_768_000_000);
    assert_eq!(adjusted[0][1].as_f64().unwrap(), 1234.5);
    // the NA value is dropped from the chart series only
    assert_eq!(json["unadjusted"].as_array().unwrap().len(), 1);
    assert_eq!(json["unadjusted"][0][1].as_f64().unwrap(), 1300.25);
}

#[test]
fn test_undocumented_market_is_rejected() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_file(input.path(), "vol_data_XYZ.csv", "month,value,adj\n108,1,Unadjusted\n");

    let config = Config::new();
    let err = process_file(
        &config,
        &input.path().join("vol_data_XYZ.csv"),
        output.path(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unrecognized input"), "{err}");

    // nothing was written anywhere under the output root
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_batch_isolates_failures_per_file() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    write_file(
        input.path(),
        "num_data_CRC.csv",
        "month,value,adj\n108,5000,Seasonally Adjusted\n",
    );
    // ragged row: this file fails, the other converts anyway
    write_file(
        input.path(),
        "vol_data_MTG.csv",
        "month,value,adj\n108,1\n",
    );
    write_file(input.path(), "notes.txt", "not an input");

    let config = Config::new();
    let summary = process_directory(&config, input.path(), output.path(), None).unwrap();

    assert_eq!(summary.succeeded, vec!["num_data_CRC.csv"]);
    assert_eq!(summary.failed, vec!["vol_data_MTG.csv"]);
    assert!(output.path().join("credit-cards/num_data_CRC.csv").exists());
    assert!(!output.path().join("mortgages/vol_data_MTG.csv").exists());
}

#[test]
fn test_map_and_group_yoy_artifacts() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    write_file(
        input.path(),
        "map_data_STU.csv",
        "state,value\n53,0.1234\n41,NA\n",
    );
    write_file(
        input.path(),
        "yoy_data_Income_Level_STU.csv",
        "month,value,group\n108,0.05,Low\n108,0.07,High\n",
    );

    let config = Config::new();
    let summary = process_directory(&config, input.path(), output.path(), None).unwrap();
    assert_eq!(summary.failed.len(), 0);
    assert_eq!(summary.succeeded.len(), 2);

    let map_json = read_json(&output.path().join("student-loans/map_data_STU.json"));
    assert_eq!(map_json[0]["name"], "WA");
    assert_eq!(map_json[0]["value"], "12.34");

    let yoy_csv =
        fs::read_to_string(output.path().join("student-loans/yoy_data_Income_Level_STU.csv"))
            .unwrap();
    let mut lines = yoy_csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "month,date,low_yoy,moderate_yoy,middle_yoy,high_yoy"
    );
    assert_eq!(lines.next().unwrap(), "108,2009-01,0.05,,,0.07");

    let yoy_json = read_json(&output.path().join("student-loans/yoy_data_Income_Level_STU.json"));
    assert_eq!(yoy_json["Low"][0][1].as_f64().unwrap(), 0.05);
    assert_eq!(yoy_json["Moderate"].as_array().unwrap().len(), 0);
}

#[test]
fn test_snapshot_file_needs_output_path() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_file(
        input.path(),
        "data_snapshot_2017-06.csv",
        "month,market,var,value,value_yoy\n195,AUT,Originations,2100000,3.4\n",
    );

    let config = Config::new();

    // without a snapshot path the file is skipped, neither success nor failure
    let summary = process_directory(&config, input.path(), output.path(), None).unwrap();
    assert!(summary.succeeded.is_empty());
    assert!(summary.failed.is_empty());

    // with one, the snapshot JSON lands at the requested path
    let snapshot_path = output.path().join("snapshot.json");
    let summary =
        process_directory(&config, input.path(), output.path(), Some(&snapshot_path)).unwrap();
    assert_eq!(summary.succeeded, vec!["data_snapshot_2017-06.csv"]);

    let snapshot = read_json(&snapshot_path);
    assert_eq!(snapshot["markets"][0]["market_key"], "AUT");
    assert_eq!(snapshot["markets"][0]["num_originations"], "2.1 million");
}
