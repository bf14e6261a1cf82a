//! End-to-end tests for the sampling and duration passes

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use valley_sampler::table::{read_csv, Value};
use valley_sampler::{
    patch_duration, DurationOptions, EdgePolicy, Error, Sampler, SamplingConfig,
};

const RAW: &str = "\
,time_stamp,epc,rssi
0,100,AAAA0001,-50
1,101,BBBB0002,-60
2,102,AAAA0001,-55
3,104,BBBB0002,-65
4,105,AAAA0001,-70
5,107,BBBB0002,-62
6,108,AAAA0001,-58
7,110,BBBB0002,-61
8,111,AAAA0001,-52
9,112,F01000310F30010011711560,-90
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn floats(path: &Path, column: &str) -> Vec<f64> {
    read_csv(path)
        .expect("Failed to read output")
        .numeric_column(column)
        .expect("Missing column")
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Window with `stamps` as timestamps and a flat signal.
fn window_csv(stamps: &[i64]) -> String {
    let mut csv = String::from(",time_stamp,epc,rssi\n");
    for (i, t) in stamps.iter().enumerate() {
        csv.push_str(&format!("{i},{t},TAG,-50\n"));
    }
    csv
}

#[test]
fn test_sample_then_patch_duration() {
    let raw_dir = TempDir::new().unwrap();
    let win_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    write(raw_dir.path(), "raw.csv", RAW);

    let sampler = Sampler::new(2, SamplingConfig::default()).unwrap();
    let written = sampler.process_all(raw_dir.path(), win_dir.path()).unwrap();

    assert_eq!(
        file_names(&written),
        vec![
            "raw-win2-0001-padded(l#0000-r#0000).csv",
            "raw-win2-0002-padded(l#0001-r#0000).csv",
        ]
    );

    let stats = sampler.stats().snapshot();
    assert_eq!(stats.files_read, 1);
    assert_eq!(stats.groups_excluded, 1);
    assert_eq!(stats.windows_written, 2);
    assert_eq!(stats.windows_padded, 1);

    // Tag B's valley is its second reading: one replicated row on the left.
    let padded = win_dir.path().join("raw-win2-0002-padded(l#0001-r#0000).csv");
    let table = read_csv(&padded).unwrap();
    let labels: Vec<&str> = table.rows().iter().map(|r| r.index.as_str()).collect();
    assert_eq!(labels, vec!["0", "0", "1", "2"]);

    let options = DurationOptions::default();
    let profile = patch_duration(win_dir.path(), out_dir.path(), &options).unwrap();
    assert_eq!(profile.values(), &[0.0, 2.0, 3.0, 3.0]);

    let unpadded = out_dir.path().join("raw-win2-0001-padded(l#0000-r#0000).csv");
    assert_eq!(floats(&unpadded, "time_stamp"), vec![0.0, 2.0, 5.0, 8.0]);
    assert_eq!(floats(&unpadded, "duration"), vec![0.0, 2.0, 3.0, 3.0]);
    assert_eq!(floats(&unpadded, "avg_duration"), vec![0.0, 2.0, 3.0, 3.0]);

    let padded = out_dir.path().join("raw-win2-0002-padded(l#0001-r#0000).csv");
    assert_eq!(floats(&padded, "duration"), vec![0.0, 0.0, 3.0, 3.0]);
    assert_eq!(floats(&padded, "avg_duration"), vec![0.0, 2.0, 3.0, 3.0]);

    let stats = options.stats.snapshot();
    assert_eq!(stats.tables_annotated, 2);
    assert_eq!(stats.profile_contributors, 1);
    assert_eq!(stats.tables_dispatched, 2);
}

#[test]
fn test_block_listed_tag_never_written() {
    let raw_dir = TempDir::new().unwrap();
    let win_dir = TempDir::new().unwrap();
    let csv = write(raw_dir.path(), "raw.csv", RAW);

    // The remaining reserved tag has a single reading, so its valley is row 0.
    let config = SamplingConfig {
        edge_policy: EdgePolicy::ReplicateValley,
        ..SamplingConfig::default()
    }
    .with_block_list(vec!["AAAA0001".to_string()]);
    let sampler = Sampler::new(2, config).unwrap();
    let written = sampler.process_one(&csv, win_dir.path()).unwrap();

    let names = file_names(&written);
    assert!(names.iter().all(|n| !n.contains("-0001-")));
    // The default list no longer applies once a custom one is given.
    assert!(names.contains(&"raw-win2-1560-padded(l#0002-r#0001).csv".to_string()));

    for path in &written {
        let table = read_csv(path).unwrap();
        let keys = table.column("epc").unwrap();
        assert!(keys.iter().all(|k| **k != Value::String("AAAA0001".into())));
    }
}

#[test]
fn test_padded_windows_do_not_bias_profile() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "a-win2-TAG-padded(l#0000-r#0000).csv", &window_csv(&[10, 11, 13, 16]));
    write(src.path(), "b-win2-TAG-padded(l#0002-r#0001).csv", &window_csv(&[20, 20, 20, 20]));

    let profile = patch_duration(src.path(), out.path(), &DurationOptions::default()).unwrap();
    assert_eq!(profile.values(), &[0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_inconsistent_unpadded_lengths() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "a-win2-TAG-padded(l#0000-r#0000).csv", &window_csv(&[1, 2, 3, 4]));
    write(src.path(), "b-win3-TAG-padded(l#0000-r#0000).csv", &window_csv(&[1, 2, 3, 4, 5, 6]));

    let err = patch_duration(src.path(), out.path(), &DurationOptions::default()).unwrap_err();
    match err.root() {
        Error::InconsistentWindowLength {
            path,
            expected,
            actual,
        } => {
            assert!(path.ends_with("b-win3-TAG-padded(l#0000-r#0000).csv"));
            assert_eq!((*expected, *actual), (4, 6));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_dispatch_length_mismatch_names_file() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "a-win2-TAG-padded(l#0000-r#0000).csv", &window_csv(&[1, 2, 3, 4]));
    write(src.path(), "notes.csv", &window_csv(&[1, 2, 3]));

    let err = patch_duration(src.path(), out.path(), &DurationOptions::default()).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::LengthMismatch {
            expected: 3,
            actual: 4
        }
    ));
    assert!(err.to_string().contains("notes.csv"));
}

#[test]
fn test_no_unpadded_windows() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "a-win2-TAG-padded(l#0001-r#0000).csv", &window_csv(&[1, 1, 2, 3]));

    let err = patch_duration(src.path(), out.path(), &DurationOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NoUnpaddedWindows));
}

#[test]
fn test_output_folder_must_exist() {
    let raw_dir = TempDir::new().unwrap();
    let csv = write(raw_dir.path(), "raw.csv", RAW);

    let sampler = Sampler::new(2, SamplingConfig::default()).unwrap();
    let err = sampler
        .process_one(&csv, &raw_dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}

#[test]
fn test_refuses_to_overwrite_when_disabled() {
    let raw_dir = TempDir::new().unwrap();
    let win_dir = TempDir::new().unwrap();
    let csv = write(raw_dir.path(), "raw.csv", RAW);

    let sampler = Sampler::new(2, SamplingConfig::default())
        .unwrap()
        .with_overwrite(false);
    sampler.process_one(&csv, win_dir.path()).unwrap();

    let err = sampler.process_one(&csv, win_dir.path()).unwrap_err();
    assert!(matches!(err, Error::FileExists(_)));
}

#[test]
fn test_missing_alignment_column_names_file() {
    let raw_dir = TempDir::new().unwrap();
    let win_dir = TempDir::new().unwrap();
    let csv = write(raw_dir.path(), "raw.csv", RAW);

    let config = SamplingConfig {
        align_key: "phase".to_string(),
        ..SamplingConfig::default()
    };
    let sampler = Sampler::new(2, config).unwrap();
    let err = sampler.process_one(&csv, win_dir.path()).unwrap_err();

    assert!(matches!(err.root(), Error::MissingColumn { column } if column == "phase"));
    assert!(err.to_string().contains("raw.csv"));
}
