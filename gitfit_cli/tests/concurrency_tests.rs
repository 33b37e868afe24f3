//! Concurrency tests for the gitfit binary.
//!
//! Several processes writing the same data directory must never leave a
//! document half-written. Updates may race, but every document on disk
//! must stay valid JSON of the expected shape.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::thread;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("gitfit"))
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("Failed to read document");
    serde_json::from_str(&text).expect("Document is not valid JSON")
}

#[test]
fn test_concurrent_note_adds() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().to_path_buf();
    let writers = 8;

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                cli()
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["notes", "add", "abs:plank", "--text"])
                    .arg(format!("writer {}", i))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }

    let doc = read_json(&data_dir.join("notes.json"));
    let notes = doc.as_array().expect("Notes document is not an array");
    assert!(!notes.is_empty());
    assert!(notes.len() <= writers);
    for note in notes {
        assert_eq!(note["key"], "abs:plank");
        assert!(note["id"].is_string());
    }
}

#[test]
fn test_concurrent_favorite_adds() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().to_path_buf();
    let keys = [
        "chest:bench-press",
        "chest:pushup",
        "legs:back-squat",
        "abs:plank",
        "back:pullup",
    ];

    let handles: Vec<_> = keys
        .iter()
        .map(|key| {
            let data_dir = data_dir.clone();
            let key = key.to_string();
            thread::spawn(move || {
                cli()
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["favorites", "add", &key])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }

    let doc = read_json(&data_dir.join("favorites.json"));
    let favorites = doc.as_array().expect("Favorites document is not an array");
    assert!(!favorites.is_empty());
    assert!(favorites.len() <= keys.len());
    for entry in favorites {
        let entry = entry.as_str().expect("Favorite is not a string");
        assert!(keys.contains(&entry));
    }
}

#[test]
fn test_concurrent_plan_edits() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().to_path_buf();

    // Create the default plan up front so every writer edits the same one
    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["plan", "show"])
        .assert()
        .success();

    let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
    let handles: Vec<_> = days
        .iter()
        .map(|day| {
            let data_dir = data_dir.clone();
            let day = day.to_string();
            thread::spawn(move || {
                cli()
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["plan", "add", "chest:pushup", "--day", &day])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }

    let doc = read_json(&data_dir.join("regimen_v2.json"));
    let plans = doc["plans"].as_array().expect("plans is not an array");
    assert_eq!(plans.len(), 1);
    assert_eq!(doc["activeId"], plans[0]["id"]);

    let total: usize = days
        .iter()
        .map(|day| plans[0]["days"][*day].as_array().map_or(0, |items| items.len()))
        .sum();
    assert!(total >= 1 && total <= days.len());
}
