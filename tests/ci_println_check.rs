//! CI validation tests for println! usage
//!
//! Terminal output belongs to the CLI commands. The dashboard owns the terminal while it
//! runs and the panel library reports through `log`, so neither may print directly.

use std::fs;
use std::path::Path;

fn printing_lines(content: &str) -> Vec<usize> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("//")
                && (line.contains("println!") || line.contains("eprintln!"))
        })
        .map(|(n, _)| n + 1)
        .collect()
}

fn rust_files(dir: &Path, files: &mut Vec<String>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                rust_files(&path, files);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path.to_string_lossy().to_string());
            }
        }
    }
}

/// Test that dashboard components don't contain println! or eprintln! statements
#[test]
fn test_no_println_in_tui_components() {
    let tui_files = [
        "src/cli/tui/event_loop.rs",
        "src/cli/tui/app.rs",
        "src/cli/tui/ui.rs",
        "src/cli/tui/mod.rs",
    ];

    for file_path in &tui_files {
        if !Path::new(file_path).exists() {
            continue;
        }
        let content = fs::read_to_string(file_path)
            .unwrap_or_else(|_| panic!("Failed to read {}", file_path));

        let lines = printing_lines(&content);
        assert!(
            lines.is_empty(),
            "Found println!/eprintln! in TUI file {}: lines {:?}\n\
             The dashboard must not write to the terminal directly, it breaks the interface.",
            file_path,
            lines
        );
    }
}

/// Test that the panel library and HTTP client only report through log macros
#[test]
fn test_no_println_in_library_modules() {
    let mut files = Vec::new();
    for dir in ["src/panel", "src/remote", "src/config", "src/errors"] {
        rust_files(Path::new(dir), &mut files);
    }

    for file_path in &files {
        let content = fs::read_to_string(file_path)
            .unwrap_or_else(|_| panic!("Failed to read {}", file_path));
        let lines = printing_lines(&content);
        assert!(
            lines.is_empty(),
            "Found println!/eprintln! in library file {}: lines {:?}. Use log macros instead.",
            file_path,
            lines
        );
    }
}

/// Test that the entry points initialize logging
#[test]
fn test_proper_logging_patterns() {
    let cli = fs::read_to_string("src/cli/mod.rs").expect("Failed to read src/cli/mod.rs");
    assert!(
        cli.contains("init_cli_logging"),
        "src/cli/mod.rs should initialize logging but doesn't appear to"
    );

    let logging =
        fs::read_to_string("src/utils/logging.rs").expect("Failed to read src/utils/logging.rs");
    assert!(logging.contains("log_panics::init"));
    assert!(logging.contains("Target::Pipe"), "dashboard logs must go to a file");
}
