//! Shared helpers for the integration tests

#![allow(dead_code)]

use regex::Regex;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Check `got` line by line against `want`, where every wanted line is a
/// regular expression that must match the whole line. Extra trailing lines
/// in `got` are ignored.
pub fn assert_lines_match(got: &str, want: &[&str]) {
    let got_lines: Vec<&str> = got.split('\n').collect();
    assert!(
        want.len() <= got_lines.len(),
        "want {} lines, got {}:\n{got}",
        want.len(),
        got_lines.len()
    );
    for (i, (pattern, line)) in want.iter().zip(&got_lines).enumerate() {
        let re = Regex::new(&format!("^(?:{pattern})$")).expect("invalid test pattern");
        assert!(
            re.is_match(line),
            "line {}: {line:?} does not match {pattern:?}\nfull output:\n{got}",
            i + 1
        );
    }
}

/// Pattern for the tab-indented location line of a frame in `file` at `line`
pub fn location(file: &str, line: u32) -> String {
    format!(r"\t.*{}:{line}", regex::escape(file))
}

/// Count the lines of `rendered` that are exactly `text`
pub fn count_lines(rendered: &str, text: &str) -> usize {
    rendered.lines().filter(|line| *line == text).count()
}
