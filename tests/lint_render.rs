//! Source lints for the miner crate.
//!
//! - Bracket-key text (`[X]`) shown in `render.rs` must be tappable: it has to
//!   go through `push_clickable()`, not a plain `push()`.
//! - The core modules must stay pure: no browser bindings and no clock reads.
//!   Time comes in as the `now` argument.

use std::fs;
use std::path::Path;

const CORE_MODULES: &[&str] = &[
    "state.rs",
    "derived.rs",
    "progress.rs",
    "events.rs",
    "actions.rs",
    "logic.rs",
];

const IMPURE_PATTERNS: &[&str] = &[
    "web_sys",
    "js_sys",
    "SystemTime",
    "Instant::now",
    "Date::now",
    "thread_rng",
];

/// Check if a string literal contains a bracket-key pattern like `[M]`, `[S]`, `[1]`.
fn contains_bracket_key(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    for i in 0..bytes.len() - 2 {
        if bytes[i] == b'[' && bytes[i + 2] == b']' {
            let ch = bytes[i + 1];
            if ch.is_ascii_alphanumeric() || b"-=!~|\\".contains(&ch) {
                return true;
            }
        }
    }
    false
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// `push(` calls (non-clickable) containing bracket-key patterns.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !is_comment(line) && contains_bracket_key(line))
        .filter(|(_, line)| line.contains("cl.push(") && !line.contains("push_clickable("))
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

/// Lines of non-test code that reach for a clock or the browser.
fn find_impure_calls(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    for (i, line) in source.lines().enumerate() {
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }
        if is_comment(line) {
            continue;
        }
        if IMPURE_PATTERNS.iter().any(|p| line.contains(p)) {
            violations.push((i + 1, line.trim().to_string()));
        }
    }
    violations
}

fn miner_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src/miner")
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let path = miner_dir().join("render.rs");
    let source = fs::read_to_string(&path).expect("render.rs is readable");
    let violations = find_bracket_key_in_push(&source);

    if !violations.is_empty() {
        let mut msg = String::from(
            "Found bracket-key text [X] in non-clickable cl.push() calls.\n\
             These should use push_clickable() so the hint can be tapped.\n\n",
        );
        for (line_num, line) in &violations {
            msg.push_str(&format!("  {}:{}: {}\n", path.display(), line_num, line));
        }
        panic!("{}", msg);
    }
}

#[test]
fn core_modules_never_read_a_clock() {
    let mut all_violations = Vec::new();
    for name in CORE_MODULES {
        let path = miner_dir().join(name);
        let source = fs::read_to_string(&path).expect("core module is readable");
        for (line_num, line) in find_impure_calls(&source) {
            all_violations.push(format!("  {}:{}: {}", path.display(), line_num, line));
        }
    }
    assert!(
        all_violations.is_empty(),
        "core modules must take time and randomness as input:\n{}",
        all_violations.join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [M] MINE  [S] Sell"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [M] MINE"), MINE);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [S] Sell"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[M]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[-]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[sell]"));
        assert!(!contains_bracket_key("[{}]"));
        assert!(!contains_bracket_key("abc"));
    }

    #[test]
    fn impure_calls_flagged_outside_tests() {
        let source = "let t = js_sys::Date::now();\n// web_sys in a comment\n#[cfg(test)]\nmod tests { use web_sys; }";
        let found = find_impure_calls(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 1);
    }
}
