//! Stack text parsing for error records
//!
//! Understands V8-style traces (`at fn (file:line:col)`) and the format
//! `std::backtrace::Backtrace` renders (`N: fn` followed by `at file:line:col`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::constants::STACKTRACE_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub filename: String,
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colno: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackTrace {
    pub frames: Vec<StackFrame>,
}

impl StackTrace {
    #[must_use]
    pub fn parse(stack: &str) -> Self {
        Self {
            frames: parse_stack_frames(stack),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

static V8_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*at (?:(.*?) ?\()?((?:file|https?|blob|chrome-extension|address|native|eval|webpack|<anonymous>|[-a-z]+:|.*bundle|/).*?)(?::(\d+))?(?::(\d+))?\)?\s*$",
    )
    .expect("Invalid V8 frame regex")
});

static RUST_FRAME_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("Invalid backtrace header regex"));

static RUST_FRAME_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at\s+(.+?):(\d+)(?::(\d+))?\s*$").expect("Invalid backtrace location regex")
});

/// Parse one V8-style frame line; `None` when the line is not a frame.
#[must_use]
pub fn parse_stack_line(line: &str) -> Option<StackFrame> {
    let captures = V8_FRAME.captures(line)?;
    Some(StackFrame {
        filename: captures.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        function_name: captures.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        lineno: captures.get(3).and_then(|m| m.as_str().parse().ok()),
        colno: captures.get(4).and_then(|m| m.as_str().parse().ok()),
    })
}

/// Parse stack text into at most ten frames, innermost first.
#[must_use]
pub fn parse_stack_frames(stack: &str) -> Vec<StackFrame> {
    if stack.trim().is_empty() {
        return Vec::new();
    }

    let is_backtrace = stack.lines().any(|line| RUST_FRAME_HEADER.is_match(line));

    let mut frames = if is_backtrace {
        parse_backtrace(stack)
    } else {
        // first line carries the error message
        stack.lines().skip(1).filter_map(parse_stack_line).collect()
    };
    frames.truncate(STACKTRACE_LIMIT);
    frames
}

fn parse_backtrace(stack: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();
    for line in stack.lines() {
        if let Some(captures) = RUST_FRAME_LOCATION.captures(line) {
            if let Some(frame) = frames.last_mut().filter(|f| f.filename.is_empty()) {
                frame.filename = captures[1].to_string();
                frame.lineno = captures[2].parse().ok();
                frame.colno = captures.get(3).and_then(|m| m.as_str().parse().ok());
            }
        } else if let Some(captures) = RUST_FRAME_HEADER.captures(line) {
            frames.push(StackFrame {
                function_name: captures[1].to_string(),
                ..StackFrame::default()
            });
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_patterns_compile() {
        Lazy::force(&V8_FRAME);
        Lazy::force(&RUST_FRAME_HEADER);
        Lazy::force(&RUST_FRAME_LOCATION);
    }

    const V8_STACK: &str = "TypeError: Cannot read properties of undefined\n    at render (https://app.test/static/main.js:12:34)\n    at https://app.test/static/vendor.js:1:99\n    not a frame";

    #[test]
    fn parses_v8_frames() {
        let frames = parse_stack_frames(V8_STACK);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].function_name, "render");
        assert_eq!(frames[0].filename, "https://app.test/static/main.js");
        assert_eq!(frames[0].lineno, Some(12));
        assert_eq!(frames[0].colno, Some(34));
        assert_eq!(frames[1].function_name, "");
        assert_eq!(frames[1].lineno, Some(1));
    }

    #[test]
    fn parses_rust_backtrace_frames() {
        let stack = "   0: app::checkout::submit\n             at ./src/checkout.rs:41:9\n   1: app::main\n             at ./src/main.rs:7:5\n   2: core::ops::function::FnOnce::call_once";
        let frames = parse_stack_frames(stack);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].function_name, "app::checkout::submit");
        assert_eq!(frames[0].filename, "./src/checkout.rs");
        assert_eq!(frames[0].lineno, Some(41));
        assert_eq!(frames[1].colno, Some(5));
        assert!(frames[2].filename.is_empty());
    }

    #[test]
    fn limits_to_ten_frames() {
        let mut stack = String::from("Error: deep");
        for i in 0..25 {
            stack.push_str(&format!("\n    at f{i} (https://app.test/a.js:{i}:1)"));
        }
        assert_eq!(parse_stack_frames(&stack).len(), STACKTRACE_LIMIT);
    }

    #[test]
    fn empty_stack_has_no_frames() {
        assert!(parse_stack_frames("").is_empty());
        assert!(parse_stack_line("hello").is_none());
    }
}
