//! Shared test constants and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Body text from the end-to-end scenario: two clauses in one group.
pub const SCENARIO_BODY: &str = "已有研究讨论了这一问题（Smith，2001；Jones和Lee，2002）。";

/// Reference list matching [`SCENARIO_BODY`]: one numbered line, one with a DOI.
pub const SCENARIO_REFS: &str = "\
[3] Smith, J. Title A. 2001.
Jones, K. and Lee, M. Title B, 2002. DOI:10.1/xyz
";

/// Expected output for the scenario. The numbered Smith line starts with
/// `[`, so it sorts after the Latin-initial Jones line.
pub const SCENARIO_OUTPUT: &str = "\
[1] Jones, K. and Lee, M. Title B, 2002.
[2] Smith, J. Title A. 2001.
";

/// Writes `content` to `dir/name`.
pub fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}
