// SPDX-License-Identifier: MIT
// Best-effort import scan — extracts top-level package names from submitted
// source so the executor can ask the engine to load them before a run.
//
// This is a line scan, not a parser: `import a, b.c` and `from x.y import z`
// yield `a`, `b`, `x`. Indented (conditional) imports are picked up too —
// over-approximating is harmless because the engine skips unknown names.

/// Scan source text for imported top-level package names, in first-seen
/// order, deduplicated.
pub fn scan_imports(source: &str) -> Vec<String> {
    let mut seen = Vec::new();

    for line in source.lines() {
        let line = line.trim_start();
        let rest = if let Some(rest) = line.strip_prefix("import ") {
            rest
        } else if let Some(rest) = line.strip_prefix("from ") {
            // `from x.y import z` — only the root package matters.
            rest.split_whitespace().next().unwrap_or("")
        } else {
            continue;
        };

        for part in rest.split(',') {
            // Strip `as` aliases and dotted tails: `numpy as np` → `numpy`,
            // `os.path` → `os`.
            let name = part
                .split_whitespace()
                .next()
                .unwrap_or("")
                .split('.')
                .next()
                .unwrap_or("");
            if !name.is_empty()
                && name.chars().all(|c| c.is_alphanumeric() || c == '_')
                && !seen.iter().any(|s| s == name)
            {
                seen.push(name.to_string());
            }
        }
    }

    seen
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_import() {
        assert_eq!(scan_imports("import numpy"), vec!["numpy"]);
    }

    #[test]
    fn multiple_and_aliased() {
        assert_eq!(
            scan_imports("import numpy as np, pandas as pd"),
            vec!["numpy", "pandas"]
        );
    }

    #[test]
    fn from_import_takes_root_package() {
        assert_eq!(scan_imports("from os.path import join"), vec!["os"]);
    }

    #[test]
    fn dotted_import_takes_root() {
        assert_eq!(scan_imports("import matplotlib.pyplot"), vec!["matplotlib"]);
    }

    #[test]
    fn dedupes_and_preserves_order() {
        let src = "import b\nimport a\nfrom b import thing\n";
        assert_eq!(scan_imports(src), vec!["b", "a"]);
    }

    #[test]
    fn indented_imports_are_scanned() {
        let src = "def f():\n    import json\n    return json.dumps({})\n";
        assert_eq!(scan_imports(src), vec!["json"]);
    }

    #[test]
    fn ignores_non_import_lines() {
        let src = "x = 1\nprint('import nothing')\n# import commented\n";
        assert_eq!(scan_imports(src), Vec::<String>::new());
    }
}
