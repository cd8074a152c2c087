//! Discovery of per-energy-bin map files.
//!
//! A bin's files are found by expanding a file-name template:
//!
//! - `{config}` → detector configuration (e.g. `IC`)
//! - `{bin}`    → two-digit, 1-based bin index (`01`..`09`)
//! - `*`        → any run of characters
//!
//! With the default template `{config}*_E{bin}.fits`, bin 3 of the `IC`
//! configuration collects `IC59_24H_sid_E03.fits`, `IC86-2011_24H_sid_E03.fits`
//! and so on. Multiple files per bin are summed by the caller.

use std::path::{Path, PathBuf};

use crate::domain::EnergyBin;
use crate::error::AppError;

pub const DEFAULT_PATTERN: &str = "{config}*_E{bin}.fits";

/// Expand `{config}` and `{bin}` in a template for one bin.
pub fn expand_pattern(pattern: &str, config: &str, bin: usize) -> String {
    pattern
        .replace("{config}", config)
        .replace("{bin}", &format!("{bin:02}"))
}

/// Match `name` against a pattern where `*` matches any (possibly empty) run.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = name.chars().collect();

    // Greedy matching with backtracking to the last `*`.
    let (mut pi, mut si) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;
    while si < s.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some((pi, si));
            pi += 1;
        } else if pi < p.len() && p[pi] == s[si] {
            pi += 1;
            si += 1;
        } else if let Some((sp, ss)) = star {
            pi = sp + 1;
            si = ss + 1;
            star = Some((sp, ss + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}

/// List the map files of every energy bin, in bin order.
pub fn energy_maps(
    dir: &Path,
    config: &str,
    pattern: &str,
    bins: &[EnergyBin],
) -> Result<Vec<Vec<PathBuf>>, AppError> {
    if !pattern.contains("{bin}") {
        return Err(AppError::usage(format!(
            "Map pattern '{pattern}' must contain a {{bin}} placeholder."
        )));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| AppError::usage(format!("Cannot read map directory '{}': {e}", dir.display())))?;
    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            AppError::usage(format!("Cannot list map directory '{}': {e}", dir.display()))
        })?;
        if entry.path().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    let mut out = Vec::with_capacity(bins.len());
    for bin in bins {
        let expanded = expand_pattern(pattern, config, bin.index);
        let files: Vec<PathBuf> = names
            .iter()
            .filter(|n| wildcard_match(&expanded, n))
            .map(|n| dir.join(n))
            .collect();
        if files.is_empty() {
            return Err(AppError::input(format!(
                "No maps for energy bin {} (median {:.2}) matching '{expanded}' in '{}'.",
                bin.index,
                bin.median,
                dir.display()
            )));
        }
        out.push(files);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::energy_bins;

    #[test]
    fn wildcard_semantics() {
        assert!(wildcard_match("IC*_E01.fits", "IC86-2011_24H_sid_E01.fits"));
        assert!(wildcard_match("IC*_E01.fits", "IC_E01.fits"));
        assert!(!wildcard_match("IC*_E01.fits", "IC59_E011.fits"));
        assert!(!wildcard_match("IC*_E01.fits", "IT73_E01.fits"));
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("a*b*c", "aXXbYYc"));
        assert!(!wildcard_match("a*b*c", "aXXbYY"));
    }

    #[test]
    fn pattern_expansion_pads_bin_index() {
        assert_eq!(expand_pattern(DEFAULT_PATTERN, "IC", 3), "IC*_E03.fits");
    }

    #[test]
    fn groups_files_by_bin() {
        let dir = std::env::temp_dir().join(format!("sh-amplitude-energy-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["IC86_E01.fits", "IC59_E01.fits", "IC79_E02.fits", "IT73_E01.fits", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let bins = &energy_bins()[..2];
        let groups = energy_maps(&dir, "IC", DEFAULT_PATTERN, bins).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec![dir.join("IC59_E01.fits"), dir.join("IC86_E01.fits")]);
        assert_eq!(groups[1], vec![dir.join("IC79_E02.fits")]);

        // Bin 3 has no files.
        let err = energy_maps(&dir, "IC", DEFAULT_PATTERN, &energy_bins()[..3]).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INPUT);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn pattern_without_bin_is_rejected() {
        let err = energy_maps(Path::new("."), "IC", "{config}.fits", &energy_bins()).unwrap_err();
        assert_eq!(err.exit_code(), AppError::USAGE);
    }
}
