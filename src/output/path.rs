//! Output file naming
//!
//! # Usage Example
//!
//! ```rust
//! use crydl::output::path::{archive_entry_name, archive_path, default_output_name};
//! use std::path::{Path, PathBuf};
//!
//! let name = default_output_name("binanceus", "BTC/USDT", "2024-01-01", "");
//! assert_eq!(name, "binanceus_BTC_USDT_2024-01-01_current.csv");
//!
//! let zip = archive_path(Path::new("data/x.csv")).unwrap();
//! assert_eq!(zip, PathBuf::from("data/x.zip"));
//! assert_eq!(archive_entry_name(Path::new("data/x.csv")).unwrap(), "x.csv");
//! ```

use super::{OutputError, OutputResult};
use std::path::{Path, PathBuf};

/// Sentinel `until` value meaning "now"
pub const CURRENT: &str = "current";

const CSV_SUFFIX: &str = ".csv";
const ZIP_SUFFIX: &str = ".zip";

/// Default output filename for a download
///
/// `{exchange}_{symbol with / replaced by _}_{since}_{until}.csv`, where an
/// empty `until` becomes `current`.
pub fn default_output_name(exchange: &str, symbol: &str, since: &str, until: &str) -> String {
    let until_part = if until.is_empty() { CURRENT } else { until };
    let safe_symbol = symbol.replace('/', "_");
    format!("{exchange}_{safe_symbol}_{since}_{until_part}{CSV_SUFFIX}")
}

/// Archive path for a CSV target: `.csv` replaced by `.zip`, or `.zip` appended
pub fn archive_path(target: &Path) -> OutputResult<PathBuf> {
    let file_name = file_name(target)?;
    let stem = file_name.strip_suffix(CSV_SUFFIX).unwrap_or(&file_name);
    Ok(target.with_file_name(format!("{stem}{ZIP_SUFFIX}")))
}

/// Name of the CSV entry inside the archive: the target's file name
pub fn archive_entry_name(target: &Path) -> OutputResult<String> {
    file_name(target)
}

fn file_name(target: &Path) -> OutputResult<String> {
    target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| OutputError::InvalidPath(target.display().to_string()))
}
