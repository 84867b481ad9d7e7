/*!
Compact applier, measurer and generator for the IPS binary patch format.

An IPS patch is a stream of `(offset, length, bytes)` records over a
fixed-size buffer, opened by a `"PATCH"` magic and closed by an `"EOF"`
trailer. [`Ipspatch`] applies or measures such a stream; [`Ipsdiff`] builds
one from an original/modified buffer pair.
*/

pub mod diag;
pub mod ipsdiff;
pub mod ipspatch;

mod utils;

pub use ipsdiff::Ipsdiff;
pub use ipspatch::Ipspatch;

use std::path::{Path, PathBuf};

/// Derive the sibling patch file path for `path`, preferring `.ips` when
/// that file exists and defaulting to `.IPS` otherwise.
///
/// Returns `None` when the file name has no extension of at least 3
/// characters to substitute.
pub fn ips_file_name<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let ext = path.extension()?.to_str()?;
    if ext.len() < 3 {
        return None;
    }

    let lower = path.with_extension("ips");
    if lower.is_file() {
        Some(lower)
    } else {
        Some(path.with_extension("IPS"))
    }
}
