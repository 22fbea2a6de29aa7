//! Plain-text field dumps.
//!
//! One output line per `iy`, from `ny-1` down to `0`, so the file reads
//! with `y` pointing up. Each line holds the `nx` values of that column
//! in `%6.1f` form, separated by single spaces.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use calor_grid::GlobalField;

/// Dump written before the run.
pub const INITIAL_DUMP: &str = "initial.dat";
/// Dump written after the gather.
pub const FINAL_DUMP: &str = "final.dat";

/// Write `field` to `out` in dump format.
pub fn write_field<W: Write>(out: &mut W, field: &GlobalField) -> io::Result<()> {
    let dims = field.dims();
    for iy in (0..dims.ny).rev() {
        for ix in 0..dims.nx {
            if ix > 0 {
                out.write_all(b" ")?;
            }
            write!(out, "{:6.1}", field[(ix, iy)])?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Create (or truncate) `path` and dump `field` into it.
pub fn dump_to_path(path: &Path, field: &GlobalField) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_field(&mut out, field)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write {}", path.display()))
}
