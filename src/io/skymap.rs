//! HEALPix FITS map reading.
//!
//! Maps are stored as a binary table in HDU 1 with one column per field. We
//! read the first three fields as (data, background, local). Large maps are
//! usually written with vector cells (`TFORM = 1024E`). A row range read
//! returns every element of every cell in those rows, so reading all rows
//! yields `rows * repeat` values: the whole map in pixel order.

use std::path::{Path, PathBuf};

use fitsio::FitsFile;
use fitsio::hdu::HduInfo;
use log::debug;

use crate::domain::{MapTriple, PixelOrdering, UNSEEN};
use crate::error::AppError;
use crate::sky::{is_bad, nside_from_npix};

/// Number of map fields read from each file.
const FIELDS: usize = 3;

/// Read the (data, background, local) triple of one HEALPix FITS file.
pub fn read_map_triple(path: &Path) -> Result<MapTriple, AppError> {
    let ctx = |what: &str, e: fitsio::errors::Error| {
        AppError::input(format!("{what} '{}': {e}", path.display()))
    };

    let mut fits = FitsFile::open(path).map_err(|e| ctx("Failed to open FITS map", e))?;
    let hdu = fits.hdu(1).map_err(|e| ctx("Missing table HDU in", e))?;

    let (names, num_rows, npix) = match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => {
            if column_descriptions.len() < FIELDS {
                return Err(AppError::input(format!(
                    "'{}' has {} map fields; expected at least {FIELDS} (data, background, local).",
                    path.display(),
                    column_descriptions.len()
                )));
            }
            let repeat = column_descriptions[0].data_type.repeat.max(1);
            let names: Vec<String> = column_descriptions[..FIELDS]
                .iter()
                .map(|c| c.name.clone())
                .collect();
            (names, *num_rows, num_rows * repeat)
        }
        _ => {
            return Err(AppError::input(format!(
                "HDU 1 of '{}' is not a binary table.",
                path.display()
            )));
        }
    };

    let nside = match hdu.read_key::<i64>(&mut fits, "NSIDE") {
        Ok(v) if v > 0 => v as u32,
        _ => nside_from_npix(npix)?,
    };
    if 12 * nside as usize * nside as usize != npix {
        return Err(AppError::input(format!(
            "'{}' declares NSIDE={nside} but holds {npix} pixels.",
            path.display()
        )));
    }

    let ordering = match hdu.read_key::<String>(&mut fits, "ORDERING") {
        Ok(v) => PixelOrdering::from_header(&v).ok_or_else(|| {
            AppError::input(format!("'{}' has unknown ORDERING '{v}'.", path.display()))
        })?,
        Err(_) => PixelOrdering::Ring,
    };

    let mut fields = Vec::with_capacity(FIELDS);
    for name in &names {
        let values: Vec<f64> = hdu
            .read_col_range(&mut fits, name, &(0..num_rows))
            .map_err(|e| ctx(&format!("Failed to read column {name} of"), e))?;
        if values.len() != npix {
            return Err(AppError::input(format!(
                "Column {name} of '{}' has {} values, expected {npix}.",
                path.display(),
                values.len()
            )));
        }
        fields.push(values);
    }

    debug!(
        "read {} (nside={nside}, {:?}, fields={:?})",
        path.display(),
        ordering,
        names
    );

    let local = fields.pop().unwrap_or_default();
    let background = fields.pop().unwrap_or_default();
    let data = fields.pop().unwrap_or_default();
    Ok(MapTriple {
        nside,
        ordering,
        data,
        background,
        local,
    })
}

/// Element-wise sum of two triples. Bad pixels in either input stay bad.
pub fn add_triples(mut acc: MapTriple, other: &MapTriple) -> Result<MapTriple, AppError> {
    if acc.nside != other.nside || acc.ordering != other.ordering {
        return Err(AppError::input(format!(
            "Cannot sum maps with different layouts: nside {} {:?} vs nside {} {:?}.",
            acc.nside, acc.ordering, other.nside, other.ordering
        )));
    }
    for (a, b) in [
        (&mut acc.data, &other.data),
        (&mut acc.background, &other.background),
        (&mut acc.local, &other.local),
    ] {
        for (x, &y) in a.iter_mut().zip(b) {
            *x = if is_bad(*x) || is_bad(y) { UNSEEN } else { *x + y };
        }
    }
    Ok(acc)
}

/// Read and sum all files of one energy bin.
pub fn read_summed(files: &[PathBuf]) -> Result<MapTriple, AppError> {
    let Some((first, rest)) = files.split_first() else {
        return Err(AppError::input("No map files to read."));
    };
    let mut acc = read_map_triple(first)?;
    for path in rest {
        acc = add_triples(acc, &read_map_triple(path)?)?;
    }
    Ok(acc)
}
