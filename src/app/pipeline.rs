//! The amplitude-vs-energy fitting pipeline.
//!
//! map discovery -> per-bin summed maps -> pixel geometry -> for each `l`:
//! (optional cumulative reference fit) -> per-bin multipole fits -> dipoles
//!
//! The front-end (`app`) only handles presentation and exports.

use log::{debug, info};
use rayon::prelude::*;

use crate::domain::{AmplitudePoint, AmplitudeSeries, EnergyBin, FitOptions, MapTriple, RunConfig, SkyCuts, energy_bins};
use crate::error::AppError;
use crate::fit::{get_dipole, multifit, multifit_fixed};
use crate::io::{add_triples, energy_maps, read_summed};
use crate::sky::{SkyPixels, pixel_centers, smooth_triple};

/// Every energy bin's summed counts, sharing one pixel layout.
#[derive(Debug, Clone)]
pub struct LoadedBins {
    pub bins: Vec<EnergyBin>,
    pub triples: Vec<MapTriple>,
    pub pixels: SkyPixels,
}

impl LoadedBins {
    /// Check the maps share a layout and compute the pixel centres once.
    pub fn new(bins: Vec<EnergyBin>, triples: Vec<MapTriple>) -> Result<Self, AppError> {
        let Some(first) = triples.first() else {
            return Err(AppError::input("No energy bins to fit."));
        };
        if bins.len() != triples.len() {
            return Err(AppError::input(format!(
                "{} energy bins but {} maps.",
                bins.len(),
                triples.len()
            )));
        }
        for (bin, t) in bins.iter().zip(&triples) {
            if t.nside != first.nside || t.ordering != first.ordering {
                return Err(AppError::input(format!(
                    "Energy bin {} has nside {} {:?}, expected nside {} {:?}.",
                    bin.index, t.nside, t.ordering, first.nside, first.ordering
                )));
            }
        }
        let pixels = pixel_centers(first.nside, first.ordering)?;
        Ok(Self { bins, triples, pixels })
    }

    /// Sum of all bins, used as the `--fix_multi` reference.
    pub fn cumulative(&self) -> Result<MapTriple, AppError> {
        let mut iter = self.triples.iter();
        let Some(first) = iter.next() else {
            return Err(AppError::input("No energy bins to sum."));
        };
        iter.try_fold(first.clone(), |acc, t| add_triples(acc, t))
    }
}

/// Find and read every bin's maps.
pub fn load_bins(config: &RunConfig) -> Result<LoadedBins, AppError> {
    let bins = energy_bins();
    let files = energy_maps(&config.map_dir, &config.detector_config, &config.pattern, &bins)?;
    info!(
        "found {} map files across {} energy bins in {}",
        files.iter().map(Vec::len).sum::<usize>(),
        bins.len(),
        config.map_dir.display()
    );

    let mut triples = Vec::with_capacity(files.len());
    for (bin, bin_files) in bins.iter().zip(&files) {
        for f in bin_files {
            debug!("E{:02}: loading {}", bin.index, f.display());
        }
        triples.push(read_summed(bin_files)?);
    }

    LoadedBins::new(bins, triples)
}

/// Fit every bin for each multipole order `1..=lmax`.
pub fn fit_amplitudes(loaded: &LoadedBins, lmax: usize, opts: &FitOptions) -> Result<Vec<AmplitudeSeries>, AppError> {
    if lmax < 1 {
        return Err(AppError::usage("lmax must be at least 1."));
    }

    // Smooth each map once; the fits below then see pre-smoothed counts.
    let smoothing = opts.cuts.smooth_radius > 0.0;
    let smoothed: Vec<MapTriple>;
    let triples: &[MapTriple] = if smoothing {
        info!(
            "smoothing {} maps ({:?}, {} deg)",
            loaded.triples.len(),
            opts.cuts.smooth_kind,
            opts.cuts.smooth_radius
        );
        smoothed = loaded
            .triples
            .iter()
            .map(|t| smooth_triple(t, &loaded.pixels, &opts.cuts))
            .collect::<Result<_, _>>()?;
        &smoothed
    } else {
        &loaded.triples
    };

    let cumulative = if opts.fix_multi {
        Some(smooth_triple(&loaded.cumulative()?, &loaded.pixels, &opts.cuts)?)
    } else {
        None
    };

    let fit_opts = FitOptions {
        cuts: SkyCuts {
            smooth_radius: 0.0,
            ..opts.cuts.clone()
        },
        ..opts.clone()
    };
    let opts = &fit_opts;

    let mut out = Vec::with_capacity(lmax);
    for l in 1..=lmax {
        let reference = match &cumulative {
            Some(total) => {
                let p = multifit(l, total, &loaded.pixels, opts)?;
                debug!("l={l}: cumulative reference chi2/ndof={:.3}", p.reduced_chi2());
                Some(p)
            }
            None => None,
        };

        let points = loaded
            .bins
            .par_iter()
            .zip(triples.par_iter())
            .map(|(bin, triple)| -> Result<AmplitudePoint, AppError> {
                let params = match &reference {
                    Some(r) => multifit_fixed(l, triple, &loaded.pixels, opts, r)?,
                    None => multifit(l, triple, &loaded.pixels, opts)?,
                };
                let dipole = get_dipole(&params)?;
                debug!(
                    "l={l} E{:02}: amplitude={:.3e} ± {:.1e} chi2/ndof={:.3}",
                    bin.index,
                    dipole.amplitude,
                    dipole.amplitude_err,
                    params.reduced_chi2()
                );
                Ok(AmplitudePoint {
                    bin: *bin,
                    dipole,
                    params,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        out.push(AmplitudeSeries { lmax: l, points });
    }
    Ok(out)
}

/// Execute the full pipeline from map files.
pub fn run_fit(config: &RunConfig) -> Result<Vec<AmplitudeSeries>, AppError> {
    let loaded = load_bins(config)?;
    fit_amplitudes(&loaded, config.lmax, &config.fit)
}
