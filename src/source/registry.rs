//! Construction of source terms by name.
//!
//! The `source_terms` lists of the `ICNS` (momentum) and `Temperature`
//! input sections name the terms of each equation:
//!
//! | equation | names |
//! |---|---|
//! | momentum | `GeostrophicForcing`, `GravityForcing`, `WallMomentumFluxForcing` |
//! | temperature | `WallTemperatureFluxForcing` |

use super::{
    GeostrophicForcing, GravityForcing, SourceTerm, SourceTermSet, WallMomentumFluxForcing,
    WallTemperatureFluxForcing,
};
use crate::config::{ConfigError, InputConfig};
use crate::error::ForcingError;
use crate::field::FieldRepo;
use crate::similarity::SharedMoData;

/// Momentum source term names.
pub const MOMENTUM_SOURCES: [&str; 3] = [
    GeostrophicForcing::NAME,
    GravityForcing::NAME,
    WallMomentumFluxForcing::NAME,
];

/// Temperature source term names.
pub const TEMPERATURE_SOURCES: [&str; 1] = [WallTemperatureFluxForcing::NAME];

/// Everything a source term may need at construction.
#[derive(Clone, Copy, Debug)]
pub struct SourceTermContext<'a> {
    /// Parsed input file
    pub config: &'a InputConfig,
    /// Field repository
    pub repo: &'a FieldRepo,
    /// Surface-layer state, required by the wall terms
    pub mo: Option<&'a SharedMoData>,
}

impl<'a> SourceTermContext<'a> {
    pub fn new(config: &'a InputConfig, repo: &'a FieldRepo) -> Self {
        Self {
            config,
            repo,
            mo: None,
        }
    }

    /// Attach the surface-layer state.
    pub fn with_mo(mut self, mo: &'a SharedMoData) -> Self {
        self.mo = Some(mo);
        self
    }

    fn require_mo(&self, term: &str) -> Result<SharedMoData, ForcingError> {
        self.mo
            .cloned()
            .ok_or_else(|| ForcingError::MissingSimilarityState(term.to_string()))
    }
}

/// Build one momentum source term.
pub fn make_momentum_source(
    name: &str,
    ctx: &SourceTermContext<'_>,
) -> Result<Box<dyn SourceTerm>, ForcingError> {
    let term: Box<dyn SourceTerm> = match name {
        GeostrophicForcing::NAME => Box::new(GeostrophicForcing::from_config(ctx.config)?),
        GravityForcing::NAME => Box::new(GravityForcing::from_config(&ctx.config.incflo)?),
        WallMomentumFluxForcing::NAME => Box::new(WallMomentumFluxForcing::new(
            ctx.repo,
            ctx.require_mo(name)?,
            &ctx.config.abl,
        )?),
        _ => return Err(ConfigError::UnknownSourceTerm(name.to_string()).into()),
    };
    Ok(term)
}

/// Build one temperature source term.
pub fn make_temperature_source(
    name: &str,
    ctx: &SourceTermContext<'_>,
) -> Result<Box<dyn SourceTerm>, ForcingError> {
    match name {
        WallTemperatureFluxForcing::NAME => Ok(Box::new(WallTemperatureFluxForcing::new(
            ctx.repo,
            ctx.require_mo(name)?,
            &ctx.config.abl,
        )?)),
        _ => Err(ConfigError::UnknownSourceTerm(name.to_string()).into()),
    }
}

fn build_set(
    names: &[String],
    ctx: &SourceTermContext<'_>,
    make: fn(&str, &SourceTermContext<'_>) -> Result<Box<dyn SourceTerm>, ForcingError>,
) -> Result<SourceTermSet, ForcingError> {
    let mut set = SourceTermSet::new();
    for name in names {
        set.push(make(name, ctx)?);
    }
    Ok(set)
}

/// Source terms listed in `ICNS.source_terms`.
pub fn momentum_sources(ctx: &SourceTermContext<'_>) -> Result<SourceTermSet, ForcingError> {
    let set = build_set(&ctx.config.icns.source_terms, ctx, make_momentum_source)?;
    log::info!("ICNS source terms: {:?}", set.names());
    Ok(set)
}

/// Source terms listed in `Temperature.source_terms`.
pub fn temperature_sources(ctx: &SourceTermContext<'_>) -> Result<SourceTermSet, ForcingError> {
    let set = build_set(&ctx.config.temperature.source_terms, ctx, make_temperature_source)?;
    log::info!("Temperature source terms: {:?}", set.names());
    Ok(set)
}
