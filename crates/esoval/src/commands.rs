//! Command implementations shared by the binary and its tests.

use color_eyre::eyre::{WrapErr, eyre};
use esoval_core::{ValuationGateway, headline_value, sweep_with};

use crate::report::{OutputFormat, format_catalog, format_headline, format_sweep};
use crate::session::SessionConfig;

/// List the session's catalog in display units.
pub fn catalog_report(session: &SessionConfig) -> String {
    format_catalog(&session.catalog())
}

/// Value the session baseline once.
pub fn value_report<G>(session: &SessionConfig, gateway: &G) -> color_eyre::Result<String>
where
    G: ValuationGateway + ?Sized,
{
    let catalog = session.catalog();
    let baseline = session
        .baseline(&catalog)
        .wrap_err("invalid session inputs")?;
    let value = headline_value(gateway, &baseline).wrap_err("headline valuation failed")?;
    Ok(format_headline(value))
}

/// Sweep `variable` from the session baseline and render the series.
pub fn sweep_report<G>(
    session: &SessionConfig,
    gateway: &G,
    variable: &str,
    format: OutputFormat,
) -> color_eyre::Result<String>
where
    G: ValuationGateway + ?Sized,
{
    let catalog = session.catalog();
    let descriptor = catalog.get(variable).ok_or_else(|| {
        eyre!(
            "unknown variable `{variable}` (expected one of: {})",
            catalog.names().collect::<Vec<_>>().join(", ")
        )
    })?;
    let baseline = session
        .baseline(&catalog)
        .wrap_err("invalid session inputs")?;

    let result = sweep_with(
        &baseline,
        descriptor,
        gateway,
        &session.sweep_options(),
        None,
    )
    .wrap_err_with(|| format!("sweep over `{variable}` failed"))?;

    Ok(format_sweep(&result, format)?)
}
