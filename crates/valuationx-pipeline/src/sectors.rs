//! Benchmark sweep across the whole sector-ETF universe

use futures::future::join_all;
use tracing::{info, instrument, warn};
use valuationx_core::{
    MetricsFetcher, Result, SectorDerivedMetrics, SectorEtf, derive_sector_multiples,
};

/// Fetch and derive metrics for all eleven sector ETFs concurrently
///
/// Results come back in [`SectorEtf::ALL`] order. A failed ETF is reported in
/// place and does not stop the others.
#[instrument(skip(fetcher))]
pub async fn benchmark_all_sectors(
    fetcher: &dyn MetricsFetcher,
) -> Vec<(SectorEtf, Result<SectorDerivedMetrics>)> {
    let results = join_all(SectorEtf::ALL.into_iter().map(|etf| async move {
        let metrics = fetcher
            .fetch_sector_raw(etf.code())
            .await
            .map(|raw| derive_sector_multiples(&raw));
        if let Err(e) = &metrics {
            warn!(etf = etf.code(), error = %e, "Sector fetch failed");
        }
        (etf, metrics)
    }))
    .await;

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    info!(total = results.len(), failed, "Sector sweep complete");
    results
}
