//! Gold price lookup with a TTL cache and a static fallback.

use anyhow::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Grams per troy ounce; spot quotes arrive per ounce.
pub const TROY_OUNCE_GRAMS: f64 = 31.1035;

/// USD per gram returned when the oracle cannot be reached. Never cached.
pub const FALLBACK_PRICE_PER_GRAM: f64 = 65.0;

/// How long a fetched price stays valid.
pub const CACHE_TTL: Duration = Duration::from_millis(10 * 60 * 1000);

/// Anything that can produce a current USD-per-gram gold price. The request
/// handlers depend on this seam rather than on the concrete cache.
#[async_trait]
pub trait GoldPriceSource: Send + Sync {
    async fn price_per_gram(&self) -> f64;
}

/// External spot-price oracle. Returns USD per troy ounce.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn fetch_spot_per_ounce(&self) -> Result<f64>;
}

/// Time source, injectable so the TTL logic can run under a fake clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CacheState {
    price_per_gram: Option<f64>,
    fetched_at: Option<Instant>,
}

/// Caches the per-gram gold price for [`CACHE_TTL`], refreshing lazily on
/// access. A failed refresh leaves the cache untouched so the next call
/// retries immediately; callers get [`FALLBACK_PRICE_PER_GRAM`] instead of
/// an error.
pub struct GoldPriceCache<P, C = SystemClock> {
    provider: P,
    clock: C,
    state: Mutex<CacheState>,
}

impl<P: SpotPriceProvider> GoldPriceCache<P, SystemClock> {
    pub fn new(provider: P) -> Self {
        Self::with_clock(provider, SystemClock)
    }
}

impl<P: SpotPriceProvider, C: Clock> GoldPriceCache<P, C> {
    pub fn with_clock(provider: P, clock: C) -> Self {
        GoldPriceCache {
            provider,
            clock,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Current gold price in USD per gram. Infallible: oracle failures are
    /// absorbed by the fallback constant.
    ///
    /// Holding the state lock across the fetch doubles as single-flight
    /// deduplication when several requests find the cache stale at once.
    pub async fn price_per_gram(&self) -> f64 {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if let (Some(price), Some(fetched_at)) = (state.price_per_gram, state.fetched_at) {
            if now.duration_since(fetched_at) < CACHE_TTL {
                debug!("Gold price cache hit: {price} USD/g");
                return price;
            }
            debug!("Gold price cache stale, refreshing");
        } else {
            debug!("Gold price cache empty, fetching");
        }

        match self.provider.fetch_spot_per_ounce().await {
            Ok(per_ounce) => {
                let per_gram = per_ounce / TROY_OUNCE_GRAMS;
                state.price_per_gram = Some(per_gram);
                state.fetched_at = Some(now);
                debug!("Fetched gold price: {per_ounce} USD/oz = {per_gram} USD/g");
                per_gram
            }
            Err(e) => {
                warn!(error = %e, "Gold price fetch failed, using fallback");
                FALLBACK_PRICE_PER_GRAM
            }
        }
    }
}

#[async_trait]
impl<P: SpotPriceProvider, C: Clock> GoldPriceSource for GoldPriceCache<P, C> {
    async fn price_per_gram(&self) -> f64 {
        GoldPriceCache::price_per_gram(self).await
    }
}
