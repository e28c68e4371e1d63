//! Candlestick chart lifecycle.
//!
//! One surface exists per (asset, timeframe). Switching either tears the old
//! surface down (and detaches its resize listener) before the new one is
//! created. Each surface gets exactly one OHLC load, tagged with a generation
//! number; results from superseded generations are dropped.

use common::models::{candles_from_ohlc, parse_ohlc, Candle, Timeframe};
use connectors::MarketDataProvider;
use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

use crate::StoreError;

/// What a chart shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartKey {
    pub asset: String,
    pub timeframe: Timeframe,
}

impl ChartKey {
    pub fn new(asset: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            asset: asset.into(),
            timeframe,
        }
    }
}

/// A charting widget instance.
pub trait ChartSurface: Send + 'static {
    fn set_data(&mut self, candles: &[Candle]);
    fn fit_content(&mut self);
    fn resize(&mut self, width: u32);
    /// Release the widget. Called exactly once.
    fn remove(&mut self);
}

/// Creates surfaces for a container.
pub trait ChartHost {
    type Surface: ChartSurface;

    fn create(&self, key: &ChartKey) -> Self::Surface;
    fn container_width(&self) -> u32;
}

type ResizeListener = Box<dyn Fn(u32) + Send + Sync>;

/// Window-level resize event source.
#[derive(Default)]
pub struct WindowEvents {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<u64, ResizeListener>>,
}

impl WindowEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a listener; it stays attached until the guard is dropped.
    pub fn on_resize(self: &Arc<Self>, listener: impl Fn(u32) + Send + Sync + 'static) -> ResizeGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).insert(id, Box::new(listener));
        ResizeGuard {
            events: Arc::clone(self),
            id,
        }
    }

    pub fn dispatch_resize(&self, width: u32) {
        for listener in lock(&self.listeners).values() {
            listener(width);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

pub struct ResizeGuard {
    events: Arc<WindowEvents>,
    id: u64,
}

impl Drop for ResizeGuard {
    fn drop(&mut self) {
        lock(&self.events.listeners).remove(&self.id);
    }
}

struct MountedChart<S: ChartSurface> {
    key: ChartKey,
    generation: u64,
    surface: Arc<Mutex<S>>,
    loaded: bool,
    resize: Option<ResizeGuard>,
}

impl<S: ChartSurface> Drop for MountedChart<S> {
    fn drop(&mut self) {
        debug!("Removing chart for {} ({}d)", self.key.asset, self.key.timeframe);
        // Detach from the window before the surface goes away.
        drop(self.resize.take());
        lock(&self.surface).remove();
    }
}

/// The single data load issued for one mounted chart.
pub struct PendingLoad {
    pub key: ChartKey,
    pub generation: u64,
    provider: Arc<dyn MarketDataProvider>,
    abort: futures::future::AbortRegistration,
}

/// Outcome of a [`PendingLoad`], handed back to [`ChartController::apply`].
pub struct LoadResult {
    pub key: ChartKey,
    pub generation: u64,
    pub candles: Result<Vec<Candle>, StoreError>,
}

impl PendingLoad {
    pub async fn fetch(self) -> LoadResult {
        let provider = self.provider;
        let key = self.key.clone();
        let request = async move {
            let payload = provider.get_ohlc(&key.asset, key.timeframe.days()).await?;
            let rows = parse_ohlc(&payload)?;
            Ok::<_, StoreError>(candles_from_ohlc(&rows))
        };

        let candles = match Abortable::new(request, self.abort).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Aborted),
        };

        LoadResult {
            key: self.key,
            generation: self.generation,
            candles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Candles were fed to the current surface
    Applied(usize),
    /// Result belonged to an older chart and was dropped
    Stale,
    /// Load failed; the chart stays empty
    Failed,
}

pub struct ChartController<H: ChartHost> {
    host: H,
    provider: Arc<dyn MarketDataProvider>,
    events: Arc<WindowEvents>,
    generation: u64,
    current: Option<MountedChart<H::Surface>>,
    in_flight: Option<AbortHandle>,
}

impl<H: ChartHost> ChartController<H> {
    pub fn new(host: H, provider: Arc<dyn MarketDataProvider>, events: Arc<WindowEvents>) -> Self {
        Self {
            host,
            provider,
            events,
            generation: 0,
            current: None,
            in_flight: None,
        }
    }

    /// Show `key`. Returns the load for the new chart, or `None` when `key` is
    /// already on screen.
    pub fn show(&mut self, key: ChartKey) -> Option<PendingLoad> {
        if self.current.as_ref().map(|c| c.key == key).unwrap_or(false) {
            return None;
        }

        self.teardown();

        self.generation += 1;
        let generation = self.generation;

        debug!(
            "Creating chart for {} ({}d), generation {}",
            key.asset, key.timeframe, generation
        );

        let mut surface = self.host.create(&key);
        surface.resize(self.host.container_width());
        let surface = Arc::new(Mutex::new(surface));

        let resize_target = Arc::clone(&surface);
        let resize = self.events.on_resize(move |width| lock(&resize_target).resize(width));

        let (abort_handle, abort) = AbortHandle::new_pair();
        self.in_flight = Some(abort_handle);

        self.current = Some(MountedChart {
            key: key.clone(),
            generation,
            surface,
            loaded: false,
            resize: Some(resize),
        });

        Some(PendingLoad {
            key,
            generation,
            provider: Arc::clone(&self.provider),
            abort,
        })
    }

    /// Feed a finished load into the chart it was issued for, if that chart is still current.
    pub fn apply(&mut self, result: LoadResult) -> ApplyOutcome {
        let Some(current) = self.current.as_mut() else {
            return ApplyOutcome::Stale;
        };
        if current.generation != result.generation || current.loaded {
            debug!(
                "Discarding chart data for generation {} (current {})",
                result.generation, current.generation
            );
            return ApplyOutcome::Stale;
        }

        current.loaded = true;
        self.in_flight = None;

        match result.candles {
            Ok(candles) => {
                let mut surface = lock(&current.surface);
                surface.set_data(&candles);
                surface.fit_content();
                ApplyOutcome::Applied(candles.len())
            }
            Err(e) => {
                error!("Error fetching chart data for {}: {}", result.key.asset, e);
                ApplyOutcome::Failed
            }
        }
    }

    /// Show `key` and run its load to completion.
    pub async fn load(&mut self, key: ChartKey) -> Option<ApplyOutcome> {
        let pending = self.show(key)?;
        let result = pending.fetch().await;
        Some(self.apply(result))
    }

    /// Remove the current chart, cancelling its load if still running.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.current = None;
    }
}

impl<H: ChartHost> Drop for ChartController<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
