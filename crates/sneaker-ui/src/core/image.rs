//! Image lazy-loading state.
//!
//! # Design
//! - `ImageLoadState` is a pure status machine; `ImageLoader` drives it through an
//!   [`ImageFetcher`] so the browser `Image` primitive stays out of the core.
//! - Every load issues a generation ticket. Only the newest ticket may settle the
//!   status, so a slow load for a previous source cannot overwrite fresher state.
//! - No timeout and no cancellation: superseded loads simply settle into nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Observable `(is_loading, has_error)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageLoadStatus {
    /// A load is in flight.
    pub is_loading: bool,
    /// The most recent load failed.
    pub has_error: bool,
}

impl ImageLoadStatus {
    /// Status while a load is in flight.
    pub const LOADING: Self = Self {
        is_loading: true,
        has_error: false,
    };
    /// Status after a successful load.
    pub const LOADED: Self = Self {
        is_loading: false,
        has_error: false,
    };
    /// Status after a failed load.
    pub const FAILED: Self = Self {
        is_loading: false,
        has_error: true,
    };
}

/// Result reported by an [`ImageFetcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The resource resolved and decoded.
    Loaded,
    /// The resource could not be loaded.
    Failed {
        /// Backend-provided detail for diagnostics.
        detail: String,
    },
}

/// Identifies one load attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Status machine for a single image source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageLoadState {
    src: String,
    status: ImageLoadStatus,
    generation: u64,
}

impl ImageLoadState {
    /// New state for `src`. Starts as loading because the first load runs immediately.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            status: ImageLoadStatus::LOADING,
            generation: 0,
        }
    }

    /// Current image source.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ImageLoadStatus {
        self.status
    }

    /// Enter the loading state and issue a ticket for the new attempt.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.status = ImageLoadStatus::LOADING;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Swap the source and begin loading it.
    pub fn set_src(&mut self, src: impl Into<String>) -> LoadTicket {
        self.src = src.into();
        self.begin()
    }

    /// Settle the attempt identified by `ticket`. Returns `false` for stale tickets,
    /// which leave the status untouched.
    pub fn finish(&mut self, ticket: LoadTicket, outcome: &LoadOutcome) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.status = match outcome {
            LoadOutcome::Loaded => ImageLoadStatus::LOADED,
            LoadOutcome::Failed { .. } => ImageLoadStatus::FAILED,
        };
        true
    }
}

/// Callback invoked once when a fetch settles.
pub type FetchCallback = Box<dyn FnOnce(LoadOutcome)>;

/// Asynchronous image resolution primitive.
pub trait ImageFetcher {
    /// Start resolving `src`; `on_complete` must be called exactly once, possibly
    /// before this method returns.
    fn fetch(&self, src: &str, on_complete: FetchCallback);
}

type StatusObserver = Rc<dyn Fn(ImageLoadStatus)>;

/// Drives an [`ImageLoadState`] through an [`ImageFetcher`].
pub struct ImageLoader<F> {
    state: Rc<RefCell<ImageLoadState>>,
    fetcher: F,
    observer: Option<StatusObserver>,
}

impl<F: ImageFetcher> ImageLoader<F> {
    /// Loader for `src` without starting a load.
    pub fn new(src: impl Into<String>, fetcher: F) -> Self {
        Self {
            state: Rc::new(RefCell::new(ImageLoadState::new(src))),
            fetcher,
            observer: None,
        }
    }

    /// Loader for `src` that immediately runs its first load.
    pub fn start(src: impl Into<String>, fetcher: F) -> Self {
        let loader = Self::new(src, fetcher);
        loader.load();
        loader
    }

    /// Register a callback invoked on every status change.
    #[must_use]
    pub fn with_observer(mut self, observer: impl Fn(ImageLoadStatus) + 'static) -> Self {
        self.observer = Some(Rc::new(observer));
        self
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ImageLoadStatus {
        self.state.borrow().status()
    }

    /// Current source.
    #[must_use]
    pub fn src(&self) -> String {
        self.state.borrow().src().to_string()
    }

    /// Reset to loading and fetch the current source.
    pub fn load(&self) {
        let ticket = self.state.borrow_mut().begin();
        self.dispatch(ticket);
    }

    /// Run [`load`](Self::load) again, typically after a failure.
    pub fn retry(&self) {
        self.load();
    }

    /// Switch to a new source and load it; any in-flight load becomes stale.
    pub fn set_src(&self, src: impl Into<String>) {
        let ticket = self.state.borrow_mut().set_src(src);
        self.dispatch(ticket);
    }

    fn dispatch(&self, ticket: LoadTicket) {
        let src = self.src();
        self.notify(ImageLoadStatus::LOADING);

        let state = Rc::clone(&self.state);
        let observer = self.observer.clone();
        let label = src.clone();
        self.fetcher.fetch(
            &src,
            Box::new(move |outcome| {
                if !state.borrow_mut().finish(ticket, &outcome) {
                    tracing::debug!(src = %label, "ignoring stale image load");
                    return;
                }
                if let LoadOutcome::Failed { detail } = &outcome {
                    tracing::error!(src = %label, detail = %detail, "failed to load image");
                }
                if let Some(observer) = observer {
                    let status = state.borrow().status();
                    observer(status);
                }
            }),
        );
    }

    fn notify(&self, status: ImageLoadStatus) {
        if let Some(observer) = &self.observer {
            observer(status);
        }
    }
}

impl<F> fmt::Debug for ImageLoader<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ImageLoader")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
