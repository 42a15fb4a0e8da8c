//! Process-scoped insets service: single-flight initialization, cached insets, and fan-out.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::{Rc, Weak},
};

use futures::{
    channel::oneshot,
    future::{LocalBoxFuture, Shared},
    FutureExt,
};
use serde_json::Value;

use crate::{
    bridge::{BridgeEvent, PlatformBridge, SET_LISTENER_METHOD, SET_MASK_METHOD},
    listeners::{notify_listeners, ListenerRegistry},
    InsetSnapshot, InsetTypeMask, InsetsConfig, InsetsError, InsetsListener, ReadinessSignal,
};

/// Shared initialization outcome; every clone resolves to the same result.
pub type InitializeFuture = Shared<LocalBoxFuture<'static, Result<(), InsetsError>>>;

/// Coarse initialization progress for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializationPhase {
    /// `initialize` has not been called.
    NotStarted,
    /// Waiting for the first inset event.
    InProgress,
    /// Resolved, successfully or with the subscription failure.
    Completed,
}

enum InitializationState {
    NotStarted,
    InProgress(InitializeFuture),
    Completed(InitializeFuture),
}

impl InitializationState {
    fn phase(&self) -> InitializationPhase {
        match self {
            Self::NotStarted => InitializationPhase::NotStarted,
            Self::InProgress(_) => InitializationPhase::InProgress,
            Self::Completed(_) => InitializationPhase::Completed,
        }
    }
}

struct ServiceInner {
    bridge: Rc<dyn PlatformBridge>,
    config: InsetsConfig,
    insets: Cell<InsetSnapshot>,
    listeners: RefCell<ListenerRegistry>,
    init_state: RefCell<InitializationState>,
    init_sender: RefCell<Option<oneshot::Sender<Result<(), InsetsError>>>>,
    pending_events: RefCell<VecDeque<InsetSnapshot>>,
    delivering: Cell<bool>,
}

impl ServiceInner {
    fn complete_initialization(&self, result: Result<(), InsetsError>) {
        let Some(sender) = self.init_sender.borrow_mut().take() else {
            if let Err(err) = result {
                tracing::warn!("insets subscription failed after initialization: {err}");
            }
            return;
        };
        self.listeners.borrow_mut().remove_once_entries();
        {
            let mut state = self.init_state.borrow_mut();
            if let InitializationState::InProgress(pending) = &*state {
                *state = InitializationState::Completed(pending.clone());
            }
        }
        match &result {
            Ok(()) => tracing::debug!("insets initialization completed"),
            Err(err) => tracing::warn!("insets initialization failed: {err}"),
        }
        let _ = sender.send(result);
    }

    fn handle_bridge_event(&self, event: BridgeEvent) {
        match event {
            Ok(payload) => match InsetSnapshot::from_payload(payload) {
                Ok(insets) => self.deliver(insets),
                Err(err) => tracing::warn!("dropping undecodable insets event: {err}"),
            },
            Err(reason) => self.complete_initialization(Err(InsetsError::Bridge(reason))),
        }
    }

    fn deliver(&self, insets: InsetSnapshot) {
        self.pending_events.borrow_mut().push_back(insets);
        // A delivery arriving from inside a listener is queued behind the running pass.
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.pending_events.borrow_mut().pop_front();
            let Some(insets) = next else {
                break;
            };
            self.insets.set(insets);
            notify_listeners(&self.listeners, &insets);
        }
        self.delivering.set(false);
    }
}

/// Display-insets service shared by application code.
///
/// Cloning yields another handle to the same service. The service caches the latest insets,
/// fans native inset events out to registered listeners, and guards bridge subscription behind
/// an idempotent [`InsetsService::initialize`].
#[derive(Clone)]
pub struct InsetsService {
    inner: Rc<ServiceInner>,
}

impl std::fmt::Debug for InsetsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsetsService")
            .field("config", &self.inner.config)
            .field("insets", &self.inner.insets.get())
            .field("listeners", &self.listener_count())
            .field("phase", &self.initialization_phase())
            .finish()
    }
}

impl InsetsService {
    /// Creates a service over `bridge` with the default native service name.
    pub fn new(bridge: Rc<dyn PlatformBridge>) -> Self {
        Self::with_config(bridge, InsetsConfig::default())
    }

    /// Creates a service over `bridge` using `config` for bridge naming.
    pub fn with_config(bridge: Rc<dyn PlatformBridge>, config: InsetsConfig) -> Self {
        Self {
            inner: Rc::new(ServiceInner {
                bridge,
                config,
                insets: Cell::new(InsetSnapshot::ZERO),
                listeners: RefCell::new(ListenerRegistry::default()),
                init_state: RefCell::new(InitializationState::NotStarted),
                init_sender: RefCell::new(None),
                pending_events: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
            }),
        }
    }

    /// Returns the configuration the service was built with.
    pub fn config(&self) -> &InsetsConfig {
        &self.inner.config
    }

    /// Starts the native inset subscription once and returns the shared initialization result.
    ///
    /// Every call after the first returns a clone of the same result without touching the
    /// bridge. All side effects happen during this call, so the returned future does not need to
    /// be polled for initialization to proceed. The result resolves with the first inset event,
    /// immediately on hosts without live insets, or with the subscription failure. It stays
    /// pending for as long as the native layer stays silent.
    pub fn initialize(&self) -> InitializeFuture {
        let (sender, pending) = {
            let mut state = self.inner.init_state.borrow_mut();
            match &*state {
                InitializationState::InProgress(pending)
                | InitializationState::Completed(pending) => return pending.clone(),
                InitializationState::NotStarted => {}
            }
            let (sender, receiver) = oneshot::channel();
            let pending: InitializeFuture = receiver
                .map(|outcome| outcome.unwrap_or(Err(InsetsError::Cancelled)))
                .boxed_local()
                .shared();
            *state = InitializationState::InProgress(pending.clone());
            (sender, pending)
        };
        *self.inner.init_sender.borrow_mut() = Some(sender);

        if !self.inner.bridge.supports_live_insets() {
            tracing::debug!("host has no live insets; initialization is a no-op");
            self.inner.complete_initialization(Ok(()));
            return pending;
        }

        let weak = Rc::downgrade(&self.inner);
        self.inner
            .listeners
            .borrow_mut()
            .add_once(InsetsListener::from_fn(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.complete_initialization(Ok(()));
                }
            }));

        let weak: Weak<ServiceInner> = Rc::downgrade(&self.inner);
        tracing::debug!(
            service = %self.inner.config.service_name,
            "subscribing to native inset changes"
        );
        self.inner.bridge.subscribe(
            &self.inner.config.service_name,
            SET_LISTENER_METHOD,
            Vec::new(),
            Rc::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_bridge_event(event);
                }
            }),
        );
        pending
    }

    /// Returns the current initialization phase.
    pub fn initialization_phase(&self) -> InitializationPhase {
        self.inner.init_state.borrow().phase()
    }

    /// Wires [`InsetsService::initialize`] to the host readiness signal.
    ///
    /// Calling `initialize` directly before or after the signal fires stays safe.
    pub fn install(&self, signal: &ReadinessSignal) {
        let service = self.clone();
        signal.on_ready(move || {
            let _ = service.initialize();
        });
    }

    /// Applies an inset mask and returns the resulting insets.
    ///
    /// On hosts without live insets this answers with the cached snapshot and leaves the bridge
    /// alone. A successful answer replaces the cached snapshot but does not notify listeners.
    /// Calls made before initialization completes are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`InsetsError::Bridge`] with the native reason when the bridge rejects, or
    /// [`InsetsError::InvalidPayload`] when it answers with something other than inset data. The
    /// cached snapshot is unchanged on failure.
    pub async fn set_mask(&self, mask: InsetTypeMask) -> Result<InsetSnapshot, InsetsError> {
        if !self.inner.bridge.supports_live_insets() {
            return Ok(self.insets());
        }
        let bridge = Rc::clone(&self.inner.bridge);
        let payload = bridge
            .invoke(
                &self.inner.config.service_name,
                SET_MASK_METHOD,
                vec![Value::from(mask.bits())],
            )
            .await
            .map_err(InsetsError::Bridge)?;
        let insets = InsetSnapshot::from_payload(payload).map_err(InsetsError::InvalidPayload)?;
        self.inner.insets.set(insets);
        Ok(insets)
    }

    /// Appends `listener`; registering the same handle twice delivers twice per event.
    pub fn add_listener(&self, listener: InsetsListener) {
        self.inner.listeners.borrow_mut().add(listener);
    }

    /// Removes the first registration of `listener`; unknown listeners are ignored.
    pub fn remove_listener(&self, listener: &InsetsListener) {
        self.inner.listeners.borrow_mut().remove(listener);
    }

    /// Number of active registrations, including the pending initialization listener.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Returns the most recently observed insets.
    pub fn insets(&self) -> InsetSnapshot {
        self.inner.insets.get()
    }
}
