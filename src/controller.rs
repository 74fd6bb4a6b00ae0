//! Per-window visibility enforcement and monitor-crossing detection.
//!
//! The host forwards its window lifecycle events to a
//! [`VisibilityController`] and passes the window in on every call. All
//! methods must run on the thread that owns the window. Display-change
//! notifications arriving on other threads are only queued; the host drains
//! them with [`VisibilityController::process_display_changes`].
//!
//! # Example
//!
//! ```no_run
//! use screenkeep::{MonitorEnumerator, VisibilityController, WindowRect};
//! use screenkeep::notify::system_notifier;
//!
//! # fn main() -> screenkeep::Result<()> {
//! let mut window = WindowRect::new(-4000.0, 200.0, 800.0, 600.0);
//! let mut controller = VisibilityController::new(MonitorEnumerator::system(), system_notifier());
//!
//! controller.attach();
//! controller.on_shown(&mut window)?;
//!
//! // In the host's event loop:
//! controller.on_moved(&mut window);
//! controller.process_display_changes(&mut window);
//!
//! controller.on_closed()?;
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::display::{MonitorHandle, Point};
use crate::error::Result;
use crate::geometry::{self, WindowRect};
use crate::monitor::MonitorEnumerator;
use crate::notify::{DisplayChangeNotifier, SubscriptionToken};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

/// The window a controller positions.
pub trait WindowHost {
    /// Current logical rectangle.
    fn rect(&self) -> WindowRect;

    /// Apply a new logical rectangle.
    fn set_rect(&mut self, rect: WindowRect);

    /// Window centre in physical screen coordinates.
    ///
    /// The default truncates the logical centre, which is only right at
    /// scale 1.0. Hosts that can map client points to the screen should
    /// override it.
    fn screen_center(&self) -> Point {
        geometry::center_point(&self.rect())
    }
}

impl WindowHost for WindowRect {
    fn rect(&self) -> WindowRect {
        *self
    }

    fn set_rect(&mut self, rect: WindowRect) {
        *self = rect;
    }
}

/// Trait for handling monitor-crossing events.
pub trait MonitorChangeHandler {
    /// Called when the window centre moves onto a different monitor.
    fn monitor_changed(&self, monitor: MonitorHandle);
}

impl<F> MonitorChangeHandler for F
where
    F: Fn(MonitorHandle),
{
    fn monitor_changed(&self, monitor: MonitorHandle) {
        self(monitor);
    }
}

/// Keeps one window on screen.
pub struct VisibilityController {
    enumerator: MonitorEnumerator,
    notifier: Arc<dyn DisplayChangeNotifier>,
    attached: bool,
    last_monitor: Option<MonitorHandle>,
    subscription: Option<SubscriptionToken>,
    pending_tx: Sender<()>,
    pending_rx: Receiver<()>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
    handlers: Vec<Box<dyn MonitorChangeHandler>>,
}

impl VisibilityController {
    /// Create a detached controller. Call [`attach`](Self::attach) before
    /// forwarding lifecycle events.
    pub fn new(enumerator: MonitorEnumerator, notifier: Arc<dyn DisplayChangeNotifier>) -> Self {
        let (pending_tx, pending_rx) = mpsc::channel();
        Self {
            enumerator,
            notifier,
            attached: false,
            last_monitor: None,
            subscription: None,
            pending_tx,
            pending_rx,
            waker: None,
            handlers: Vec::new(),
        }
    }

    /// Replace the configuration used for both enumeration and placement.
    pub fn with_config(mut self, config: Config) -> Self {
        self.enumerator.set_config(config);
        self
    }

    /// The configuration shared with the enumerator.
    pub fn config(&self) -> &Config {
        self.enumerator.config()
    }

    /// The enumerator snapshots are taken from.
    pub fn enumerator(&self) -> &MonitorEnumerator {
        &self.enumerator
    }

    /// Called from the notification thread after a change has been queued,
    /// typically to post a message that wakes the host's event loop.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Register a handler for monitor-crossing events.
    pub fn on_monitor_changed(&mut self, handler: impl MonitorChangeHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Start reacting to lifecycle events.
    pub fn attach(&mut self) {
        if self.attached {
            log::debug!("controller already attached");
        }
        self.attached = true;
    }

    /// Stop reacting to lifecycle events and drop the display-change
    /// subscription.
    pub fn detach(&mut self) -> Result<()> {
        self.attached = false;
        self.last_monitor = None;
        let result = self.unsubscribe();
        while self.pending_rx.try_recv().is_ok() {}
        result
    }

    /// Whether lifecycle events are being handled.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a display-change subscription is live.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Monitor the window was last seen on.
    pub fn last_monitor(&self) -> Option<MonitorHandle> {
        self.last_monitor
    }

    /// The window became visible: enforce visibility once, then follow
    /// display-configuration changes.
    pub fn on_shown<W: WindowHost>(&mut self, window: &mut W) -> Result<()> {
        if !self.attached {
            return Ok(());
        }
        self.enforce(window)?;

        if self.subscription.is_none() {
            let sender = self.pending_tx.clone();
            let waker = self.waker.clone();
            let token = self.notifier.subscribe(Box::new(move || {
                if sender.send(()).is_ok() {
                    if let Some(waker) = &waker {
                        waker();
                    }
                }
            }))?;
            log::debug!("subscribed to display changes as {token}");
            self.subscription = Some(token);
        }
        Ok(())
    }

    /// The window closed: drop the display-change subscription.
    pub fn on_closed(&mut self) -> Result<()> {
        self.unsubscribe()
    }

    /// Drain queued display changes and enforce visibility once.
    ///
    /// Every enforcement takes a fresh snapshot, so one pass covers any
    /// number of queued notifications. Returns how many were drained. An
    /// enumeration failure is logged.
    pub fn process_display_changes<W: WindowHost>(&mut self, window: &mut W) -> usize {
        let pending = self.pending_rx.try_iter().count();
        if !self.attached || pending == 0 {
            return 0;
        }
        if let Err(e) = self.enforce(window) {
            log::error!("could not re-check window after display change: {}", e);
        }
        pending
    }

    /// The window moved. Returns `true` if it crossed onto another monitor.
    pub fn on_moved<W: WindowHost>(&mut self, window: &mut W) -> bool {
        if !self.attached {
            return false;
        }
        let displays = self.enumerator.display_system();
        let Some(current) = displays.monitor_at(window.screen_center()) else {
            log::debug!("no monitor under window centre, skipping");
            return false;
        };
        if self.last_monitor == Some(current) {
            return false;
        }

        self.last_monitor = Some(current);
        log::info!("window moved to monitor {current}");
        for handler in &self.handlers {
            handler.monitor_changed(current);
        }
        self.clamp_to(window, current);
        true
    }

    /// The window was resized: clamp it to the monitor under its centre.
    pub fn on_resized<W: WindowHost>(&mut self, window: &mut W) {
        if !self.attached {
            return;
        }
        match self
            .enumerator
            .display_system()
            .monitor_at(window.screen_center())
        {
            Some(current) => self.clamp_to(window, current),
            None => log::debug!("no monitor under window centre, skipping"),
        }
    }

    /// Take a fresh snapshot and reposition the window.
    pub fn enforce<W: WindowHost>(&self, window: &mut W) -> Result<WindowRect> {
        let monitors = self.enumerator.enumerate()?;
        let current = window.rect();
        let next = geometry::ensure_visible_with(&current, &monitors, self.config().edge_margin);
        if next != current {
            window.set_rect(next);
        }
        Ok(next)
    }

    fn clamp_to<W: WindowHost>(&self, window: &mut W, monitor: MonitorHandle) {
        let Some(work_area) = self.enumerator.display_system().work_area_of(monitor) else {
            log::debug!("monitor {monitor} has no work area, skipping");
            return;
        };
        let current = window.rect();
        let next = geometry::clamp_to_work_area(&current, &work_area);
        if next != current {
            window.set_rect(next);
        }
    }

    fn unsubscribe(&mut self) -> Result<()> {
        match self.subscription.take() {
            Some(token) => {
                log::debug!("unsubscribing display changes {token}");
                self.notifier.unsubscribe(token)
            }
            None => Ok(()),
        }
    }
}

impl Drop for VisibilityController {
    fn drop(&mut self) {
        if let Err(e) = self.unsubscribe() {
            log::warn!("failed to unsubscribe on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Rect;
    use crate::notify::DisplayChangeHub;
    use crate::testing::{FakeDisplaySystem, FakeMetadataSource};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LEFT: Rect = Rect::new(0, 0, 1920, 1080);
    const RIGHT: Rect = Rect::new(1920, 0, 1920, 1080);
    const RIGHT_WORK: Rect = Rect::new(1920, 0, 1920, 1040);

    fn dual() -> FakeDisplaySystem {
        FakeDisplaySystem::new()
            .with_monitor(LEFT, true)
            .with_work_area(RIGHT, RIGHT_WORK, false, Some(crate::Dpi::default()))
    }

    fn setup(
        fake: FakeDisplaySystem,
    ) -> (VisibilityController, Arc<FakeDisplaySystem>, Arc<DisplayChangeHub>) {
        let fake = Arc::new(fake);
        let hub = Arc::new(DisplayChangeHub::new());
        let enumerator =
            MonitorEnumerator::new(fake.clone(), Arc::new(FakeMetadataSource::empty()));
        let controller = VisibilityController::new(enumerator, hub.clone());
        (controller, fake, hub)
    }

    #[test]
    fn test_detached_controller_ignores_events() {
        let (mut controller, fake, hub) = setup(dual());
        let mut window = WindowRect::new(-5000.0, 0.0, 800.0, 600.0);

        controller.on_shown(&mut window).unwrap();
        assert!(!controller.on_moved(&mut window));
        controller.on_resized(&mut window);

        assert_eq!(window, WindowRect::new(-5000.0, 0.0, 800.0, 600.0));
        assert_eq!(hub.subscriber_count(), 0);
        assert!(fake.work_area_lookups().is_empty());
    }

    #[test]
    fn test_shown_enforces_and_subscribes() {
        let (mut controller, _fake, hub) = setup(dual());
        let mut window = WindowRect::new(-5000.0, 0.0, 800.0, 600.0);

        controller.attach();
        controller.on_shown(&mut window).unwrap();

        assert_eq!(window, WindowRect::new(560.0, 240.0, 800.0, 600.0));
        assert!(controller.is_subscribed());
        assert_eq!(hub.subscriber_count(), 1);

        // A second show does not stack subscriptions.
        controller.on_shown(&mut window).unwrap();
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn test_display_change_is_marshalled_to_owner() {
        let (mut controller, fake, hub) = setup(dual());
        let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        controller.attach();
        controller.on_shown(&mut window).unwrap();

        // Topology change: the window is now far off the only monitor.
        fake.replace_with(FakeDisplaySystem::new().with_monitor(Rect::new(0, 0, 1280, 720), true));
        window = WindowRect::new(3000.0, 100.0, 800.0, 600.0);

        let notifier_hub = hub.clone();
        std::thread::spawn(move || notifier_hub.notify()).join().unwrap();

        // Nothing happens until the owner drains the queue.
        assert_eq!(window.left, 3000.0);
        assert_eq!(controller.process_display_changes(&mut window), 1);
        assert_eq!(window, WindowRect::new(240.0, 60.0, 800.0, 600.0));
        assert_eq!(controller.process_display_changes(&mut window), 0);
    }

    #[test]
    fn test_waker_runs_on_notification() {
        let woken = Arc::new(AtomicUsize::new(0));
        let counter = woken.clone();
        let (controller, _fake, hub) = setup(dual());
        let mut controller = controller.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        controller.attach();
        controller.on_shown(&mut window).unwrap();

        hub.notify();
        hub.notify();
        assert_eq!(woken.load(Ordering::SeqCst), 2);
        assert_eq!(controller.process_display_changes(&mut window), 2);
    }

    #[test]
    fn test_close_unsubscribes_the_registered_token() {
        let (mut controller, _fake, hub) = setup(dual());
        let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        controller.attach();
        controller.on_shown(&mut window).unwrap();
        assert_eq!(hub.subscriber_count(), 1);

        controller.on_closed().unwrap();
        assert_eq!(hub.subscriber_count(), 0);
        assert!(!controller.is_subscribed());

        hub.notify();
        assert_eq!(controller.process_display_changes(&mut window), 0);
        // Closing twice is a no-op.
        controller.on_closed().unwrap();
    }

    #[test]
    fn test_detach_stops_notifications() {
        let (mut controller, _fake, hub) = setup(dual());
        let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        controller.attach();
        controller.on_shown(&mut window).unwrap();

        controller.detach().unwrap();
        assert!(!controller.is_attached());
        assert_eq!(hub.subscriber_count(), 0);
        hub.notify();
        assert_eq!(controller.process_display_changes(&mut window), 0);
    }

    #[test]
    fn test_independent_subscriptions_per_window() {
        let fake = Arc::new(dual());
        let hub = Arc::new(DisplayChangeHub::new());
        let controller = |fake: &Arc<FakeDisplaySystem>| {
            let enumerator =
                MonitorEnumerator::new(fake.clone(), Arc::new(FakeMetadataSource::empty()));
            VisibilityController::new(enumerator, hub.clone())
        };
        let mut first = controller(&fake);
        let mut second = controller(&fake);
        let mut window_a = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        let mut window_b = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        first.attach();
        second.attach();
        first.on_shown(&mut window_a).unwrap();
        second.on_shown(&mut window_b).unwrap();
        assert_eq!(hub.subscriber_count(), 2);

        first.on_closed().unwrap();
        assert_eq!(hub.subscriber_count(), 1);
        drop(second);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_monitor_crossing_signals_once_and_clamps_to_new_monitor() {
        let (mut controller, fake, _hub) = setup(dual());
        let seen: Rc<RefCell<Vec<MonitorHandle>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        controller.on_monitor_changed(move |handle: MonitorHandle| sink.borrow_mut().push(handle));
        controller.attach();

        let mut window = WindowRect::new(400.0, 200.0, 800.0, 600.0);
        assert!(controller.on_moved(&mut window));
        assert_eq!(controller.last_monitor(), Some(MonitorHandle(1)));

        // Still on the left monitor: no signal.
        window = WindowRect::new(500.0, 200.0, 800.0, 600.0);
        assert!(!controller.on_moved(&mut window));

        // Centre crosses onto the right monitor, bottom overhangs its work area.
        window = WindowRect::new(1700.0, 600.0, 800.0, 600.0);
        let lookups_before = fake.work_area_lookups().len();
        assert!(controller.on_moved(&mut window));
        assert_eq!(controller.last_monitor(), Some(MonitorHandle(2)));
        assert_eq!(window, WindowRect::new(1920.0, 440.0, 800.0, 600.0));

        let lookups = fake.work_area_lookups();
        assert_eq!(&lookups[lookups_before..], &[MonitorHandle(2)]);
        assert_eq!(*seen.borrow(), vec![MonitorHandle(1), MonitorHandle(2)]);

        // Settling on the right monitor does not signal again.
        assert!(!controller.on_moved(&mut window));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_lookup_miss_skips_the_cycle() {
        let (mut controller, fake, _hub) = setup(dual());
        controller.attach();
        let mut window = WindowRect::new(-5000.0, -5000.0, 800.0, 600.0);

        assert!(!controller.on_moved(&mut window));
        controller.on_resized(&mut window);
        assert_eq!(window, WindowRect::new(-5000.0, -5000.0, 800.0, 600.0));
        assert_eq!(controller.last_monitor(), None);
        assert!(fake.work_area_lookups().is_empty());
    }

    #[test]
    fn test_resize_clamps_without_crossing() {
        let (mut controller, _fake, _hub) = setup(dual());
        controller.attach();
        let mut window = WindowRect::new(2000.0, 100.0, 800.0, 600.0);
        assert!(controller.on_moved(&mut window));

        // Grown past the bottom of the right monitor's work area.
        window.height = 1000.0;
        window.top = 300.0;
        controller.on_resized(&mut window);
        assert_eq!(window.top, 40.0);
        assert_eq!(controller.last_monitor(), Some(MonitorHandle(2)));
    }

    #[test]
    fn test_queued_changes_enforce_once() {
        let fake = Arc::new(dual());
        let hub = Arc::new(DisplayChangeHub::new());
        let metadata = Arc::new(FakeMetadataSource::empty());
        let enumerator = MonitorEnumerator::new(fake, metadata.clone());
        let mut controller = VisibilityController::new(enumerator, hub.clone());
        let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        controller.attach();
        controller.on_shown(&mut window).unwrap();
        let queries = metadata.query_count();

        hub.notify();
        hub.notify();
        hub.notify();
        assert_eq!(controller.process_display_changes(&mut window), 3);
        assert_eq!(metadata.query_count(), queries + 1);
    }

    #[test]
    fn test_config_reaches_enumeration_and_placement() {
        let (controller, _fake, _hub) = setup(
            FakeDisplaySystem::new().with_monitor_dpi(Rect::new(0, 0, 1920, 1080), true, None),
        );
        let config = Config::new()
            .with_edge_margin(0.0)
            .with_fallback_dpi(crate::Dpi::new(192, 192))
            .with_unknown_label("n/a");
        let mut controller = controller.with_config(config.clone());
        assert_eq!(controller.config(), &config);

        let monitors = controller.enumerator().enumerate().unwrap();
        assert_eq!(monitors[0].dpi, crate::Dpi::new(192, 192));
        assert_eq!(monitors[0].model, "n/a");

        controller.attach();
        let mut window = WindowRect::new(-5000.0, 0.0, 400.0, 300.0);
        controller.on_shown(&mut window).unwrap();
        assert_eq!((window.left, window.top), (280.0, 120.0));
    }

    #[test]
    fn test_metadata_failure_surfaces_on_show() {
        let fake = Arc::new(dual());
        let hub = Arc::new(DisplayChangeHub::new());
        let enumerator = MonitorEnumerator::new(fake, Arc::new(FakeMetadataSource::failing()));
        let mut controller = VisibilityController::new(enumerator, hub.clone());
        controller.attach();

        let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
        assert!(controller.on_shown(&mut window).is_err());
        assert_eq!(hub.subscriber_count(), 0);
    }
}
