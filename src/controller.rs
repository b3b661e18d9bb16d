//! Infinite paging over month pages.
//!
//! The controller owns the current page and nothing else: pages before and
//! after it are derived on demand. Observers are told about every settled
//! change, synchronously and in subscription order.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::{
    CalendarConfig, CalendarPage, ConfigurationError, DAYS_PER_WEEK, HeaderSize, Orientation,
    PageLayout, WINDOW_SIZE, YearMonth, YearMonthDay, today,
};

/// Everything an observer needs to redraw the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PagingState {
    pub anchor: YearMonth,
    pub column_count: usize,
    /// Week rows of the anchor month for the current week start.
    pub row_count: usize,
    pub orientation: Orientation,
    pub start_with_monday: bool,
    /// Page-turn gestures are ignored while locked.
    pub is_locked: bool,
}

impl PagingState {
    fn new(anchor: YearMonth, orientation: Orientation, start_with_monday: bool) -> Self {
        Self {
            anchor,
            column_count: DAYS_PER_WEEK,
            row_count: anchor.row_count(start_with_monday),
            orientation,
            start_with_monday,
            is_locked: false,
        }
    }

    /// Same settings, different anchor, rows recomputed.
    fn with_anchor(self, anchor: YearMonth) -> Self {
        Self {
            anchor,
            row_count: anchor.row_count(self.start_with_monday),
            ..self
        }
    }
}

/// Direction of a page-turn gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageTurn {
    Backward,
    Forward,
}

impl PageTurn {
    const fn months(self) -> i64 {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }
}

type Observer = Arc<dyn Fn(&PagingState) + Send + Sync>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
}

impl Observers {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

fn lock(observers: &Mutex<Observers>) -> MutexGuard<'_, Observers> {
    // An observer panicking mid-registration leaves the list itself intact
    observers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps an observer attached; dropping it detaches the observer.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    observers: Weak<Mutex<Observers>>,
}

impl Subscription {
    /// Detaches the observer now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };
        // The observer may own other subscriptions, so it must be dropped
        // after the registry is unlocked.
        let removed = {
            let mut observers = lock(&observers);
            let position = observers.entries.iter().position(|(id, _)| *id == self.id);
            position.map(|position| observers.entries.remove(position))
        };
        drop(removed);
        debug!(id = self.id, "observer unsubscribed");
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Source of truth for which month page is shown.
pub struct CalendarController {
    state: PagingState,
    header_size: HeaderSize,
    observers: Arc<Mutex<Observers>>,
}

impl CalendarController {
    /// Builds a controller showing the month of `config.initial_date`, or the
    /// current month.
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn new(config: &CalendarConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let state = PagingState::new(
            config.initial_anchor(),
            config.orientation,
            config.start_with_monday,
        );
        debug!(anchor = %state.anchor, rows = state.row_count, "calendar controller created");
        Ok(Self {
            state,
            header_size: config.header_size,
            observers: Arc::default(),
        })
    }

    /// Controller on `anchor` with default header sizing.
    pub fn with_anchor(
        anchor: YearMonth,
        orientation: Orientation,
        start_with_monday: bool,
    ) -> Self {
        Self {
            state: PagingState::new(anchor, orientation, start_with_monday),
            header_size: HeaderSize::default(),
            observers: Arc::default(),
        }
    }

    pub const fn current_anchor(&self) -> YearMonth {
        self.state.anchor
    }

    pub const fn state(&self) -> PagingState {
        self.state
    }

    pub const fn row_count(&self) -> usize {
        self.state.row_count
    }

    pub const fn orientation(&self) -> Orientation {
        self.state.orientation
    }

    pub const fn header_size(&self) -> HeaderSize {
        self.header_size
    }

    pub const fn is_locked(&self) -> bool {
        self.state.is_locked
    }

    /// Moves `months` pages forward, or backward when negative.
    pub fn advance(&mut self, months: i64) {
        let anchor = self.state.anchor.add_months(months);
        self.apply(self.state.with_anchor(anchor));
    }

    /// Shows the month containing `date`.
    pub fn jump_to(&mut self, date: YearMonthDay) {
        self.jump_to_month(date.year_month());
    }

    /// Shows the month containing `year-month-day`, validating the date first.
    ///
    /// # Errors
    /// Returns `ConfigurationError::Parse` if the components do not form a
    /// valid date; the current page is left unchanged.
    pub fn jump_to_ymd(&mut self, year: i32, month: u8, day: u8) -> Result<(), ConfigurationError> {
        let date = YearMonthDay::new(year, month, day)?;
        self.jump_to(date);
        Ok(())
    }

    pub fn jump_to_month(&mut self, anchor: YearMonth) {
        self.apply(self.state.with_anchor(anchor));
    }

    pub fn jump_to_today(&mut self) {
        self.jump_to(today());
    }

    /// Gesture entry point: turns one page unless the controller is locked.
    /// Returns whether the page turned.
    pub fn turn_page(&mut self, turn: PageTurn) -> bool {
        if self.state.is_locked {
            debug!(?turn, "page turn ignored while locked");
            return false;
        }
        self.advance(turn.months());
        true
    }

    pub fn set_locked(&mut self, is_locked: bool) {
        self.apply(PagingState {
            is_locked,
            ..self.state
        });
    }

    /// Changes the week start; the row count follows.
    pub fn set_start_with_monday(&mut self, start_with_monday: bool) {
        let state = PagingState {
            start_with_monday,
            ..self.state
        };
        self.apply(state.with_anchor(state.anchor));
    }

    /// Registers `observer`, called with the new state after each change.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&PagingState) + Send + Sync + 'static,
    {
        let mut observers = lock(&self.observers);
        let id = observers.next_id;
        observers.next_id += 1;
        observers.entries.push((id, Arc::new(observer)));
        debug!(id, count = observers.entries.len(), "observer subscribed");
        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.observers).entries.len()
    }

    /// The pages kept materialized around the current one.
    pub fn window(&self) -> PageWindow {
        PageWindow::around(self.state.anchor)
    }

    /// Geometry of the current page.
    pub const fn page(&self, layout: PageLayout) -> CalendarPage {
        CalendarPage::new(self.state.anchor, self.state.start_with_monday, layout)
    }

    fn apply(&mut self, state: PagingState) {
        if state == self.state {
            return;
        }
        debug!(
            from = %self.state.anchor,
            to = %state.anchor,
            rows = state.row_count,
            locked = state.is_locked,
            "paging state changed"
        );
        self.state = state;
        self.notify();
    }

    fn notify(&self) {
        // Snapshot so observers may unsubscribe from inside the callback
        let observers: Vec<(u64, Observer)> = lock(&self.observers)
            .entries
            .iter()
            .map(|(id, observer)| (*id, Arc::clone(observer)))
            .collect();
        for (id, observer) in observers {
            // Skip observers detached by an earlier callback of this round
            if !lock(&self.observers).contains(id) {
                continue;
            }
            observer(&self.state);
        }
    }
}

impl Default for CalendarController {
    fn default() -> Self {
        Self::with_anchor(YearMonth::current(), Orientation::default(), false)
    }
}

impl fmt::Debug for CalendarController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarController")
            .field("state", &self.state)
            .field("header_size", &self.header_size)
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// One materialized page of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowPage {
    pub anchor: YearMonth,
    /// Months from the current page: -1, 0 or 1.
    pub offset: i64,
    /// Stable key of the view holding this page. A month keeps its key as the
    /// window slides, so only the page entering the window needs a rebuild.
    pub key: usize,
}

/// Previous, current and next pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    pages: [WindowPage; WINDOW_SIZE],
}

impl PageWindow {
    pub fn around(anchor: YearMonth) -> Self {
        let page = |offset: i64| {
            let anchor = anchor.add_months(offset);
            WindowPage {
                anchor,
                offset,
                // rem_euclid keeps the key in 0..WINDOW_SIZE
                key: anchor.month_index().rem_euclid(WINDOW_SIZE as i64) as usize,
            }
        };
        Self {
            pages: [page(-1), page(0), page(1)],
        }
    }

    pub const fn previous(&self) -> WindowPage {
        self.pages[0]
    }

    pub const fn current(&self) -> WindowPage {
        self.pages[1]
    }

    pub const fn next(&self) -> WindowPage {
        self.pages[2]
    }

    pub const fn pages(&self) -> &[WindowPage; WINDOW_SIZE] {
        &self.pages
    }

    pub fn contains(&self, anchor: YearMonth) -> bool {
        self.pages.iter().any(|page| page.anchor == anchor)
    }

    pub fn key_of(&self, anchor: YearMonth) -> Option<usize> {
        self.pages
            .iter()
            .find(|page| page.anchor == anchor)
            .map(|page| page.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ym(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn ymd(year: i32, month: u8, day: u8) -> YearMonthDay {
        YearMonthDay::new(year, month, day).unwrap()
    }

    fn controller_at(date: &str) -> CalendarController {
        CalendarController::new(&CalendarConfig {
            initial_date: Some(date.parse().unwrap()),
            ..CalendarConfig::default()
        })
        .unwrap()
    }

    fn recorder(controller: &CalendarController) -> (Arc<Mutex<Vec<PagingState>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = controller.subscribe(move |state| sink.lock().unwrap().push(*state));
        (seen, subscription)
    }

    #[test]
    fn test_initial_date_sets_anchor() {
        let controller = controller_at("2023-02-15");
        assert_eq!(controller.current_anchor(), ym(2023, 2));
        assert_eq!(controller.row_count(), 5);
        assert_eq!(controller.state().column_count, 7);
        assert_eq!(controller.orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_default_starts_on_current_month() {
        let controller = CalendarController::default();
        let now = YearMonth::current();
        assert!(
            controller.current_anchor() == now || controller.current_anchor().add_months(1) == now,
            "month rolled over during the test"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CalendarConfig {
            header_size: HeaderSize::FixHeight(-1.0),
            ..CalendarConfig::default()
        };
        assert!(matches!(
            CalendarController::new(&config),
            Err(ConfigurationError::InvalidHeaderHeight(_))
        ));
    }

    #[test]
    fn test_jump_recomputes_rows() {
        let mut controller = controller_at("2023-02-15");
        controller.jump_to(ymd(2024, 12, 25));
        assert_eq!(controller.current_anchor(), ym(2024, 12));
        assert_eq!(controller.row_count(), ym(2024, 12).row_count(false));
        assert_eq!(controller.row_count(), 5);

        controller.set_start_with_monday(true);
        assert_eq!(controller.row_count(), 6);
        assert!(controller.state().start_with_monday);
    }

    #[test]
    fn test_advance_round_trip() {
        let mut controller = controller_at("2015-02-10");
        let before = controller.state();
        assert_eq!(before.row_count, 4);

        controller.advance(1);
        assert_eq!(controller.current_anchor(), ym(2015, 3));
        assert_ne!(controller.row_count(), before.row_count);

        controller.advance(-1);
        assert_eq!(controller.state(), before);
    }

    #[test]
    fn test_advance_across_years() {
        let mut controller = controller_at("2023-11-01");
        controller.advance(14);
        assert_eq!(controller.current_anchor(), ym(2025, 1));
        controller.advance(-25);
        assert_eq!(controller.current_anchor(), ym(2022, 12));
    }

    #[test]
    fn test_observers_see_settled_state() {
        let mut controller = controller_at("2023-02-15");
        let (first, _a) = recorder(&controller);
        let (second, _b) = recorder(&controller);

        controller.advance(1);
        controller.jump_to(ymd(2024, 12, 25));

        let first = first.lock().unwrap().clone();
        let second = second.lock().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].anchor, ym(2023, 3));
        assert_eq!(first[0].row_count, ym(2023, 3).row_count(false));
        assert_eq!(first[1], controller.state());
    }

    #[test]
    fn test_no_notification_without_change() {
        let mut controller = controller_at("2023-02-15");
        let (seen, _sub) = recorder(&controller);
        controller.advance(0);
        controller.jump_to(ymd(2023, 2, 1));
        controller.set_locked(false);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_detaches() {
        let mut controller = controller_at("2023-02-15");
        let (seen, subscription) = recorder(&controller);
        assert_eq!(controller.observer_count(), 1);

        subscription.unsubscribe();
        assert_eq!(controller.observer_count(), 0);
        controller.advance(1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subscription_outlives_controller() {
        let controller = controller_at("2023-02-15");
        let (_seen, subscription) = recorder(&controller);
        drop(controller);
        drop(subscription);
    }

    #[test]
    fn test_observer_may_unsubscribe_during_notification() {
        let mut controller = controller_at("2023-02-15");
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let counter = Arc::clone(&calls);
        let own = Arc::clone(&slot);
        let subscription = controller.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            own.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(subscription);

        controller.advance(1);
        controller.advance(1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.observer_count(), 0);
    }

    #[test]
    fn test_observer_detached_by_earlier_observer_is_skipped() {
        let mut controller = controller_at("2023-02-15");
        let later_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&later_slot);
        let _first = controller.subscribe(move |_| {
            slot.lock().unwrap().take();
        });
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);
        let later = controller.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        *later_slot.lock().unwrap() = Some(later);

        controller.advance(1);
        assert_eq!(controller.observer_count(), 1);
        assert_eq!(
            later_calls.load(Ordering::SeqCst),
            0,
            "detached observer must not run in the same round"
        );
    }

    #[test]
    fn test_dropping_observer_that_owns_a_subscription() {
        let controller = controller_at("2023-02-15");
        let inner = controller.subscribe(|_| {});
        let outer = controller.subscribe(move |_| {
            let _held = &inner;
        });
        assert_eq!(controller.observer_count(), 2);

        let (done, finished) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            drop(outer);
            done.send(()).unwrap();
        });
        finished
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("dropping a subscription whose observer owns another one must not block");
        assert_eq!(controller.observer_count(), 0);
    }

    #[test]
    fn test_jump_to_ymd_validates() {
        let mut controller = controller_at("2023-02-15");
        controller.jump_to_ymd(2024, 2, 29).unwrap();
        assert_eq!(controller.current_anchor(), ym(2024, 2));

        let err = controller.jump_to_ymd(2023, 2, 29).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::Parse(crate::ParseError::InvalidDay { day: 29, .. })
        ));
        assert!(matches!(
            controller.jump_to_ymd(2023, 13, 1),
            Err(ConfigurationError::Parse(crate::ParseError::InvalidMonth(13)))
        ));
        assert_eq!(controller.current_anchor(), ym(2024, 2));
    }

    #[test]
    fn test_lock_blocks_gestures_only() {
        let mut controller = controller_at("2023-02-15");
        assert!(controller.turn_page(PageTurn::Forward));
        assert_eq!(controller.current_anchor(), ym(2023, 3));

        controller.set_locked(true);
        assert!(controller.is_locked());
        assert!(!controller.turn_page(PageTurn::Backward));
        assert_eq!(controller.current_anchor(), ym(2023, 3));

        controller.advance(-1);
        assert_eq!(controller.current_anchor(), ym(2023, 2));
    }

    #[test]
    fn test_window_slides_with_stable_keys() {
        let mut controller = controller_at("2023-12-15");
        let before = controller.window();
        assert_eq!(before.previous().anchor, ym(2023, 11));
        assert_eq!(before.current().anchor, ym(2023, 12));
        assert_eq!(before.next().anchor, ym(2024, 1));

        let mut keys: Vec<usize> = before.pages().iter().map(|p| p.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![0, 1, 2]);

        controller.advance(1);
        let after = controller.window();
        assert!(!after.contains(ym(2023, 11)));
        assert_eq!(after.key_of(ym(2023, 12)), before.key_of(ym(2023, 12)));
        assert_eq!(after.key_of(ym(2024, 1)), before.key_of(ym(2024, 1)));
        assert_eq!(after.next().key, before.previous().key);
    }

    #[test]
    fn test_page_follows_controller() {
        let mut controller = controller_at("2023-02-15");
        let layout = PageLayout::with_headers(controller.header_size());
        assert_eq!(controller.page(layout).anchor(), ym(2023, 2));
        controller.advance(-2);
        let page = controller.page(layout);
        assert_eq!(page.anchor(), ym(2022, 12));
        assert_eq!(page.row_count(), controller.row_count());
    }
}
