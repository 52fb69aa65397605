//! The "Copy BibTeX" control
//!
//! A [`CopyControl`] owns the BibTeX payload of one card and the button label.
//! After a successful copy the label reads `Copied!` until a reset fires
//! [`RESET_DELAY`] later. The reset only holds a weak handle: once the card
//! (and with it the control) is dropped, a pending reset does nothing.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::error::ClipboardError;

pub const COPY_LABEL: &str = "Copy BibTeX";
pub const COPIED_LABEL: &str = "Copied!";
pub const RESET_DELAY: Duration = Duration::from_millis(1500);

/// System clipboard seam
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Deferred work on the current thread
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

struct CopyState {
    label: &'static str,
    // Bumped on every successful copy so that only the latest reset applies
    generation: u64,
}

struct CopyInner {
    payload: String,
    state: RefCell<CopyState>,
    observers: RefCell<Vec<Box<dyn Fn(&str)>>>,
}

impl CopyInner {
    fn set_label(&self, label: &'static str) {
        self.state.borrow_mut().label = label;
        for observer in self.observers.borrow().iter() {
            observer(label);
        }
    }
}

/// Handle to one card's copy button; clones share the same button
#[derive(Clone)]
pub struct CopyControl {
    inner: Rc<CopyInner>,
}

/// Non-owning handle, for event listeners that outlive the card
#[derive(Clone)]
pub struct WeakCopyControl {
    inner: Weak<CopyInner>,
}

impl CopyControl {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(CopyInner {
                payload: payload.into(),
                state: RefCell::new(CopyState {
                    label: COPY_LABEL,
                    generation: 0,
                }),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The text written to the clipboard
    pub fn payload(&self) -> &str {
        &self.inner.payload
    }

    /// Current button label
    pub fn label(&self) -> &'static str {
        self.inner.state.borrow().label
    }

    /// Call `observer` with the new label whenever it changes
    pub fn on_label_change(&self, observer: impl Fn(&str) + 'static) {
        self.inner.observers.borrow_mut().push(Box::new(observer));
    }

    pub fn downgrade(&self) -> WeakCopyControl {
        WeakCopyControl {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Copy the payload and show the confirmation label
    ///
    /// A failed write is logged and returned; the label stays as it was.
    pub async fn copy<C, S>(&self, clipboard: &C, scheduler: &S) -> Result<(), ClipboardError>
    where
        C: Clipboard,
        S: Scheduler,
    {
        if let Err(err) = clipboard.write_text(&self.inner.payload).await {
            tracing::error!(error = %err, "Clipboard error");
            return Err(err);
        }

        let generation = {
            let mut state = self.inner.state.borrow_mut();
            state.generation += 1;
            state.generation
        };
        self.inner.set_label(COPIED_LABEL);

        let weak = Rc::downgrade(&self.inner);
        scheduler.schedule(
            RESET_DELAY,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    tracing::debug!("Copy control dropped before label reset");
                    return;
                };
                let current = inner.state.borrow().generation;
                if current == generation {
                    inner.set_label(COPY_LABEL);
                }
            }),
        );

        Ok(())
    }
}

impl WeakCopyControl {
    pub fn upgrade(&self) -> Option<CopyControl> {
        self.inner.upgrade().map(|inner| CopyControl { inner })
    }
}

impl fmt::Debug for CopyControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyControl")
            .field("label", &self.label())
            .field("payload_len", &self.inner.payload.len())
            .finish()
    }
}

/// In-process clipboard for headless rendering and tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: RefCell<Option<String>>,
    deny: Cell<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write, like a browser without permission
    pub fn denied() -> Self {
        let clipboard = Self::default();
        clipboard.deny.set(true);
        clipboard
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.deny.get() {
            return Err(ClipboardError::Rejected("permission denied".to_string()));
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Scheduler driven by hand: tasks run when [`advance`](Self::advance)
/// moves the clock past their deadline
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    pending: RefCell<VecDeque<(Duration, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move the clock forward, running every task that came due in order
    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);

        loop {
            let due = {
                let mut pending = self.pending.borrow_mut();
                let next = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, (deadline, _))| *deadline <= now)
                    .min_by_key(|(_, (deadline, _))| *deadline)
                    .map(|(idx, _)| idx);
                next.and_then(|idx| pending.remove(idx))
            };
            match due {
                Some((_, task)) => task(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let deadline = self.now.get() + delay;
        self.pending.borrow_mut().push_back((deadline, task));
    }
}

/// Tokio timer scheduler; must be used from within a `LocalSet`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

#[cfg(not(target_arch = "wasm32"))]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_writes_payload_and_confirms() {
        let clipboard = MemoryClipboard::new();
        let scheduler = ManualScheduler::new();
        let control = CopyControl::new("@misc{k,\n  title = {T}\n}");

        control.copy(&clipboard, &scheduler).await.unwrap();

        assert_eq!(clipboard.contents().as_deref(), Some(control.payload()));
        assert_eq!(control.label(), COPIED_LABEL);
        assert_eq!(scheduler.pending(), 1);
    }

    #[tokio::test]
    async fn test_label_resets_after_delay() {
        let clipboard = MemoryClipboard::new();
        let scheduler = ManualScheduler::new();
        let control = CopyControl::new("x");

        control.copy(&clipboard, &scheduler).await.unwrap();
        scheduler.advance(Duration::from_millis(1499));
        assert_eq!(control.label(), COPIED_LABEL);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(control.label(), COPY_LABEL);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_label() {
        let clipboard = MemoryClipboard::denied();
        let scheduler = ManualScheduler::new();
        let control = CopyControl::new("x");

        let err = control.copy(&clipboard, &scheduler).await.unwrap_err();

        assert!(matches!(err, ClipboardError::Rejected(_)));
        assert_eq!(control.label(), COPY_LABEL);
        assert_eq!(clipboard.contents(), None);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_second_copy_extends_confirmation() {
        let clipboard = MemoryClipboard::new();
        let scheduler = ManualScheduler::new();
        let control = CopyControl::new("x");

        control.copy(&clipboard, &scheduler).await.unwrap();
        scheduler.advance(Duration::from_millis(1000));
        control.copy(&clipboard, &scheduler).await.unwrap();

        // First reset is stale and must not clear the newer confirmation
        scheduler.advance(Duration::from_millis(600));
        assert_eq!(control.label(), COPIED_LABEL);

        scheduler.advance(Duration::from_millis(900));
        assert_eq!(control.label(), COPY_LABEL);
    }

    #[tokio::test]
    async fn test_reset_after_drop_is_ignored() {
        let clipboard = MemoryClipboard::new();
        let scheduler = ManualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));

        let control = CopyControl::new("x");
        let log = seen.clone();
        control.on_label_change(move |label| log.borrow_mut().push(label.to_string()));
        let weak = control.downgrade();

        control.copy(&clipboard, &scheduler).await.unwrap();
        drop(control);
        assert!(weak.upgrade().is_none());

        scheduler.advance(RESET_DELAY);
        assert_eq!(*seen.borrow(), vec![COPIED_LABEL.to_string()]);
    }

    #[tokio::test]
    async fn test_observers_see_each_change() {
        let clipboard = MemoryClipboard::new();
        let scheduler = ManualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));

        let control = CopyControl::new("x");
        let log = seen.clone();
        control.on_label_change(move |label| log.borrow_mut().push(label.to_string()));

        control.copy(&clipboard, &scheduler).await.unwrap();
        scheduler.advance(RESET_DELAY);

        assert_eq!(
            *seen.borrow(),
            vec![COPIED_LABEL.to_string(), COPY_LABEL.to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_resets_label() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let clipboard = MemoryClipboard::new();
                let control = CopyControl::new("x");

                control.copy(&clipboard, &TokioScheduler).await.unwrap();
                assert_eq!(control.label(), COPIED_LABEL);

                tokio::time::sleep(Duration::from_millis(1600)).await;
                assert_eq!(control.label(), COPY_LABEL);
            })
            .await;
    }
}
