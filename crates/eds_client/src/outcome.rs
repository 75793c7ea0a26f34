use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug)]
struct SlotState<T> {
    generation: u64,
    value: Option<T>,
}

/// A value that disappears on its own after a delay.
///
/// Showing a new value aborts the pending expiry of the previous one; the generation
/// check keeps a late-firing expiry from clearing its successor.
#[derive(Debug)]
pub struct ExpiringSlot<T> {
    state: Arc<Mutex<SlotState<T>>>,
    expiry: Option<JoinHandle<()>>,
}

impl<T> Default for ExpiringSlot<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState {
                generation: 0,
                value: None,
            })),
            expiry: None,
        }
    }
}

impl<T: Clone + Send + 'static> ExpiringSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&mut self, value: T, ttl: Duration) {
        self.cancel_expiry();
        let generation = {
            let mut st = self.state.lock();
            st.generation += 1;
            st.value = Some(value);
            st.generation
        };

        let state = Arc::clone(&self.state);
        self.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut st = state.lock();
            if st.generation == generation {
                st.value = None;
            }
        }));
    }

    pub fn clear(&mut self) {
        self.cancel_expiry();
        let mut st = self.state.lock();
        st.generation += 1;
        st.value = None;
    }

    pub fn current(&self) -> Option<T> {
        self.state.lock().value.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().value.is_some()
    }

    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for ExpiringSlot<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}
