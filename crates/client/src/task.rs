//! Cancellable background tasks and timers.
//!
//! Native builds run on tokio; the browser build uses `spawn_local` and
//! `gloo-timers`. Either way a spawned task is wrapped in an
//! [`Abortable`] so the returned [`TaskHandle`] can stop it.

use std::future::Future;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable};

/// Handle to a spawned repeating task. Cancelling (or dropping) the handle
/// stops the task at its next await point.
#[derive(Debug)]
pub struct TaskHandle {
    abort: AbortHandle,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::TimeoutFuture::new(duration.as_millis() as u32).await;
}

/// Call `tick` every `period`. The first call happens one full period after
/// spawning. A tick is awaited before the next one is scheduled.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_interval<F, Fut>(period: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let (abort, registration) = AbortHandle::new_pair();
    let task = async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if !tick().await {
                break;
            }
        }
    };
    tokio::spawn(Abortable::new(task, registration));
    TaskHandle { abort }
}

/// Call `tick` every `period`. The first call happens one full period after
/// spawning. A tick is awaited before the next one is scheduled.
#[cfg(target_arch = "wasm32")]
pub fn spawn_interval<F, Fut>(period: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = bool> + 'static,
{
    let (abort, registration) = AbortHandle::new_pair();
    let task = async move {
        loop {
            sleep(period).await;
            if !tick().await {
                break;
            }
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        let _ = Abortable::new(task, registration).await;
    });
    TaskHandle { abort }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(period: Duration) -> (TaskHandle, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handle = spawn_interval(period, move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                true
            }
        });
        (handle, count)
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let (_handle, count) = counting(Duration::from_secs(3));
        sleep(Duration::from_millis(2900)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (handle, count) = counting(Duration::from_secs(1));
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        handle.cancel();
        assert!(handle.is_cancelled());
        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let (handle, count) = counting(Duration::from_secs(1));
        drop(handle);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_returning_false_ends_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _handle = spawn_interval(Duration::from_secs(1), move || {
            let c = c.clone();
            async move { c.fetch_add(1, Ordering::SeqCst) < 1 }
        });
        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
