//! Trailing-edge debouncer on the tokio timer.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Collapses bursts of calls into one delayed call with the latest argument.
///
/// Must be used from within a tokio runtime.
pub struct Debounce<T> {
    f: Arc<dyn Fn(T) + Send + Sync>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

/// Wrap `f` so that it runs `delay` after the last [`Debounce::call`].
///
/// ```no_run
/// # async fn demo() {
/// use mokia_cli::dev::debounce;
/// use std::time::Duration;
///
/// let mut reload = debounce(|path: String| println!("reload {path}"), Duration::from_millis(500));
/// reload.call("a.toml".to_string());
/// reload.call("b.toml".to_string()); // only this one runs
/// # }
/// ```
pub fn debounce<T, F>(f: F, delay: Duration) -> Debounce<T>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    Debounce {
        f: Arc::new(f),
        delay,
        pending: None,
    }
}

impl<T: Send + 'static> Debounce<T> {
    /// Cancel any scheduled call and schedule `f(arg)` after the delay.
    pub fn call(&mut self, arg: T) {
        self.cancel();

        let f = self.f.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f(arg);
        }));
    }

    /// Drop the scheduled call, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Whether a call is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }
}

impl<T> Drop for Debounce<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |n| sink.lock().push(n))
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_argument() {
        let (calls, f) = recorder();
        let mut trigger = debounce(f, Duration::from_millis(500));

        trigger.call(1);
        sleep(Duration::from_millis(100)).await;
        trigger.call(2);
        sleep(Duration::from_millis(100)).await;
        trigger.call(3);
        assert!(trigger.is_pending());

        sleep(Duration::from_millis(499)).await;
        assert!(calls.lock().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock(), vec![3]);
        assert!(!trigger.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_separated_by_quiet_period_both_fire() {
        let (calls, f) = recorder();
        let mut trigger = debounce(f, Duration::from_millis(50));

        trigger.call(1);
        sleep(Duration::from_millis(60)).await;
        trigger.call(2);
        sleep(Duration::from_millis(60)).await;

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop() {
        let (calls, f) = recorder();
        let mut trigger = debounce(f, Duration::from_millis(50));

        trigger.call(1);
        trigger.cancel();
        assert!(!trigger.is_pending());

        trigger.call(2);
        drop(trigger);

        sleep(Duration::from_millis(100)).await;
        assert!(calls.lock().is_empty());
    }
}
