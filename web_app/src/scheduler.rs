//! Cancellable repeating tasks on top of browser intervals.

use std::time::Duration;

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;

/// A repeating timer with explicit start/stop and an optional tick limit.
///
/// The interval handle lives in local storage, so the task itself is
/// `Copy` and can be moved into event handlers and async blocks.
#[derive(Clone, Copy)]
pub struct ScheduledTask {
    handle: StoredValue<Option<Interval>, LocalStorage>,
    generation: StoredValue<u64>,
}

impl ScheduledTask {
    pub fn new() -> Self {
        Self {
            handle: StoredValue::new_local(None),
            generation: StoredValue::new(0),
        }
    }

    /// Run `tick` every `period`, passing the 1-based tick number.
    /// Any previous run of this task is stopped first. With `max_ticks`
    /// the task stops itself after that many ticks.
    pub fn start<F>(&self, period: Duration, max_ticks: Option<u32>, mut tick: F)
    where
        F: FnMut(u32) + 'static,
    {
        self.stop();
        let task = *self;
        let generation = self.generation.get_value();
        let mut count: u32 = 0;
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);

        let interval = Interval::new(millis, move || {
            count += 1;
            tick(count);
            if limit_reached(count, max_ticks) {
                // The interval cannot be dropped from inside its own callback.
                spawn_local(async move { task.stop_generation(generation) });
            }
        });
        self.handle.set_value(Some(interval));
    }

    pub fn stop(&self) {
        let _ = self.generation.try_update_value(|g| *g += 1);
        if let Some(Some(interval)) = self.handle.try_update_value(|h| h.take()) {
            interval.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.try_with_value(|h| h.is_some()).unwrap_or(false)
    }

    fn stop_generation(&self, generation: u64) {
        if self.generation.try_get_value() == Some(generation) {
            self.stop();
        }
    }
}

impl Default for ScheduledTask {
    fn default() -> Self {
        Self::new()
    }
}

fn limit_reached(count: u32, max_ticks: Option<u32>) -> bool {
    max_ticks.is_some_and(|max| count >= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_tasks_never_hit_the_limit() {
        assert!(!limit_reached(1_000, None));
        assert!(!limit_reached(9, Some(10)));
        assert!(limit_reached(10, Some(10)));
    }
}
