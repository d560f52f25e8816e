use std::time::Duration;
use std::thread;
use rand::Rng;
use log::info;
use crate::config::DelayConfig;

/// Time to wait before the next district: the base delay plus random jitter.
pub fn item_delay(config: &DelayConfig) -> Duration {
    let jitter = if config.jitter_millis > 0 {
        rand::thread_rng().gen_range(0..=config.jitter_millis)
    } else {
        0
    };
    Duration::from_millis(config.between_items_millis.saturating_add(jitter))
}

pub fn wait_between_items(config: &DelayConfig) {
    let delay = item_delay(config);
    if delay.is_zero() {
        return;
    }
    info!("Waiting for {} ms before next district...", delay.as_millis());
    thread::sleep(delay);
}
