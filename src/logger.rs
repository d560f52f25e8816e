use log::LevelFilter;
use env_logger::Builder;
use std::io::Write;
use chrono::Local;

/// Info by default, browser driver chatter at warn; `RUST_LOG` overrides, e.g. `RUST_LOG=district_scraper_lib=debug`.
pub fn init() {
    Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        // headless_chrome logs every tab navigation at info
        .filter(Some("headless_chrome"), LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .init();

    log::info!("Logger initialized.");
}
