use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Wire up tracing and the panic hook for the server process. `RUST_LOG`
/// controls filtering (default `info`). With `TM_LOG_DIR` set, output
/// rotates daily into `<dir>/<service>.log`; otherwise it goes to stdout.
/// Safe to call more than once; later calls are no-ops.
pub fn init(service: &'static str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match daily_log_writer(service) {
        Some(writer) => {
            let _ = builder.with_writer(writer).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }

    install_panic_hook(service);
}

fn daily_log_writer(service: &str) -> Option<tracing_appender::non_blocking::NonBlocking> {
    let dir = PathBuf::from(std::env::var_os("TM_LOG_DIR")?);
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(dir, format!("{service}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // First guard wins; a second init keeps the original sink alive.
    if FILE_GUARD.set(guard).is_err() {
        return None;
    }
    Some(writer)
}

/// Panics become `tracing::error!` records in the same sink as request
/// logs. `TM_LOG_INCLUDE_BACKTRACE=1` additionally chains to the stock
/// hook for the stderr backtrace.
fn install_panic_hook(service: &'static str) {
    static HOOKED: OnceLock<()> = OnceLock::new();
    if HOOKED.set(()).is_err() {
        return;
    }

    let stock_hook = panic::take_hook();
    let chain_stock = std::env::var("TM_LOG_INCLUDE_BACKTRACE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    panic::set_hook(Box::new(move |info| {
        let detail = if let Some(s) = info.payload().downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        };

        let at = info
            .location()
            .map(|loc| loc.to_string())
            .unwrap_or_else(|| "unknown location".to_string());

        tracing::error!(service, %at, %detail, "process panicked");

        if chain_stock {
            stock_hook(info);
        }
    }));
}
