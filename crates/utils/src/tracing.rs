use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracing::{error, info, span, Level, Span};

/// Initialize the tracing system
///
/// Honors `RUST_LOG`, falling back to `info`. Output goes to stderr so that
/// stdout stays reserved for the operator output sink; ANSI colours are only
/// used when stderr is a terminal.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    init_with_default("info")
}

/// Initialize tracing with an explicit fallback filter (e.g. `debug` for `--verbose`)
pub fn init_with_default(
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for a single leaf task
pub fn task_span(name: &str) -> Span {
    span!(Level::INFO, "task", task_name = %name)
}

/// Create a span for a task group
pub fn group_span(label: &str, mode: &str, children: usize) -> Span {
    span!(Level::INFO, "group", label = %label, mode = %mode, children = %children)
}

/// Create a span for the entire plan execution
pub fn pipeline_span(total_tasks: usize) -> Span {
    span!(Level::INFO, "pipeline", total_tasks = %total_tasks)
}

/// Emit a structured event for task completion
pub fn task_completed(task_name: &str, duration_ms: u64, success: bool) {
    if success {
        info!(
            task_name = %task_name,
            duration_ms = %duration_ms,
            "task_completed"
        );
    } else {
        error!(
            task_name = %task_name,
            duration_ms = %duration_ms,
            "task_failed"
        );
    }
}
