#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Emit a server event, attaching the JSON context as a structured field when present.
pub fn log_event(level: LogLevel, message: &str, context: Option<serde_json::Value>) {
    let context = context.map(|value| value.to_string()).unwrap_or_default();
    match level {
        LogLevel::Debug => tracing::debug!(context = %context, "[Server] {}", message),
        LogLevel::Info => tracing::info!(context = %context, "[Server] {}", message),
        LogLevel::Warn => tracing::warn!(context = %context, "[Server] {}", message),
        LogLevel::Error => tracing::error!(context = %context, "[Server] {}", message),
    }
}
