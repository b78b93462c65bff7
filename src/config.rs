use std::time::Duration;

const DEFAULT_PORT: &str = "10000";
const DEFAULT_MODEL_PATH: &str = "models/model.onnx";

/// Process configuration, read once from the environment at startup and
/// passed explicitly to whatever needs it.
#[derive(Clone)]
pub struct Config {
    /// Address the listener binds, `0.0.0.0:<PORT>`.
    pub listen_addr: String,
    /// CORS origin echoed by the predict endpoints. `None` means the
    /// Access-Control-Allow-Origin header is not emitted at all.
    pub allow_origin: Option<String>,
    /// Refuse to start when the model file is missing.
    pub fail_on_missing_model: bool,
    /// Where the model file is expected on disk.
    pub model_path: String,
    /// Optional per-connection deadline covering the whole exchange.
    /// Unset by default: a slow client stalls only its own worker.
    pub read_timeout: Option<Duration>,
}

impl Config {
    pub fn load() -> Self {
        let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let listen_addr = format!("0.0.0.0:{}", port);

        // An explicit ALLOW_ORIGIN always wins. Otherwise default to the
        // wildcard in development and to no origin when RENDER marks a
        // production-like environment.
        let allow_origin = match std::env::var("ALLOW_ORIGIN") {
            Ok(origin) if !origin.is_empty() => Some(origin),
            _ => {
                if std::env::var("RENDER").is_ok() {
                    None
                } else {
                    Some("*".to_string())
                }
            }
        };

        let fail_on_missing_model = std::env::var("FAIL_ON_MISSING_MODEL")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        let model_path = std::env::var("MODEL_PATH")
            .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());

        let read_timeout = std::env::var("READ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            listen_addr,
            allow_origin,
            fail_on_missing_model,
            model_path,
            read_timeout,
        }
    }
}
