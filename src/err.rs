use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FpErr {
    #[error("[Pool] Worker pool has been stopped, task not accepted")]
    PoolStopped,

    #[error("[Pool] Failed to spawn worker thread: {0}")]
    SpawnWorker(String),

    #[error("[Task] Task panicked: {message}")]
    TaskPanicked { message: String },

    #[error("[Task] Task was dropped before producing a result")]
    TaskAbandoned,

    #[error("[Config] Invalid value `{value}` for `{key}`: {reason}")]
    InvalidConfig { key: &'static str, value: String, reason: &'static str },
}

impl FpErr {
    /// 从`catch_unwind`捕获的panic负载构造错误。
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> FpErr {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_owned()
        };
        FpErr::TaskPanicked { message }
    }
}
