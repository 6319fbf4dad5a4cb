use crate::FpRes;
use crate::err::FpErr;
use std::num::NonZeroUsize;

/// 线程数环境变量，取值为正整数或`auto`。
pub const THREADS_ENV: &str = "FPIPE_POOL_THREADS";

const DEFAULT_THREADS: usize = 1;
const DEFAULT_NAME_PREFIX: &str = "fpipe-worker";

/// 工作线程池配置
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PoolConfig {
    /// 工作线程数，必须为正整数。
    pub threads: usize,
    /// 工作线程名前缀，线程名为`<prefix>-<index>`。
    pub name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig { threads: DEFAULT_THREADS, name_prefix: DEFAULT_NAME_PREFIX.to_owned() }
    }
}

impl PoolConfig {
    pub fn new(threads: usize) -> PoolConfig {
        PoolConfig { threads, ..PoolConfig::default() }
    }

    pub fn name_prefix(mut self, prefix: impl Into<String>) -> PoolConfig {
        self.name_prefix = prefix.into();
        self
    }

    /// 从环境变量`FPIPE_POOL_THREADS`读取线程数，未设置时使用默认值。
    pub fn from_env() -> FpRes<PoolConfig> {
        let threads = parse_threads(std::env::var(THREADS_ENV).ok().as_deref())?;
        Ok(PoolConfig::new(threads))
    }

    pub fn validate(&self) -> FpRes<()> {
        if self.threads == 0 {
            Err(FpErr::InvalidConfig { key: "threads", value: "0".to_owned(), reason: "must be positive" })
        } else {
            Ok(())
        }
    }
}

fn parse_threads(value: Option<&str>) -> FpRes<usize> {
    match value.map(str::trim) {
        None | Some("") => Ok(DEFAULT_THREADS),
        Some(v) if v.eq_ignore_ascii_case("auto") => {
            Ok(std::thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(DEFAULT_THREADS))
        }
        Some(v) => match v.parse::<usize>() {
            Ok(0) => Err(FpErr::InvalidConfig { key: THREADS_ENV, value: v.to_owned(), reason: "must be positive" }),
            Ok(n) => Ok(n),
            Err(_) => Err(FpErr::InvalidConfig {
                key: THREADS_ENV,
                value: v.to_owned(),
                reason: "expect a positive integer or `auto`",
            }),
        },
    }
}
