//! 基于容器的惰性函数式流水线，以及用于并行转换的固定大小工作线程池。
//!
//! ```
//! use fpipe::{RangeExt, filter, reduce, transform};
//!
//! let base = vec![1, 2, 3, 4, 5, 6];
//! let sum = (&base).pipe(filter(|x: &i32| x % 2 == 0)).pipe(transform(|x: i32| x * x)).pipe(reduce(0));
//! assert_eq!(4 + 16 + 36, sum);
//! ```

mod action;
mod config;
mod err;
mod pipe;
mod pool;
mod range;
mod view;

pub use action::{ParallelTransform, parallel_transform};
pub use config::{PoolConfig, THREADS_ENV};
pub use err::FpErr;
pub use pipe::{RangeExt, Stage, compose};
pub use pool::{PoolState, TaskHandle, WorkerPool};
pub use range::{Cursor, Indexed, Range, Shared, SharedCursor};
pub use view::*;

pub type FpRes<T> = Result<T, FpErr>;
