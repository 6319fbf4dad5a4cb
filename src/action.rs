use crate::FpRes;
use crate::config::PoolConfig;
use crate::pipe::Stage;
use crate::pool::{TaskHandle, WorkerPool};
use crate::range::Range;
use std::sync::Arc;
use tracing::debug;

/// 并行转换，见[`parallel_transform`]。
#[derive(Debug, Clone)]
pub struct ParallelTransform<F> {
    func: F,
    config: PoolConfig,
}

/// 立即求值的并行转换，结果顺序与输入顺序一致。
///
/// 每次组合都会创建一个只属于本次调用的线程池，每个元素提交一个任务，
/// 停止并回收线程池后再按输入顺序收集结果。执行顺序不确定，结果顺序确定。
///
/// ```
/// use fpipe::{RangeExt, parallel_transform};
///
/// let squares = vec![1, 2, 3].pipe(parallel_transform(|x: i32| x * x).threads(2)).unwrap();
/// assert_eq!(vec![1, 4, 9], squares);
/// ```
pub fn parallel_transform<F>(func: F) -> ParallelTransform<F> {
    ParallelTransform { func, config: PoolConfig::default() }
}

impl<F> ParallelTransform<F> {
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }
}

impl<R, F, O> Stage<R> for ParallelTransform<F>
where
    R: Range,
    R::Item: Send + 'static,
    F: Fn(R::Item) -> O + Send + Sync + 'static,
    O: Send + 'static,
{
    type Output = FpRes<Vec<O>>;

    fn apply(self, range: R) -> Self::Output {
        let func = Arc::new(self.func);
        let handles = {
            let pool = WorkerPool::with_config(self.config)?;
            let handles = range
                .iter()
                .map(|item| {
                    let func = Arc::clone(&func);
                    pool.submit(move || (*func)(item))
                })
                .collect::<FpRes<Vec<_>>>()?;
            debug!(tasks = handles.len(), threads = pool.thread_count(), "parallel transform dispatched");
            pool.shutdown();
            handles
        };
        handles.into_iter().map(TaskHandle::join).collect()
    }
}
