use crate::FpRes;
use crate::config::PoolConfig;
use crate::err::FpErr;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// 线程池状态
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PoolState {
    /// 接受任务，工作线程正在取任务。
    Running,
    /// 已请求停止，不再接受任务，队列中的任务继续执行。
    Stopping,
    /// 全部工作线程已退出并回收。
    Stopped,
}

struct Queue {
    jobs: VecDeque<Job>,
    stop: bool,
    joined: bool,
}

struct Inner {
    queue: Mutex<Queue>,
    available: Condvar,
}

/// 固定线程数的工作线程池。
///
/// 所有工作线程共享一个先进先出的任务队列，队列与停止标志都在同一把锁下访问。
/// 停止时不取消已入队的任务，而是等待队列清空后回收全部线程。
pub struct WorkerPool {
    inner: Arc<Inner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> FpRes<WorkerPool> {
        WorkerPool::with_config(PoolConfig::new(threads))
    }

    pub fn with_config(config: PoolConfig) -> FpRes<WorkerPool> {
        config.validate()?;
        let inner = Arc::new(Inner {
            queue: Mutex::new(Queue { jobs: VecDeque::new(), stop: false, joined: false }),
            available: Condvar::new(),
        });
        let mut workers = Vec::with_capacity(config.threads);
        for index in 0..config.threads {
            let worker_inner = Arc::clone(&inner);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.name_prefix, index))
                .spawn(move || work(&worker_inner, index));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    // 回收已经启动的线程
                    let pool = WorkerPool { inner, workers: Mutex::new(workers), threads: index };
                    pool.shutdown();
                    return Err(FpErr::SpawnWorker(err.to_string()));
                }
            }
        }
        debug!(threads = config.threads, prefix = %config.name_prefix, "worker pool started");
        Ok(WorkerPool { inner, workers: Mutex::new(workers), threads: config.threads })
    }

    /// 提交任务，返回用于获取结果的句柄。
    ///
    /// 已请求停止时返回[`FpErr::PoolStopped`]，任务不会执行。
    pub fn submit<F, T>(&self, task: F) -> FpRes<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (promise, handle) = promise();
        let job: Job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| {
                let err = FpErr::from_panic(payload);
                warn!(error = %err, "task panicked");
                err
            });
            promise.fulfill(result);
        });
        {
            let mut queue = self.inner.queue.lock();
            if queue.stop {
                return Err(FpErr::PoolStopped);
            }
            queue.jobs.push_back(job);
        }
        self.inner.available.notify_one();
        Ok(handle)
    }

    /// 请求停止并等待全部工作线程退出。
    ///
    /// 队列中剩余的任务会先执行完。重复调用无副作用。不能在本池的工作线程中调用。
    ///
    /// 多个线程同时调用时，每个调用都在全部工作线程被回收后才返回。
    pub fn shutdown(&self) {
        {
            let mut queue = self.inner.queue.lock();
            if !queue.stop {
                queue.stop = true;
                debug!(pending = queue.jobs.len(), "worker pool stopping");
            }
        }
        self.inner.available.notify_all();
        // 回收期间持有锁，后到的调用在此等待先到的调用完成；工作线程不访问该锁
        let mut workers = self.workers.lock();
        if workers.is_empty() {
            return;
        }
        for handle in workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread exited abnormally");
            }
        }
        self.inner.queue.lock().joined = true;
        debug!("worker pool stopped");
    }

    pub fn state(&self) -> PoolState {
        let queue = self.inner.queue.lock();
        match (queue.stop, queue.joined) {
            (false, _) => PoolState::Running,
            (true, false) => PoolState::Stopping,
            (true, true) => PoolState::Stopped,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    /// 已入队但尚未被工作线程取走的任务数。
    pub fn pending(&self) -> usize {
        self.inner.queue.lock().jobs.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool").field("threads", &self.threads).field("state", &self.state()).finish()
    }
}

fn work(inner: &Inner, index: usize) {
    trace!(index, "worker started");
    loop {
        let job = {
            let mut queue = inner.queue.lock();
            // 每次被唤醒都重新检查，空队列且未停止时继续等待
            while !queue.stop && queue.jobs.is_empty() {
                inner.available.wait(&mut queue);
            }
            match queue.jobs.pop_front() {
                Some(job) => job,
                None => break,
            }
        };
        trace!(index, "worker running task");
        job();
    }
    trace!(index, "worker exited");
}

/// 任务结果的发送端。
///
/// 任务未执行就被丢弃时补发[`FpErr::TaskAbandoned`]，句柄一侧因此总能收到恰好一个结果。
struct Promise<T> {
    sender: Option<Sender<FpRes<T>>>,
}

fn promise<T>() -> (Promise<T>, TaskHandle<T>) {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    (Promise { sender: Some(sender) }, TaskHandle { receiver })
}

impl<T> Promise<T> {
    fn fulfill(mut self, result: FpRes<T>) {
        if let Some(sender) = self.sender.take() {
            // 提交方可能已丢弃句柄
            let _ = sender.send(result);
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Err(FpErr::TaskAbandoned));
        }
    }
}

/// 任务结果句柄，结果只能取一次。
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<FpRes<T>>,
}

impl<T> TaskHandle<T> {
    /// 阻塞直到任务完成。
    ///
    /// 任务panic时返回[`FpErr::TaskPanicked`]，任务未执行就被丢弃时返回[`FpErr::TaskAbandoned`]。
    pub fn join(self) -> FpRes<T> {
        self.receiver.recv().unwrap_or(Err(FpErr::TaskAbandoned))
    }

    /// 不阻塞地取结果，任务未完成时原样返回句柄。
    pub fn try_join(self) -> Result<FpRes<T>, TaskHandle<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Ok(result),
            Err(TryRecvError::Empty) => Err(self),
            Err(TryRecvError::Disconnected) => Ok(Err(FpErr::TaskAbandoned)),
        }
    }

    /// 结果是否已可取，任务被丢弃时同样视为已完成。
    pub fn is_finished(&self) -> bool {
        !self.receiver.is_empty()
    }
}
