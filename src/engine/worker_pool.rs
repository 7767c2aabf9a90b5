// ==========================================
// 图书零售库存决策支持系统 - 分析工作池
// ==========================================
// 依据: Inventory_Engine_Specs_v1.2.md - 8. 并发与资源模型
// ==========================================
// 职责: 固定规模工作池 + 有界提交队列,承载并行分析子任务
// 约定: 无取消接口; 调用方如需超时,自行包装返回的接收端
// ==========================================

use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::debug;

type Job = BoxFuture<'static, ()>;

/// 工作池已关闭 (优雅停机后拒绝新提交)
#[derive(Debug, Error)]
#[error("分析工作池已关闭,拒绝新任务提交")]
pub struct PoolClosedError;

// ==========================================
// AnalysisWorkerPool - 固定规模工作池
// ==========================================
pub struct AnalysisWorkerPool {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl AnalysisWorkerPool {
    /// 创建工作池 (须在 Tokio 运行时内调用)
    ///
    /// # 参数
    /// - worker_count: 工作任务数 (下限 1)
    /// - queue_capacity: 提交队列容量 (下限 1, 队列满时提交方挂起等待)
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>(queue_capacity.max(1));
        let receiver = Arc::new(AsyncMutex::new(receiver));

        let workers = (0..worker_count.max(1))
            .map(|worker_id| {
                let receiver = receiver.clone();
                tokio::spawn(async move {
                    loop {
                        // 锁仅覆盖取任务,执行期间释放,其他工作任务可继续取活
                        let job = { receiver.lock().await.recv().await };
                        match job {
                            Some(job) => job.await,
                            None => break,
                        }
                    }
                    debug!(worker_id, "分析工作任务退出");
                })
            })
            .collect();

        Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    /// 提交子任务,返回结果接收端
    ///
    /// 队列满时挂起等待空位; 池已关闭时返回 PoolClosedError。
    /// 任务 panic 时接收端以 RecvError 结束 (发送端被丢弃)。
    pub async fn submit<T, F>(&self, task: F) -> Result<oneshot::Receiver<T>, PoolClosedError>
    where
        T: Send + 'static,
        F: std::future::Future<Output = T> + Send + 'static,
    {
        let sender = {
            let guard = self.sender.lock().expect("工作池提交端锁中毒");
            guard.clone()
        };
        let Some(sender) = sender else {
            return Err(PoolClosedError);
        };

        let (result_tx, result_rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let _ = result_tx.send(task.await);
        });

        sender.send(job).await.map_err(|_| PoolClosedError)?;
        Ok(result_rx)
    }

    /// 优雅停机: 关闭提交队列,等待在途任务完成
    pub async fn shutdown(&self) {
        {
            let mut guard = self.sender.lock().expect("工作池提交端锁中毒");
            guard.take();
        }

        let handles: Vec<JoinHandle<()>> = {
            let mut guard = self.workers.lock().expect("工作池句柄锁中毒");
            guard.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
        debug!("分析工作池已停机");
    }
}
