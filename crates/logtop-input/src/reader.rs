use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Lines delivered together, each without its line ending
pub type LineBatch = Vec<Vec<u8>>;

/// Maximum lines per batch
pub const BATCH_SIZE: usize = 256;

/// Batches buffered between the reader and the main loop
pub const CHANNEL_DEPTH: usize = 64;

/// Read buffer size
const READ_BUFFER: usize = 64 * 1024;

/// Background task turning a byte stream into line batches
///
/// The sender is dropped when the input ends, which the receiving side sees
/// as a closed channel.
pub struct LineReader {
    /// Cancellation token for stopping the task
    cancel: CancellationToken,

    /// Reader task, yields the number of lines read
    task: Option<JoinHandle<u64>>,
}

impl LineReader {
    /// Channel sized for a reader
    pub fn channel() -> (mpsc::Sender<LineBatch>, mpsc::Receiver<LineBatch>) {
        mpsc::channel(CHANNEL_DEPTH)
    }

    /// Read the process's standard input
    pub fn stdin(tx: mpsc::Sender<LineBatch>) -> Self {
        Self::spawn(tokio::io::stdin(), tx)
    }

    /// Start reading `input` on a new task
    pub fn spawn<R>(input: R, tx: mpsc::Sender<LineBatch>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(read_lines(input, tx, cancel.clone()));

        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Check if the reader is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait for the input to end, returning the number of lines read
    pub async fn join(mut self) -> u64 {
        match self.task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => 0,
        }
    }

    /// Stop reading; lines not yet sent are dropped
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for LineReader {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn read_lines<R>(input: R, tx: mpsc::Sender<LineBatch>, cancel: CancellationToken) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::with_capacity(READ_BUFFER, input);
    let mut batch: LineBatch = Vec::with_capacity(BATCH_SIZE);
    let mut lines: u64 = 0;

    loop {
        let mut line = Vec::new();
        let read = tokio::select! {
            _ = cancel.cancelled() => break,
            read = reader.read_until(b'\n', &mut line) => read,
        };

        match read {
            Ok(0) => break,
            Ok(_) => {
                strip_line_ending(&mut line);
                batch.push(line);
                lines += 1;

                // Flush when full, or when the next read would wait for input
                if batch.len() >= BATCH_SIZE || reader.buffer().is_empty() {
                    let full = std::mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE));
                    if tx.send(full).await.is_err() {
                        debug!(lines, "line receiver closed");
                        return lines;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        }
    }

    if !batch.is_empty() {
        let _ = tx.send(batch).await;
    }
    debug!(lines, "input finished");
    lines
}

/// Remove every trailing `\n` and `\r`
pub fn strip_line_ending(line: &mut Vec<u8>) {
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
}
