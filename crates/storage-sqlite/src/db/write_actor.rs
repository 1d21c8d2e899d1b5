//! Single writer for the SQLite database.
//!
//! Every write job runs on one dedicated connection inside an immediate
//! transaction, so concurrent callers never interleave partial writes.

use std::any::Any;

use diesel::sqlite::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use expensehud_core::errors::{Error, Result};

use super::{DbConnection, DbPool};
use crate::errors::StorageError;

type BoxedResult = Result<Box<dyn Any + Send>>;
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> BoxedResult + Send>;

struct WriteRequest {
    job: Job,
    reply: oneshot::Sender<BoxedResult>,
}

/// Error type of the writer's transaction closure. diesel needs a
/// `From<diesel::result::Error>` error to roll back on.
enum TxError {
    Job(Error),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

/// Cloneable handle used by repositories to submit write jobs.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl WriteHandle {
    /// Runs `job` inside an immediate transaction on the writer connection.
    /// An `Err` from the job rolls the transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |conn| {
            job(conn).map(|value| Box::new(value) as Box<dyn Any + Send>)
        });
        self.tx
            .send(WriteRequest { job, reply })
            .map_err(|_| StorageError::Writer("writer task has stopped".to_string()))?;

        let value = response
            .await
            .map_err(|_| StorageError::Writer("writer dropped the job".to_string()))??;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| StorageError::Writer("unexpected job result type".to_string()).into())
    }
}

/// Spawns the writer task. Must be called from within a tokio runtime.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<WriteRequest>();

    tokio::spawn(async move {
        let mut conn: Option<DbConnection> = None;
        while let Some(WriteRequest { job, reply }) = rx.recv().await {
            if conn.is_none() {
                match pool.get() {
                    Ok(acquired) => conn = Some(acquired),
                    Err(e) => {
                        error!("Writer failed to acquire a connection: {}", e);
                        let _ = reply.send(Err(StorageError::from(e).into()));
                        continue;
                    }
                }
            }
            let Some(active) = conn.as_mut() else {
                continue;
            };
            let outcome = active.immediate_transaction::<_, TxError, _>(|tx_conn| {
                job(tx_conn).map_err(TxError::Job)
            });
            let result = match outcome {
                Ok(value) => Ok(value),
                Err(TxError::Job(err)) => Err(err),
                Err(TxError::Diesel(err)) => Err(StorageError::from(err).into()),
            };
            let _ = reply.send(result);
        }
    });

    WriteHandle { tx }
}
