use tokio::sync::broadcast;

use crate::errors::JoinHandle;

/// `Operator` is anything that runs on its own task until the broadcast
/// `signal` fires.
pub trait Operator {
    fn run(&self, signal: broadcast::Receiver<()>) -> JoinHandle<()>;
}
