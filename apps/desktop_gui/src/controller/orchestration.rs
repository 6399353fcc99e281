//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the worker. Returns `false` when it could not be queued;
/// `status` then explains why.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the app".to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queues_command_when_worker_is_listening() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(
            &tx,
            BackendCommand::Search { generation: 1 },
            &mut status
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::Search { generation: 1 })
        ));
        assert!(status.is_empty());
    }

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(
            &tx,
            BackendCommand::Search { generation: 1 },
            &mut status
        ));
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::Search { generation: 2 },
            &mut status
        ));
        assert!(status.contains("full"));

        drop(rx);
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::Search { generation: 3 },
            &mut status
        ));
        assert!(status.contains("disconnected"));
    }
}
