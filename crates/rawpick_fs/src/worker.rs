//! Background execution of one pick-copy run.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use crate::copy::pick_copy_observed;
use crate::report::ReportPick;
use crate::spec::{PickCopyError, SpecPickItem, SpecPickOptions};

/// Progress message emitted by a running worker.
#[derive(Debug)]
pub enum EnumPickEvent {
    /// One requested name has been resolved.
    Item(SpecPickItem),
    /// Terminal message; nothing follows it.
    Finished(Result<ReportPick, PickCopyError>),
}

/// Handle on a worker started by [`spawn_pick_copy`].
#[derive(Debug)]
pub struct HandlePickCopy {
    rx_events: Receiver<EnumPickEvent>,
    flag_cancel: Arc<AtomicBool>,
    join_handle: JoinHandle<()>,
}

impl HandlePickCopy {
    /// Ask the worker to stop before its next copy.
    pub fn cancel(&self) {
        self.flag_cancel.store(true, Ordering::Relaxed);
    }

    /// Shared flag, e.g. for a Ctrl+C handler.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag_cancel)
    }

    /// Event stream; ends after [`EnumPickEvent::Finished`].
    pub fn events(&self) -> &Receiver<EnumPickEvent> {
        &self.rx_events
    }

    /// Drain remaining events and return the final result.
    pub fn join(self) -> Result<ReportPick, PickCopyError> {
        self.wait(|_| {})
    }

    /// Feed each remaining item to `on_item`, then return the final result.
    pub fn wait<F>(self, mut on_item: F) -> Result<ReportPick, PickCopyError>
    where
        F: FnMut(&SpecPickItem),
    {
        let mut res_final = None;
        for event in self.rx_events.iter() {
            match event {
                EnumPickEvent::Item(item) => on_item(&item),
                EnumPickEvent::Finished(res) => res_final = Some(res),
            }
        }
        let _ = self.join_handle.join();
        match res_final {
            Some(res) => res,
            // The worker only exits without a terminal event if it panicked.
            None => Err(PickCopyError::WorkerAborted),
        }
    }
}

/// Run [`crate::pick_copy`] on a dedicated thread.
///
/// Items stream over [`HandlePickCopy::events`] as they are resolved; the
/// finished report is published once, whole, as the last event.
pub fn spawn_pick_copy(
    names: Vec<String>,
    dir_source: PathBuf,
    dir_destination: PathBuf,
    spec_pick_options: SpecPickOptions,
) -> Result<HandlePickCopy, PickCopyError> {
    let (tx_events, rx_events) = mpsc::channel();
    let flag_cancel = Arc::new(AtomicBool::new(false));
    let flag_cancel_worker = Arc::clone(&flag_cancel);

    let join_handle = thread::Builder::new()
        .name("rawpick-copy".to_string())
        .spawn(move || {
            let res = pick_copy_observed(
                names.as_slice(),
                &dir_source,
                &dir_destination,
                spec_pick_options,
                Some(&flag_cancel_worker),
                |item| {
                    // Receiver gone means nobody listens; keep copying anyway.
                    let _ = tx_events.send(EnumPickEvent::Item(item.clone()));
                },
            );
            let _ = tx_events.send(EnumPickEvent::Finished(res));
        })
        .map_err(|e| PickCopyError::WorkerSpawnFailed(e.to_string()))?;

    Ok(HandlePickCopy {
        rx_events,
        flag_cancel,
        join_handle,
    })
}
