use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::PersistedData;
use crate::error::{Error, StateError};

/// Backing store for [`PersistedData`]
pub trait StateStorage: Send {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<PersistedData>, StateError>;

    fn save(&self, data: &PersistedData) -> Result<(), StateError>;
}

/// Pretty-printed JSON file, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedData>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, data: &PersistedData) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(data)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

enum Command {
    Save(PersistedData),
    Flush(Sender<()>),
}

/// Background writer that coalesces saves
///
/// Each scheduled snapshot replaces the pending one and restarts the
/// debounce timer. Dropping the writer saves whatever is still pending.
pub struct DebouncedWriter {
    commands: Option<Sender<Command>>,
    thread: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    pub fn spawn(storage: Box<dyn StateStorage>, debounce: Duration) -> Result<Self, Error> {
        let (commands, receiver) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("state-writer".into())
            .spawn(move || writer_loop(storage.as_ref(), &receiver, debounce))
            .map_err(Error::Spawn)?;

        Ok(Self {
            commands: Some(commands),
            thread: Some(thread),
        })
    }

    pub fn schedule(&self, data: PersistedData) {
        self.send(Command::Save(data));
    }

    /// Write the pending snapshot, if any, and wait for it
    pub fn flush(&self) {
        let (ack, done) = mpsc::channel();
        if self.send(Command::Flush(ack)) {
            let _ = done.recv();
        }
    }

    fn send(&self, command: Command) -> bool {
        let sent = self
            .commands
            .as_ref()
            .is_some_and(|commands| commands.send(command).is_ok());
        if !sent {
            log::warn!("state: writer thread is gone, change not persisted");
        }
        sent
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        self.commands.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("state: writer thread panicked");
            }
        }
    }
}

fn writer_loop(
    storage: &dyn StateStorage,
    receiver: &mpsc::Receiver<Command>,
    debounce: Duration,
) {
    let mut pending = None;
    loop {
        let next = if pending.is_some() {
            receiver.recv_timeout(debounce)
        } else {
            receiver.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match next {
            Ok(Command::Save(data)) => pending = Some(data),
            Ok(Command::Flush(ack)) => {
                write_pending(storage, &mut pending);
                let _ = ack.send(());
            }
            Err(RecvTimeoutError::Timeout) => write_pending(storage, &mut pending),
            Err(RecvTimeoutError::Disconnected) => {
                write_pending(storage, &mut pending);
                break;
            }
        }
    }
}

/// Save the pending snapshot; on failure it stays pending for the next window
fn write_pending(storage: &dyn StateStorage, pending: &mut Option<PersistedData>) {
    let Some(data) = pending.take() else {
        return;
    };
    match storage.save(&data) {
        Ok(()) => log::info!("state: saved to disk"),
        Err(err) => {
            log::warn!("state: failed to save: {err}");
            *pending = Some(data);
        }
    }
}
