use std::fmt::Debug;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use smart_leds::SmartLedsWrite;

use super::OutputDriver;
use crate::{color::Rgb, error::OutputError};

/// Adapter over any `smart-leds` driver
///
/// The sink already applies the channel order, so the wrapped driver must
/// send the channels as given.
pub struct SmartLedsDriver<W> {
    writer: W,
}

impl<W> SmartLedsDriver<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsDriver<W>
where
    W: SmartLedsWrite + Send,
    W::Color: From<Rgb>,
    W::Error: Debug,
{
    fn write(&mut self, colors: &[Rgb]) -> Result<(), OutputError> {
        self.writer
            .write(colors.iter().copied())
            .map_err(|err| OutputError::Write(format!("{err:?}")))
    }
}

/// Raw frame writer for a character device or FIFO
///
/// Every frame is written as three bytes per LED, in wire order. Bit
/// timing is up to whatever sits behind the node.
#[derive(Debug)]
pub struct DeviceDriver {
    file: File,
    path: PathBuf,
    bytes: Vec<u8>,
}

impl DeviceDriver {
    /// Open `path` for writing
    ///
    /// Fails with [`OutputError::Unavailable`] when the node is missing, is
    /// not a character device or FIFO, is not writable, or is a FIFO with no
    /// reader attached. Never blocks.
    pub fn open(path: &Path) -> Result<Self, OutputError> {
        let file = open_frame_sink(path)
            .map_err(|err| OutputError::Unavailable(format!("{}: {err}", path.display())))?;
        Ok(Self {
            file,
            path: path.to_owned(),
            bytes: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn open_frame_sink(path: &Path) -> io::Result<File> {
    use std::fs::{self, OpenOptions};
    use std::os::fd::AsRawFd;
    use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};

    let kind = fs::metadata(path)?.file_type();
    if !(kind.is_char_device() || kind.is_fifo()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a character device or FIFO",
        ));
    }

    // Without O_NONBLOCK, opening a FIFO nobody reads waits forever;
    // with it, the open fails with ENXIO instead
    let file = OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)?;

    // Frames must go out whole, so writes block again once open
    let fd = file.as_raw_fd();
    // SAFETY: `fd` belongs to `file`, which stays open across both calls
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    // SAFETY: as above
    if flags < 0 || unsafe { libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(file)
}

#[cfg(not(unix))]
fn open_frame_sink(_path: &Path) -> io::Result<File> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "device output needs a unix host",
    ))
}

impl OutputDriver for DeviceDriver {
    fn write(&mut self, colors: &[Rgb]) -> Result<(), OutputError> {
        self.bytes.clear();
        self.bytes
            .extend(colors.iter().flat_map(|color| [color.r, color.g, color.b]));
        self.file
            .write_all(&self.bytes)
            .and_then(|()| self.file.flush())
            .map_err(|err| OutputError::Write(format!("{}: {err}", self.path.display())))
    }
}
