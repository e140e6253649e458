//! Buffered broker connection
//!
//! The MQTT client reads a packet with several awaits, so dropping its read
//! halfway loses bytes and the stream falls out of step. Network reads happen
//! in [`FramedLink::fill`] instead: every byte it receives stays in the link
//! buffer, so the fill can be dropped at any await. The client only reads
//! through [`LinkHandle`] once a whole packet is buffered.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::{Error as _, ErrorKind, ErrorType, Read, Write};

use super::error::LinkError;
use super::frame::packet_len;

/// Byte stream with an `N` byte receive buffer in front of it
pub struct FramedLink<T, const N: usize> {
    inner: Mutex<NoopRawMutex, Inner<T, N>>,
}

struct Inner<T, const N: usize> {
    io: T,
    buf: [u8; N],
    len: usize,
}

impl<T: Read + Write, const N: usize> FramedLink<T, N> {
    pub fn new(io: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                io,
                buf: [0; N],
                len: 0,
            }),
        }
    }

    /// Read whatever the stream has into the buffer.
    ///
    /// Safe to drop at any await: nothing is consumed from the stream until a
    /// read completes, and completed reads are stored before returning.
    pub async fn fill(&self) -> Result<usize, LinkError> {
        let mut inner = self.inner.lock().await;
        let Inner { io, buf, len } = &mut *inner;
        if *len == N {
            return Err(LinkError::Overflow);
        }
        let read = io
            .read(&mut buf[*len..])
            .await
            .map_err(|e| LinkError::Io(e.kind()))?;
        if read == 0 {
            return Err(LinkError::Closed);
        }
        *len += read;
        Ok(read)
    }

    /// Whether a complete packet is waiting in the buffer
    pub async fn packet_ready(&self) -> Result<bool, LinkError> {
        let inner = self.inner.lock().await;
        match packet_len(&inner.buf[..inner.len]) {
            Ok(Some(_)) => Ok(true),
            Ok(None) if inner.len == N => Err(LinkError::Overflow),
            Ok(None) => Ok(false),
            Err(_) => Err(LinkError::Malformed),
        }
    }

    /// Number of buffered bytes not yet read by the client
    pub async fn buffered(&self) -> usize {
        self.inner.lock().await.len
    }

    /// Stream handle for the MQTT client
    pub fn handle(&self) -> LinkHandle<'_, T, N> {
        LinkHandle { link: self }
    }
}

/// Client side of a [`FramedLink`]
///
/// Reads are served from the buffer first. Writes are flushed at once, the
/// client never flushes on its own.
pub struct LinkHandle<'l, T, const N: usize> {
    link: &'l FramedLink<T, N>,
}

impl<T, const N: usize> ErrorType for LinkHandle<'_, T, N> {
    type Error = ErrorKind;
}

impl<T: Read + Write, const N: usize> Read for LinkHandle<'_, T, N> {
    async fn read(&mut self, out: &mut [u8]) -> Result<usize, Self::Error> {
        let mut inner = self.link.inner.lock().await;
        let Inner { io, buf, len } = &mut *inner;
        if *len == 0 {
            return io.read(out).await.map_err(|e| e.kind());
        }

        let count = out.len().min(*len);
        out[..count].copy_from_slice(&buf[..count]);
        buf.copy_within(count..*len, 0);
        *len -= count;
        Ok(count)
    }
}

impl<T: Read + Write, const N: usize> Write for LinkHandle<'_, T, N> {
    async fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut inner = self.link.inner.lock().await;
        let written = inner.io.write(data).await.map_err(|e| e.kind())?;
        inner.io.flush().await.map_err(|e| e.kind())?;
        Ok(written)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.link.inner.lock().await;
        inner.io.flush().await.map_err(|e| e.kind())
    }
}
