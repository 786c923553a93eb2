use std::io::Read;

use bytes::Bytes;

use crate::pool::BufferPool;

/// Fixed size of the pooled working buffer used for each read call,
/// independent of the declared content length.
pub(crate) const WORKING_BUFFER_SIZE: usize = 1024;

/// Accumulator capacity when the declared length is absent or nonsensical.
const DEFAULT_ACCUMULATOR_SIZE: usize = 256;

/// Ceiling on how far a declared-length hint may size the accumulator up
/// front; a lying Content-Length must not force a huge allocation.
const MAX_ACCUMULATOR_HINT: usize = 1 << 20;

/// Drains response body streams into owned byte sequences using pooled
/// buffers.
pub struct BodyReader<'a> {
    pool: &'a BufferPool,
}

impl<'a> BodyReader<'a> {
    pub fn new(pool: &'a BufferPool) -> Self {
        Self { pool }
    }

    /// Reads `stream` to end-of-stream and returns the collected bytes.
    ///
    /// An absent stream yields empty bytes without touching the pool; that is
    /// the explicit no-content signal, distinct from a failed read. Both
    /// pooled buffers are released on every exit path, and the stream is
    /// dropped (closed) whether the drain succeeds or not.
    pub fn drain(
        &self,
        stream: Option<Box<dyn Read + Send>>,
        declared_len: Option<usize>,
    ) -> std::io::Result<Bytes> {
        let Some(mut stream) = stream else {
            return Ok(Bytes::new());
        };

        let capacity_hint = match declared_len {
            Some(length) if length > 0 => length.min(MAX_ACCUMULATOR_HINT),
            _ => DEFAULT_ACCUMULATOR_SIZE,
        };
        let mut accumulator = self.pool.checkout(capacity_hint);
        let mut accumulated = 0_usize;
        let mut working = self.pool.checkout(WORKING_BUFFER_SIZE);

        let outcome = loop {
            match stream.read(&mut working[..WORKING_BUFFER_SIZE]) {
                Ok(0) => break Ok(Bytes::copy_from_slice(&accumulator[..accumulated])),
                Ok(count) => {
                    if accumulated + count > accumulator.len() {
                        accumulator = self.grow(accumulator, accumulated, accumulated + count);
                    }
                    accumulator[accumulated..accumulated + count]
                        .copy_from_slice(&working[..count]);
                    accumulated += count;
                }
                Err(source) => break Err(source),
            }
        };

        drop(stream);
        self.pool.release(working);
        self.pool.release(accumulator);
        outcome
    }

    /// Swaps the accumulator for a larger pooled buffer, carrying the
    /// accumulated prefix over.
    fn grow(&self, accumulator: Vec<u8>, accumulated: usize, needed: usize) -> Vec<u8> {
        let mut grown = self.pool.checkout(needed.max(accumulator.len() * 2));
        grown[..accumulated].copy_from_slice(&accumulator[..accumulated]);
        self.pool.release(accumulator);
        grown
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::{BodyReader, WORKING_BUFFER_SIZE};
    use crate::pool::BufferPool;

    fn boxed(bytes: Vec<u8>) -> Option<Box<dyn Read + Send>> {
        Some(Box::new(Cursor::new(bytes)))
    }

    #[test]
    fn drains_exact_bytes_despite_lying_length_hint() {
        let pool = BufferPool::default();
        let reader = BodyReader::new(&pool);
        let payload = b"hello response body".to_vec();

        let drained = reader
            .drain(boxed(payload.clone()), Some(3))
            .expect("drain succeeds");
        assert_eq!(drained.as_ref(), payload.as_slice());
    }

    #[test]
    fn drains_bodies_larger_than_the_working_buffer() {
        let pool = BufferPool::default();
        let reader = BodyReader::new(&pool);
        let payload: Vec<u8> = (0..WORKING_BUFFER_SIZE * 3 + 17)
            .map(|index| (index % 251) as u8)
            .collect();

        let drained = reader
            .drain(boxed(payload.clone()), None)
            .expect("drain succeeds");
        assert_eq!(drained.as_ref(), payload.as_slice());
    }

    #[test]
    fn absent_stream_yields_empty_bytes_without_pool_use() {
        let pool = BufferPool::default();
        let reader = BodyReader::new(&pool);

        let drained = reader.drain(None, Some(128)).expect("drain succeeds");
        assert!(drained.is_empty());
        assert_eq!(pool.pooled_bytes(), 0);
        assert_eq!(pool.pooled_buffers(), 0);
    }

    #[test]
    fn buffers_return_to_the_pool_after_a_drain() {
        let pool = BufferPool::default();
        let reader = BodyReader::new(&pool);

        reader
            .drain(boxed(b"abc".to_vec()), Some(16))
            .expect("drain succeeds");
        assert!(pool.pooled_buffers() >= 1);
        assert!(pool.pooled_bytes() > 0);
    }

    #[test]
    fn read_failure_still_releases_buffers() {
        struct FailingStream;
        impl Read for FailingStream {
            fn read(&mut self, _buffer: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "reset mid-body",
                ))
            }
        }

        let pool = BufferPool::default();
        let reader = BodyReader::new(&pool);
        let error = reader
            .drain(Some(Box::new(FailingStream)), Some(64))
            .expect_err("read failure propagates");
        assert_eq!(error.kind(), std::io::ErrorKind::ConnectionReset);
        assert!(pool.pooled_buffers() >= 1);
    }
}
