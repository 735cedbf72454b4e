//! Pooled growable byte buffer.
//!
//! The writer asks a [`ByteBuffer`] for writable spans and commits however
//! many bytes it actually produced. Storage is a chain of fixed-size
//! segments borrowed from a [`BufferPool`], so a serialization call of any
//! size performs no per-write allocation once the pool is warm. A final
//! [`ByteBuffer::into_vec`] flattens the chain into one contiguous vector
//! for callers that need a single slab, returning every segment to the
//! pool.
//!
//! Reserve-then-commit discipline: `span(hint)` grants a contiguous
//! writable region of at least `hint` bytes (usually more — the rest of the
//! current segment), and `advance(n)` commits the first `n` of them. Bytes
//! past the committed count are uninitialized as far as the buffer is
//! concerned and are never read back.

use std::sync::{Arc, Mutex, OnceLock};

/// Default segment size handed out by a pool.
const SEGMENT_SIZE: usize = 64 * 1024;

/// Upper bound on segments a pool retains; released segments beyond this are
/// freed instead of pooled so an occasional huge document cannot pin memory
/// forever.
const MAX_RETAINED: usize = 64;

/// A thread-safe pool of byte segments shared by any number of buffers.
///
/// The pool is explicit: buffers take an `Arc<BufferPool>` at construction,
/// so tests can run against an isolated pool. [`BufferPool::shared`] is the
/// documented process-wide default used by [`ByteBuffer::new`].
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Box<[u8]>>>,
    segment_size: usize,
}

impl BufferPool {
    /// Creates an empty pool with the default segment size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_segment_size(SEGMENT_SIZE)
    }

    /// Creates an empty pool whose segments are `segment_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `segment_size` is zero.
    #[must_use]
    pub fn with_segment_size(segment_size: usize) -> Self {
        assert!(segment_size > 0, "segment size must be positive");
        Self {
            free: Mutex::new(Vec::new()),
            segment_size,
        }
    }

    /// The process-wide default pool.
    pub fn shared() -> &'static Arc<BufferPool> {
        static SHARED: OnceLock<Arc<BufferPool>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(BufferPool::new()))
    }

    /// Number of segments currently idle in the pool.
    #[must_use]
    pub fn idle_segments(&self) -> usize {
        self.free.lock().expect("buffer pool poisoned").len()
    }

    /// Hands out a segment of at least `min` bytes. Requests larger than the
    /// pool's segment size get a dedicated allocation that will not be
    /// retained on release.
    fn acquire(&self, min: usize) -> Box<[u8]> {
        if min <= self.segment_size {
            if let Some(segment) = self.free.lock().expect("buffer pool poisoned").pop() {
                return segment;
            }
            vec![0u8; self.segment_size].into_boxed_slice()
        } else {
            vec![0u8; min].into_boxed_slice()
        }
    }

    fn release(&self, segment: Box<[u8]>) {
        if segment.len() != self.segment_size {
            return;
        }
        let mut free = self.free.lock().expect("buffer pool poisoned");
        if free.len() < MAX_RETAINED {
            free.push(segment);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Segment {
    data: Box<[u8]>,
    committed: usize,
}

/// A growable byte buffer backed by pooled segments.
///
/// # Examples
///
/// ```
/// use jsonwire::ByteBuffer;
///
/// let mut buf = ByteBuffer::new();
/// let span = buf.span(5);
/// span[..5].copy_from_slice(b"hello");
/// buf.advance(5);
/// assert_eq!(buf.into_vec(), b"hello");
/// ```
#[derive(Debug)]
pub struct ByteBuffer {
    pool: Arc<BufferPool>,
    sealed: Vec<Segment>,
    head: Option<Segment>,
    /// Length of the last span handed out, shrunk as bytes are committed.
    granted: usize,
    total: usize,
}

impl ByteBuffer {
    /// Creates a buffer backed by the process-wide [`BufferPool::shared`]
    /// pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pool(Arc::clone(BufferPool::shared()))
    }

    /// Creates a buffer backed by the given pool.
    #[must_use]
    pub fn with_pool(pool: Arc<BufferPool>) -> Self {
        Self {
            pool,
            sealed: Vec::new(),
            head: None,
            granted: 0,
            total: 0,
        }
    }

    /// Total bytes committed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether no bytes have been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Grants a contiguous writable span of at least `hint` bytes.
    ///
    /// The returned slice may be longer than `hint`; only the bytes later
    /// committed with [`ByteBuffer::advance`] become part of the output.
    /// When the current segment cannot satisfy `hint`, it is sealed and a
    /// fresh segment is taken from the pool.
    ///
    /// # Panics
    ///
    /// Panics if `hint` is zero; requesting nothing is a usage error.
    pub fn span(&mut self, hint: usize) -> &mut [u8] {
        assert!(hint > 0, "span size hint must be positive");
        let exhausted = match &self.head {
            Some(segment) => segment.data.len() - segment.committed < hint,
            None => true,
        };
        if exhausted {
            if let Some(segment) = self.head.take() {
                self.sealed.push(segment);
            }
            self.head = Some(Segment {
                data: self.pool.acquire(hint),
                committed: 0,
            });
        }
        let segment = self.head.as_mut().expect("head segment present");
        let free = &mut segment.data[segment.committed..];
        self.granted = free.len();
        free
    }

    /// Commits `count` bytes of the last granted span.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds what remains of the last granted span, or
    /// if no span has been granted.
    pub fn advance(&mut self, count: usize) {
        assert!(count <= self.granted, "advanced past the granted span");
        let segment = self.head.as_mut().expect("advance without a granted span");
        segment.committed += count;
        self.granted -= count;
        self.total += count;
    }

    /// Flattens every committed byte into one contiguous vector and returns
    /// all segments to the pool.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total);
        for segment in self.sealed.drain(..).chain(self.head.take()) {
            out.extend_from_slice(&segment.data[..segment.committed]);
            self.pool.release(segment.data);
        }
        out
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        for segment in self.sealed.drain(..).chain(self.head.take()) {
            self.pool.release(segment.data);
        }
    }
}
