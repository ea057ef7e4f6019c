use crate::plan::Characteristics;
use crate::traits::{Downstream, Gatherer, OpError};

/// Fixed-size, non-overlapping groups of consecutive elements.
#[derive(Debug, Clone, Copy)]
pub struct Chunks {
    size: usize,
}

/// Groups input into chunks of `size`; a shorter final chunk is emitted at
/// end of input if anything is left over. `size` must be at least 1.
pub fn chunks(size: usize) -> Result<Chunks, OpError> {
    if size == 0 {
        return Err(OpError::invalid("chunks", "size must be at least 1"));
    }
    Ok(Chunks { size })
}

impl Chunks {
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<T> Gatherer<T> for Chunks {
    type State = Vec<T>;
    type Output = Vec<T>;

    fn name(&self) -> &'static str {
        "chunks"
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::BUFFERING
    }

    fn initialize(&self) -> Self::State {
        Vec::with_capacity(self.size)
    }

    fn integrate<D>(&self, buf: &mut Vec<T>, element: T, downstream: &mut D) -> bool
    where
        D: Downstream<Vec<T>> + ?Sized,
    {
        buf.push(element);
        if buf.len() == self.size {
            // Hand the full buffer over and start a fresh one.
            let full = std::mem::replace(buf, Vec::with_capacity(self.size));
            downstream.push(full);
        }
        true
    }

    fn finish<D>(&self, buf: Vec<T>, downstream: &mut D)
    where
        D: Downstream<Vec<T>> + ?Sized,
    {
        if !buf.is_empty() {
            downstream.push(buf);
        }
    }
}
