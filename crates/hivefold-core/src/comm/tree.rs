use super::error::CommError;
use super::mesh::{Endpoint, Payload};

impl Endpoint {
    /// Tree scatter: rank 0's buffer, viewed as `size` chunks of `chunk`
    /// elements, is distributed so every rank ends with its own chunk at the
    /// start of its local buffer.
    ///
    /// Every rank must call this with the same `chunk` and a buffer large
    /// enough for the spans it relays (all-ranks `size * chunk` is the
    /// worst-case overestimate that always works). No-op for a single rank.
    pub fn scatter<T: Payload>(&self, buf: &mut [T], chunk: usize) -> Result<(), CommError> {
        if self.size() == 1 {
            return Ok(());
        }

        let mut control = self.size().next_power_of_two() / 2;
        while control >= 1 {
            if self.rank() % control == 0 {
                if (self.rank() / control) % 2 == 0 {
                    let dest = self.rank() + control;
                    if dest < self.size() {
                        let far = (dest + control).min(self.size());
                        let count = (far - dest) * chunk;
                        let start = control * chunk;
                        if start + count > buf.len() {
                            return Err(CommError::BufferTooSmall {
                                needed: start + count,
                                len: buf.len(),
                            });
                        }
                        self.send(dest, buf[start..start + count].to_vec())?;
                    }
                } else {
                    let src = self.rank() - control;
                    let far = (self.rank() + control).min(self.size());
                    let count = (far - self.rank()) * chunk;
                    if count > buf.len() {
                        return Err(CommError::BufferTooSmall {
                            needed: count,
                            len: buf.len(),
                        });
                    }
                    let items = self.recv::<T>(src, count)?;
                    buf[..count].copy_from_slice(&items);
                }
            }
            control /= 2;
        }
        Ok(())
    }

    /// Tree gather: the exact structural inverse of [`Endpoint::scatter`].
    /// Every rank contributes the chunk at the start of its local buffer;
    /// after the call rank 0 holds the full concatenation in rank order.
    pub fn gather<T: Payload>(&self, buf: &mut [T], chunk: usize) -> Result<(), CommError> {
        if self.size() == 1 {
            return Ok(());
        }

        let hipow2 = self.size().next_power_of_two();
        let mut control = 1;
        while control < hipow2 {
            if self.rank() % control == 0 {
                if (self.rank() / control) % 2 == 0 {
                    let src = self.rank() + control;
                    if src < self.size() {
                        let far = (src + control).min(self.size());
                        let count = (far - src) * chunk;
                        let start = control * chunk;
                        if start + count > buf.len() {
                            return Err(CommError::BufferTooSmall {
                                needed: start + count,
                                len: buf.len(),
                            });
                        }
                        let items = self.recv::<T>(src, count)?;
                        buf[start..start + count].copy_from_slice(&items);
                    }
                } else {
                    let dest = self.rank() - control;
                    let far = (self.rank() + control).min(self.size());
                    let count = (far - self.rank()) * chunk;
                    if count > buf.len() {
                        return Err(CommError::BufferTooSmall {
                            needed: count,
                            len: buf.len(),
                        });
                    }
                    self.send(dest, buf[..count].to_vec())?;
                }
            }
            control *= 2;
        }
        Ok(())
    }
}
