use super::error::CommError;
use super::mesh::Endpoint;

impl Endpoint {
    /// Sends `outbound` to the right ring neighbor and returns the buffer
    /// received from the left one.
    ///
    /// Even ranks send first then receive; odd ranks receive first then send.
    /// The alternation keeps the ring deadlock-free on synchronous
    /// transports. Every participant must pass a buffer of the same length.
    /// With a single participant the exchange is the identity.
    pub fn ring_exchange(&self, outbound: &[u8]) -> Result<Vec<u8>, CommError> {
        if self.size() == 1 {
            return Ok(outbound.to_vec());
        }

        let right = (self.rank() + 1) % self.size();
        let left = if self.rank() == 0 {
            self.size() - 1
        } else {
            self.rank() - 1
        };

        if self.rank() % 2 == 0 {
            self.send(right, outbound.to_vec())?;
            self.recv::<u8>(left, outbound.len())
        } else {
            let inbound = self.recv::<u8>(left, outbound.len())?;
            self.send(right, outbound.to_vec())?;
            Ok(inbound)
        }
    }

    /// Collects one equally-sized item from every ring participant at rank 0,
    /// in rank order. Returns `None` on every other rank.
    ///
    /// This specializes the tree gather: each rank seeds its item as its own
    /// chunk and relays through the same binomial pattern.
    pub fn ring_gather(&self, item: &[u8]) -> Result<Option<Vec<u8>>, CommError> {
        if self.size() == 1 {
            return Ok(Some(item.to_vec()));
        }

        let mut buf = vec![0u8; self.size() * item.len()];
        buf[..item.len()].copy_from_slice(item);
        self.gather(&mut buf, item.len())?;

        if self.rank() == 0 {
            Ok(Some(buf))
        } else {
            Ok(None)
        }
    }
}
