use {rapidhash::v3::rapidhash_v3, std::hash::Hasher};

/// Default hasher for ring positions.
///
/// This uses the rapidhash V3 algorithm with the default seed and secrets,
/// so positions are portable across platforms and major releases. Ring
/// placement must be stable: every process routing against the same host
/// set has to agree on where each virtual node lands.
#[derive(Default)]
pub struct RingHasher(Vec<u8>);

impl Hasher for RingHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        rapidhash_v3(&self.0)
    }
}
