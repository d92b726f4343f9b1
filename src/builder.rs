use {
    super::{Ring, RingError, RingNode, RingResult, hash::RingHasher, ring::DEFAULT_VIRTUAL_NODES},
    std::hash::{BuildHasher, BuildHasherDefault},
};

/// Ring builder.
pub struct RingBuilder<N: RingNode, H: BuildHasher = BuildHasherDefault<RingHasher>> {
    hosts: Vec<N>,
    virtual_nodes: usize,
    build_hasher: H,
}

impl<N: RingNode> RingBuilder<N> {
    /// Create new ring builder over the initial hosts.
    pub fn new<I: IntoIterator<Item = N>>(hosts: I) -> Self {
        Self::with_build_hasher(hosts, BuildHasherDefault::default())
    }
}

impl<N: RingNode, H: BuildHasher> RingBuilder<N, H> {
    /// Create new ring builder with a custom hasher.
    ///
    /// All routing processes sharing a host set must agree on the hasher,
    /// otherwise they will place virtual nodes at different positions.
    pub fn with_build_hasher<I>(hosts: I, build_hasher: H) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        Self {
            hosts: hosts.into_iter().collect(),
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            build_hasher,
        }
    }

    /// Override the number of virtual nodes placed per host.
    ///
    /// More virtual nodes smooth the key distribution at the cost of memory
    /// and mutation time.
    pub fn with_virtual_nodes(mut self, virtual_nodes: usize) -> Self {
        self.virtual_nodes = virtual_nodes;
        self
    }

    /// Build the ring.
    ///
    /// Fails with [`RingError::NoVirtualNodes`] when the virtual node count
    /// has been set to zero.
    pub fn build(self) -> RingResult<Ring<N, H>> {
        if self.virtual_nodes == 0 {
            return Err(RingError::NoVirtualNodes);
        }
        Ok(Ring::with_build_hasher(
            self.build_hasher,
            self.hosts,
            self.virtual_nodes,
        ))
    }
}
