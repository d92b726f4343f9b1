use {
    super::{RingError, RingResult, hash::RingHasher},
    parking_lot::RwLock,
    std::{
        collections::BTreeMap,
        fmt,
        hash::{BuildHasher, BuildHasherDefault},
    },
    tracing::{debug, trace},
};

/// Default number of virtual nodes placed on the ring per host.
pub const DEFAULT_VIRTUAL_NODES: usize = 1000;

/// Node that can be placed on the ring.
///
/// The `Display` rendering is the node's identity: it is folded into each
/// virtual node key before hashing, so nodes that render the same occupy
/// the same ring positions.
pub trait RingNode: fmt::Display + Clone + PartialEq {}

impl<T> RingNode for T where T: fmt::Display + Clone + PartialEq {}

/// Positions and membership, swapped out wholesale on [`Ring::rebuild`].
struct RingState<N> {
    /// Ring position to owning host. The key space is circular: the entry
    /// with the smallest position is the successor of the largest.
    positions: BTreeMap<u64, N>,

    /// Current membership, in insertion order, without duplicates.
    members: Vec<N>,
}

/// Consistent-hash ring mapping routing keys to backend hosts.
///
/// Each host is projected onto the ring as [`Ring::virtual_nodes`] positions
/// to smooth load distribution. A key resolves to the owner of the first
/// position at or after the key's own hash, wrapping to the smallest
/// position when the key hashes past the end.
///
/// The ring is shared state: lookups take a read lock and mutations a write
/// lock, so a membership change is atomic from the perspective of concurrent
/// readers. Membership changes only move keys that fall into the affected
/// hosts' slices of the ring; everything else keeps resolving to its
/// previous owner.
pub struct Ring<N: RingNode, H: BuildHasher = BuildHasherDefault<RingHasher>> {
    state: RwLock<RingState<N>>,
    virtual_nodes: usize,
    build_hasher: H,
}

impl<N: RingNode> Ring<N> {
    /// Creates a ring over the given hosts with the default hasher and
    /// virtual node count.
    pub fn new<I: IntoIterator<Item = N>>(hosts: I) -> Self {
        Self::with_build_hasher(
            BuildHasherDefault::default(),
            hosts.into_iter().collect(),
            DEFAULT_VIRTUAL_NODES,
        )
    }
}

impl<N: RingNode, H: BuildHasher> Ring<N, H> {
    /// Creates a ring with an explicit hasher and virtual node count.
    ///
    /// The builder validates `virtual_nodes` before calling this.
    pub(crate) fn with_build_hasher(build_hasher: H, hosts: Vec<N>, virtual_nodes: usize) -> Self {
        let ring = Self {
            state: RwLock::new(RingState {
                positions: BTreeMap::new(),
                members: Vec::new(),
            }),
            virtual_nodes,
            build_hasher,
        };
        ring.rebuild(hosts);
        ring
    }

    /// Returns the host owning the given routing key.
    ///
    /// Resolves to the owner of the smallest ring position at or after the
    /// key's hash, wrapping around to the ring's first position when the key
    /// hashes past every stored position. Deterministic: the same key against
    /// the same membership always resolves to the same host.
    ///
    /// Fails with [`RingError::EmptyRing`] when no hosts are present.
    pub fn lookup(&self, key: &str) -> RingResult<N> {
        let position = self.position(key);
        let state = self.state.read();
        let owner = state
            .positions
            .range(position..)
            .next()
            .or_else(|| state.positions.iter().next())
            .map(|(_, owner)| owner.clone())
            .ok_or(RingError::EmptyRing)?;
        trace!(key, position, owner = %owner, "key resolved");
        Ok(owner)
    }

    /// Discards all prior state and repopulates the ring from `hosts`.
    pub fn rebuild<I: IntoIterator<Item = N>>(&self, hosts: I) {
        let mut state = self.state.write();
        state.positions.clear();
        state.members.clear();
        for host in hosts {
            self.join(&mut state, host);
        }
        debug!(hosts = state.members.len(), "ring rebuilt");
    }

    /// Adds a single host and places its virtual nodes on the ring.
    ///
    /// Tolerates a host that is already a member: membership is unchanged
    /// and its virtual nodes are re-placed onto the same positions.
    pub fn add_host(&self, host: N) {
        let mut state = self.state.write();
        self.join(&mut state, host);
    }

    /// Adds every host in `hosts` to the ring.
    ///
    /// Virtual nodes are re-placed for the full resulting membership, not
    /// just the newly added hosts. Re-placing an existing host overwrites
    /// its positions with the same owner, so the operation is idempotent,
    /// and the overwrite order under position collisions matches a full
    /// rebuild.
    pub fn add_hosts<I: IntoIterator<Item = N>>(&self, hosts: I) {
        let mut state = self.state.write();
        self.extend(&mut state, hosts);
    }

    /// Removes a host and its virtual nodes from the ring.
    ///
    /// Positions are found by re-hashing the host's virtual node keys rather
    /// than tracked per host. If another host's virtual node had collided
    /// onto one of these positions and overwritten it, that entry is removed
    /// too, leaving the surviving host short one virtual node. With a
    /// 64-bit, well-distributed hash this is vanishingly rare and accepted
    /// as a known limitation.
    pub fn remove_host(&self, host: &N) {
        let mut state = self.state.write();
        self.evict(&mut state, host);
    }

    /// Removes every host in `hosts` from the ring.
    pub fn remove_hosts(&self, hosts: &[N]) {
        let mut state = self.state.write();
        for host in hosts {
            self.evict(&mut state, host);
        }
    }

    /// Converges membership to a freshly observed host list.
    ///
    /// Hosts missing from the ring are added, hosts absent from `hosts` are
    /// removed, and everything else keeps its positions, so only the changed
    /// hosts' slices of the key space are remapped. The whole transition is
    /// applied under one write lock and appears atomic to readers.
    pub fn reconcile(&self, hosts: &[N]) {
        let mut state = self.state.write();
        let to_add: Vec<N> = hosts
            .iter()
            .filter(|host| !state.members.contains(host))
            .cloned()
            .collect();
        let to_remove: Vec<N> = state
            .members
            .iter()
            .filter(|member| !hosts.contains(member))
            .cloned()
            .collect();
        self.extend(&mut state, to_add);
        for host in &to_remove {
            self.evict(&mut state, host);
        }
    }

    /// Returns the ring position a key hashes to.
    pub fn position(&self, key: &str) -> u64 {
        self.build_hasher.hash_one(key)
    }

    /// Returns the current membership.
    pub fn hosts(&self) -> Vec<N> {
        self.state.read().members.clone()
    }

    /// Number of hosts currently in the ring.
    pub fn len(&self) -> usize {
        self.state.read().members.len()
    }

    /// Whether the ring has no hosts.
    pub fn is_empty(&self) -> bool {
        self.state.read().members.is_empty()
    }

    /// Number of occupied ring positions.
    ///
    /// Normally `virtual_nodes * len()`; position collisions reduce it.
    pub fn entries(&self) -> usize {
        self.state.read().positions.len()
    }

    /// Number of virtual nodes placed per host.
    pub fn virtual_nodes(&self) -> usize {
        self.virtual_nodes
    }

    fn join(&self, state: &mut RingState<N>, host: N) {
        self.place(&mut state.positions, &host);
        if !state.members.contains(&host) {
            debug!(host = %host, "host added to ring");
            state.members.push(host);
        }
    }

    fn extend<I: IntoIterator<Item = N>>(&self, state: &mut RingState<N>, hosts: I) {
        for host in hosts {
            if !state.members.contains(&host) {
                debug!(host = %host, "host added to ring");
                state.members.push(host);
            }
        }
        let RingState { positions, members } = state;
        for host in members.iter() {
            self.place(positions, host);
        }
    }

    fn evict(&self, state: &mut RingState<N>, host: &N) {
        state.members.retain(|member| member != host);
        for index in 0..self.virtual_nodes {
            let position = self.position(&virtual_key(host, index));
            state.positions.remove(&position);
        }
        debug!(host = %host, "host removed from ring");
    }

    fn place(&self, positions: &mut BTreeMap<u64, N>, host: &N) {
        for index in 0..self.virtual_nodes {
            let position = self.position(&virtual_key(host, index));
            positions.insert(position, host.clone());
        }
    }
}

/// Key a virtual node is hashed under: replica index plus host identity.
fn virtual_key<N: RingNode>(host: &N, index: usize) -> String {
    format!("virtual&&{index}&&{host}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_key_format() {
        assert_eq!(
            virtual_key(&"10.0.0.1:46801".to_string(), 7),
            "virtual&&7&&10.0.0.1:46801"
        );
    }

    #[test]
    fn places_virtual_nodes_per_host() {
        let ring = Ring::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.entries(), 2 * DEFAULT_VIRTUAL_NODES);
        assert_eq!(ring.virtual_nodes(), DEFAULT_VIRTUAL_NODES);
    }

    #[test]
    fn duplicate_add_is_idempotent() {
        let ring = Ring::new(vec!["a".to_string()]);
        ring.add_host("a".to_string());
        ring.add_hosts(vec!["a".to_string(), "a".to_string()]);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.entries(), DEFAULT_VIRTUAL_NODES);
    }

    #[test]
    fn rebuild_replaces_state() {
        let ring = Ring::new(vec!["a".to_string(), "b".to_string()]);
        ring.rebuild(vec!["c".to_string()]);
        assert_eq!(ring.hosts(), vec!["c".to_string()]);
        assert_eq!(ring.entries(), DEFAULT_VIRTUAL_NODES);
    }

    #[test]
    fn remove_unknown_host_is_noop() {
        let ring = Ring::new(vec!["a".to_string()]);
        ring.remove_host(&"b".to_string());
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.entries(), DEFAULT_VIRTUAL_NODES);
    }

    #[test]
    fn empty_ring_fails_lookup() {
        let ring = Ring::<String>::new(vec![]);
        assert_eq!(ring.lookup("topicA"), Err(RingError::EmptyRing));

        ring.add_host("a".to_string());
        assert!(ring.lookup("topicA").is_ok());

        ring.remove_host(&"a".to_string());
        assert_eq!(ring.lookup("topicA"), Err(RingError::EmptyRing));
    }
}
