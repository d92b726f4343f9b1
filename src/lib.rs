//! Consistent-hash routing of keys to a dynamic set of backend hosts.
//!
//! Routing keys and host endpoints are both hashed onto the same circular
//! `u64` space. Each host is placed on the ring as many virtual nodes, and a
//! key is owned by the host whose virtual node is the first at or after the
//! key's position (wrapping around at the end of the space). When membership
//! changes, only the keys falling into the affected hosts' slices of the
//! ring are remapped; everything else keeps routing to its previous owner.
//!
//! The [`Ring`] is safe to share across threads: lookups are concurrent
//! reads, membership changes are exclusive writes, and each change appears
//! atomic to readers.
//!
//! # Example
//!
//! ```
//! use hostring::{HostEndpoint, Ring};
//!
//! let ring = Ring::new(vec![
//!     HostEndpoint::new("10.0.0.1", 46801),
//!     HostEndpoint::new("10.0.0.2", 46801),
//! ]);
//!
//! let owner = ring.lookup("topicA")?;
//! assert!(ring.hosts().contains(&owner));
//!
//! // Converge to a freshly discovered host list.
//! ring.reconcile(&[HostEndpoint::new("10.0.0.2", 46801)]);
//! assert_eq!(ring.lookup("topicA")?, HostEndpoint::new("10.0.0.2", 46801));
//! # Ok::<(), hostring::RingError>(())
//! ```

mod builder;
mod error;
mod hash;
mod host;
mod ring;

pub use {
    builder::RingBuilder,
    error::{RingError, RingResult},
    hash::RingHasher,
    host::HostEndpoint,
    ring::{DEFAULT_VIRTUAL_NODES, Ring, RingNode},
};
