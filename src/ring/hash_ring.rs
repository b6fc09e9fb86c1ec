use std::collections::BTreeMap;

/// Hash used both for virtual points and for lookup keys.
pub type HashFn = fn(&[u8]) -> u32;

/// CRC-32 (IEEE) checksum.
pub fn default_hash(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

#[derive(Debug, Clone)]
pub struct HashRing {
    /// Ring position -> owning node.
    points: BTreeMap<u32, String>,
    replicas: usize,
    hash: HashFn,
}

impl HashRing {
    /// Builds a ring over `nodes`, placing `replicas` virtual points per node.
    ///
    /// Point `i` of node `id` is `hash(format!("{i}{id}"))`. Nodes are placed
    /// in sorted order and the first node to claim a position keeps it, so
    /// every member builds the same ring regardless of peer list order.
    pub fn build<I, S>(nodes: I, replicas: usize, hash: HashFn) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = nodes.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();

        let mut points = BTreeMap::new();
        for id in &ids {
            for i in 0..replicas {
                let position = hash(format!("{}{}", i, id).as_bytes());
                points.entry(position).or_insert_with(|| id.clone());
            }
        }

        tracing::debug!(
            "Built hash ring: {} nodes, {} virtual points",
            ids.len(),
            points.len()
        );

        Self {
            points,
            replicas,
            hash,
        }
    }

    /// Owner of `key`: the first point clockwise from the key's hash,
    /// wrapping to the smallest point. `None` when the ring has no nodes.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let hash = (self.hash)(key.as_bytes());

        self.points
            .range(hash..)
            .next()
            .or_else(|| self.points.iter().next())
            .map(|(_, node)| node.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of virtual points actually on the ring.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}
