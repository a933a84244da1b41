//! Union-find over message positions

/// Disjoint-set forest with path halving and union by size.
///
/// Nodes are positions `0..len` in the date-sorted batch.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    pub fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Merge the sets containing `a` and `b`. Returns false if already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut root_a, mut root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        if self.size[root_a] < self.size[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }
        self.parent[root_b] = root_a;
        self.size[root_a] += self.size[root_b];
        true
    }

    /// Group nodes into components.
    ///
    /// Components are ordered by their smallest node and members are
    /// listed in ascending order, so the result depends only on the edges.
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.parent.len()];
        let mut components: Vec<Vec<usize>> = Vec::new();

        for node in 0..self.parent.len() {
            let root = self.find(node);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(node);
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut set = DisjointSet::new(3);
        assert_eq!(set.components(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_transitive_union() {
        let mut set = DisjointSet::new(5);
        assert!(set.union(3, 4));
        assert!(set.union(0, 4));
        assert!(!set.union(3, 0));

        assert_eq!(set.components(), vec![vec![0, 3, 4], vec![1], vec![2]]);
    }

    #[test]
    fn test_empty() {
        let mut set = DisjointSet::new(0);
        assert!(set.components().is_empty());
    }
}
