//! The boolean dependency matrix and its transitive closure.

/// A dense n×n boolean matrix over an architecture's identifiers.
///
/// `get(i, j)` means identifier `i` drives identifier `j`. The matrix
/// starts as the identity (every identifier depends on itself) and is
/// closed by squaring under the boolean semiring until it reaches the
/// fixpoint M = M·M, at which point `get` answers reachability.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DepMatrix {
    n: usize,
    bits: Vec<bool>,
}

impl DepMatrix {
    /// Creates an identity matrix of the given size.
    pub fn identity(n: usize) -> Self {
        let mut bits = vec![false; n * n];
        for i in 0..n {
            bits[i * n + i] = true;
        }
        Self { n, bits }
    }

    /// The matrix dimension.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Marks a direct dependency: `master` drives `slave`.
    pub fn set(&mut self, master: usize, slave: usize) {
        self.bits[master * self.n + slave] = true;
    }

    /// Whether `master` drives (or, after closure, reaches) `slave`.
    pub fn get(&self, master: usize, slave: usize) -> bool {
        self.bits[master * self.n + slave]
    }

    /// Boolean matrix product `self · self`, saturated to 0/1.
    fn squared(&self) -> DepMatrix {
        let n = self.n;
        let mut out = DepMatrix {
            n,
            bits: vec![false; n * n],
        };
        for i in 0..n {
            for k in 0..n {
                if !self.get(i, k) {
                    continue;
                }
                for j in 0..n {
                    if self.get(k, j) {
                        out.bits[i * n + j] = true;
                    }
                }
            }
        }
        out
    }

    /// Closes the matrix transitively: squares until the fixpoint.
    ///
    /// Because each squaring doubles the reachable path length, the loop
    /// runs at most ⌈log₂ n⌉ + 1 times.
    pub fn close(&mut self) {
        loop {
            let next = self.squared();
            if next == *self {
                break;
            }
            *self = next;
        }
    }

    /// Whether the matrix equals its own square.
    pub fn is_closed(&self) -> bool {
        self.squared() == *self
    }
}
