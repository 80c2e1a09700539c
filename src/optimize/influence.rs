//! Reverse-dependency recording and invalidation of influenced methods.
//!
//! Method facts are not computed in one linear bottom-up sweep: a fact change in a callee
//! can invalidate facts already computed for every caller of that callee. The
//! [`CallRegistry`] records caller edges as the analysis pass visits call sites, and the
//! [`InfluencedMethodTraveller`] replays them when a method's facts change, resetting each
//! recorded caller to conservative facts and forwarding it for re-analysis.
//!
//! Several method handles can be linked into one analysis unit (overriding and bridged
//! methods the framework treats as one). Alias groups are an explicit union-find keyed by
//! [`MethodId`], and caller sets are indexed by group root - invalidating through any alias
//! therefore surfaces the identical caller set by construction.
//!
//! The traveller performs exactly one expansion step (direct callers only). Running the
//! propagation to a global fixed point is the enclosing optimization loop's contract.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::{
    metadata::{ClassPool, MemberVisitor, MethodId},
    optimize::{
        events::{Event, EventLog},
        info::{MethodOptimizationInfo, ProgramMethodOptimizationInfo},
    },
    Result,
};

/// Records caller edges per callee alias group.
///
/// All lookups on unregistered methods return empty, never fail; recording
/// against an unseen callee creates a singleton group on first sight, so the
/// order of linking and edge recording is immaterial.
#[derive(Debug, Default)]
pub struct CallRegistry {
    nodes: HashMap<MethodId, u32>,
    parent: Vec<u32>,
    members: HashMap<u32, Vec<MethodId>>,
    callers: HashMap<u32, IndexSet<MethodId>>,
}

impl CallRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, method: MethodId) -> u32 {
        if let Some(&n) = self.nodes.get(&method) {
            return n;
        }
        let n = self.parent.len() as u32;
        self.parent.push(n);
        self.nodes.insert(method, n);
        self.members.insert(n, vec![method]);
        n
    }

    fn find(&self, mut n: u32) -> u32 {
        while self.parent[n as usize] != n {
            n = self.parent[n as usize];
        }
        n
    }

    fn find_compress(&mut self, n: u32) -> u32 {
        let root = self.find(n);
        let mut cur = n;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Registers a method handle, creating its singleton alias group if it
    /// was never seen.
    pub fn register(&mut self, method: MethodId) {
        self.node(method);
    }

    /// Links two method handles into one analysis unit.
    ///
    /// Their alias groups are merged, along with the caller sets recorded
    /// against either.
    pub fn link(&mut self, a: MethodId, b: MethodId) {
        let na = self.node(a);
        let ra = self.find_compress(na);
        let nb = self.node(b);
        let rb = self.find_compress(nb);
        if ra == rb {
            return;
        }

        // merge the smaller group into the larger one
        let len = |r: u32| self.members.get(&r).map_or(0, Vec::len);
        let (winner, loser) = if len(ra) >= len(rb) { (ra, rb) } else { (rb, ra) };

        self.parent[loser as usize] = winner;
        let moved = self.members.remove(&loser).unwrap_or_default();
        self.members.entry(winner).or_default().extend(moved);
        if let Some(moved_callers) = self.callers.remove(&loser) {
            self.callers.entry(winner).or_default().extend(moved_callers);
        }
    }

    /// Records that `caller` contains a call site targeting `callee`.
    pub fn record_call(&mut self, callee: MethodId, caller: MethodId) {
        let n = self.node(callee);
        let root = self.find_compress(n);
        self.callers.entry(root).or_default().insert(caller);
    }

    /// The recorded callers of the method's alias group, in recording order.
    ///
    /// Empty for methods that were never registered or never called.
    pub fn callers_of(&self, method: MethodId) -> impl Iterator<Item = MethodId> + '_ {
        self.nodes
            .get(&method)
            .map(|&n| self.find(n))
            .and_then(|root| self.callers.get(&root))
            .into_iter()
            .flatten()
            .copied()
    }

    /// The number of recorded callers of the method's alias group.
    #[must_use]
    pub fn caller_count(&self, method: MethodId) -> usize {
        self.callers_of(method).count()
    }

    /// Every method handle in the same alias group, the queried one included.
    ///
    /// Empty for methods that were never registered.
    pub fn aliases_of(&self, method: MethodId) -> impl Iterator<Item = MethodId> + '_ {
        self.nodes
            .get(&method)
            .map(|&n| self.find(n))
            .and_then(|root| self.members.get(&root))
            .into_iter()
            .flatten()
            .copied()
    }
}

/// Resets and re-queues the recorded callers of a method whose facts changed.
///
/// Each caller receives a fresh conservative fact record (whole-record
/// replacement, bumping its revision) and is forwarded to the downstream
/// visitor, which typically schedules it for re-analysis. One expansion step
/// only; the fixed point belongs to the enclosing loop.
#[derive(Debug)]
pub struct InfluencedMethodTraveller<'a, V> {
    registry: &'a CallRegistry,
    next: V,
    events: EventLog,
}

impl<'a, V: MemberVisitor> InfluencedMethodTraveller<'a, V> {
    /// Creates a traveller over the given registry, forwarding to `next`.
    #[must_use]
    pub fn new(registry: &'a CallRegistry, next: V) -> Self {
        Self {
            registry,
            next,
            events: EventLog::new(),
        }
    }

    /// The events recorded by this traveller so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Unwraps the traveller, returning the downstream visitor.
    #[must_use]
    pub fn into_inner(self) -> V {
        self.next
    }
}

impl<V: MemberVisitor> MemberVisitor for InfluencedMethodTraveller<'_, V> {
    fn visit_method(&mut self, pool: &mut ClassPool, method: MethodId) -> Result<()> {
        let callers: Vec<MethodId> = self.registry.callers_of(method).collect();

        for &caller in &callers {
            let slots = pool.method(caller).parameter_value_count();
            pool.method_mut(caller)
                .set_optimization_info(MethodOptimizationInfo::Program(
                    ProgramMethodOptimizationInfo::conservative(slots),
                ));
            self.next.visit_method(pool, caller)?;
        }

        tracing::debug!(callee = %method, callers = callers.len(), "invalidated callers");
        self.events.record(Event::CallersInvalidated {
            callee: method,
            callers: callers.len(),
        });
        Ok(())
    }
}
