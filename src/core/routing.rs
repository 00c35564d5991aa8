//! Signal routing model: source → [effect] → analyser → output.
//!
//! Rewiring is planned as a flat list of disconnect/connect operations that
//! the audio backend replays verbatim. Every plan tears down the old chain
//! before building the new one, so a source is never routed through two
//! effect chains at once. `RoutingGraph` mirrors the live graph and rejects a
//! connect from a node that still has an outgoing edge.

use super::error::{PadError, PadResult};
use super::mapping::{EffectKind, SourceKind};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Synth,
    Microphone,
    Delay,
    Reverb,
    PitchShift,
    Lowpass,
    Analyser,
    Output,
}

impl Node {
    pub fn for_source(source: SourceKind) -> Node {
        match source {
            SourceKind::Oscillator => Node::Synth,
            SourceKind::Microphone => Node::Microphone,
        }
    }

    pub fn for_effect(effect: EffectKind) -> Option<Node> {
        match effect {
            EffectKind::None => None,
            EffectKind::Delay => Some(Node::Delay),
            EffectKind::Reverb => Some(Node::Reverb),
            EffectKind::PitchShift => Some(Node::PitchShift),
            EffectKind::Lowpass => Some(Node::Lowpass),
        }
    }

    pub fn is_effect(&self) -> bool {
        matches!(
            self,
            Node::Delay | Node::Reverb | Node::PitchShift | Node::Lowpass
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireOp {
    /// Drop every outgoing edge of the node.
    Disconnect(Node),
    Connect(Node, Node),
}

pub type WirePlan = SmallVec<[WireOp; 6]>;

/// The active source and effect selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub source: SourceKind,
    pub effect: EffectKind,
}

impl Route {
    pub fn new(source: SourceKind, effect: EffectKind) -> Self {
        Self { source, effect }
    }

    /// Nodes from source to output, in signal order.
    pub fn chain(&self) -> SmallVec<[Node; 4]> {
        let mut nodes = SmallVec::new();
        nodes.push(Node::for_source(self.source));
        if let Some(fx) = Node::for_effect(self.effect) {
            nodes.push(fx);
        }
        nodes.push(Node::Analyser);
        nodes.push(Node::Output);
        nodes
    }
}

/// Operations that build `route` on an empty graph.
pub fn plan_initial(route: Route) -> WirePlan {
    let chain = route.chain();
    chain
        .windows(2)
        .map(|pair| WireOp::Connect(pair[0], pair[1]))
        .collect()
}

/// Operations that move the live graph from `old` to `new`.
///
/// The analyser → output edge is shared and never touched.
pub fn plan_rewire(old: Route, new: Route) -> WirePlan {
    let mut plan = WirePlan::new();
    if old == new {
        return plan;
    }
    plan.push(WireOp::Disconnect(Node::for_source(old.source)));
    if let Some(fx) = Node::for_effect(old.effect) {
        plan.push(WireOp::Disconnect(fx));
    }
    let chain = new.chain();
    for pair in chain.windows(2) {
        if pair[0] == Node::Analyser {
            break;
        }
        plan.push(WireOp::Connect(pair[0], pair[1]));
    }
    plan
}

/// Re-issue the source's first edge after its node was (re)created.
pub fn plan_reattach(route: Route) -> WirePlan {
    let chain = route.chain();
    let mut plan = WirePlan::new();
    plan.push(WireOp::Disconnect(chain[0]));
    plan.push(WireOp::Connect(chain[0], chain[1]));
    plan
}

/// Edge-set model of the audio graph.
#[derive(Clone, Debug, Default)]
pub struct RoutingGraph {
    edges: SmallVec<[(Node, Node); 8]>,
}

impl RoutingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: WireOp) -> PadResult<()> {
        match op {
            WireOp::Disconnect(node) => {
                self.edges.retain(|(from, _)| *from != node);
                Ok(())
            }
            WireOp::Connect(from, to) => {
                if from == to {
                    return Err(PadError::GraphWiring(format!("{:?} into itself", from)));
                }
                if let Some((_, existing)) = self.edges.iter().find(|(f, _)| *f == from) {
                    return Err(PadError::GraphWiring(format!(
                        "{:?} already feeds {:?}; disconnect before connecting to {:?}",
                        from, existing, to
                    )));
                }
                self.edges.push((from, to));
                Ok(())
            }
        }
    }

    /// Apply a plan, stopping at the first rejected operation.
    pub fn apply_all(&mut self, plan: &[WireOp]) -> PadResult<()> {
        for op in plan {
            self.apply(*op)?;
        }
        Ok(())
    }

    pub fn edges(&self) -> &[(Node, Node)] {
        &self.edges
    }

    pub fn is_connected(&self, from: Node, to: Node) -> bool {
        self.edges.iter().any(|e| *e == (from, to))
    }

    /// Follow outgoing edges from `start` until a node with none.
    pub fn path_from(&self, start: Node) -> SmallVec<[Node; 4]> {
        let mut path = SmallVec::new();
        let mut cur = start;
        path.push(cur);
        while let Some((_, next)) = self.edges.iter().find(|(f, _)| *f == cur) {
            if path.contains(next) {
                break;
            }
            path.push(*next);
            cur = *next;
        }
        path
    }

    /// Effect nodes that currently carry signal from `source`.
    pub fn effects_on_path(&self, source: Node) -> SmallVec<[Node; 2]> {
        self.path_from(source)
            .into_iter()
            .filter(|n| n.is_effect())
            .collect()
    }
}
