use super::{Node, Shape};

/// Result of peeling every wrapper off a node.
#[derive(Debug, Clone)]
pub struct Unwrapped {
    /// First non-wrapper node; may be an opaque scalar.
    pub innermost: Node,
    /// Traversed wrappers, outermost first. Empty if the node was not wrapped.
    pub wrappers: Vec<Node>,
}

impl Unwrapped {
    /// Wrappers followed by the innermost node: the registry lookup order.
    pub fn outermost_first(&self) -> impl Iterator<Item = &Node> {
        self.wrappers.iter().chain(std::iter::once(&self.innermost))
    }
}

pub fn unwrap_chain(node: &Node) -> Unwrapped {
    let mut wrappers = Vec::new();
    let mut current = node.clone();
    while let Shape::Wrapper(wrapper) = current.shape() {
        let inner = wrapper.inner().clone();
        wrappers.push(current);
        current = inner;
    }
    Unwrapped { innermost: current, wrappers }
}

pub fn unwrap(node: &Node) -> Node {
    unwrap_chain(node).innermost
}
