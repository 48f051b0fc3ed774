//! Schema node tree: the data-shape description a document is built from.
//!
//! A [`Node`] is a shared handle. Cloning it does not copy the shape, and
//! the clone is the *same* node as far as the field option registry is
//! concerned; building a node twice yields two distinct nodes even when the
//! shapes are equal.
pub mod unwrap;

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

pub use unwrap::{unwrap_chain, Unwrapped};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone)]
pub struct Node(Arc<Shape>);

pub type Fields = IndexMap<String, Node>;

pub enum Shape {
    /// Field order is the selection order.
    Object(Fields),
    Array(Node),
    Tuple { items: Vec<Node>, rest: Option<Node> },
    TaggedUnion(TaggedUnion),
    Leaf(Leaf),
    /// Validated locally, selected as a plain scalar; never expanded.
    OpaqueScalar(Node),
    Wrapper(Wrapper),
}

pub struct TaggedUnion {
    pub discriminator: String,
    /// Object variants, each holding a literal under `discriminator`.
    pub variants: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    String,
    Number,
    Boolean,
    Null,
    /// Always absent; such a field is left out of the selection.
    Undefined,
    Literal(Literal),
    /// Union of primitive nodes. Selected like any scalar.
    Union(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Null,
}

/// Single-child decorators that do not change what gets selected.
pub enum Wrapper {
    Nullable(Node),
    Deferred(Deferred),
    /// Validated through the inner shape, then post-processed by the caller.
    Transformed(Node),
    ReadOnly(Node),
}

/// Inner node produced on first access and memoized; this is how
/// self-referential shapes are written.
pub struct Deferred {
    resolved: OnceCell<Node>,
    thunk: Box<dyn Fn() -> Node + Send + Sync>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    Nullable,
    Deferred,
    Transformed,
    ReadOnly,
}

/// Classification of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    Tuple,
    TaggedUnion,
    Leaf,
    OpaqueScalar,
    Wrapper(WrapperKind),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Node {
    pub fn new(shape: Shape) -> Self {
        Self(Arc::new(shape))
    }
    pub fn shape(&self) -> &Shape {
        &self.0
    }
    pub fn kind(&self) -> NodeKind {
        match self.shape() {
            Shape::Object(_) => NodeKind::Object,
            Shape::Array(_) => NodeKind::Array,
            Shape::Tuple { .. } => NodeKind::Tuple,
            Shape::TaggedUnion(_) => NodeKind::TaggedUnion,
            Shape::Leaf(_) => NodeKind::Leaf,
            Shape::OpaqueScalar(_) => NodeKind::OpaqueScalar,
            Shape::Wrapper(w) => NodeKind::Wrapper(w.kind()),
        }
    }
    pub fn is_opaque_scalar(&self) -> bool {
        matches!(self.shape(), Shape::OpaqueScalar(_))
    }
    pub fn is_undefined(&self) -> bool {
        matches!(self.shape(), Shape::Leaf(Leaf::Undefined))
    }
    pub fn fields(&self) -> Option<&Fields> {
        match self.shape() {
            Shape::Object(fields) => Some(fields),
            _ => None,
        }
    }
    /// Same allocation, i.e. the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // Identity plumbing for the registry.
    pub(crate) fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
    pub(crate) fn downgrade(&self) -> Weak<Shape> {
        Arc::downgrade(&self.0)
    }

    pub fn nullable(self) -> Node {
        nullable(self)
    }
    pub fn transformed(self) -> Node {
        transformed(self)
    }
    pub fn read_only(self) -> Node {
        read_only(self)
    }
}

impl Wrapper {
    pub fn kind(&self) -> WrapperKind {
        match self {
            Wrapper::Nullable(_) => WrapperKind::Nullable,
            Wrapper::Deferred(_) => WrapperKind::Deferred,
            Wrapper::Transformed(_) => WrapperKind::Transformed,
            Wrapper::ReadOnly(_) => WrapperKind::ReadOnly,
        }
    }
    /// The single child. Resolves (and memoizes) a deferred child.
    pub fn inner(&self) -> &Node {
        match self {
            Wrapper::Nullable(inner) | Wrapper::Transformed(inner) | Wrapper::ReadOnly(inner) => inner,
            Wrapper::Deferred(deferred) => deferred.resolve(),
        }
    }
}

impl Deferred {
    pub fn new(thunk: impl Fn() -> Node + Send + Sync + 'static) -> Self {
        Self { resolved: OnceCell::new(), thunk: Box::new(thunk) }
    }
    pub fn resolve(&self) -> &Node {
        self.resolved.get_or_init(|| (self.thunk)())
    }
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl TaggedUnion {
    /// Tag of the variant at `index`, as written after `... on`.
    ///
    /// `None` when the variant is not an object or its discriminator field
    /// is not a non-null literal.
    pub fn tag(&self, index: usize) -> Option<String> {
        let variant = unwrap::unwrap(self.variants.get(index)?);
        let field = variant.fields()?.get(&self.discriminator)?;
        match unwrap::unwrap(field).shape() {
            Shape::Leaf(Leaf::Literal(literal)) => literal.as_tag(),
            _ => None,
        }
    }
}

impl Literal {
    fn as_tag(&self) -> Option<String> {
        match self {
            Literal::String(s) => Some(s.clone()),
            Literal::Number(n) => Some(n.to_string()),
            Literal::Boolean(b) => Some(b.to_string()),
            Literal::Null => None,
        }
    }
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Tuple => "tuple",
            NodeKind::TaggedUnion => "tagged union",
            NodeKind::Leaf => "leaf",
            NodeKind::OpaqueScalar => "opaque scalar",
            NodeKind::Wrapper(WrapperKind::Nullable) => "nullable",
            NodeKind::Wrapper(WrapperKind::Deferred) => "deferred",
            NodeKind::Wrapper(WrapperKind::Transformed) => "transformed",
            NodeKind::Wrapper(WrapperKind::ReadOnly) => "read-only",
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape() {
            Shape::Object(fields) => f.debug_map().entries(fields.iter()).finish(),
            Shape::Array(element) => f.debug_tuple("Array").field(element).finish(),
            Shape::Tuple { items, rest } => f.debug_struct("Tuple").field("items", items).field("rest", rest).finish(),
            Shape::TaggedUnion(u) => f
                .debug_struct("TaggedUnion")
                .field("discriminator", &u.discriminator)
                .field("variants", &u.variants)
                .finish(),
            Shape::Leaf(leaf) => fmt::Debug::fmt(leaf, f),
            Shape::OpaqueScalar(_) => f.write_str("OpaqueScalar(..)"),
            Shape::Wrapper(Wrapper::Deferred(d)) if !d.is_resolved() => f.write_str("Deferred(..)"),
            Shape::Wrapper(w) => f.debug_tuple(self.kind().name()).field(w.inner()).finish(),
        }
    }
}

// Structural equality is not node identity; compare handles.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

pub fn object<K, I>(fields: I) -> Node
where
    I: IntoIterator<Item = (K, Node)>,
    K: Into<String>,
{
    Node::new(Shape::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect()))
}

pub fn array(element: Node) -> Node {
    Node::new(Shape::Array(element))
}

pub fn tuple(items: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Shape::Tuple { items: items.into_iter().collect(), rest: None })
}

pub fn tuple_with_rest(items: impl IntoIterator<Item = Node>, rest: Node) -> Node {
    Node::new(Shape::Tuple { items: items.into_iter().collect(), rest: Some(rest) })
}

pub fn tagged_union(discriminator: impl Into<String>, variants: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Shape::TaggedUnion(TaggedUnion {
        discriminator: discriminator.into(),
        variants: variants.into_iter().collect(),
    }))
}

pub fn string() -> Node {
    Node::new(Shape::Leaf(Leaf::String))
}

pub fn number() -> Node {
    Node::new(Shape::Leaf(Leaf::Number))
}

pub fn boolean() -> Node {
    Node::new(Shape::Leaf(Leaf::Boolean))
}

pub fn null() -> Node {
    Node::new(Shape::Leaf(Leaf::Null))
}

pub fn undefined() -> Node {
    Node::new(Shape::Leaf(Leaf::Undefined))
}

pub fn literal(value: impl Into<Literal>) -> Node {
    Node::new(Shape::Leaf(Leaf::Literal(value.into())))
}

pub fn union(options: impl IntoIterator<Item = Node>) -> Node {
    Node::new(Shape::Leaf(Leaf::Union(options.into_iter().collect())))
}

/// Wrap a shape that must be selected as a scalar even if it is an object.
pub fn custom_scalar(inner: Node) -> Node {
    Node::new(Shape::OpaqueScalar(inner))
}

pub fn nullable(inner: Node) -> Node {
    Node::new(Shape::Wrapper(Wrapper::Nullable(inner)))
}

pub fn lazy(thunk: impl Fn() -> Node + Send + Sync + 'static) -> Node {
    Node::new(Shape::Wrapper(Wrapper::Deferred(Deferred::new(thunk))))
}

pub fn transformed(inner: Node) -> Node {
    Node::new(Shape::Wrapper(Wrapper::Transformed(inner)))
}

pub fn read_only(inner: Node) -> Node {
    Node::new(Shape::Wrapper(Wrapper::ReadOnly(inner)))
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self { Literal::String(value.to_owned()) }
}
impl From<String> for Literal {
    fn from(value: String) -> Self { Literal::String(value) }
}
impl From<bool> for Literal {
    fn from(value: bool) -> Self { Literal::Boolean(value) }
}
impl From<i64> for Literal {
    fn from(value: i64) -> Self { Literal::Number(value.into()) }
}
impl From<serde_json::Number> for Literal {
    fn from(value: serde_json::Number) -> Self { Literal::Number(value) }
}
impl From<()> for Literal {
    fn from(_: ()) -> Self { Literal::Null }
}
