pub mod elements;
pub mod ring;
pub mod store;

pub use elements::{Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
pub use ring::{Link, Linked, Ring};
pub use store::MeshStore;
