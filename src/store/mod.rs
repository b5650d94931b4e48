//! Persistence: workspace layout, chunk artifacts, the vector store, and the
//! conversation database.

pub mod chunks;
pub mod conversations;
pub mod vector;
pub mod workspace;

pub use conversations::ConversationStore;
pub use vector::VectorStore;
pub use workspace::Workspace;
