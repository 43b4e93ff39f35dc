//! Log stream core (pure).
//!
//! [`ChunkBuffer`] stores fetched fragments; [`StreamCoordinator`] is the
//! polling state machine that decides which fetch to issue next. Neither
//! performs I/O: the impure shell forwards the coordinator's requests to the
//! fetch worker and pipes replies back.

pub mod chunk_buffer;
pub mod coordinator;

pub use chunk_buffer::ChunkBuffer;
pub use coordinator::{StreamCoordinator, StreamStatus};
