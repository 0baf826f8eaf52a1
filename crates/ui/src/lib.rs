pub mod dispatch;
pub mod state;
pub mod vm;

pub use dispatch::CommitDispatcher;
pub use state::ViewError;
