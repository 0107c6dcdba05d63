pub mod tse;
pub mod util;

pub use tse::TseHttpProvider;
