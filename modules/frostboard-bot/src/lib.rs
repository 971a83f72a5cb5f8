pub mod extract;
pub mod intake;
pub mod ledger;
pub mod nickname;
pub mod parse;
pub mod pin;
pub mod reconcile;
pub mod render;
pub mod transcript;
pub mod traits;
pub mod upload;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
