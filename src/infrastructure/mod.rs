pub mod automation;
pub mod operator_signal;
pub mod page_driver;

#[cfg(test)]
pub(crate) mod mock;

pub use automation::{Automation, Locator};
pub use operator_signal::{stdin_signal, ChannelSignal, OperatorSignal};
pub use page_driver::PageDriver;
