mod adapter;
mod store;

pub use adapter::{Binding, ChangeEvent, ChangeTarget, DirectBinding, SharedValue};
pub use store::{FormStore, NativeChange, Registration};
