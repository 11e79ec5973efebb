//! spacedash-reactive — explicit input → output bindings.
//!
//! A [`BindingRegistry`] maps each named output to a pure callback and the
//! ordered list of named inputs it reads. A [`Dispatcher`] holds the
//! current value of every input; when an input changes it re-evaluates
//! exactly the bindings subscribed to it and stores their results in the
//! output slots.
//!
//! ```text
//! set_input("site", v)
//!   │
//!   ├── value unchanged? → nothing refreshed
//!   │
//!   ├── for each binding reading "site":
//!   │     gather its inputs in declared order (v for "site")
//!   │     callback(&context, &values) → staged result
//!   │
//!   ├── any callback failed? → error, nothing stored
//!   │
//!   ├── store v, move staged results into the output slots
//!   │
//!   ▼
//! ids of refreshed outputs
//! ```
//!
//! Callbacks receive a shared application context `C` and return an
//! output `F`; the registry itself knows nothing about charts.

pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod value;

pub use dispatcher::Dispatcher;
pub use error::{BindingError, BindingResult};
pub use registry::{Binding, BindingRegistry, Callback};
pub use value::ControlValue;
