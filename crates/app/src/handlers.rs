//! Built-in handlers that need nothing but the catalog and a clock.

pub mod delay;
pub mod device;
pub mod template;

pub use delay::DelayHandler;
pub use device::DeviceHandler;
pub use template::TemplateHandler;
