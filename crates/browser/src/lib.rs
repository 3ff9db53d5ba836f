pub mod chromium;
pub mod frame;
pub mod id;
pub mod loader;
pub mod resolver;
pub mod shared;
pub mod util;

pub use chromium::ChromiumDocument;
pub use frame::{DEFAULT_WAIT_MS, FrameClock, FrameWaiter, IntervalClock};
pub use id::generate_id;
pub use loader::{ResourceLoader, ScriptOptions};
pub use resolver::{Completion, DEFAULT_RESOLVER_TIMEOUT, Resolver, create_resolver};
pub use shared::LoaderConfig;
