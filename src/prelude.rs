#[allow(unused_imports)]
pub use anyhow::{Context, Result, anyhow, bail};
#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn};
