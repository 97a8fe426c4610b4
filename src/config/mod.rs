//! Layered YAML configuration.
//!
//! A [`ConfigProfile`] names a configuration and the directories it is read
//! from. Loading a profile:
//! 1. **Resolve** candidate files, lowest to highest priority: for each
//!    directory `{slug}.yml` then `{slug}.{env}.yml`, and finally the lock
//!    snapshot `{lock_dir}/{slug}.lock.yml`
//! 2. **Merge** the files that exist, field-by-field (later files win)
//! 3. **Validate** the merged mapping against the profile's [`Schema`]
//!
//! ## Merge Strategy
//! - Mappings merge recursively
//! - Sequences, scalars and nulls replace the lower-priority value
//!
//! ## Environment Variables
//! - `{SLUG}_ENV` - Environment name selecting `{slug}.{env}.yml`
//! - `{SLUG}_CONFIG_DIRS` - Comma-separated extra directories, searched after the profile's own

mod cache;
mod loader;
mod lock;
mod merge;
mod paths;
mod profile;
mod resolved;
mod schema;

pub use cache::ConfigCache;
pub use loader::{MergedLayers, load_file, load_merged};
pub use lock::{remove_snapshot, write_snapshot};
pub use merge::{deep_merge, deep_merge_all, merge_maps};
pub use paths::{CandidatePath, PathOrigin, SearchPaths};
pub use profile::{CONFIG_DIRS_SUFFIX, ConfigProfile, ENV_SUFFIX};
pub use resolved::ResolvedConfig;
pub use schema::{ExtraKeys, Field, Kind, Schema};
