//! Cliplane Timeline - Clip and track data model
//!
//! Implements the editable side of the timeline:
//! - Clips placed on parallel tracks, addressed by project-wide ids
//! - The clip store, sole owner of every track and clip
//! - Edit commands (move, resize, trim, cut, copy, paste) and the clipboard
//! - View state and the persisted session blob

pub mod clip;
pub mod edit;
pub mod serialization;
pub mod store;
pub mod track;
pub mod view;

pub use clip::{Clip, ClipData, ClipId, ClipPatch};
pub use edit::{Clipboard, EditCommand};
pub use serialization::SessionFile;
pub use store::ClipStore;
pub use track::{Track, TrackId};
pub use view::ViewState;
